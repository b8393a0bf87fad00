use assert_matches::assert_matches;

use biomaj_catalog::error::BiomajError;
use biomaj_catalog::validate::PrefixConstraint;

#[test]
fn path_below_prefix_is_accepted() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().canonicalize().unwrap();
    let bank_dir = root.join("genbank").join("blast");
    std::fs::create_dir_all(&bank_dir).unwrap();

    let constraint = PrefixConstraint::new(root.to_str().unwrap()).unwrap();
    // blast databases are referenced without extension, only the directory exists
    let candidate = bank_dir.join("nt");
    assert!(constraint.validate(Some(candidate.to_str().unwrap())).is_ok());
}

#[test]
fn absent_value_is_accepted() {
    let constraint = PrefixConstraint::new("/db").unwrap();
    assert!(constraint.validate(None).is_ok());
}

#[test]
fn missing_directory_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().canonicalize().unwrap();
    let constraint = PrefixConstraint::new(root.to_str().unwrap()).unwrap();
    let candidate = root.join("nowhere").join("nt");
    assert_matches!(
        constraint.validate(Some(candidate.to_str().unwrap())),
        Err(BiomajError::PathNotFound(_))
    );
}

#[test]
fn path_outside_prefix_is_rejected() {
    let trusted = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let trusted_root = trusted.path().canonicalize().unwrap();
    let outside = other.path().canonicalize().unwrap().join("nt");

    let constraint = PrefixConstraint::new(trusted_root.to_str().unwrap()).unwrap();
    assert_matches!(
        constraint.validate(Some(outside.to_str().unwrap())),
        Err(BiomajError::PrefixMismatch { .. })
    );
}

#[test]
fn dot_dot_segments_are_resolved_before_comparing() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().canonicalize().unwrap();
    let trusted = root.join("db");
    std::fs::create_dir_all(&trusted).unwrap();
    std::fs::create_dir_all(root.join("private")).unwrap();

    let constraint = PrefixConstraint::new(trusted.to_str().unwrap()).unwrap();
    let escaping = trusted.join("..").join("private").join("secret");
    assert_matches!(
        constraint.validate(Some(escaping.to_str().unwrap())),
        Err(BiomajError::PrefixMismatch { .. })
    );
}

#[test]
fn filesystem_root_is_checked_itself() {
    // the working directory must not stand in for `/`
    let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();
    let constraint = PrefixConstraint::new(cwd.to_str().unwrap()).unwrap();
    assert_matches!(
        constraint.validate(Some("/")),
        Err(BiomajError::PrefixMismatch { .. })
    );

    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().canonicalize().unwrap();
    let constraint = PrefixConstraint::new(root.to_str().unwrap()).unwrap();
    assert_matches!(
        constraint.validate(Some("/")),
        Err(BiomajError::PrefixMismatch { .. })
    );
}
