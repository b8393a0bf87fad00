use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::{BLAST_FORMAT, Bank, Catalog, Release, SectionMap};
use crate::error::BiomajError;

pub const MAX_SECTION_DEPTH: usize = 64;

pub fn parse_catalog(bytes: &[u8]) -> Result<Catalog, BiomajError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(BiomajError::MalformedResponse("empty body".to_string()));
    }
    let json: Value = serde_json::from_slice(bytes)
        .map_err(|err| BiomajError::MalformedResponse(err.to_string()))?;
    let entries = json
        .get("banks")
        .and_then(Value::as_array)
        .ok_or_else(|| BiomajError::MalformedResponse("missing `banks` array".to_string()))?;

    let mut catalog = Catalog::new();
    for entry in entries {
        if let Some(bank) = parse_bank(entry)? {
            catalog.insert(bank);
        }
    }
    tracing::debug!(
        received = entries.len(),
        kept = catalog.len(),
        "parsed BioMaj catalog"
    );
    Ok(catalog)
}

pub fn parse_bank(json: &Value) -> Result<Option<Bank>, BiomajError> {
    let name = string_field(json, "name");
    let current_release = string_field(json, "current_release");
    let last_update = string_field(json, "session_date");
    let db_type = string_field(json, "db_type");

    let (Some(name), Some(current_release), Some(last_update), Some(db_type)) =
        (name, current_release, last_update, db_type)
    else {
        return Ok(None);
    };

    let mut releases = Vec::new();
    if let Some(entries) = json.get("releases").and_then(Value::as_object) {
        for (release_name, release) in entries {
            releases.push(parse_release(
                release_name,
                release,
                release_name == &current_release,
            )?);
        }
    }

    Ok(Some(Bank::new(
        name,
        last_update,
        db_type,
        current_release,
        releases,
    )))
}

fn parse_release(name: &str, json: &Value, is_current: bool) -> Result<Release, BiomajError> {
    let root_dir = string_field(json, "path").unwrap_or_default();
    let mut formats = Vec::new();
    let mut format_sections: Vec<(String, SectionMap)> = Vec::new();

    for format in json
        .get("formats")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let Some(id) = string_field(format, "value") else {
            continue;
        };
        let sections = map_sections(format, &id, "")?;
        formats.push(id.clone());
        match format_sections.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = sections,
            None => format_sections.push((id, sections)),
        }
    }

    Ok(Release {
        name: name.to_string(),
        root_dir,
        is_current,
        formats,
        format_sections,
    })
}

pub fn map_sections(node: &Value, format: &str, prefix: &str) -> Result<SectionMap, BiomajError> {
    map_sections_at(node, format, prefix, 0)
}

fn map_sections_at(
    node: &Value,
    format: &str,
    prefix: &str,
    depth: usize,
) -> Result<SectionMap, BiomajError> {
    if depth > MAX_SECTION_DEPTH {
        return Err(BiomajError::MalformedResponse(format!(
            "sections nested deeper than {MAX_SECTION_DEPTH} levels under {prefix}"
        )));
    }

    let mut result = SectionMap::new();

    if let Some(sections) = node.get("sections").and_then(Value::as_array) {
        for section in sections {
            let name = string_field(section, "name").unwrap_or_default();
            let child_prefix = format!("{prefix}/{name}");
            result.extend(map_sections_at(section, format, &child_prefix, depth + 1)?);
        }
    }

    if let Some(files) = node.get("files").and_then(Value::as_array) {
        for file in files.iter().filter_map(Value::as_str) {
            let leaf = if format == BLAST_FORMAT {
                strip_extension(file)
            } else {
                file
            };
            result.insert(prefix, leaf);
        }
    }

    Ok(result)
}

// nr.00.pin -> nr.00
pub fn strip_extension(file: &str) -> &str {
    static EXTENSION: OnceLock<Regex> = OnceLock::new();
    let regex = EXTENSION.get_or_init(|| Regex::new(r"^(.*)\.(.*)$").expect("valid regex"));
    regex
        .captures(file)
        .and_then(|captures| captures.get(1))
        .map(|base| base.as_str())
        .unwrap_or(file)
}

fn string_field(json: &Value, key: &str) -> Option<String> {
    match json.get(key)? {
        Value::String(value) if !value.is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}
