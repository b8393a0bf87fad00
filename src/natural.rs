use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare(a, b, false)
}

pub fn natural_case_cmp(a: &str, b: &str) -> Ordering {
    compare(a, b, true)
}

fn compare(a: &str, b: &str, ignore_case: bool) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let (l, r) = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => (l, r),
        };

        if l.is_ascii_digit() && r.is_ascii_digit() {
            let l_run = digit_run(&mut left);
            let r_run = digit_run(&mut right);
            match compare_numeric(&l_run, &r_run) {
                Ordering::Equal => continue,
                other => return other,
            }
        }

        let ordering = if ignore_case {
            l.to_lowercase().cmp(r.to_lowercase())
        } else {
            l.cmp(&r)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
        left.next();
        right.next();
    }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        // "007" after "7" so equal values still order deterministically
        .then_with(|| a.len().cmp(&b.len()))
}
