//! Small string utilities for document metadata.

/// Canonicalize a user-supplied date to `YYYY-MM-DD`.
///
/// Accepts `/` or `-` separators and unpadded month/day.  Returns `None`
/// for anything else; callers fall back to the raw value.
pub fn date2str(s: &str) -> Option<String> {
    let s = s.trim();
    let sep = if s.contains('/') { '/' } else { '-' };
    let mut parts = s.split(sep);

    let year: u32 = parse_component(parts.next()?, 4)?;
    let month: u32 = parse_component(parts.next()?, 2)?;
    let day: u32 = parse_component(parts.next()?, 2)?;
    if parts.next().is_some() {
        return None;
    }
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}

fn parse_component(s: &str, max_digits: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_digits || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Extract `YYYY-MM-DD` from an RCS `$Date$` keyword expansion such as
/// `$Date: 2021/03/31 13:08:30 $`.
pub fn rcsdate2str(s: &str) -> Option<String> {
    let inner = rcs_keyword(s, "Date")?;
    date2str(inner.split_ascii_whitespace().next()?)
}

/// Extract the user name from an RCS `$Author$` keyword expansion such as
/// `$Author: kristaps $`.
pub fn rcsauthor2str(s: &str) -> Option<String> {
    let inner = rcs_keyword(s, "Author")?;
    let name = inner.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn rcs_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let s = s.trim();
    let rest = s.strip_prefix('$')?.strip_prefix(keyword)?.strip_prefix(':')?;
    rest.split('$').next()
}
