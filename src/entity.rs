//! Named-entity resolution and UTF-8 emission.

use std::fmt::{self, Write};

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

/// Resolve an HTML named or numeric entity to a Unicode code point, or 0
/// if unknown.
///
/// Accepts the entity text with or without the `&`/`;` wrapping, as it
/// appears in entity nodes.  Numeric references (`#123`, `#x7F`) are
/// decoded; malformed ones resolve to 0.
pub fn find_iso(text: &str) -> u32 {
    let mut name = text.strip_prefix('&').unwrap_or(text);
    name = name.strip_suffix(';').unwrap_or(name);

    if name.is_empty() {
        return 0;
    }

    if let Some(num) = name.strip_prefix('#') {
        let parsed = match num.strip_prefix(['x', 'X']) {
            Some(hex) if !hex.is_empty() => u32::from_str_radix(hex, 16),
            Some(_) => return 0,
            None => num.parse::<u32>(),
        };
        return parsed.unwrap_or(0);
    }

    match entitydata::SCALAR_ENTITIES.binary_search_by_key(&name, |&(n, _)| n) {
        Ok(ix) => entitydata::SCALAR_ENTITIES[ix].1,
        Err(_) => 0,
    }
}

/// Write the code point `cp` as a UTF-8 sequence.
///
/// Surrogate halves, zero, and values beyond U+10FFFF emit nothing; there
/// is no error channel for bad input, only for the write itself.
pub fn write_utf8(output: &mut dyn Write, cp: u32) -> fmt::Result {
    match char::from_u32(cp) {
        Some(c) if cp > 0 => output.write_char(c),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_entities_resolve() {
        assert_eq!(find_iso("amp"), '&' as u32);
        assert_eq!(find_iso("&amp;"), '&' as u32);
        assert_eq!(find_iso("nbsp"), 0xa0);
        assert_eq!(find_iso("hellip"), 0x2026);
    }

    #[test]
    fn case_matters() {
        assert_eq!(find_iso("Aacute"), 0xc1);
        assert_eq!(find_iso("aacute"), 0xe1);
    }

    #[test]
    fn unknown_entities_resolve_to_zero() {
        assert_eq!(find_iso("notanentity"), 0);
        assert_eq!(find_iso(""), 0);
        assert_eq!(find_iso("&;"), 0);
    }

    #[test]
    fn numeric_references() {
        assert_eq!(find_iso("#65"), 65);
        assert_eq!(find_iso("&#8617;"), 8617);
        assert_eq!(find_iso("#x7F"), 0x7f);
        assert_eq!(find_iso("#X7f"), 0x7f);
        assert_eq!(find_iso("#"), 0);
        assert_eq!(find_iso("#x"), 0);
        assert_eq!(find_iso("#12a"), 0);
    }

    #[test]
    fn utf8_round_trip() {
        for &cp in &[0x41u32, 0xa0, 0x7ff, 0x800, 0xffff, 0x10000, 0x10ffff] {
            let mut s = String::new();
            write_utf8(&mut s, cp).unwrap();
            let mut chars = s.chars();
            assert_eq!(chars.next().map(|c| c as u32), Some(cp));
            assert_eq!(chars.next(), None);
        }
    }

    #[test]
    fn surrogates_and_overflow_emit_nothing() {
        for &cp in &[0u32, 0xd800, 0xdfff, 0x110000] {
            let mut s = String::new();
            write_utf8(&mut s, cp).unwrap();
            assert_eq!(s, "");
        }
    }
}
