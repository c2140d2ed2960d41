//! Display-column measurement.
//!
//! Terminal and Gemini layout count columns, not bytes: East-Asian wide
//! glyphs occupy two columns, combining marks zero.  Input is always valid
//! UTF-8 here, so the byte-count fallback of the classic `mbswidth` never
//! triggers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// The display width of a whole string, in columns.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// The display width of a single character; control characters count zero.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}
