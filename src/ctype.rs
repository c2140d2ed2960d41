//! Byte classification, C-locale flavoured.
//!
//! The renderers split and trim on ASCII whitespace at the byte level;
//! multi-byte sequences never contain these values, so slicing at the
//! boundaries found here keeps strings valid UTF-8.

pub fn isspace(ch: u8) -> bool {
    matches!(ch, b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r' | b' ')
}
