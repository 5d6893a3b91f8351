//! Byte-level cleanup for vendor spreadsheet exports.
//!
//! Files arrive as CSV saved from Excel on Windows machines, so the
//! encoding is unreliable: sometimes UTF-8 (with or without BOM),
//! sometimes Latin-1. Accented column names ("Código Barras") are the
//! usual casualty.

use std::borrow::Cow;

/// Column tokens that mark the real header row, including the mojibake
/// forms produced when a Latin-1 file was read as UTF-8 upstream.
const HEADER_TOKENS: &[&str] = &["Código Barras", "C\u{fffd}digo Barras", "Codigo Barras"];

/// Decode file bytes to text, trying UTF-8 first and falling back to
/// Latin-1 when the UTF-8 reading produced replacement characters.
/// Strips a leading BOM either way.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let utf8 = String::from_utf8_lossy(bytes);
    let text: Cow<'_, str> = if utf8.contains('\u{fffd}') {
        encoding_rs::mem::decode_latin1(bytes)
    } else {
        utf8
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text.into_owned(),
    }
}

/// Find the line index of the real header row, skipping any vendor
/// preamble (store name, address, export timestamp).
pub fn find_header_line(text: &str) -> Option<usize> {
    text.lines()
        .position(|line| HEADER_TOKENS.iter().any(|t| line.contains(t)))
}

/// Drop everything before the header row. When no header token is found
/// the text is returned unchanged and parsing starts at the first line.
pub fn strip_preamble(text: &str) -> Cow<'_, str> {
    match find_header_line(text) {
        Some(0) | None => Cow::Borrowed(text),
        Some(idx) => {
            let joined = text
                .lines()
                .skip(idx)
                .collect::<Vec<_>>()
                .join("\n");
            Cow::Owned(joined)
        }
    }
}
