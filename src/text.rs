//! Text sanitization for extracted document content.
//!
//! Everything an extraction backend produces passes through [`clean`] before
//! it becomes a CSV field. The result is always valid UTF-8 with no form
//! feeds and no NUL bytes.

/// Page break marker emitted by pdftotext and most OCR engines.
const FORM_FEED: char = '\x0C';

/// Normalize raw extracted bytes into a safe text field.
///
/// Applies, in order:
/// 1. UTF-8 decoding, falling back to lossy decoding (U+FFFD) for invalid sequences
/// 2. Form feed → newline
/// 3. NUL bytes removed
///
/// Never fails, and `clean(clean(x).as_bytes()) == clean(x)`.
pub fn clean(raw: &[u8]) -> String {
    let text = match std::str::from_utf8(raw) {
        Ok(valid) => std::borrow::Cow::Borrowed(valid),
        Err(_) => String::from_utf8_lossy(raw),
    };
    clean_str(&text)
}

/// Same as [`clean`] for text that is already valid UTF-8.
pub fn clean_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            FORM_FEED => out.push('\n'),
            '\0' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Whether `text` contains at least one alphabetic character, in any script.
///
/// A PDF whose text layer has no letters at all is treated as having no
/// extractable text and becomes an OCR candidate.
pub fn has_alphabetic(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}
