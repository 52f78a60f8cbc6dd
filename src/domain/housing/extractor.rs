//! JSON object extraction from model output.
//!
//! Models frequently wrap the requested JSON in markdown fences or surround
//! it with prose. [`extract_json_object`] locates the first balanced top-level
//! object with a small state machine; braces inside string values are
//! ignored.

use thiserror::Error;

const FENCE: &str = "```";

/// Errors that can occur while locating JSON in raw model text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// No `{` in the text, or the first `{` is never closed.
    #[error("No JSON object found in response")]
    NoJsonFound,
}

/// Scanner position relative to JSON string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal; braces count.
    Structural,
    /// Inside a double-quoted string literal.
    InString,
    /// Directly after a backslash inside a string literal.
    Escaped,
}

/// Returns the outermost balanced JSON object in `raw`.
///
/// Surrounding whitespace and a leading code fence (with optional language
/// tag) are stripped first. The result borrows from `raw` and runs from the
/// first `{` to its matching `}` inclusive.
///
/// # Errors
///
/// Returns [`ExtractionError::NoJsonFound`] for empty input, input without
/// `{`, or input whose first object is never closed.
pub fn extract_json_object(raw: &str) -> Result<&str, ExtractionError> {
    let text = strip_code_fence(raw.trim());
    let start = text.find('{').ok_or(ExtractionError::NoJsonFound)?;
    let candidate = &text[start..];
    let end = matching_close(candidate).ok_or(ExtractionError::NoJsonFound)?;
    Ok(&candidate[..=end])
}

fn strip_code_fence(text: &str) -> &str {
    let Some(after_marker) = text.strip_prefix(FENCE) else {
        return text;
    };

    // Language tag, e.g. ```json or ```JSON5
    let body = after_marker
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
        .trim();

    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Byte offset of the `}` closing the object that opens at offset 0.
fn matching_close(text: &str) -> Option<usize> {
    let mut state = ScanState::Structural;
    let mut depth: usize = 0;

    for (index, c) in text.char_indices() {
        state = match (state, c) {
            (ScanState::Escaped, _) => ScanState::InString,
            (ScanState::InString, '\\') => ScanState::Escaped,
            (ScanState::InString, '"') => ScanState::Structural,
            (ScanState::InString, _) => ScanState::InString,
            (ScanState::Structural, '"') => ScanState::InString,
            (ScanState::Structural, '{') => {
                depth += 1;
                ScanState::Structural
            }
            (ScanState::Structural, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
                ScanState::Structural
            }
            (ScanState::Structural, _) => ScanState::Structural,
        };
    }

    None
}
