//! Whitespace trimming of compiled block sections.

use crate::compile::params::Trim;
use crate::types::ast::{Part, Snippet};

/// Trims the edges of a compiled section according to `mode`.
pub fn section(mode: Trim, snippet: &mut Snippet) {
    match mode {
        Trim::None => {}
        Trim::All => {
            if let Some(Part::Literal(text)) = snippet.parts.first_mut() {
                *text = text.trim_start().to_owned();
            }
            if let Some(Part::Literal(text)) = snippet.parts.last_mut() {
                *text = text.trim_end().to_owned();
            }
        }
        Trim::Smart => {
            if let Some(Part::Literal(text)) = snippet.parts.first_mut() {
                *text = smart(text).to_owned();
            }
        }
    }
    snippet
        .parts
        .retain(|part| !matches!(part, Part::Literal(text) if text.is_empty()));
}

/// Removes a blank first line, including its line break, and the indentation
/// of the line after it.
///
/// If the text does not start with a blank line then it is stripped of
/// whitespace at both ends instead.
pub fn smart(text: &str) -> &str {
    if let Some(i) = text.find(['\n', '\r']) {
        if text[..i].trim().is_empty() {
            let rest = &text[i..];
            let len = if rest.starts_with("\r\n") || rest.starts_with("\r\r") {
                2
            } else {
                1
            };
            return text[i + len..].trim_start_matches([' ', '\t']);
        }
    }
    text.trim()
}
