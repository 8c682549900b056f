//! Builtin filters for marking form options.
//!
//! `{{~color|sel(red)}}` outputs ` selected="selected" ` when the value of
//! `color` is `red` and nothing otherwise. A test value starting with `~` or
//! `$` is looked up as a tag first, and an optional second argument replaces
//! the output token.

use crate::value::{Chunk, Value};

const SELECTED: &str = r#" selected="selected" "#;
const CHECKED: &str = r#" checked="checked" "#;

/// Outputs ` selected="selected" ` if the value equals the argument.
pub fn selected(chunk: &Chunk<'_>, value: &str, args: &[&str]) -> String {
    mark(chunk, value, args, SELECTED)
}

/// Outputs ` checked="checked" ` if the value equals the argument.
pub fn checked(chunk: &Chunk<'_>, value: &str, args: &[&str]) -> String {
    mark(chunk, value, args, CHECKED)
}

fn mark(chunk: &Chunk<'_>, value: &str, args: &[&str], token: &str) -> String {
    let Some(&test) = args.first() else {
        return token.to_owned();
    };
    let token = args.get(1).copied().unwrap_or(token);
    let test = match test.strip_prefix(['~', '$']) {
        Some(name) => match chunk.get(name) {
            Some(Value::String(s)) => s.as_str(),
            _ => return String::new(),
        },
        None => test,
    };
    if value == test {
        token.to_owned()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_literal() {
        let chunk = Chunk::new();
        assert_eq!(selected(&chunk, "red", &["red"]), SELECTED);
        assert_eq!(selected(&chunk, "red", &["blue"]), "");
    }

    #[test]
    fn selected_without_argument() {
        let chunk = Chunk::new();
        assert_eq!(selected(&chunk, "anything", &[]), SELECTED);
    }

    #[test]
    fn checked_tag_reference() {
        let mut chunk = Chunk::new();
        chunk.set("choice", "b");
        assert_eq!(checked(&chunk, "b", &["~choice"]), CHECKED);
        assert_eq!(checked(&chunk, "a", &["~choice"]), "");
        assert_eq!(checked(&chunk, "a", &["~missing"]), "");
    }

    #[test]
    fn custom_token() {
        let chunk = Chunk::new();
        assert_eq!(selected(&chunk, "x", &["x", "active"]), "active");
    }
}
