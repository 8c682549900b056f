use crate::compile::nest::Markers;
use crate::types::span::Span;
use crate::{Error, Result};

/// A lexer that splits a region of the template source into raw text and
/// tags.
///
/// The lexer is implemented as a fallible iterator. The parser should
/// repeatedly call the [`.next()?`][Lexer::next] method until [`None`] is
/// returned. Spans are always relative to the full template source.
#[derive(Debug)]
pub struct Lexer<'engine, 'source> {
    markers: &'engine Markers,

    /// The original template source.
    pub source: &'source str,

    /// A cursor over the template source.
    cursor: usize,

    /// The end of the region being lexed.
    end: usize,
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Raw template text.
    Raw,
    /// A complete tag, including its delimiters.
    Tag,
}

impl<'engine, 'source> Lexer<'engine, 'source> {
    pub fn new(markers: &'engine Markers, source: &'source str, region: Span) -> Self {
        Self {
            markers,
            source,
            cursor: region.m,
            end: region.n,
        }
    }

    /// Moves the cursor forward, e.g. past the end of a block.
    pub fn seek(&mut self, i: usize) {
        self.cursor = i;
    }

    /// Returns the span of a tag with its delimiters removed.
    pub fn inner(&self, tag: Span) -> Span {
        Span::from(tag.m + self.markers.begin.len()..tag.n - self.markers.end.len())
    }

    /// Returns the next token and its span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        let i = self.cursor;
        if i >= self.end {
            return Ok(None);
        }
        let region = &self.source[..self.end];
        match region[i..].find(&self.markers.begin) {
            Some(0) => {
                let after = i + self.markers.begin.len();
                match region[after..].find(&self.markers.end) {
                    Some(j) => {
                        let n = after + j + self.markers.end.len();
                        self.cursor = n;
                        Ok(Some((Token::Tag, Span::from(i..n))))
                    }
                    None => Err(Error::syntax(
                        "unclosed tag",
                        self.source,
                        i..after,
                    )),
                }
            }
            Some(j) => {
                self.cursor = i + j;
                Ok(Some((Token::Raw, Span::from(i..i + j))))
            }
            None => {
                self.cursor = self.end;
                Ok(Some((Token::Raw, Span::from(i..self.end))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Syntax;

    #[track_caller]
    fn lex(source: &str) -> Result<Vec<(Token, &str)>> {
        let markers = Markers::new(&Syntax::default());
        let mut lexer = Lexer::new(&markers, source, Span::from(0..source.len()));
        let mut tokens = Vec::new();
        while let Some((tk, sp)) = lexer.next()? {
            tokens.push((tk, &source[sp]));
        }
        Ok(tokens)
    }

    #[test]
    fn lex_empty() {
        assert!(lex("").unwrap().is_empty());
    }

    #[test]
    fn lex_raw_and_tags() {
        let tokens = lex("Hello {{~name}}!{{.loop ~x}}").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Raw, "Hello "),
                (Token::Tag, "{{~name}}"),
                (Token::Raw, "!"),
                (Token::Tag, "{{.loop ~x}}"),
            ]
        );
    }

    #[test]
    fn lex_err_unclosed_tag() {
        let err = lex("lorem {{ ipsum").unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "
   |
 1 | lorem {{ ipsum
   |       ^^ unclosed tag
"
        );
    }
}
