use crate::compile::lex::{Lexer, Token};
use crate::compile::nest::Markers;
use crate::compile::params::LoopOptions;
use crate::compile::trim;
use crate::tracing_macros::trace;
use crate::types::ast::{LoopBlock, Part, Snippet, Tag};
use crate::types::span::Span;
use crate::{Error, Result};

/// A parser that builds a [`Snippet`] from a region of the template source.
///
/// Block bodies are located with the nesting matcher and each section is
/// parsed by a new parser over the section's region.
pub struct Parser<'engine, 'source> {
    markers: &'engine Markers,
    source: &'source str,
    max_depth: usize,
}

impl<'engine, 'source> Parser<'engine, 'source> {
    pub fn new(markers: &'engine Markers, source: &'source str, max_depth: usize) -> Self {
        Self {
            markers,
            source,
            max_depth,
        }
    }

    /// Parse the full template source.
    pub fn parse_template(&self) -> Result<Snippet> {
        self.parse_snippet(Span::from(0..self.source.len()), 0)
    }

    fn parse_snippet(&self, region: Span, depth: usize) -> Result<Snippet> {
        let mut lexer = Lexer::new(self.markers, self.source, region);
        let mut parts = Vec::new();
        while let Some((token, span)) = lexer.next()? {
            match token {
                Token::Raw => parts.push(Part::Literal(self.source[span].to_owned())),
                Token::Tag => {
                    let inner = &self.source[lexer.inner(span)];
                    let tag = Tag::new(inner);
                    if tag.is_loop_end() {
                        return Err(Error::syntax("unexpected `/loop` tag", self.source, span));
                    }
                    if !tag.is_loop() {
                        parts.push(Part::Tag(tag));
                        continue;
                    }
                    let options = LoopOptions::parse(inner);
                    if !options.has_body() {
                        parts.push(Part::Tag(tag));
                        continue;
                    }
                    let text = &self.source[..region.n];
                    let end = self.markers.find_block_end(text, span.n).ok_or_else(|| {
                        Error::syntax("unclosed `.loop` block", self.source, span)
                    })?;
                    let body = Span::from(span.n..end.m);
                    let block = self.parse_block(tag, options, span, body, depth + 1)?;
                    parts.push(Part::Loop(Box::new(block)));
                    lexer.seek(end.n);
                }
            }
        }
        Ok(Snippet { parts })
    }

    fn parse_block(
        &self,
        tag: Tag,
        options: LoopOptions,
        span: Span,
        body: Span,
        depth: usize,
    ) -> Result<LoopBlock> {
        if depth > self.max_depth {
            return Err(Error::syntax(
                format!("reached maximum nesting depth ({})", self.max_depth),
                self.source,
                span,
            ));
        }
        let sections = self.markers.split_body(self.source, body);
        trace!(?sections, "split loop block");

        let section = |region: Span| -> Result<Snippet> {
            let mut snippet = self.parse_snippet(region, depth)?;
            trim::section(options.trim(), &mut snippet);
            Ok(snippet)
        };
        let row = section(sections.row)?;
        let divider = sections.divider.map(section).transpose()?;
        let empty = sections.empty.map(section).transpose()?;

        Ok(LoopBlock {
            tag,
            options,
            row,
            divider,
            empty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Syntax;

    fn parse(source: &str) -> Result<Snippet> {
        let markers = Markers::new(&Syntax::default());
        Parser::new(&markers, source, 64).parse_template()
    }

    #[test]
    fn parse_literals_and_tags() {
        let snippet = parse("Hi {{~name}}!").unwrap();
        assert_eq!(
            snippet.parts(),
            [
                Part::Literal("Hi ".into()),
                Part::Tag(Tag::new("~name")),
                Part::Literal("!".into()),
            ]
        );
    }

    #[test]
    fn parse_block_sections() {
        let snippet = parse("{{.loop ~x}}\n<{{~v}}>{{.divider}},{{.onEmpty}}none{{/loop}}!").unwrap();
        let [Part::Loop(block), Part::Literal(after)] = snippet.parts() else {
            panic!("unexpected parts: {:?}", snippet.parts());
        };
        assert_eq!(after, "!");
        assert_eq!(block.options().data(), Some("~x"));
        assert_eq!(
            block.row().parts(),
            [
                Part::Literal("<".into()),
                Part::Tag(Tag::new("~v")),
                Part::Literal(">".into()),
            ]
        );
        assert_eq!(block.divider(), Some(&Snippet::literal(",")));
        assert_eq!(block.empty(), Some(&Snippet::literal("none")));
    }

    #[test]
    fn parse_nested_blocks() {
        let snippet = parse("{{.loop ~a}}A{{.loop ~b}}B{{/loop}}{{/loop}}").unwrap();
        let [Part::Loop(outer)] = snippet.parts() else {
            panic!("unexpected parts: {:?}", snippet.parts());
        };
        let [Part::Literal(a), Part::Loop(inner)] = outer.row().parts() else {
            panic!("unexpected parts: {:?}", outer.row().parts());
        };
        assert_eq!(a, "A");
        assert_eq!(inner.row(), &Snippet::literal("B"));
    }

    #[test]
    fn parse_single_tag_loop_is_a_tag() {
        let snippet = parse("{{.loop(~a,row)}}").unwrap();
        assert_eq!(snippet.parts(), [Part::Tag(Tag::new(".loop(~a,row)"))]);
    }

    #[test]
    fn parse_err_unclosed_block() {
        let err = parse("a {{.loop ~x}} b").unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "
   |
 1 | a {{.loop ~x}} b
   |   ^^^^^^^^^^^^ unclosed `.loop` block
"
        );
    }

    #[test]
    fn parse_err_unexpected_end() {
        let err = parse("a {{/loop}}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected `/loop` tag between bytes 2 and 11"
        );
    }

    #[test]
    fn parse_err_too_deep() {
        let markers = Markers::new(&Syntax::default());
        let source = "{{.loop ~a}}{{.loop ~b}}{{/loop}}{{/loop}}";
        let err = Parser::new(&markers, source, 1).parse_template().unwrap_err();
        assert_eq!(
            err.to_string(),
            "reached maximum nesting depth (1) between bytes 12 and 24"
        );
    }
}
