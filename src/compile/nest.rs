//! Matches `.loop` tags with their `/loop` end tags and splits a block body
//! into its row, divider and empty sections.
//!
//! All positions are byte offsets into the full template source so that
//! errors can point at the original text.

use crate::compile::params::LoopOptions;
use crate::types::ast::Tag;
use crate::types::span::Span;
use crate::types::syntax::Syntax;

/// The tag delimiters for the configured syntax.
#[derive(Debug, Clone)]
pub struct Markers {
    pub begin: String,
    pub end: String,
}

/// The regions of a block body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub row: Span,
    pub divider: Option<Span>,
    pub empty: Option<Span>,
}

/// What a tag means to the nesting matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A `.loop` tag that opens a block.
    Start,
    /// A `/loop` tag.
    End,
    /// A `.divider` tag.
    Divider,
    /// A `.onEmpty` tag.
    OnEmpty,
    Other,
}

impl Marker {
    /// Classifies a tag from its text with the delimiters removed.
    ///
    /// Whitespace around the tag text is ignored, so `{{ /loop }}` ends a
    /// block just like `{{/loop}}`.
    pub fn classify(inner: &str) -> Self {
        let tag = Tag::new(inner);
        if tag.is_loop_end() {
            return Self::End;
        }
        match inner.trim() {
            ".divider" => Self::Divider,
            ".onEmpty" => Self::OnEmpty,
            _ if tag.is_loop() && LoopOptions::parse(inner).has_body() => Self::Start,
            _ => Self::Other,
        }
    }
}

impl Markers {
    pub fn new(syntax: &Syntax) -> Self {
        Self {
            begin: syntax.begin_tag.clone(),
            end: syntax.end_tag.clone(),
        }
    }

    /// Finds the next complete tag at or after `at`.
    ///
    /// Tags are delimited exactly as the lexer delimits them. Returns `None`
    /// if there are no more tags or the next tag is never closed.
    fn next_tag(&self, text: &str, at: usize) -> Option<(Span, Marker)> {
        let i = at + text.get(at..)?.find(&self.begin)?;
        let after = i + self.begin.len();
        let close = after + text[after..].find(&self.end)?;
        let marker = Marker::classify(&text[after..close]);
        Some((Span::from(i..close + self.end.len()), marker))
    }

    /// Finds the `/loop` tag matching a block whose opening tag ends at
    /// `from`, skipping over complete nested blocks.
    ///
    /// Returns `None` if the block is never closed.
    pub fn find_block_end(&self, text: &str, from: usize) -> Option<Span> {
        let mut depth = 0usize;
        let mut at = from;
        loop {
            let (span, marker) = self.next_tag(text, at)?;
            match marker {
                Marker::Start => depth += 1,
                Marker::End if depth == 0 => return Some(span),
                Marker::End => depth -= 1,
                _ => {}
            }
            at = span.n;
        }
    }

    /// Returns the spans of complete nested blocks within `body`.
    ///
    /// An unclosed nested block stops the scan; the text after it is treated
    /// as part of the current block.
    pub fn off_limits(&self, text: &str, body: Span) -> Vec<Span> {
        let text = &text[..body.n];
        let mut spans = Vec::new();
        let mut at = body.m;
        while let Some((span, marker)) = self.next_tag(text, at) {
            if marker != Marker::Start {
                at = span.n;
                continue;
            }
            match self.find_block_end(text, span.n) {
                Some(end) => {
                    spans.push(Span::from(span.m..end.n));
                    at = end.n;
                }
                None => break,
            }
        }
        spans
    }

    /// Finds a `marker` tag within `body` but outside every off-limits span.
    pub fn find_outside(
        &self,
        text: &str,
        body: Span,
        marker: Marker,
        spans: &[Span],
    ) -> Option<Span> {
        let text = &text[..body.n];
        let mut spans = spans.iter().peekable();
        let mut at = body.m;
        loop {
            let (span, found) = self.next_tag(text, at)?;
            while spans.next_if(|s| s.n <= span.m).is_some() {}
            match spans.peek() {
                Some(s) if s.m <= span.m => at = s.n,
                _ if found == marker => return Some(span),
                _ => at = span.n,
            }
        }
    }

    /// Splits a block body on its top-level `.divider` and `.onEmpty`
    /// markers. Whichever marker comes first ends the row section.
    pub fn split_body(&self, text: &str, body: Span) -> Sections {
        let spans = self.off_limits(text, body);
        let divider = self.find_outside(text, body, Marker::Divider, &spans);
        let empty = self.find_outside(text, body, Marker::OnEmpty, &spans);
        match (divider, empty) {
            (None, None) => Sections {
                row: body,
                divider: None,
                empty: None,
            },
            (Some(d), None) => Sections {
                row: Span::from(body.m..d.m),
                divider: Some(Span::from(d.n..body.n)),
                empty: None,
            },
            (None, Some(e)) => Sections {
                row: Span::from(body.m..e.m),
                divider: None,
                empty: Some(Span::from(e.n..body.n)),
            },
            (Some(d), Some(e)) if d.m < e.m => Sections {
                row: Span::from(body.m..d.m),
                divider: Some(Span::from(d.n..e.m)),
                empty: Some(Span::from(e.n..body.n)),
            },
            (Some(d), Some(e)) => Sections {
                row: Span::from(body.m..e.m),
                divider: Some(Span::from(d.n..body.n)),
                empty: Some(Span::from(e.n..d.m)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Markers {
        Markers::new(&Syntax::default())
    }

    /// Returns the body following the first tag and the end tag span.
    fn block(text: &str) -> (Span, Span) {
        let m = markers();
        let open = text.find("}}").unwrap() + 2;
        let end = m.find_block_end(text, open).unwrap();
        (Span::from(open..end.m), end)
    }

    #[test]
    fn find_block_end_flat() {
        let text = "{{.loop ~x}}row{{/loop}}after";
        let (body, end) = block(text);
        assert_eq!(&text[body], "row");
        assert_eq!(&text[end], "{{/loop}}");
    }

    #[test]
    fn find_block_end_nested() {
        let text = "{{.loop ~a}}A{{.loop ~b}}B{{/loop}}C{{/loop}}D";
        let (body, _) = block(text);
        assert_eq!(&text[body], "A{{.loop ~b}}B{{/loop}}C");
    }

    #[test]
    fn find_block_end_unclosed() {
        let m = markers();
        let text = "{{.loop ~a}}A{{.loop ~b}}B{{/loop}}";
        assert_eq!(m.find_block_end(text, 12), None);
    }

    #[test]
    fn single_tag_loops_are_not_nesting() {
        let text = "{{.loop ~a}}A{{.loop(~b,row)}}{{.loop data=\"~c\" template=\"r\"}}B{{/loop}}C";
        let (body, _) = block(text);
        assert_eq!(
            &text[body],
            "A{{.loop(~b,row)}}{{.loop data=\"~c\" template=\"r\"}}B"
        );
    }

    #[test]
    fn loop_prefix_needs_a_boundary() {
        let text = "{{.loop ~a}}{{.loopy}}{{/loop}}";
        let (body, _) = block(text);
        assert_eq!(&text[body], "{{.loopy}}");
    }

    #[test]
    fn spaced_tags_nest() {
        let m = markers();
        let text = "{{.loop ~a}}A{{ .loop ~b}}B{{ .onEmpty }}N{{ /loop }}C{{.onEmpty}}E{{/loop}}D";
        let (body, end) = block(text);
        assert_eq!(end.n, text.len() - 1);
        let sections = m.split_body(text, body);
        assert_eq!(
            &text[sections.row],
            "A{{ .loop ~b}}B{{ .onEmpty }}N{{ /loop }}C"
        );
        assert_eq!(&text[sections.empty.unwrap()], "E");
    }

    #[test]
    fn classify_tags() {
        assert_eq!(Marker::classify(" /loop "), Marker::End);
        assert_eq!(Marker::classify(".loop ~x"), Marker::Start);
        assert_eq!(Marker::classify("  .loop ~x as y"), Marker::Start);
        assert_eq!(Marker::classify(".loop(~x,row)"), Marker::Other);
        assert_eq!(Marker::classify(".loopy"), Marker::Other);
        assert_eq!(Marker::classify(" .divider"), Marker::Divider);
        assert_eq!(Marker::classify(".onEmpty "), Marker::OnEmpty);
        assert_eq!(Marker::classify("/loop x"), Marker::Other);
    }

    #[test]
    fn split_body_ignores_nested_markers() {
        let m = markers();
        let text = "{{.loop ~outer}}A{{.loop ~inner}}X{{.onEmpty}}Y{{/loop}}B{{.onEmpty}}Z{{/loop}}";
        let (body, _) = block(text);
        let sections = m.split_body(text, body);
        assert_eq!(
            &text[sections.row],
            "A{{.loop ~inner}}X{{.onEmpty}}Y{{/loop}}B"
        );
        assert_eq!(sections.divider, None);
        assert_eq!(&text[sections.empty.unwrap()], "Z");
    }

    #[test]
    fn split_body_divider_then_empty() {
        let m = markers();
        let text = "{{.loop ~x}}R{{.divider}}D{{.onEmpty}}E{{/loop}}";
        let (body, _) = block(text);
        let sections = m.split_body(text, body);
        assert_eq!(&text[sections.row], "R");
        assert_eq!(&text[sections.divider.unwrap()], "D");
        assert_eq!(&text[sections.empty.unwrap()], "E");
    }

    #[test]
    fn split_body_empty_then_divider() {
        let m = markers();
        let text = "{{.loop ~x}}R{{.onEmpty}}E{{.divider}}D{{/loop}}";
        let (body, _) = block(text);
        let sections = m.split_body(text, body);
        assert_eq!(&text[sections.row], "R");
        assert_eq!(&text[sections.divider.unwrap()], "D");
        assert_eq!(&text[sections.empty.unwrap()], "E");
    }

    #[test]
    fn split_body_without_markers() {
        let m = markers();
        let text = "{{.loop ~x}}just a row{{/loop}}";
        let (body, _) = block(text);
        let sections = m.split_body(text, body);
        assert_eq!(sections.row, body);
        assert_eq!(sections.divider, None);
        assert_eq!(sections.empty, None);
    }

    #[test]
    fn off_limits_stops_at_unclosed_nested_block() {
        let m = markers();
        let text = "R{{.loop ~y}}{{.onEmpty}}E";
        let body = Span::from(0..text.len());
        assert!(m.off_limits(text, body).is_empty());
        let sections = m.split_body(text, body);
        assert_eq!(&text[sections.row], "R{{.loop ~y}}");
        assert_eq!(&text[sections.empty.unwrap()], "E");
    }

    #[test]
    fn custom_delimiters() {
        let syntax = Syntax::builder().tag("<%", "%>").build();
        let m = Markers::new(&syntax);
        let text = "<%.loop ~a%>A<%.divider%>,<%/loop%>";
        let end = m.find_block_end(text, 12).unwrap();
        let sections = m.split_body(text, Span::from(12..end.m));
        assert_eq!(&text[sections.row], "A");
        assert_eq!(&text[sections.divider.unwrap()], ",");
    }
}
