//! The compiled representation of a template.

use crate::compile::LoopOptions;

/// A compiled template body: an ordered list of parts.
///
/// Snippets are immutable once compiled and may be shared freely between
/// threads and concurrent renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snippet {
    pub(crate) parts: Vec<Part>,
}

/// One element of a [`Snippet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Raw text that is output verbatim.
    Literal(String),
    /// A tag that is resolved at render time.
    Tag(Tag),
    /// A `.loop` block with its sections already compiled.
    Loop(Box<LoopBlock>),
}

/// The text of a tag with the delimiters removed, e.g. `~name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    raw: String,
}

/// A compiled `.loop ... /loop` block.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopBlock {
    pub(crate) tag: Tag,
    pub(crate) options: LoopOptions,
    pub(crate) row: Snippet,
    pub(crate) divider: Option<Snippet>,
    pub(crate) empty: Option<Snippet>,
}

impl Snippet {
    pub(crate) const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Construct a snippet containing a single literal.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Literal(text.into())],
        }
    }

    /// Returns the parts of this snippet in order.
    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns true if this snippet has no parts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Tag {
    /// Construct a tag from its text without delimiters.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the tag text without delimiters.
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the leading token of the tag, e.g. `.loop` or `~name`.
    pub fn name(&self) -> &str {
        let raw = self.raw.trim_start();
        let end = raw
            .find(|c: char| c.is_whitespace() || c == '(' || c == '|')
            .unwrap_or(raw.len());
        &raw[..end]
    }

    /// Returns true if this is a `.loop` tag.
    pub fn is_loop(&self) -> bool {
        self.name() == ".loop"
    }

    /// Returns true if this is a `/loop` tag.
    pub fn is_loop_end(&self) -> bool {
        self.raw.trim() == "/loop"
    }
}

impl LoopBlock {
    /// Returns the opening tag of the block.
    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Returns the parsed options of the opening tag.
    #[inline]
    pub fn options(&self) -> &LoopOptions {
        &self.options
    }

    /// Returns the row section, rendered once per record.
    #[inline]
    pub fn row(&self) -> &Snippet {
        &self.row
    }

    /// Returns the divider section, rendered between rows.
    #[inline]
    pub fn divider(&self) -> Option<&Snippet> {
        self.divider.as_ref()
    }

    /// Returns the empty section, rendered when there are no rows.
    #[inline]
    pub fn empty(&self) -> Option<&Snippet> {
        self.empty.as_ref()
    }
}
