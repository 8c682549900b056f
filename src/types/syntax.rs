/// The template syntax configuration.
///
/// Use [`Syntax::default()`] to get the default syntax configuration and
/// [`Syntax::builder()`] to create a custom syntax configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub(crate) begin_tag: String,
    pub(crate) end_tag: String,
}

/// A builder for the syntax configuration.
///
/// This struct is typically created using [`Syntax::builder()`].
#[derive(Debug, Clone)]
pub struct SyntaxBuilder<'a> {
    tag: Option<(&'a str, &'a str)>,
}

impl Default for Syntax {
    /// Returns the default syntax configuration.
    ///
    /// This is equivalent to the following.
    /// ```
    /// use chunky::Syntax;
    ///
    /// let syntax = Syntax::builder().tag("{{", "}}").build();
    /// assert_eq!(syntax, Syntax::default());
    /// ```
    #[inline]
    fn default() -> Self {
        Syntax::builder().tag("{{", "}}").build()
    }
}

impl Syntax {
    /// Create a new syntax builder.
    ///
    /// # Examples
    ///
    /// ```
    /// let syntax = chunky::Syntax::builder().tag("{~", "}").build();
    /// ```
    #[inline]
    pub fn builder<'a>() -> SyntaxBuilder<'a> {
        SyntaxBuilder::new()
    }

    /// Returns the begin tag delimiter, e.g. `{{`.
    #[inline]
    pub fn begin_tag(&self) -> &str {
        &self.begin_tag
    }

    /// Returns the end tag delimiter, e.g. `}}`.
    #[inline]
    pub fn end_tag(&self) -> &str {
        &self.end_tag
    }
}

impl<'a> SyntaxBuilder<'a> {
    /// Creates a new syntax builder.
    #[inline]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { tag: None }
    }

    /// Set the tag delimiters.
    ///
    /// If not set then the default `{{` and `}}` are used.
    ///
    /// # Panics
    ///
    /// If either of the strings are empty or if they are equal.
    #[inline]
    pub fn tag(&mut self, begin_tag: &'a str, end_tag: &'a str) -> &mut Self {
        assert!(!begin_tag.is_empty() && !end_tag.is_empty());
        assert_ne!(begin_tag, end_tag);
        self.tag = Some((begin_tag, end_tag));
        self
    }

    /// Builds the syntax configuration.
    pub fn build(&self) -> Syntax {
        let (begin, end) = self.tag.unwrap_or(("{{", "}}"));
        Syntax {
            begin_tag: begin.to_owned(),
            end_tag: end.to_owned(),
        }
    }
}
