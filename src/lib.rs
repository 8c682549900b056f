//! A template engine with nesting-aware block tags and table-driven loops.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Placeholders: `{{~name}}`, `{{$name}}`, `{{~user.name}}`
//! - Loops over tables: `{{.loop ~rows}} ... {{/loop}}`
//! - Dividers and empty-data sections: `{{.divider}}`, `{{.onEmpty}}`
//! - Nested loops of any depth, each with their own sections
//! - Single-tag loops using named templates: `{{.loop(~rows,row,none)}}`
//! - Row windows: `{{.loop ~rows[2:5]}}`, paging with `page` and `per_page`
//! - Configurable delimiters: `<%~name%>`
//! - Filters: `{{~color|sel(red)}}`
//!
//! ### Engine
//!
//! - Render to a [`String`] or any [`std::io::Write`] implementor
//! - Data from [`Table`]s, inline table text, lists, maps and any [`serde`]
//!   serializable value
//! - Unresolved tags are left in the output rather than failing the render
//! - Compiled templates are immutable and can be rendered from many threads
//!
//! # Getting started
//!
//! Your entry point is the [`Engine`] struct. The engine stores the syntax
//! config, filter functions and named templates.
//!
//! ```
//! let engine = chunky::Engine::new();
//! ```
//!
//! Templates are rendered against a [`Chunk`], which binds tag names to
//! values.
//!
//! ```
//! use chunky::{Chunk, Engine, Table};
//!
//! let mut users = Table::new(["name", "role"]);
//! users.push_row(["Ada", "admin"]);
//! users.push_row(["Grace", "dev"]);
//!
//! let mut chunk = Chunk::new();
//! chunk.set("users", users);
//!
//! let engine = Engine::new();
//! let template = engine.compile(
//!     "{{.loop ~users}}{{~name}} ({{~role}}){{.divider}} / {{.onEmpty}}nobody{{/loop}}",
//! )?;
//! assert_eq!(template.render(&chunk)?, "Ada (admin)/Grace (dev)");
//! # Ok::<(), chunky::Error>(())
//! ```
//!
//! # Examples
//!
//! ### Named row templates
//!
//! Templates stored in the engine can be used as the row of a single-tag
//! loop. A leading `#` on the name is ignored.
//!
//! ```
//! use chunky::{Chunk, Engine};
//!
//! let mut engine = Engine::new();
//! engine.add_template("row", "<li>{{~anonymous}}</li>")?;
//!
//! let mut chunk = Chunk::new();
//! chunk.set("colors", "[red,green]");
//!
//! let out = engine.compile("{{.loop(~colors,#row)}}")?.render(&chunk)?;
//! assert_eq!(out, "<li>red</li><li>green</li>");
//! # Ok::<(), chunky::Error>(())
//! ```
//!
//! ### Render using structured data
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Context { users: Vec<User> }
//!
//! #[derive(serde::Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct User { full_name: String }
//!
//! let ctx = Context {
//!     users: vec![User { full_name: "Ada Lovelace".into() }],
//! };
//!
//! let result = chunky::Engine::new()
//!     .compile("{{.loop ~users as u}}{{~u.full_name}}{{/loop}}")?
//!     .render_from(&ctx)?;
//!
//! assert_eq!(result, "Ada Lovelace");
//! # Ok::<(), chunky::Error>(())
//! ```
//!
//! ### Render a template using custom syntax
//!
//! ```
//! let syntax = chunky::Syntax::builder().tag("<%", "%>").build();
//!
//! let mut chunk = chunky::Chunk::new();
//! chunk.set("name", "World");
//!
//! let result = chunky::Engine::with_syntax(syntax)
//!     .compile("Hello <%~name%>")?
//!     .render(&chunk)?;
//!
//! assert_eq!(result, "Hello World");
//! # Ok::<(), chunky::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod compile;
mod error;
#[cfg(feature = "filters")]
mod filters;
mod macros;
mod render;
mod tracing_macros;
mod types;
mod value;

use std::collections::BTreeMap;
use std::fmt;
use std::io;

pub use crate::compile::{LoopOptions, Trim};
pub use crate::error::{Error, ErrorKind, Result};
#[cfg(feature = "filters")]
pub use crate::filters::Filter;
pub use crate::types::ast::{LoopBlock, Part, Snippet, Tag};
pub use crate::types::syntax::{Syntax, SyntaxBuilder};
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::{
    Chunk, List, Map, Row, Rows, Slice, Source, Table, TableData, Value, ANONYMOUS,
};

use crate::compile::Markers;
#[cfg(feature = "filters")]
use crate::filters::FilterFn;

/// The default maximum nesting depth of loops and template references.
const DEFAULT_MAX_DEPTH: usize = 64;

/// The compilation and rendering engine.
pub struct Engine {
    syntax: Syntax,
    markers: Markers,
    max_depth: usize,
    #[cfg(feature = "filters")]
    functions: BTreeMap<String, Box<FilterFn>>,
    templates: BTreeMap<String, Stored>,
}

/// A named template owned by the engine.
struct Stored {
    source: String,
    snippet: Snippet,
}

/// A compiled template.
pub struct Template<'engine, 'source> {
    engine: &'engine Engine,
    source: &'source str,
    snippet: Snippet,
}

/// A reference to a compiled template in an [`Engine`].
#[derive(Clone, Copy)]
pub struct TemplateRef<'engine> {
    engine: &'engine Engine,
    template: &'engine Stored,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine.
    #[inline]
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    /// Construct a new engine with custom syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use chunky::{Engine, Syntax};
    ///
    /// let syntax = Syntax::builder().tag("{~", "}").build();
    /// let engine = Engine::with_syntax(syntax);
    /// ```
    pub fn with_syntax(syntax: Syntax) -> Self {
        #[allow(unused_mut)]
        let mut engine = Self {
            markers: Markers::new(&syntax),
            syntax,
            max_depth: DEFAULT_MAX_DEPTH,
            #[cfg(feature = "filters")]
            functions: BTreeMap::new(),
            templates: BTreeMap::new(),
        };
        #[cfg(feature = "filters")]
        {
            use crate::filters::builtins;
            for name in ["selected", "select", "sel"] {
                engine.add_filter(name, builtins::selected);
            }
            for name in ["checked", "check"] {
                engine.add_filter(name, builtins::checked);
            }
        }
        engine
    }

    /// Returns the syntax this engine compiles with.
    #[inline]
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Set the maximum nesting depth.
    ///
    /// This limits how deeply `.loop` blocks may nest at compile time and how
    /// deeply loops and template references may recurse at render time.
    ///
    /// Defaults to 64.
    #[inline]
    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    /// Add a new filter to the engine.
    ///
    /// Filters with the same name replace the builtin ones. See [`Filter`]
    /// for the accepted function shapes.
    #[cfg(feature = "filters")]
    #[cfg_attr(docsrs, doc(cfg(feature = "filters")))]
    #[inline]
    pub fn add_filter<F, A>(&mut self, name: impl Into<String>, f: F)
    where
        F: Filter<A>,
    {
        self.functions.insert(name.into(), filters::new(f));
    }

    /// Add a template to the engine.
    ///
    /// The template will be compiled and stored under the given name. Named
    /// templates can be used as loop rows, empty sections, dividers and data.
    pub fn add_template(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let source = source.into();
        let snippet = compile::template(self, &source)?;
        self.templates.insert(name.into(), Stored { source, snippet });
        Ok(())
    }

    /// Lookup a template by name. A leading `#` is ignored.
    #[inline]
    pub fn get_template(&self, name: &str) -> Option<TemplateRef<'_>> {
        self.lookup(name).map(|template| TemplateRef {
            engine: self,
            template,
        })
    }

    /// Compile a template.
    ///
    /// The template will not be stored in the engine.
    #[inline]
    pub fn compile<'source>(&self, source: &'source str) -> Result<Template<'_, 'source>> {
        let snippet = compile::template(self, source)?;
        Ok(Template {
            engine: self,
            source,
            snippet,
        })
    }

    fn lookup(&self, name: &str) -> Option<&Stored> {
        let name = name.trim();
        self.templates.get(name.strip_prefix('#').unwrap_or(name))
    }

    pub(crate) fn snippet(&self, name: &str) -> Option<&Snippet> {
        self.lookup(name).map(|t| &t.snippet)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Engine");
        d.field("syntax", &self.syntax);
        d.field("max_depth", &self.max_depth);
        #[cfg(feature = "filters")]
        d.field("functions", &self.functions.keys());
        d.field("templates", &self.templates.keys()).finish()
    }
}

impl<'engine, 'source> Template<'engine, 'source> {
    /// Render the template to a string using the provided chunk.
    #[inline]
    pub fn render(&self, chunk: &Chunk<'_>) -> Result<String> {
        render::to_string(self.engine, &self.snippet, chunk, self.source.len())
    }

    /// Render the template to a writer using the provided chunk.
    #[inline]
    pub fn render_to_writer<W>(&self, writer: W, chunk: &Chunk<'_>) -> Result<()>
    where
        W: io::Write,
    {
        render::to_writer(self.engine, &self.snippet, chunk, writer)
    }

    /// Render the template to a string using any serializable map-like value
    /// as the chunk.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn render_from<S>(&self, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        self.render(&Chunk::from_value(to_value(ctx)?))
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &'source str {
        self.source
    }

    /// Returns the compiled template.
    #[inline]
    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }
}

impl fmt::Debug for Template<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("engine", &self.engine)
            .field("snippet", &self.snippet)
            .finish_non_exhaustive()
    }
}

impl<'engine> TemplateRef<'engine> {
    /// Render the template to a string using the provided chunk.
    #[inline]
    pub fn render(&self, chunk: &Chunk<'_>) -> Result<String> {
        render::to_string(
            self.engine,
            &self.template.snippet,
            chunk,
            self.template.source.len(),
        )
    }

    /// Render the template to a writer using the provided chunk.
    #[inline]
    pub fn render_to_writer<W>(&self, writer: W, chunk: &Chunk<'_>) -> Result<()>
    where
        W: io::Write,
    {
        render::to_writer(self.engine, &self.template.snippet, chunk, writer)
    }

    /// Render the template to a string using any serializable map-like value
    /// as the chunk.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn render_from<S>(&self, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        self.render(&Chunk::from_value(to_value(ctx)?))
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &'engine str {
        &self.template.source
    }

    /// Returns the compiled template.
    #[inline]
    pub fn snippet(&self) -> &'engine Snippet {
        &self.template.snippet
    }
}

impl fmt::Debug for TemplateRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRef")
            .field("engine", &self.engine)
            .field("snippet", &self.template.snippet)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<Template<'_, '_>>();
        assert_send_sync::<TemplateRef<'_>>();
        assert_send_sync::<Snippet>();
    }

    #[test]
    fn lookup_ignores_hash() {
        let mut engine = Engine::new();
        engine.add_template("row", "x").unwrap();
        assert!(engine.get_template("#row").is_some());
        assert!(engine.get_template("row").is_some());
        assert!(engine.get_template("nope").is_none());
    }
}
