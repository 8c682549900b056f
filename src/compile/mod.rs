//! Compile template source into a [`Snippet`].
//!
//! This process has three stages:
//! - The lexer splits the source into raw text and tags.
//! - The nesting matcher pairs each `.loop` block with its `/loop` and splits
//!   the body into sections.
//! - The parser builds the snippet, recursing into block sections and
//!   trimming them.

mod lex;
mod nest;
mod params;
mod parse;
mod trim;

pub use crate::compile::nest::Markers;
pub use crate::compile::params::{LoopOptions, Trim};

use crate::tracing_macros::debug;
use crate::types::ast::Snippet;
use crate::{Engine, Result};

/// Compile template source using the engine's syntax.
pub fn template(engine: &Engine, source: &str) -> Result<Snippet> {
    let snippet = parse::Parser::new(&engine.markers, source, engine.max_depth).parse_template()?;
    debug!(len = source.len(), parts = snippet.parts().len(), "compiled template");
    Ok(snippet)
}
