//! Render a compiled [`Snippet`] against a [`Chunk`].

mod core;
mod data;
mod fmt;
mod loops;

use std::io;

use crate::render::core::RendererImpl;
use crate::render::fmt::{Formatter, Writer};
use crate::types::ast::Snippet;
use crate::value::Chunk;
use crate::{Engine, Error, Result};

pub(crate) fn to_string(
    engine: &Engine,
    snippet: &Snippet,
    chunk: &Chunk<'_>,
    capacity: usize,
) -> Result<String> {
    let mut s = String::with_capacity(capacity);
    let mut f = Formatter::with_string(&mut s);
    RendererImpl { engine }.render(&mut f, snippet, chunk, 0)?;
    Ok(s)
}

pub(crate) fn to_writer<W>(
    engine: &Engine,
    snippet: &Snippet,
    chunk: &Chunk<'_>,
    writer: W,
) -> Result<()>
where
    W: io::Write,
{
    let mut w = Writer::new(writer);
    let mut f = Formatter::with_writer(&mut w);
    RendererImpl { engine }
        .render(&mut f, snippet, chunk, 0)
        .map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
}
