//! Resolves the data reference of a loop into a data source.

use crate::compile::LoopOptions;
use crate::render::core::RendererImpl;
use crate::tracing_macros::{debug, trace};
use crate::value::{inline, parse_range, Chunk, Rows, Slice, Table, TableData, Value};
use crate::Result;

/// Resolves the data reference of `options` against the chunk and engine.
///
/// - `~name` and `$name` look up a table, a caller supplied source, an inline
///   table string or a list.
/// - `^name` is shorthand for `~.name`, a lookup in the outermost chunk.
/// - A bare name renders the engine template of that name and parses the
///   output as an inline table.
///
/// Anything that cannot be resolved is no data, which is not an error.
pub fn fetch<'c>(
    r: &RendererImpl<'_>,
    options: &LoopOptions,
    chunk: &'c Chunk<'_>,
    depth: usize,
) -> Result<Option<Box<dyn TableData + 'c>>> {
    let Some(reference) = options.data().map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    let rewritten;
    let reference = match reference.strip_prefix('^') {
        Some(rest) => {
            rewritten = format!("~.{rest}");
            rewritten.as_str()
        }
        None => reference,
    };

    let data: Option<Box<dyn TableData + 'c>> = match reference.strip_prefix(['~', '$']) {
        Some(name) => match chunk.get(name) {
            Some(Value::Table(table)) => Some(boxed(table.rows())),
            Some(Value::Source(source)) => match source.lock() {
                Some(locked) => Some(boxed(locked)),
                None => {
                    debug!(name, "data source is already in use");
                    None
                }
            },
            Some(Value::String(text)) => inline::parse(text).map(Rows::from).map(boxed),
            Some(Value::List(items)) => Table::from_list(items).map(Rows::from).map(boxed),
            _ => None,
        },
        None => match r.engine.snippet(reference) {
            Some(snippet) => {
                let text = r.render_to_string(snippet, chunk, depth + 1)?;
                inline::parse(&text).map(Rows::from).map(boxed)
            }
            None => None,
        },
    };
    trace!(reference, found = data.is_some(), "resolved loop data");

    let Some(data) = data else {
        return Ok(None);
    };
    let data = match options.range().and_then(parse_range) {
        Some((start, end)) => boxed(Slice::new(data, start, end)),
        None => data,
    };
    Ok(Some(data))
}

fn boxed<'c, D>(data: D) -> Box<dyn TableData + 'c>
where
    D: TableData + 'c,
{
    Box::new(data)
}
