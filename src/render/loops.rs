//! The loop renderer.
//!
//! Each row is rendered with one child chunk that is reused across rows.
//! Every per-row key is either rebound or removed before each row so that
//! nothing leaks from one row into the next.

use std::borrow::Cow;

use crate::compile::LoopOptions;
use crate::render::core::RendererImpl;
use crate::render::fmt::Formatter;
use crate::tracing_macros::{debug, trace, trace_span};
use crate::types::ast::Snippet;
use crate::value::{Chunk, TableData, ANONYMOUS};
use crate::Result;

/// Which syntax started the loop. Picks the in-band message for empty data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Block,
    Tag,
}

impl Form {
    fn empty_marker(self) -> &'static str {
        match self {
            Form::Block => {
                "[Loop error: Empty Table - please supply .onEmpty section in .loop block]"
            }
            Form::Tag => {
                "[Loop error: Empty Table - please specify no_data template parameter in .loop tag]"
            }
        }
    }
}

/// Everything one loop invocation needs.
pub struct Loop<'a> {
    pub data: Option<Box<dyn TableData + 'a>>,
    pub row: &'a Snippet,
    pub empty: Option<&'a Snippet>,
    pub divider: Option<&'a Snippet>,
    pub options: &'a LoopOptions,
    pub form: Form,
}

/// The keys one column is bound under in the row chunk.
struct Column {
    /// The label, or `prefix.label` when the loop has a binding name.
    key: String,
    /// The column that supplies the value for `key`.
    authority: usize,
    /// `DATA[i]` and `prefix[i]`, empty if index tags are disabled.
    index_keys: Vec<String>,
}

/// Per-invocation state derived from the options and the column labels.
struct Prepared<'a> {
    divider: Option<Cow<'a, Snippet>>,
    columns: Vec<Column>,
    /// Bound to the single value of an anonymous table.
    scalar: Option<String>,
}

impl<'a> Prepared<'a> {
    fn new(
        r: &RendererImpl<'a>,
        options: &'a LoopOptions,
        divider: Option<&'a Snippet>,
        labels: &[String],
    ) -> Self {
        let divider = match (divider, options.divider()) {
            (Some(snippet), _) => Some(Cow::Borrowed(snippet)),
            (None, Some(text)) => Some(match r.engine.snippet(text) {
                Some(snippet) => Cow::Borrowed(snippet),
                None => Cow::Owned(
                    crate::compile::template(r.engine, text)
                        .unwrap_or_else(|_| Snippet::literal(text)),
                ),
            }),
            (None, None) => None,
        };

        let prefix = options.name().map(sanitize).filter(|p| !p.is_empty());
        let prefix = prefix.as_deref();
        let columns = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let authority = labels.iter().rposition(|l| l == label).unwrap_or(i);
                let key = match prefix {
                    Some(p) => format!("{p}.{label}"),
                    None => label.clone(),
                };
                let index_keys = if options.index_tags() {
                    let mut keys = vec![format!("DATA[{i}]")];
                    keys.extend(prefix.map(|p| format!("{p}[{i}]")));
                    keys
                } else {
                    Vec::new()
                };
                Column {
                    key,
                    authority,
                    index_keys,
                }
            })
            .collect();

        let scalar = match labels {
            [only] if only == ANONYMOUS => prefix.map(str::to_owned),
            _ => None,
        };

        Self {
            divider,
            columns,
            scalar,
        }
    }

    fn bind(&self, row: &mut Chunk<'_>, record: &[Option<String>]) {
        let cell = |i: usize| record.get(i).and_then(Option::as_deref);
        for (i, column) in self.columns.iter().enumerate().rev() {
            row.set_or_delete(&column.key, cell(column.authority));
            for key in &column.index_keys {
                row.set_or_delete(key, cell(i));
            }
        }
        if let Some(name) = &self.scalar {
            row.set_or_delete(name, cell(0));
        }
    }
}

/// Keeps only the characters allowed in a binding name.
fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

/// Renders a loop: the empty section if there are no rows, otherwise the row
/// snippet once per record with dividers in between.
pub fn render<'a>(
    r: &RendererImpl<'a>,
    f: &mut Formatter<'_>,
    mut lp: Loop<'a>,
    chunk: &Chunk<'_>,
    depth: usize,
) -> Result<()> {
    trace_span!("loop", data = ?lp.options.data());
    let data = match lp.data.as_deref_mut() {
        Some(data) if data.has_next() => data,
        _ => {
            debug!("loop has no data");
            return match lp.empty {
                Some(empty) => r.render(f, empty, chunk, depth + 1),
                None => f.write(lp.form.empty_marker()),
            };
        }
    };

    let prepared = Prepared::new(r, lp.options, lp.divider, data.column_labels());
    let rendered = render_rows(r, f, data, &prepared, lp.row, chunk, depth);
    data.reset();
    rendered
}

/// Renders every remaining record with dividers in between.
fn render_rows(
    r: &RendererImpl<'_>,
    f: &mut Formatter<'_>,
    data: &mut dyn TableData,
    prepared: &Prepared<'_>,
    snippet: &Snippet,
    chunk: &Chunk<'_>,
    depth: usize,
) -> Result<()> {
    let mut row = chunk.child();
    let mut i = 0usize;
    while data.has_next() {
        row.set("0", i.to_string());
        row.set("1", (i + 1).to_string());
        if i > 0 {
            if let Some(divider) = &prepared.divider {
                r.render(f, divider, chunk, depth + 1)?;
            }
        }
        let Some(record) = data.next_record() else {
            break;
        };
        prepared.bind(&mut row, &record);
        r.render(f, snippet, &row, depth + 1)?;
        i += 1;
    }
    trace!(rows = i, "rendered loop");
    Ok(())
}
