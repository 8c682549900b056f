use crate::compile::LoopOptions;
use crate::render::data;
use crate::render::fmt::Formatter;
use crate::render::loops::{self, Form, Loop};
use crate::tracing_macros::trace;
use crate::types::ast::{LoopBlock, Part, Snippet, Tag};
use crate::value::{Chunk, Value};
use crate::{Engine, Error, Result};

/// Used when a loop explicitly asks for no output on empty data.
static EMPTY: Snippet = Snippet::new();

/// A renderer that walks a compiled [`Snippet`].
///
/// The renderer holds no per-render state. Loop state lives on the stack of
/// each loop invocation so snippets and the engine are shared read-only.
pub struct RendererImpl<'render> {
    pub engine: &'render Engine,
}

impl<'render> RendererImpl<'render> {
    pub fn render(
        &self,
        f: &mut Formatter<'_>,
        snippet: &Snippet,
        chunk: &Chunk<'_>,
        depth: usize,
    ) -> Result<()> {
        if depth > self.engine.max_depth {
            return Err(Error::max_depth(self.engine.max_depth));
        }
        for part in snippet.parts() {
            match part {
                Part::Literal(text) => f.write(text)?,
                Part::Tag(tag) => self.render_tag(f, tag, chunk, depth)?,
                Part::Loop(block) => self.render_block(f, block, chunk, depth)?,
            }
        }
        Ok(())
    }

    pub fn render_to_string(
        &self,
        snippet: &Snippet,
        chunk: &Chunk<'_>,
        depth: usize,
    ) -> Result<String> {
        let mut s = String::new();
        self.render(&mut Formatter::with_string(&mut s), snippet, chunk, depth)?;
        Ok(s)
    }

    fn render_tag(
        &self,
        f: &mut Formatter<'_>,
        tag: &Tag,
        chunk: &Chunk<'_>,
        depth: usize,
    ) -> Result<()> {
        match tag.raw().trim_start().chars().next() {
            Some('~' | '$') => self.render_placeholder(f, tag, chunk),
            _ if tag.is_loop() => self.render_loop_tag(f, tag, chunk, depth),
            _ => self.write_verbatim(f, tag),
        }
    }

    fn write_verbatim(&self, f: &mut Formatter<'_>, tag: &Tag) -> Result<()> {
        let markers = &self.engine.markers;
        f.write_tag(&markers.begin, tag.raw(), &markers.end)
    }

    /// Outputs the string bound to `~name`, after applying any filters.
    ///
    /// Tags that do not resolve to a string are written back unchanged so
    /// that an outer pass can still fill them.
    fn render_placeholder(&self, f: &mut Formatter<'_>, tag: &Tag, chunk: &Chunk<'_>) -> Result<()> {
        let expr = &tag.raw().trim()[1..];
        let (name, chain) = match expr.split_once('|') {
            Some((name, chain)) => (name.trim(), Some(chain)),
            None => (expr.trim(), None),
        };
        match chunk.get(name) {
            Some(Value::String(value)) => match chain {
                #[cfg(feature = "filters")]
                Some(chain) => f.write(&crate::filters::apply_chain(
                    self.engine,
                    chunk,
                    value,
                    chain,
                )),
                _ => f.write(value),
            },
            _ => {
                trace!(name, "unresolved placeholder");
                self.write_verbatim(f, tag)
            }
        }
    }

    /// Renders a single-tag loop, e.g. `{{.loop(~rows,row_tpl,empty_tpl)}}`.
    fn render_loop_tag(
        &self,
        f: &mut Formatter<'_>,
        tag: &Tag,
        chunk: &Chunk<'_>,
        depth: usize,
    ) -> Result<()> {
        let options = LoopOptions::parse(tag.raw());
        let row = match options.template() {
            Some(name) => self.engine.snippet(name).ok_or_else(|| {
                Error::render(format!("unknown row template `{name}`"), self.tag_text(tag))
            })?,
            None => return Err(Error::render("missing row template", self.tag_text(tag))),
        };
        let empty = match options.no_data() {
            None => None,
            Some("") => Some(&EMPTY),
            Some(name) => self.engine.snippet(name),
        };
        let data = data::fetch(self, &options, chunk, depth)?;
        let lp = Loop {
            data,
            row,
            empty,
            divider: None,
            options: &options,
            form: Form::Tag,
        };
        loops::render(self, f, lp, chunk, depth)
    }

    fn render_block(
        &self,
        f: &mut Formatter<'_>,
        block: &LoopBlock,
        chunk: &Chunk<'_>,
        depth: usize,
    ) -> Result<()> {
        let data = data::fetch(self, block.options(), chunk, depth)?;
        let lp = Loop {
            data,
            row: block.row(),
            empty: block.empty(),
            divider: block.divider(),
            options: block.options(),
            form: Form::Block,
        };
        loops::render(self, f, lp, chunk, depth)
    }

    fn tag_text(&self, tag: &Tag) -> String {
        let markers = &self.engine.markers;
        format!("{}{}{}", markers.begin, tag.raw(), markers.end)
    }
}
