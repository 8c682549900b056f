//! Parses the parameters of a `.loop` tag.
//!
//! Three forms are accepted.
//!
//! - Call: `.loop(~data, row_template, empty_template)`
//! - Short: `.loop ~data as item` or `.loop in ~data as item`, optionally
//!   followed by attributes.
//! - Attributes: `.loop data="~data" template="row" divider=", "`
//!
//! A data reference may carry a trailing range, e.g. `~data[1:3]`.

use std::collections::BTreeMap;

use crate::tracing_macros::trace;

/// How whitespace at the edges of a block section is trimmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trim {
    /// Drop a blank first line, or leading whitespace.
    #[default]
    Smart,
    /// Strip leading and trailing whitespace unconditionally.
    All,
    /// Leave sections untouched.
    None,
}

/// The parsed, immutable options of a `.loop` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopOptions {
    pub(crate) data: Option<String>,
    pub(crate) range: Option<String>,
    pub(crate) template: Option<String>,
    pub(crate) no_data: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) divider: Option<String>,
    pub(crate) trim: Trim,
    pub(crate) array_index_tags: bool,
    pub(crate) attributes: BTreeMap<String, String>,
    call: bool,
}

impl LoopOptions {
    /// Parse the text of a `.loop` tag with the delimiters removed.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut opts = match raw.strip_prefix(".loop(") {
            Some(args) => Self::parse_call(args),
            None => match short_form(raw) {
                Some((data, name)) => {
                    let mut opts = Self::parse_attributes(raw);
                    opts.data = Some(data.to_owned());
                    if name.is_some() {
                        opts.name = name.map(str::to_owned);
                    }
                    opts
                }
                None => Self::parse_attributes(raw),
            },
        };
        opts.finish();
        trace!(?opts, "parsed loop options");
        opts
    }

    fn parse_call(args: &str) -> Self {
        let args = args.trim_end();
        let args = args.strip_suffix(')').unwrap_or(args);
        let mut args = args.split(',').map(str::trim);
        let data = args.next().filter(|d| !d.is_empty());
        let template = args.next().filter(|t| !t.is_empty());
        let no_data = args.next();
        Self {
            data: data.map(str::to_owned),
            template: template.map(str::to_owned),
            no_data: no_data.map(str::to_owned),
            call: true,
            ..Self::default()
        }
    }

    fn parse_attributes(raw: &str) -> Self {
        let mut opts = Self::default();
        for (key, value) in attributes(raw) {
            let value = value.to_owned();
            match key {
                "data" => opts.data = Some(value),
                "range" => opts.range = Some(value),
                "template" => opts.template = Some(value),
                "no_data" => opts.no_data = Some(value),
                "name" => opts.name = Some(value),
                "divider" => opts.divider = Some(value),
                "trim" => opts.trim = Trim::parse(&value),
                "array_index_tags" => opts.array_index_tags = true,
                _ => {
                    opts.attributes.insert(key.to_owned(), value);
                }
            }
        }
        opts
    }

    /// Split a `[range]` suffix from the data reference and synthesize a
    /// range from `page` and `per_page` when none was given.
    fn finish(&mut self) {
        if let Some(data) = &self.data {
            let data = data.trim();
            if let Some(open) = data.find('[').filter(|&i| i > 0) {
                // An unclosed range runs to the end of the reference.
                let range = &data[open + 1..];
                let range = range.find(']').map_or(range, |close| &range[..close]);
                self.range = Some(range.to_owned());
                self.data = Some(data[..open].to_owned());
            }
        }
        if self.range.is_none() {
            if let (Some(page), Some(per_page)) =
                (self.attributes.get("page"), self.attributes.get("per_page"))
            {
                self.range = Some(format!("{}*{}", page.trim(), per_page.trim()));
            }
        }
    }

    /// Returns true if this tag opens a block that is closed by `/loop`.
    ///
    /// Call-form tags and tags naming a row template are self-contained.
    #[inline]
    pub fn has_body(&self) -> bool {
        !self.call && self.template.is_none()
    }

    /// The data reference, e.g. `~rows`, without any range suffix.
    #[inline]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// The range expression, e.g. `1:3`.
    #[inline]
    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    /// The name of the row template.
    #[inline]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// The name of the template rendered when there are no rows.
    #[inline]
    pub fn no_data(&self) -> Option<&str> {
        self.no_data.as_deref()
    }

    /// The binding prefix, e.g. `item` for `{{~item.title}}`.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The divider template name or literal text.
    #[inline]
    pub fn divider(&self) -> Option<&str> {
        self.divider.as_deref()
    }

    #[inline]
    pub fn trim(&self) -> Trim {
        self.trim
    }

    /// Returns false when positional `DATA[i]` keys are disabled.
    #[inline]
    pub fn index_tags(&self) -> bool {
        !self.array_index_tags
    }

    /// Attributes that are not recognized loop options, e.g. `page`.
    #[inline]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

impl Trim {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("false") {
            Trim::None
        } else if value.eq_ignore_ascii_case("all") {
            Trim::All
        } else {
            Trim::Smart
        }
    }
}

/// Returns the data reference and optional binding name of the short form.
fn short_form(raw: &str) -> Option<(&str, Option<&str>)> {
    let mut tokens = raw.split_whitespace();
    if tokens.next()? != ".loop" {
        return None;
    }
    let mut data = tokens.next()?;
    if data == "in" {
        data = tokens.next()?;
    }
    if data.contains(['=', '"', '\'']) {
        return None;
    }
    let name = match tokens.next() {
        Some("as") => tokens.next().filter(|n| !n.contains('=')),
        _ => None,
    };
    Some((data, name))
}

/// Scans for ` key="value"` and ` key='value'` pairs.
fn attributes(raw: &str) -> Vec<(&str, &str)> {
    let bytes = raw.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while let Some(eq) = raw[i..].find('=').map(|j| i + j) {
        let mut k = eq;
        while k > 0 && is_key_byte(bytes[k - 1]) {
            k -= 1;
        }
        let spaced = k > 0 && bytes[k - 1].is_ascii_whitespace();
        match bytes.get(eq + 1) {
            Some(&q @ (b'"' | b'\'')) if k < eq && spaced => {
                let start = eq + 2;
                match raw[start..].find(q as char) {
                    Some(len) => {
                        out.push((&raw[k..eq], &raw[start..start + len]));
                        i = start + len + 1;
                    }
                    None => break,
                }
            }
            _ => i = eq + 1,
        }
    }
    out
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}
