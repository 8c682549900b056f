use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::value::{Map, Value};

/// The column label of a table built from a flat list of strings.
pub const ANONYMOUS: &str = "anonymous";

/// A source of rows for a loop.
///
/// A data source is a forward cursor over records. Each record has one
/// optional cell per column label, in column order. Loops call
/// [`reset`][TableData::reset] after iterating so that the same source can
/// be iterated again.
pub trait TableData {
    /// The column labels, in column order.
    fn column_labels(&self) -> &[String];

    /// Returns true if [`next_record`][TableData::next_record] would return
    /// a record.
    fn has_next(&self) -> bool;

    /// Advances the cursor and returns the next record.
    fn next_record(&mut self) -> Option<Vec<Option<String>>>;

    /// Rewinds the cursor to the first record.
    fn reset(&mut self);
}

impl<T> TableData for Box<T>
where
    T: TableData + ?Sized,
{
    fn column_labels(&self) -> &[String] {
        (**self).column_labels()
    }

    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next_record(&mut self) -> Option<Vec<Option<String>>> {
        (**self).next_record()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Any value that can be viewed as a list of named fields, e.g. a map or a
/// user type with an adapter.
pub trait Row {
    /// Returns the `(name, value)` pairs of this record.
    fn fields(&self) -> Vec<(String, Option<String>)>;
}

impl<R> Row for &R
where
    R: Row + ?Sized,
{
    fn fields(&self) -> Vec<(String, Option<String>)> {
        (**self).fields()
    }
}

/// Only string fields are kept; nested values have no cell representation.
impl Row for Map<String, Value> {
    fn fields(&self) -> Vec<(String, Option<String>)> {
        self.iter()
            .map(|(k, v)| (k.clone(), v.as_str().map(str::to_owned)))
            .collect()
    }
}

impl Row for BTreeMap<String, String> {
    fn fields(&self) -> Vec<(String, Option<String>)> {
        self.iter()
            .map(|(k, v)| (k.clone(), Some(v.clone())))
            .collect()
    }
}

/// An in-memory table of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    labels: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Construct an empty table with the given column labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Construct a single column table labelled [`ANONYMOUS`] with one row
    /// per value.
    pub fn anonymous<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new([ANONYMOUS]);
        for value in values {
            table.rows.push(vec![Some(value.into())]);
        }
        table
    }

    /// Construct a table from records.
    ///
    /// The columns are the union of the field names in order of first
    /// appearance. Fields a record lacks are absent cells.
    pub fn from_rows<I>(records: I) -> Self
    where
        I: IntoIterator,
        I::Item: Row,
    {
        let mut table = Self::default();
        for record in records {
            let mut row = vec![None; table.labels.len()];
            for (name, value) in record.fields() {
                let i = match table.labels.iter().position(|l| *l == name) {
                    Some(i) => i,
                    None => {
                        table.labels.push(name);
                        row.push(None);
                        table.labels.len() - 1
                    }
                };
                row[i] = value;
            }
            table.rows.push(row);
        }
        let width = table.labels.len();
        for row in &mut table.rows {
            row.resize(width, None);
        }
        table
    }

    /// Builds a table from a list of strings or a list of maps.
    pub(crate) fn from_list(items: &[Value]) -> Option<Self> {
        if items.iter().all(|v| matches!(v, Value::String(_))) {
            Some(Self::anonymous(items.iter().filter_map(Value::as_str)))
        } else if items.iter().all(|v| matches!(v, Value::Map(_))) {
            Some(Self::from_rows(items.iter().filter_map(|v| match v {
                Value::Map(m) => Some(m),
                _ => None,
            })))
        } else {
            None
        }
    }

    /// Appends a row where every cell is present.
    ///
    /// Short rows are padded with absent cells and long rows are truncated.
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_record(values.into_iter().map(|v| Some(v.into())).collect());
    }

    /// Appends a row of optional cells.
    pub fn push_record(&mut self, mut record: Vec<Option<String>>) {
        record.resize(self.labels.len(), None);
        self.rows.push(record);
    }

    /// The column labels.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a fresh cursor over the rows of this table.
    #[inline]
    pub fn rows(&self) -> Rows<'_> {
        Rows::new(Cow::Borrowed(self))
    }
}

/// A cursor over a borrowed or owned [`Table`].
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    table: Cow<'a, Table>,
    pos: usize,
}

impl<'a> Rows<'a> {
    pub fn new(table: Cow<'a, Table>) -> Self {
        Self { table, pos: 0 }
    }
}

impl From<Table> for Rows<'static> {
    fn from(table: Table) -> Self {
        Self::new(Cow::Owned(table))
    }
}

impl TableData for Rows<'_> {
    fn column_labels(&self) -> &[String] {
        self.table.labels()
    }

    fn has_next(&self) -> bool {
        self.pos < self.table.rows.len()
    }

    fn next_record(&mut self) -> Option<Vec<Option<String>>> {
        let row = self.table.rows.get(self.pos)?.clone();
        self.pos += 1;
        Some(row)
    }

    fn reset(&mut self) {
        self.pos = 0;
    }
}

/// Limits another data source to a window of its rows.
///
/// Rows before `start` are skipped eagerly and iteration stops before `end`.
#[derive(Debug, Clone)]
pub struct Slice<D> {
    inner: D,
    start: usize,
    end: Option<usize>,
    pos: usize,
}

impl<D: TableData> Slice<D> {
    pub fn new(inner: D, start: usize, end: Option<usize>) -> Self {
        let mut slice = Self {
            inner,
            start,
            end,
            pos: 0,
        };
        slice.skip();
        slice
    }

    fn skip(&mut self) {
        while self.pos < self.start && self.inner.has_next() {
            self.inner.next_record();
            self.pos += 1;
        }
    }
}

impl<D: TableData> TableData for Slice<D> {
    fn column_labels(&self) -> &[String] {
        self.inner.column_labels()
    }

    fn has_next(&self) -> bool {
        self.end.map_or(true, |end| self.pos < end) && self.inner.has_next()
    }

    fn next_record(&mut self) -> Option<Vec<Option<String>>> {
        if !self.has_next() {
            return None;
        }
        self.pos += 1;
        self.inner.next_record()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.pos = 0;
        self.skip();
    }
}

/// Parses a range expression into a start row and an optional end row.
///
/// Accepted forms are `a:b`, `a:`, `:b`, a single row `n` and a page `p*n`
/// where pages are numbered from one. Malformed expressions yield `None`.
pub(crate) fn parse_range(expr: &str) -> Option<(usize, Option<usize>)> {
    let expr = expr.trim();
    if let Some((page, per_page)) = expr.split_once('*') {
        let page: usize = page.trim().parse().ok()?;
        let per_page: usize = per_page.trim().parse().ok()?;
        let start = page.max(1).checked_sub(1)?.checked_mul(per_page)?;
        return Some((start, Some(start.checked_add(per_page)?)));
    }
    if let Some((start, end)) = expr.split_once(':') {
        let start = match start.trim() {
            "" => 0,
            s => s.parse().ok()?,
        };
        let end = match end.trim() {
            "" => None,
            e => Some(e.parse().ok()?),
        };
        return Some((start, end));
    }
    let n: usize = expr.parse().ok()?;
    Some((n, Some(n.checked_add(1)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut t = Table::new(["a"]);
        for i in 0..5 {
            t.push_row([i.to_string()]);
        }
        t
    }

    fn collect(data: &mut dyn TableData) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(r) = data.next_record() {
            out.push(r[0].clone().unwrap_or_default());
        }
        out
    }

    #[test]
    fn rows_reset() {
        let t = table();
        let mut rows = t.rows();
        assert_eq!(collect(&mut rows), ["0", "1", "2", "3", "4"]);
        assert!(!rows.has_next());
        rows.reset();
        assert_eq!(collect(&mut rows), ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn slice_window() {
        let t = table();
        let mut slice = Slice::new(t.rows(), 1, Some(3));
        assert_eq!(collect(&mut slice), ["1", "2"]);
        slice.reset();
        assert_eq!(collect(&mut slice), ["1", "2"]);
    }

    #[test]
    fn slice_past_the_end() {
        let t = table();
        let slice = Slice::new(t.rows(), 10, None);
        assert!(!slice.has_next());
    }

    #[test]
    fn range_forms() {
        assert_eq!(parse_range("1:3"), Some((1, Some(3))));
        assert_eq!(parse_range(" 2: "), Some((2, None)));
        assert_eq!(parse_range(":2"), Some((0, Some(2))));
        assert_eq!(parse_range("4"), Some((4, Some(5))));
        assert_eq!(parse_range("2*10"), Some((10, Some(20))));
        assert_eq!(parse_range("0*10"), Some((0, Some(10))));
        assert_eq!(parse_range("x:1"), None);
        assert_eq!(parse_range(""), None);
        assert_eq!(parse_range("-1"), None);
    }

    #[test]
    fn records_union_columns() {
        let a = BTreeMap::from([("x".to_owned(), "1".to_owned())]);
        let b = BTreeMap::from([
            ("x".to_owned(), "2".to_owned()),
            ("y".to_owned(), "3".to_owned()),
        ]);
        let t = Table::from_rows([&a, &b]);
        assert_eq!(t.labels(), ["x", "y"]);
        let mut rows = t.rows();
        assert_eq!(rows.next_record(), Some(vec![Some("1".into()), None]));
        assert_eq!(
            rows.next_record(),
            Some(vec![Some("2".into()), Some("3".into())])
        );
    }

    #[test]
    fn push_row_pads_and_truncates() {
        let mut t = Table::new(["a", "b"]);
        t.push_row(["1"]);
        t.push_row(["1", "2", "3"]);
        let mut rows = t.rows();
        assert_eq!(rows.next_record(), Some(vec![Some("1".into()), None]));
        assert_eq!(
            rows.next_record(),
            Some(vec![Some("1".into()), Some("2".into())])
        );
    }
}
