//! Defines the [`Value`] enum, representing any data that can be bound in a
//! [`Chunk`], and the tabular data sources that loops iterate over.

mod chunk;
mod from;
pub(crate) mod inline;
#[cfg(feature = "serde")]
mod ser;
mod source;
mod table;

pub use std::collections::BTreeMap as Map;
pub use std::vec::Vec as List;

pub use crate::value::chunk::Chunk;
#[cfg(feature = "serde")]
pub use crate::value::ser::to_value;
pub(crate) use crate::value::source::Locked;
pub use crate::value::source::Source;
pub(crate) use crate::value::table::parse_range;
pub use crate::value::table::{Row, Rows, Slice, Table, TableData, ANONYMOUS};

/// Data bound to a tag name.
///
/// Only strings are output by placeholders. Lists, maps, tables and caller
/// supplied sources are loop data sources and maps can also be reached with
/// dotted paths, e.g. `{{~user.name}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    None,
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
    Table(Table),
    Source(Source),
}

impl Value {
    /// Returns the string if this value is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}
