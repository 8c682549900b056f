use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::{Source, Table, Value};

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::None
    }
}

/// `true` is bound as the string `TRUE` and `false` as no value, so that a
/// flag can be tested by whether its tag resolves.
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Self::String(String::from("TRUE"))
        } else {
            Self::None
        }
    }
}

macro_rules! impl_from_display {
    ($($ty:ty)+) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::String(n.to_string())
                }
            }
        )+
    };
}

impl_from_display! { u8 u16 u32 u64 usize i8 i16 i32 i64 isize f32 f64 char }

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Self::String(String::from(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(s: Cow<'a, str>) -> Self {
        Self::String(s.into_owned())
    }
}

impl From<Table> for Value {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Source> for Value {
    fn from(source: Source) -> Self {
        Self::Source(source)
    }
}

impl<V> From<Vec<V>> for Value
where
    V: Into<Value>,
{
    fn from(list: Vec<V>) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

impl<V, const N: usize> From<[V; N]> for Value
where
    V: Into<Value>,
{
    fn from(list: [V; N]) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

impl<K, V> From<BTreeMap<K, V>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V> From<HashMap<K, V>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(map: HashMap<K, V>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<V> From<Option<V>> for Value
where
    V: Into<Value>,
{
    fn from(opt: Option<V>) -> Self {
        match opt {
            None => Self::None,
            Some(value) => value.into(),
        }
    }
}

impl<V> FromIterator<V> for Value
where
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools_follow_flag_convention() {
        assert_eq!(Value::from(true), Value::String("TRUE".into()));
        assert_eq!(Value::from(false), Value::None);
    }

    #[test]
    fn numbers_are_strings() {
        assert_eq!(Value::from(42_u32), Value::String("42".into()));
        assert_eq!(Value::from(-1.5_f64), Value::String("-1.5".into()));
    }
}
