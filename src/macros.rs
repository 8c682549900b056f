/// Convenient macro for building a [`Value::Map`][crate::Value::Map].
///
/// Keys are identifiers or string literals. Values are `None`, nested
/// `[...]` lists, nested `{...}` maps or any expression that implements
/// `Into<Value>`.
///
/// # Examples
///
/// ```
/// use chunky::{value, Chunk, Table};
///
/// let mut table = Table::new(["name"]);
/// table.push_row(["Ada"]);
///
/// let value = value! {
///     title: "Users",
///     "page-size": 10,
///     user: { name: "Ada", nick: None },
///     tags: ["a", "b"],
///     users: table,
/// };
/// let chunk = Chunk::from_value(value);
/// assert_eq!(chunk.get("user.name").and_then(|v| v.as_str()), Some("Ada"));
/// assert_eq!(chunk.get("page-size").and_then(|v| v.as_str()), Some("10"));
/// ```
#[macro_export]
macro_rules! value {
    ($($tt:tt)*) => {
        $crate::_value!({ $($tt)* })
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value {
    (None) => {
        $crate::Value::None
    };

    ([]) => {
        $crate::Value::List(::std::vec::Vec::new())
    };

    ([ $($tt:tt)+ ]) => {
        $crate::Value::List($crate::_value!(@list [] $($tt)+))
    };

    ({}) => {
        $crate::Value::Map(::std::collections::BTreeMap::new())
    };

    ({ $($tt:tt)+ }) => {{
        let mut map = ::std::collections::BTreeMap::new();
        $crate::_value!(@map map ($($tt)+));
        $crate::Value::Map(map)
    }};

    // Lists: accumulate converted elements then build the vector.
    (@list [$($elems:expr,)*]) => {
        ::std::vec![$($elems,)*]
    };

    (@list [$($elems:expr,)*] None $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($elems,)* $crate::Value::None,] $($($rest)*)?)
    };

    (@list [$($elems:expr,)*] [$($list:tt)*] $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!([$($list)*]),] $($($rest)*)?)
    };

    (@list [$($elems:expr,)*] {$($map:tt)*} $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!({$($map)*}),] $($($rest)*)?)
    };

    (@list [$($elems:expr,)*] $next:expr $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!($next),] $($($rest)*)?)
    };

    // Maps: insert one entry at a time.
    (@map $map:ident ()) => {};

    (@map $map:ident ($key:tt : None $(, $($rest:tt)*)?)) => {
        let _ = $map.insert($crate::_value!(@key $key), $crate::Value::None);
        $crate::_value!(@map $map ($($($rest)*)?));
    };

    (@map $map:ident ($key:tt : [$($list:tt)*] $(, $($rest:tt)*)?)) => {
        let _ = $map.insert($crate::_value!(@key $key), $crate::_value!([$($list)*]));
        $crate::_value!(@map $map ($($($rest)*)?));
    };

    (@map $map:ident ($key:tt : {$($inner:tt)*} $(, $($rest:tt)*)?)) => {
        let _ = $map.insert($crate::_value!(@key $key), $crate::_value!({$($inner)*}));
        $crate::_value!(@map $map ($($($rest)*)?));
    };

    (@map $map:ident ($key:tt : $value:expr $(, $($rest:tt)*)?)) => {
        let _ = $map.insert($crate::_value!(@key $key), $crate::_value!($value));
        $crate::_value!(@map $map ($($($rest)*)?));
    };

    (@key $key:ident) => {
        ::std::string::String::from(stringify!($key))
    };

    (@key $key:literal) => {
        ::std::string::String::from($key)
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
