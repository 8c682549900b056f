use std::collections::HashMap;

use crate::value::Value;

/// A render context: tag names bound to values, with an optional parent.
///
/// Lookups fall back to the parent chain, so a child created for each loop
/// row sees everything bound outside the loop while its own bindings shadow
/// them.
///
/// # Examples
///
/// ```
/// use chunky::Chunk;
///
/// let mut outer = Chunk::new();
/// outer.set("site", "example.org");
///
/// let mut row = outer.child();
/// row.set("title", "Hello");
///
/// assert_eq!(row.get("site").and_then(|v| v.as_str()), Some("example.org"));
/// assert_eq!(outer.get("title"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chunk<'parent> {
    tags: HashMap<String, Value>,
    parent: Option<&'parent Chunk<'parent>>,
}

impl<'parent> Chunk<'parent> {
    /// Construct an empty chunk with no parent.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a chunk from the entries of a [`Value::Map`].
    ///
    /// Any other value gives an empty chunk.
    pub fn from_value(value: Value) -> Self {
        let tags = match value {
            Value::Map(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Self { tags, parent: None }
    }

    /// Construct an empty chunk whose lookups fall back to this one.
    #[inline]
    pub fn child(&self) -> Chunk<'_> {
        Chunk {
            tags: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Bind a value to a tag name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.tags.insert(name.into(), value.into());
    }

    /// Bind a string to a tag name, or remove the binding if there is no
    /// string.
    pub fn set_or_delete(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) => match self.tags.get_mut(name) {
                Some(Value::String(s)) => {
                    s.clear();
                    s.push_str(v);
                }
                Some(slot) => *slot = Value::String(v.to_owned()),
                None => {
                    self.tags.insert(name.to_owned(), Value::String(v.to_owned()));
                }
            },
            None => {
                self.tags.remove(name);
            }
        }
    }

    /// Remove a binding from this chunk. Parents are not affected.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.tags.remove(name)
    }

    /// Serialize a value and bind it to a tag name.
    #[cfg(feature = "serde")]
    pub fn set_serialized<S>(&mut self, name: impl Into<String>, value: S) -> crate::Result<()>
    where
        S: serde::Serialize,
    {
        let value = crate::to_value(value)?;
        self.tags.insert(name.into(), value);
        Ok(())
    }

    /// Look up a tag name in this chunk and then in each parent.
    ///
    /// A name that is not bound exactly is tried as a dotted path into a map,
    /// e.g. `user.name`. A leading `.` looks the name up in the outermost
    /// chunk only, skipping any bindings that shadow it.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(rest) = name.strip_prefix('.') {
            let mut root = self;
            while let Some(parent) = root.parent {
                root = parent;
            }
            return root.lookup(rest);
        }
        let mut chunk = Some(self);
        while let Some(c) = chunk {
            if let Some(value) = c.lookup(name) {
                return Some(value);
            }
            chunk = c.parent;
        }
        None
    }

    /// Returns true if the name resolves in this chunk or a parent.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.tags.get(name) {
            return Some(value);
        }
        let (head, rest) = name.split_once('.')?;
        let mut value = self.tags.get(head)?;
        for key in rest.split('.') {
            value = match value {
                Value::Map(map) => map.get(key)?,
                _ => return None,
            };
        }
        Some(value)
    }
}

impl<K, V> FromIterator<(K, V)> for Chunk<'_>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            tags: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            parent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::value::Map;

    #[test]
    fn child_shadows_parent() {
        let mut parent = Chunk::new();
        parent.set("a", "outer");
        parent.set("b", "kept");
        let mut child = parent.child();
        child.set("a", "inner");
        assert_eq!(child.get("a"), Some(&Value::from("inner")));
        assert_eq!(child.get("b"), Some(&Value::from("kept")));
        assert_eq!(parent.get("a"), Some(&Value::from("outer")));
    }

    #[test]
    fn set_or_delete_unshadows() {
        let mut parent = Chunk::new();
        parent.set("a", "outer");
        let mut child = parent.child();
        child.set_or_delete("a", Some("inner"));
        assert_eq!(child.get("a"), Some(&Value::from("inner")));
        child.set_or_delete("a", None);
        assert_eq!(child.get("a"), Some(&Value::from("outer")));
    }

    #[test]
    fn dotted_paths() {
        let mut user = Map::new();
        user.insert("name".to_owned(), Value::from("Ada"));
        let mut chunk = Chunk::new();
        chunk.set("user", Value::Map(user));
        chunk.set("a.b", "exact");
        assert_eq!(chunk.get("user.name"), Some(&Value::from("Ada")));
        assert_eq!(chunk.get("user.age"), None);
        assert_eq!(chunk.get("a.b"), Some(&Value::from("exact")));
    }

    #[test]
    fn leading_dot_reads_the_root() {
        let mut root = Chunk::new();
        root.set("a", "root");
        let mut mid = root.child();
        mid.set("a", "mid");
        let leaf = mid.child();
        assert_eq!(leaf.get("a"), Some(&Value::from("mid")));
        assert_eq!(leaf.get(".a"), Some(&Value::from("root")));
    }
}
