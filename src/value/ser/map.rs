use std::collections::BTreeMap;

use serde::ser::{Error as _, Serialize};

use crate::value::ser::snake_case;
use crate::{to_value, Error, Result, Value};

pub struct SerializeMap {
    map: BTreeMap<String, Value>,
    next_key: Option<String>,
    snake: bool,
}

impl SerializeMap {
    /// If `snake` is set then keys are converted to snake_case.
    pub fn new(snake: bool) -> Self {
        Self {
            map: BTreeMap::new(),
            next_key: None,
            snake,
        }
    }

    fn insert(&mut self, key: &str, value: Value) {
        let key = if self.snake {
            snake_case(key)
        } else {
            key.to_owned()
        };
        self.map.insert(key, value);
    }
}

impl serde::ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<()>
    where
        T: Serialize,
    {
        match to_value(key)? {
            Value::String(key) => {
                self.next_key = Some(key);
                Ok(())
            }
            _ => Err(Error::custom("map key must be a string")),
        }
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("map value serialized before its key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Map(self.map))
    }
}

impl serde::ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let value = to_value(value)?;
        self.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Map(self.map))
    }
}

/// A struct variant becomes a single entry map from the variant name to the
/// map of fields.
pub struct SerializeStructVariant {
    name: &'static str,
    fields: SerializeMap,
}

impl SerializeStructVariant {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: SerializeMap::new(true),
        }
    }
}

impl serde::ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        serde::ser::SerializeStruct::serialize_field(&mut self.fields, key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        let fields = serde::ser::SerializeStruct::end(self.fields)?;
        Ok(Value::Map(BTreeMap::from([(self.name.to_owned(), fields)])))
    }
}
