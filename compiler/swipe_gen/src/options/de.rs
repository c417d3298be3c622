//! `serde::Deserializer` over a borrowed [`OptionValue`].

use std::collections::btree_map;
use std::fmt;

use serde::de::value::{BorrowedStrDeserializer, U32Deserializer};
use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::forward_to_deserialize_any;
use swipe_ir::{FuncRef, OptionValue};

/// Failure inside one option value; the path is added by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueError(pub(crate) String);

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValueError {}

impl de::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ValueError(msg.to_string())
    }
}

/// Newtype name under which [`TypeRef`](super::TypeRef) asks for a handle.
pub(super) const TYPE_REF: &str = "TypeRef";

pub struct ValueDeserializer<'v>(pub &'v OptionValue);

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self.0 {
            OptionValue::Null => visitor.visit_unit(),
            OptionValue::Bool(b) => visitor.visit_bool(*b),
            OptionValue::Int(i) => visitor.visit_i64(*i),
            OptionValue::Float(f) => visitor.visit_f64(*f),
            OptionValue::String(s) => visitor.visit_borrowed_str(s),
            OptionValue::Slice(items) => visitor.visit_seq(Seq(items.iter())),
            OptionValue::Named(id) => HandleDeserializer(id.raw()).deserialize_any(visitor),
            OptionValue::Func(func) => visitor.visit_map(FuncAccess { func, state: 0 }),
            OptionValue::Nested(map) => visitor.visit_map(Map {
                iter: map.iter(),
                value: None,
            }),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self.0 {
            OptionValue::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        match self.0 {
            OptionValue::String(s) => visitor.visit_enum(s.as_str().into_deserializer()),
            other => Err(de::Error::custom(format!(
                "expected a string, found {}",
                other.kind_name()
            ))),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        match self.0 {
            OptionValue::Named(_) => self.deserialize_any(visitor),
            other if name == TYPE_REF => Err(de::Error::custom(format!(
                "expected a type, found {}",
                other.kind_name()
            ))),
            _ => visitor.visit_newtype_struct(self),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

/// An IR handle, presented as a newtype around its raw index.
struct HandleDeserializer(u32);

impl<'de> de::Deserializer<'de> for HandleDeserializer {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        visitor.visit_newtype_struct(U32Deserializer::<ValueError>::new(self.0))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct Seq<'v>(std::slice::Iter<'v, OptionValue>);

impl<'de> SeqAccess<'de> for Seq<'de> {
    type Error = ValueError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, ValueError> {
        self.0
            .next()
            .map(|v| seed.deserialize(ValueDeserializer(v)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

struct Map<'v> {
    iter: btree_map::Iter<'v, String, OptionValue>,
    value: Option<&'v OptionValue>,
}

impl<'de> MapAccess<'de> for Map<'de> {
    type Error = ValueError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, ValueError> {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.value = Some(value);
        seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, ValueError> {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer(value)),
            None => Err(de::Error::custom("value requested before key")),
        }
    }
}

/// A method expression, presented as `{owner, name}`.
struct FuncAccess<'v> {
    func: &'v FuncRef,
    state: u8,
}

impl<'de> MapAccess<'de> for FuncAccess<'de> {
    type Error = ValueError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, ValueError> {
        let key = match self.state {
            0 => "owner",
            2 => "name",
            _ => return Ok(None),
        };
        self.state += 1;
        seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, ValueError> {
        self.state += 1;
        match self.state {
            2 => seed.deserialize(HandleDeserializer(self.func.owner.raw())),
            _ => seed.deserialize(BorrowedStrDeserializer::new(&self.func.name)),
        }
    }
}
