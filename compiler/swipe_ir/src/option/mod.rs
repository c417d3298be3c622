//! The untyped option tree produced by the option decoder.
//!
//! Each DSL call decodes to an [`OptionValue`]. Plugins later turn the tree
//! into their typed configuration.

use std::collections::BTreeMap;
use std::fmt;

use crate::IrId;

/// Ordered map of option name to value.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// A method selected by a method expression such as `Svc.Create`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FuncRef {
    /// The named type owning the method (interface or concrete type).
    pub owner: IrId,
    pub name: String,
}

#[derive(Clone, PartialEq, Debug)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Slice(Vec<OptionValue>),
    /// A type resolved into the IR (`&Config{}`, `(*Svc)(nil)`).
    Named(IrId),
    /// A method expression.
    Func(FuncRef),
    Nested(OptionMap),
}

impl OptionValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            OptionValue::Null => "null",
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::String(_) => "string",
            OptionValue::Slice(_) => "slice",
            OptionValue::Named(_) => "type",
            OptionValue::Func(_) => "method",
            OptionValue::Nested(_) => "options",
        }
    }

    pub fn as_nested(&self) -> Option<&OptionMap> {
        match self {
            OptionValue::Nested(map) => Some(map),
            _ => None,
        }
    }

    /// Record `value` under `name`.
    ///
    /// With `repeat`, occurrences accumulate into a `Slice` in call order;
    /// otherwise the last assignment wins. Has no effect on non-nested
    /// values.
    pub fn insert(&mut self, name: &str, value: OptionValue, repeat: bool) {
        let OptionValue::Nested(map) = self else {
            return;
        };
        if repeat {
            match map.get_mut(name) {
                Some(OptionValue::Slice(items)) => items.push(value),
                _ => {
                    map.insert(name.to_string(), OptionValue::Slice(vec![value]));
                }
            }
        } else {
            map.insert(name.to_string(), value);
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Null => f.write_str("nil"),
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::String(s) => write!(f, "{s:?}"),
            OptionValue::Slice(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            OptionValue::Named(id) => write!(f, "type#{}", id.raw()),
            OptionValue::Func(func) => write!(f, "type#{}.{}", func.owner.raw(), func.name),
            OptionValue::Nested(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests;
