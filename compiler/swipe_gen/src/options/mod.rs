//! Typed plugin configuration from the untyped option tree.
//!
//! Plugin configs are plain `#[derive(Deserialize)]` structs read straight
//! from an [`OptionValue`]:
//!
//! - option names map to fields through `#[serde(rename = "...")]`;
//! - `Option<T>` fields are `Some` exactly when the option was given, which
//!   is what per-method default inheritance keys on;
//! - `#[serde(flatten)]` embeds one option set in another;
//! - IR types arrive as [`TypeRef`] handles and method expressions as
//!   [`MethodRef`].
//!
//! Errors name the option path that failed (`MethodOptions[0].RESTPath`).

mod de;

use std::fmt;

use serde::de::{DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer};
use swipe_diagnostic::Diagnostic;
use swipe_ir::{IrId, OptionValue};

pub use de::{ValueDeserializer, ValueError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid option {path}: {message}")]
pub struct OptionsDecodeError {
    pub path: String,
    pub message: String,
}

impl From<OptionsDecodeError> for Diagnostic {
    fn from(err: OptionsDecodeError) -> Self {
        Diagnostic::config(err.to_string())
    }
}

/// Decode `value` into `T`, reporting the failing option path.
pub fn decode_options<T: DeserializeOwned>(value: &OptionValue) -> Result<T, OptionsDecodeError> {
    serde_path_to_error::deserialize(ValueDeserializer(value)).map_err(|err| {
        let path = err.path().to_string();
        OptionsDecodeError {
            path,
            message: err.into_inner().to_string(),
        }
    })
}

/// Handle of an IR type named in the options (`&Config{}`, `(*Svc)(nil)`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeRef(pub IrId);

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HandleVisitor;

        impl<'de> Visitor<'de> for HandleVisitor {
            type Value = TypeRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a type")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<TypeRef, D::Error> {
                u32::deserialize(deserializer).map(|raw| TypeRef(IrId::from_raw(raw)))
            }
        }

        deserializer.deserialize_newtype_struct(de::TYPE_REF, HandleVisitor)
    }
}

/// A method expression such as `Svc.Create`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize)]
pub struct MethodRef {
    pub owner: TypeRef,
    pub name: String,
}

/// Fill the options `self` left unset from `defaults`.
///
/// A field counts as set when it is `Some`, even when it holds an empty
/// string or list.
pub trait Inherit {
    fn inherit(&mut self, defaults: &Self);
}

/// Implement [`Inherit`] for a struct of `Option` fields.
///
/// ```ignore
/// inherit!(MethodOptions { logging, instrumenting, rest_path });
/// ```
#[macro_export]
macro_rules! inherit {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::options::Inherit for $ty {
            fn inherit(&mut self, defaults: &Self) {
                $(
                    if self.$field.is_none() {
                        self.$field.clone_from(&defaults.$field);
                    }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests;
