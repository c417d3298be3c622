//! Compile-time constant values and their arithmetic.
//!
//! Integers are kept as `i128`, which covers every typed Go integer and
//! the untyped constants real programs use; anything outside that range
//! folds to `None` and the expression becomes a non-constant value.

use std::fmt;

use swipe_syntax::ast::LitKind;
use swipe_syntax::literal::{parse_float, parse_int, unquote, unquote_char};
use swipe_syntax::TokenKind;

use crate::BasicKind;

#[derive(Clone, PartialEq, Debug)]
pub enum ConstValue {
    Bool(bool),
    Int(i128),
    Float(f64),
    String(String),
}

impl ConstValue {
    pub fn from_literal(kind: LitKind, raw: &str) -> Option<ConstValue> {
        match kind {
            LitKind::Int => parse_int(raw).map(ConstValue::Int),
            LitKind::Float => parse_float(raw).map(ConstValue::Float),
            LitKind::Char => unquote_char(raw).ok().map(|c| ConstValue::Int(i128::from(c))),
            LitKind::String => unquote(raw).ok().map(ConstValue::String),
            LitKind::Imag => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConstValue::Int(v) => i64::try_from(*v).ok(),
            #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
            ConstValue::Float(f) if f.fract() == 0.0 && f.abs() < 9.2e18 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            ConstValue::Int(v) => Some(*v as f64),
            ConstValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Untyped kind a constant of this value has.
    pub fn untyped_kind(&self) -> BasicKind {
        match self {
            ConstValue::Bool(_) => BasicKind::UntypedBool,
            ConstValue::Int(_) => BasicKind::UntypedInt,
            ConstValue::Float(_) => BasicKind::UntypedFloat,
            ConstValue::String(_) => BasicKind::UntypedString,
        }
    }

    /// Apply a unary operator.
    pub fn unary(op: TokenKind, x: &ConstValue) -> Option<ConstValue> {
        match (op, x) {
            (TokenKind::Add, ConstValue::Int(_) | ConstValue::Float(_)) => Some(x.clone()),
            (TokenKind::Sub, ConstValue::Int(v)) => v.checked_neg().map(ConstValue::Int),
            (TokenKind::Sub, ConstValue::Float(f)) => Some(ConstValue::Float(-f)),
            (TokenKind::Xor, ConstValue::Int(v)) => Some(ConstValue::Int(!v)),
            (TokenKind::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
            _ => None,
        }
    }

    /// Apply an arithmetic, bitwise or logical binary operator.
    ///
    /// `integer` selects truncated division for `/`.
    pub fn binary(op: TokenKind, x: &ConstValue, y: &ConstValue, integer: bool) -> Option<ConstValue> {
        use ConstValue::{Bool, Float, Int, String};
        match (x, y) {
            (Int(a), Int(b)) => {
                let (a, b) = (*a, *b);
                let v = match op {
                    TokenKind::Add => a.checked_add(b)?,
                    TokenKind::Sub => a.checked_sub(b)?,
                    TokenKind::Mul => a.checked_mul(b)?,
                    TokenKind::Quo if integer => a.checked_div(b)?,
                    #[allow(clippy::cast_precision_loss)]
                    TokenKind::Quo => {
                        if b == 0 {
                            return None;
                        }
                        return Some(Float(a as f64 / b as f64));
                    }
                    TokenKind::Rem => a.checked_rem(b)?,
                    TokenKind::And => a & b,
                    TokenKind::Or => a | b,
                    TokenKind::Xor => a ^ b,
                    TokenKind::AndNot => a & !b,
                    TokenKind::Shl => a.checked_shl(u32::try_from(b).ok()?)?,
                    TokenKind::Shr => a.checked_shr(u32::try_from(b).ok()?)?,
                    _ => return None,
                };
                Some(Int(v))
            }
            (Int(_) | Float(_), Int(_) | Float(_)) => {
                let (a, b) = (x.as_f64()?, y.as_f64()?);
                let v = match op {
                    TokenKind::Add => a + b,
                    TokenKind::Sub => a - b,
                    TokenKind::Mul => a * b,
                    TokenKind::Quo if b != 0.0 => a / b,
                    _ => return None,
                };
                Some(Float(v))
            }
            (String(a), String(b)) if op == TokenKind::Add => Some(String(format!("{a}{b}"))),
            (Bool(a), Bool(b)) => match op {
                TokenKind::LAnd => Some(Bool(*a && *b)),
                TokenKind::LOr => Some(Bool(*a || *b)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Apply a comparison operator.
    pub fn compare(op: TokenKind, x: &ConstValue, y: &ConstValue) -> Option<bool> {
        use std::cmp::Ordering;
        let ord = match (x, y) {
            (ConstValue::Int(a), ConstValue::Int(b)) => a.cmp(b),
            (ConstValue::String(a), ConstValue::String(b)) => a.cmp(b),
            (ConstValue::Bool(a), ConstValue::Bool(b)) => {
                return match op {
                    TokenKind::Eql => Some(a == b),
                    TokenKind::Neq => Some(a != b),
                    _ => None,
                };
            }
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?)?,
        };
        Some(match op {
            TokenKind::Eql => ord == Ordering::Equal,
            TokenKind::Neq => ord != Ordering::Equal,
            TokenKind::Lss => ord == Ordering::Less,
            TokenKind::Leq => ord != Ordering::Greater,
            TokenKind::Gtr => ord == Ordering::Greater,
            TokenKind::Geq => ord != Ordering::Less,
            _ => return None,
        })
    }

    /// Convert to a value of basic kind `kind`, as `T(x)` does.
    pub fn convert(&self, kind: BasicKind) -> Option<ConstValue> {
        let kind = kind.default_kind();
        if kind.is_integer() {
            return match self {
                ConstValue::Int(_) => Some(self.clone()),
                ConstValue::Float(_) => self.as_i64().map(|v| ConstValue::Int(i128::from(v))),
                _ => None,
            };
        }
        if kind.is_float() {
            return self.as_f64().map(ConstValue::Float);
        }
        if kind.is_string() {
            return match self {
                ConstValue::String(_) => Some(self.clone()),
                ConstValue::Int(v) => {
                    let c = u32::try_from(*v).ok().and_then(char::from_u32).unwrap_or('\u{FFFD}');
                    Some(ConstValue::String(c.to_string()))
                }
                _ => None,
            };
        }
        if kind.is_boolean() {
            return self.as_bool().map(ConstValue::Bool);
        }
        None
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::Float(v) => write!(f, "{v}"),
            ConstValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

#[cfg(test)]
mod tests;
