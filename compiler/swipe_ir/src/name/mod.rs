//! Identifier names with pre-computed case variants.
//!
//! Generators constantly need `GetUser`, `getUser` and `get_user` forms of
//! the same identifier. [`Name`] computes them once at normalization time.

use std::fmt;

/// An identifier together with its upper/lower camel-case variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct Name {
    /// The identifier exactly as declared.
    pub origin: String,
    /// `UpperCamel` variant.
    pub upper: String,
    /// `lowerCamel` variant.
    pub lower: String,
}

impl Name {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Name {
            upper: to_upper_camel(&origin),
            lower: to_lower_camel(&origin),
            origin,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.origin.is_empty()
    }

    pub fn snake(&self) -> String {
        to_snake(&self.origin)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

/// Split an identifier into words.
///
/// Boundaries are separators (`_`, `-`, space, `.`), a lower-to-upper
/// transition (`getUser`), and the last capital of an acronym run that is
/// followed by a lowercase letter (`HTTPServer` → `HTTP`, `Server`).
/// Digits stay attached to the word they follow.
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ' | '.' | '/') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `get_user` / `getUser` / `GetUser` → `GetUser`.
pub fn to_upper_camel(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// `GetUser` → `getUser`, `HTTPServer` → `httpServer`, `ID` → `id`.
pub fn to_lower_camel(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::with_capacity(s.len());
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&w.to_lowercase());
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// `GetUser` → `get_user`, `JSONRPCServer` → `jsonrpc_server`.
pub fn to_snake(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests;
