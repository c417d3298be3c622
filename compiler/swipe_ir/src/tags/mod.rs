//! Struct tag parsing.
//!
//! Parses Go struct tags (`json:"name,omitempty" env:"PORT,required"`) into a
//! structured multimap. The first comma-separated element of a value is the
//! tag *name*, the rest are *options*. An option starting with `desc:`
//! swallows the remainder of the value, commas included, so descriptions can
//! be written naturally:
//!
//! ```text
//! env:"FLD_STRING_REQ,required,use_flag,desc:Listen address, host:port"
//! ```

use std::fmt;

/// One `key:"value"` pair of a struct tag.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Tag {
    pub key: String,
    /// First element of the value (`name` in `json:"name,omitempty"`).
    pub name: String,
    /// Remaining elements, in source order.
    pub options: Vec<String>,
    /// The unquoted value as written.
    pub value: String,
}

impl Tag {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Value of a `prefix:value` option, e.g. `option_value("desc")`.
    pub fn option_value(&self, prefix: &str) -> Option<&str> {
        self.options.iter().find_map(|o| {
            o.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(':'))
        })
    }
}

/// Error returned for malformed tags.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TagParseError {
    pub raw: String,
    pub offset: usize,
}

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad struct tag {:?} at offset {}", self.raw, self.offset)
    }
}

impl std::error::Error for TagParseError {}

/// Parsed struct tag: an ordered multimap from key to [`Tag`].
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    /// Parse an unquoted tag string.
    ///
    /// Follows `reflect.StructTag` conventions: keys are non-empty runs of
    /// non-space, non-quote, non-colon characters followed by `:` and a
    /// double-quoted Go string.
    pub fn parse(raw: &str) -> Result<TagSet, TagParseError> {
        let bytes = raw.as_bytes();
        let mut tags = Vec::new();
        let mut i = 0;
        let err = |offset| TagParseError {
            raw: raw.to_string(),
            offset,
        };

        loop {
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            let key_start = i;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == key_start || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"'
            {
                return Err(err(i));
            }
            let key = &raw[key_start..i];
            i += 2; // `:"`

            let mut value = String::new();
            let mut closed = false;
            let mut chars = raw[i..].char_indices();
            while let Some((off, c)) = chars.next() {
                match c {
                    '"' => {
                        i += off + 1;
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, other)) => value.push(other),
                        None => return Err(err(i + off)),
                    },
                    other => value.push(other),
                }
            }
            if !closed {
                return Err(err(bytes.len()));
            }

            tags.push(split_value(key, value));
        }

        Ok(TagSet { tags })
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == key)
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}

fn split_value(key: &str, value: String) -> Tag {
    let mut options = Vec::new();
    let mut parts = value.split(',');
    let name = parts.next().unwrap_or_default().to_string();

    let rest: Vec<&str> = parts.collect();
    for (idx, part) in rest.iter().enumerate() {
        if part.starts_with("desc:") {
            options.push(rest[idx..].join(","));
            break;
        }
        options.push((*part).to_string());
    }

    Tag {
        key: key.to_string(),
        name,
        options,
        value,
    }
}

#[cfg(test)]
mod tests;
