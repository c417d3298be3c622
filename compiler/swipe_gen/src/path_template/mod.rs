//! REST path templates: `/users/{id:[0-9]+}/posts/{slug}`.
//!
//! Variables are brace spans holding a name and an optional regular
//! expression after the first `:`. Braces nest (`{id:[0-9]{2}}`), so spans
//! are found by counting depth, the way gorilla/mux does it.

use std::collections::BTreeMap;

use swipe_diagnostic::Diagnostic;

/// Pattern of a variable declared without one.
pub const DEFAULT_PATTERN: &str = "[^/]+";

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum PathTemplateError {
    #[error("mux: unbalanced braces in {0:?}")]
    Unbalanced(String),
    #[error("mux: missing name or pattern in {0:?}")]
    MissingName(String),
    #[error("mux: invalid pattern in {span:?}: {message}")]
    InvalidPattern { span: String, message: String },
}

impl From<PathTemplateError> for Diagnostic {
    fn from(err: PathTemplateError) -> Self {
        Diagnostic::config(err.to_string())
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PathVar {
    pub name: String,
    pub pattern: String,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PathTemplate {
    pub template: String,
    /// Variables in source order.
    pub vars: Vec<PathVar>,
    /// Anchored regular expression matching the whole path; variable `i`
    /// is capture group `v{i}`.
    pub regex: String,
}

impl PathTemplate {
    /// Variable name to pattern.
    pub fn var_map(&self) -> BTreeMap<&str, &str> {
        self.vars
            .iter()
            .map(|v| (v.name.as_str(), v.pattern.as_str()))
            .collect()
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.vars.iter().any(|v| v.name == name)
    }
}

/// Byte ranges of the top-level brace spans of `s`, braces included.
pub fn brace_indices(s: &str) -> Result<Vec<(usize, usize)>, PathTemplateError> {
    let mut level = 0usize;
    let mut start = 0;
    let mut spans = Vec::new();
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'{' => {
                level += 1;
                if level == 1 {
                    start = i;
                }
            }
            b'}' => {
                level = level
                    .checked_sub(1)
                    .ok_or_else(|| PathTemplateError::Unbalanced(s.to_string()))?;
                if level == 0 {
                    spans.push((start, i + 1));
                }
            }
            _ => {}
        }
    }
    if level != 0 {
        return Err(PathTemplateError::Unbalanced(s.to_string()));
    }
    Ok(spans)
}

/// Parse and validate `template`.
pub fn parse_path_template(template: &str) -> Result<PathTemplate, PathTemplateError> {
    let spans = brace_indices(template)?;
    let mut vars = Vec::with_capacity(spans.len());
    let mut regex = String::from("^");
    let mut end = 0;
    for (i, &(start, stop)) in spans.iter().enumerate() {
        let raw = &template[start..stop];
        let inner = &raw[1..raw.len() - 1];
        let (name, pattern) = match inner.split_once(':') {
            Some((name, pattern)) => (name.trim(), pattern),
            None => (inner.trim(), DEFAULT_PATTERN),
        };
        if name.is_empty() || pattern.is_empty() {
            return Err(PathTemplateError::MissingName(raw.to_string()));
        }
        regex::Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            PathTemplateError::InvalidPattern {
                span: raw.to_string(),
                message: e.to_string(),
            }
        })?;
        regex.push_str(&regex::escape(&template[end..start]));
        regex.push_str(&format!("(?P<v{i}>{pattern})"));
        end = stop;
        vars.push(PathVar {
            name: name.to_string(),
            pattern: pattern.to_string(),
        });
    }
    regex.push_str(&regex::escape(&template[end..]));
    regex.push('$');
    Ok(PathTemplate {
        template: template.to_string(),
        vars,
        regex,
    })
}

#[cfg(test)]
mod tests;
