//! Collect-and-continue sink for diagnostics.
//!
//! Stages that can produce partial output (package errors during load,
//! generator errors during generation) push into a [`Diagnostics`] and
//! keep going. The CLI drains it at the end.

use crate::{Diagnostic, ErrorKind};

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_fatal() {
            tracing::debug!(kind = %diagnostic.kind, "{diagnostic}");
        } else {
            tracing::warn!("{diagnostic}");
        }
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for d in diagnostics {
            self.push(d);
        }
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Diagnostic::is_fatal)
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Drain in report order: positioned diagnostics sorted by file, line
    /// and column first, then position-less ones in insertion order.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        // Stable sort keeps insertion order for equal keys.
        self.items.sort_by(|a, b| match (&a.pos, &b.pos) {
            (Some(pa), Some(pb)) => pa.cmp(pb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        self.items
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        Diagnostics::extend(self, iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests;
