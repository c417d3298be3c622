//! Per-output import accumulator.
//!
//! Generators ask the [`Importer`] for the local name of a package as they
//! write code. The importer picks a name that does not collide with a Go
//! keyword, a predeclared identifier, a reserved file-scope name or another
//! import, and remembers it; the framer later writes the import block.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

/// Go keywords and predeclared identifiers.
const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "any", "append", "bool", "byte",
    "cap", "clear", "close", "comparable", "complex", "complex64", "complex128", "copy",
    "delete", "error", "false", "float32", "float64", "imag", "int", "int8", "int16", "int32",
    "int64", "iota", "len", "make", "max", "min", "new", "nil", "panic", "print", "println",
    "real", "recover", "rune", "string", "true", "uint", "uint8", "uint16", "uint32",
    "uint64", "uintptr",
];

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ImportEntry {
    pub name: String,
    /// The chosen name is not the last path element, so the import line
    /// needs an alias.
    pub differs: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Importer {
    own_pkg_path: String,
    imports: BTreeMap<String, ImportEntry>,
    taken: FxHashSet<String>,
}

impl Importer {
    /// Importer for a file of package `own_pkg_path`; empty when the
    /// package is unknown.
    pub fn new(own_pkg_path: impl Into<String>) -> Self {
        Importer {
            own_pkg_path: canonical_path(&own_pkg_path.into()).to_string(),
            imports: BTreeMap::new(),
            taken: FxHashSet::default(),
        }
    }

    pub fn own_pkg_path(&self) -> &str {
        &self.own_pkg_path
    }

    /// Keep `name` free for a file-scope declaration.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Local name for package `path`, importing it on first use.
    ///
    /// Returns an empty string for the file's own package. An empty `name`
    /// defaults to the last path element.
    pub fn import(&mut self, name: &str, path: &str) -> String {
        let path = canonical_path(path);
        if path == self.own_pkg_path {
            return String::new();
        }
        if let Some(entry) = self.imports.get(path) {
            return entry.name.clone();
        }
        let wanted = if name.is_empty() {
            default_name(path)
        } else {
            name.to_string()
        };
        let mut chosen = wanted.clone();
        let mut n = 2;
        while RESERVED.contains(&chosen.as_str()) || self.taken.contains(&chosen) {
            chosen = format!("{wanted}_{n}");
            n += 1;
        }
        tracing::trace!(%path, name = %chosen, "import");
        self.taken.insert(chosen.clone());
        self.imports.insert(
            path.to_string(),
            ImportEntry {
                differs: chosen != last_element(path),
                name: chosen.clone(),
            },
        );
        chosen
    }

    /// Qualifier for an identifier of package `path`: `name.` or empty.
    pub fn qualifier(&mut self, name: &str, path: &str) -> String {
        let local = self.import(name, path);
        if local.is_empty() {
            local
        } else {
            local + "."
        }
    }

    pub fn get(&self, path: &str) -> Option<&ImportEntry> {
        self.imports.get(canonical_path(path))
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Import lines sorted by path: `"path"` or `alias "path"`.
    pub fn sorted_import_lines(&self) -> Vec<String> {
        self.imports
            .iter()
            .map(|(path, entry)| {
                if entry.differs {
                    format!("{} {path:?}", entry.name)
                } else {
                    format!("{path:?}")
                }
            })
            .collect()
    }
}

/// Import path with any vendor prefix removed.
fn canonical_path(path: &str) -> &str {
    if let Some(i) = path.rfind("/vendor/") {
        return &path[i + "/vendor/".len()..];
    }
    path.strip_prefix("vendor/").unwrap_or(path)
}

fn last_element(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Identifier derived from the last path element (`go-kit` → `go_kit`).
fn default_name(path: &str) -> String {
    let name: String = last_element(path)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}
