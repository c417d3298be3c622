use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use swipe_syntax::{parse_file, BuildContext};

use super::{Driver, ListError, ListedModule, ListedPackage, LoadOptions};
use crate::LoadError;

const GOROOT: &str = "/goroot/src";
const MODCACHE: &str = "/gopath/pkg/mod";

#[derive(Clone, Debug, Default)]
struct MemPackage {
    dir: PathBuf,
    files: Vec<String>,
    standard: bool,
}

/// Serves packages from memory.
///
/// Sources are registered per import path; build constraints are evaluated
/// against a [`BuildContext`] (host platform plus the `swipe` tag by
/// default). Patterns support `.`, `./...`, `./dir`, `./dir/...`,
/// `path/...` and exact import paths.
#[derive(Clone, Debug)]
pub struct MemoryDriver {
    modules: Vec<ListedModule>,
    packages: BTreeMap<String, MemPackage>,
    sources: BTreeMap<PathBuf, String>,
    build: BuildContext,
}

impl MemoryDriver {
    /// A driver whose main module is `module_path` rooted at `dir`.
    pub fn new(module_path: &str, dir: impl Into<PathBuf>) -> Self {
        MemoryDriver {
            modules: vec![ListedModule {
                path: module_path.to_string(),
                version: String::new(),
                dir: dir.into(),
                main: true,
            }],
            packages: BTreeMap::new(),
            sources: BTreeMap::new(),
            build: BuildContext::host(),
        }
    }

    #[must_use]
    pub fn with_build_context(mut self, build: BuildContext) -> Self {
        self.build = build;
        self
    }

    /// Add minimal `context`, `errors` and `fmt` packages.
    #[must_use]
    pub fn with_std_stubs(mut self) -> Self {
        self.add_std("context", CONTEXT_STUB);
        self.add_std("errors", ERRORS_STUB);
        self.add_std("fmt", FMT_STUB);
        self
    }

    pub fn main_module(&self) -> &ListedModule {
        &self.modules[0]
    }

    /// Register a dependency module; its packages live under the module
    /// cache.
    pub fn add_module(&mut self, path: &str, version: &str) -> &mut Self {
        self.modules.push(ListedModule {
            path: path.to_string(),
            version: version.to_string(),
            dir: Path::new(MODCACHE).join(format!("{path}@{version}")),
            main: false,
        });
        self
    }

    pub fn add_file(&mut self, import_path: &str, file_name: &str, src: &str) -> &mut Self {
        let dir = self.package_dir(import_path);
        self.insert(import_path, dir, file_name, src, false);
        self
    }

    pub fn add_std(&mut self, import_path: &str, src: &str) -> &mut Self {
        let dir = Path::new(GOROOT).join(import_path);
        let file_name = format!("{}.go", import_path.rsplit('/').next().unwrap_or(import_path));
        self.insert(import_path, dir, &file_name, src, true);
        self
    }

    fn insert(&mut self, import_path: &str, dir: PathBuf, file_name: &str, src: &str, standard: bool) {
        self.sources.insert(dir.join(file_name), src.to_string());
        let pkg = self
            .packages
            .entry(import_path.to_string())
            .or_insert_with(|| MemPackage {
                dir,
                files: Vec::new(),
                standard,
            });
        if !pkg.files.iter().any(|f| f == file_name) {
            pkg.files.push(file_name.to_string());
            pkg.files.sort();
        }
    }

    fn module_of(&self, import_path: &str) -> Option<&ListedModule> {
        self.modules
            .iter()
            .filter(|m| import_path == m.path || import_path.starts_with(&format!("{}/", m.path)))
            .max_by_key(|m| m.path.len())
    }

    fn package_dir(&self, import_path: &str) -> PathBuf {
        match self.module_of(import_path) {
            Some(m) => match import_path.strip_prefix(&m.path) {
                Some(rel) => m.dir.join(rel.trim_start_matches('/')),
                None => m.dir.clone(),
            },
            None => Path::new(MODCACHE).join(import_path),
        }
    }

    fn matches(&self, pattern: &str, work_dir: &Path) -> Vec<String> {
        let local = |pkg: &MemPackage| !pkg.standard;
        if pattern == "." || pattern.starts_with("./") || pattern.starts_with("../") {
            let (rel, recursive) = match pattern.strip_suffix("/...") {
                Some(rel) => (rel, true),
                None => (pattern, false),
            };
            let base = normalize(&work_dir.join(rel));
            return self
                .packages
                .iter()
                .filter(|(_, p)| local(p))
                .filter(|(_, p)| {
                    if recursive {
                        p.dir.starts_with(&base)
                    } else {
                        p.dir == base
                    }
                })
                .map(|(path, _)| path.clone())
                .collect();
        }
        if let Some(prefix) = pattern.strip_suffix("/...") {
            return self
                .packages
                .keys()
                .filter(|path| *path == prefix || path.starts_with(&format!("{prefix}/")))
                .cloned()
                .collect();
        }
        self.packages
            .keys()
            .filter(|path| *path == pattern)
            .cloned()
            .collect()
    }

    /// Files passing build constraints, with the package name and imports
    /// found in them.
    fn scan(&self, pkg: &MemPackage) -> (Vec<String>, String, BTreeSet<String>) {
        let mut files = Vec::new();
        let mut name = String::new();
        let mut imports = BTreeSet::new();
        for file_name in &pkg.files {
            let Some(src) = self.sources.get(&pkg.dir.join(file_name)) else {
                continue;
            };
            let (file, _) = parse_file(src);
            if !self
                .build
                .matches(file_name, file.build_constraint.as_deref())
            {
                continue;
            }
            if name.is_empty() {
                name = file.package_name().to_string();
            }
            imports.extend(file.imports().map(|i| i.path.clone()));
            files.push(file_name.clone());
        }
        imports.remove("C");
        imports.remove("unsafe");
        (files, name, imports)
    }

    fn visit(
        &self,
        path: &str,
        roots: &BTreeSet<String>,
        seen: &mut BTreeSet<String>,
        out: &mut Vec<ListedPackage>,
    ) {
        if !seen.insert(path.to_string()) {
            return;
        }
        let Some(pkg) = self.packages.get(path) else {
            out.push(ListedPackage {
                import_path: path.to_string(),
                dep_only: !roots.contains(path),
                error: Some(ListError {
                    pos: String::new(),
                    err: format!("cannot find package {path:?}"),
                }),
                ..ListedPackage::default()
            });
            return;
        };
        let (go_files, name, imports) = self.scan(pkg);
        for import in &imports {
            self.visit(import, roots, seen, out);
        }
        let error = go_files.is_empty().then(|| ListError {
            pos: String::new(),
            err: format!("build constraints exclude all Go files in {}", pkg.dir.display()),
        });
        out.push(ListedPackage {
            import_path: path.to_string(),
            name,
            dir: pkg.dir.clone(),
            go_files,
            cgo_files: Vec::new(),
            imports: imports.into_iter().collect(),
            import_map: BTreeMap::new(),
            module: if pkg.standard {
                None
            } else {
                self.module_of(path).cloned()
            },
            dep_only: !roots.contains(path),
            standard: pkg.standard,
            error,
        });
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

impl Driver for MemoryDriver {
    fn list(&self, opts: &LoadOptions) -> Result<Vec<ListedPackage>, LoadError> {
        let work_dir = normalize(&opts.work_dir);
        let mut roots = BTreeSet::new();
        for pattern in &opts.patterns {
            let matched = self.matches(pattern, &work_dir);
            if matched.is_empty() {
                tracing::warn!(pattern = %pattern, "pattern matched no packages");
            }
            roots.extend(matched);
        }
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for root in &roots {
            self.visit(root, &roots, &mut seen, &mut out);
        }
        Ok(out)
    }

    fn read_file(&self, path: &Path) -> std::io::Result<String> {
        self.sources.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not registered", path.display()),
            )
        })
    }
}

const CONTEXT_STUB: &str = "package context

type Context interface {
	Done() <-chan struct{}
	Err() error
	Value(key any) any
}

func Background() Context { return nil }

func TODO() Context { return nil }
";

const ERRORS_STUB: &str = "package errors

type errorString struct{ s string }

func (e *errorString) Error() string { return e.s }

func New(text string) error { return &errorString{text} }

func Is(err, target error) bool { return err == target }
";

const FMT_STUB: &str = "package fmt

type Stringer interface {
	String() string
}

func Sprintf(format string, a ...any) string { return format }

func Errorf(format string, a ...any) error { return nil }
";
