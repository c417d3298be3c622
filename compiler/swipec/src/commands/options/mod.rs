//! `swipe options`: DSL stubs derived from option structs.
//!
//! A struct annotated with `@swipe:"<ID>"` describes a plugin's options.
//! Each exported field becomes an option function of the generated stub:
//!
//! ```go
//! // Service builds a service.
//! // @swipe:"Service"
//! type Service struct {
//!     // HTTPServer enables the server.
//!     HTTPServer bool
//!     JSONRPCPath string
//!     Interface  []Interface `swipe:"option"`
//! }
//! ```
//!
//! A `bool` becomes a flag (`HTTPServer()`), any other type a single
//! parameter (`JSONRPCPath(jsonrpcPath string)`). A field tagged
//! `swipe:"option"` whose type is a struct of the same directory becomes
//! an option group taking variadic options, with the group's fields as
//! further option functions; slice groups repeat.
//!
//! The stub is returned by a generated `func (*T) Options() []byte` in
//! `swipe_gen_options.go`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use swipe_diagnostic::{Diagnostic, Diagnostics};
use swipe_gen::frame::frame_and_format;
use swipe_gen::{Formatter, Importer, GENERATED_PREFIX};
use swipe_ir::{to_lower_camel, Position, TagSet};
use swipe_syntax::ast::{Decl, ExprId, ExprKind, Field, File, Spec};
use swipe_syntax::{parse_file, BuildContext, TokenKind};

use crate::write::write_atomic;

pub const OUTPUT_FILE: &str = "swipe_gen_options.go";

const BODY: &str = "\treturn \"implementation not generated, run swipe\"\n";

#[derive(Debug, Default)]
pub struct OptionsReport {
    pub written: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

/// One parsed source file of the directory.
pub struct Source {
    pub path: PathBuf,
    pub src: String,
    file: File,
}

impl Source {
    pub fn parse(path: impl Into<PathBuf>, src: String) -> Result<Source, Diagnostic> {
        let path = path.into();
        let (file, errors) = parse_file(&src);
        if let Some(err) = errors.into_iter().next() {
            return Err(Diagnostic::load(err.message).at(Position::new(&path, err.line, err.column)));
        }
        Ok(Source { path, src, file })
    }

    fn text(&self, id: ExprId) -> &str {
        let span = self.file.expr(id).span;
        self.src
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    fn pos(&self, offset: u32) -> Position {
        let (line, column) = self.file.lines.line_col(offset);
        Position::new(&self.path, line, column)
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub fn run(dir: &Path, formatter: &dyn Formatter) -> OptionsReport {
    let mut report = OptionsReport::default();
    let result = read_dir(dir).and_then(|sources| {
        generate(&sources, formatter, &mut report.diagnostics)
    });
    match result {
        Ok(Some(content)) => {
            let path = dir.join(OUTPUT_FILE);
            match write_atomic(&path, &content) {
                Ok(()) => report.written.push(path),
                Err(e) => report
                    .diagnostics
                    .push(Diagnostic::io(format!("write {}: {e}", path.display()))),
            }
        }
        Ok(None) => report.diagnostics.push(Diagnostic::warn(format!(
            "{}: no @swipe option structs",
            dir.display()
        ))),
        Err(err) => report.diagnostics.push(err),
    }
    report
}

/// Parse the Go files of `dir`, skipping tests, generated files and files
/// the host build would leave out.
pub fn read_dir(dir: &Path) -> Result<Vec<Source>, Diagnostic> {
    let io_err = |e: std::io::Error| Diagnostic::io(format!("{}: {e}", dir.display()));
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".go") && !name.ends_with("_test.go") && !name.contains(GENERATED_PREFIX) {
            paths.push(path);
        }
    }
    paths.sort();
    let build = BuildContext::host();
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let src = std::fs::read_to_string(&path)
            .map_err(|e| Diagnostic::io(format!("{}: {e}", path.display())))?;
        let source = Source::parse(path, src)?;
        let name = source.path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if build.matches(name, source.file.build_constraint.as_deref()) {
            sources.push(source);
        } else {
            tracing::debug!(file = %source.path.display(), "excluded by build constraints");
        }
    }
    Ok(sources)
}

/// The framed `swipe_gen_options.go`, or `None` when no struct carries an
/// annotation.
pub fn generate(
    sources: &[Source],
    formatter: &dyn Formatter,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Vec<u8>>, Diagnostic> {
    let Some(first) = sources.first() else {
        return Ok(None);
    };
    let pkg = first.file.package_name().to_string();
    let structs = collect_structs(sources);

    let mut body = String::new();
    for decl in &structs {
        let Some(id) = swipe_analysis::annotation(&decl.doc, "swipe") else {
            continue;
        };
        let mut stub = StubWriter {
            structs: &structs,
            out: String::new(),
            declared: FxHashSet::default(),
            stack: Vec::new(),
            errors: Vec::new(),
        };
        stub.write(decl, id);
        if !stub.errors.is_empty() {
            diagnostics.extend(stub.errors);
            continue;
        }
        let _ = writeln!(body, "// Options returns the DSL source of the {id} plugin.");
        let _ = writeln!(body, "func (*{}) Options() []byte {{", decl.name);
        let _ = writeln!(body, "\treturn []byte({})", go_string(&stub.out));
        body.push_str("}\n\n");
        tracing::debug!(plugin = id, name = %decl.name, "options stub");
    }
    if body.is_empty() {
        return Ok(None);
    }
    let version = swipe_gen::VERSION;
    frame_and_format(OUTPUT_FILE, &pkg, version, &Importer::new(""), body.as_bytes(), formatter)
        .map(Some)
        .map_err(Diagnostic::from)
}

/// Raw string literal unless the text contains a backtick.
fn go_string(s: &str) -> String {
    if s.contains('`') {
        swipe_gen::emit::quote(s)
    } else {
        format!("`{s}`")
    }
}

struct StructDecl<'s> {
    source: &'s Source,
    name: String,
    doc: Vec<String>,
    fields: &'s [Field],
    offset: u32,
}

fn collect_structs(sources: &[Source]) -> Vec<StructDecl<'_>> {
    let mut out = Vec::new();
    for source in sources {
        for decl in &source.file.decls {
            let Decl::Gen(gen) = decl else { continue };
            if gen.tok != TokenKind::Type {
                continue;
            }
            for spec in &gen.specs {
                let Spec::Type(ts) = spec else { continue };
                let ExprKind::StructType { fields } = &source.file.expr(ts.ty).kind else {
                    continue;
                };
                if ts.alias {
                    continue;
                }
                let doc = if gen.grouped { ts.doc } else { ts.doc.or(gen.doc) };
                out.push(StructDecl {
                    source,
                    name: ts.name.name.clone(),
                    doc: source.file.comment_lines(doc),
                    fields,
                    offset: ts.name.span.start,
                });
            }
        }
    }
    out
}

/// Shape of an option group's type: `S`, `*S` or `[]S`.
fn group_type<'a>(source: &'a Source, ty: ExprId) -> Option<(&'a str, bool)> {
    let file = &source.file;
    match &file.expr(file.unparen(ty)).kind {
        ExprKind::Ident(id) => Some((id.name.as_str(), false)),
        ExprKind::Star(inner) => match &file.expr(*inner).kind {
            ExprKind::Ident(id) => Some((id.name.as_str(), false)),
            _ => None,
        },
        ExprKind::ArrayType { len: None, elem } => {
            group_type(source, *elem).map(|(name, _)| (name, true))
        }
        _ => None,
    }
}

fn is_option_group(source: &Source, field: &Field) -> bool {
    let Some(raw) = &field.tag else {
        return false;
    };
    let Ok(tag) = swipe_syntax::literal::unquote(raw) else {
        return false;
    };
    TagSet::parse(&tag)
        .ok()
        .and_then(|tags| tags.get("swipe").map(|t| t.name == "option"))
        .unwrap_or_else(|| {
            tracing::debug!(file = %source.path.display(), tag = %raw, "unparsable tag");
            false
        })
}

struct StubWriter<'a, 's> {
    structs: &'a [StructDecl<'s>],
    out: String,
    /// Function names already emitted.
    declared: FxHashSet<String>,
    /// Groups being expanded.
    stack: Vec<String>,
    errors: Vec<Diagnostic>,
}

impl StubWriter<'_, '_> {
    fn write(&mut self, entry: &StructDecl<'_>, id: &str) {
        self.out.push_str("type Option string\n");
        self.func(&entry.doc, id, "opts ...Option", entry.source.pos(entry.offset));
        self.fields(entry);
    }

    fn func(&mut self, doc: &[String], name: &str, params: &str, pos: Position) {
        if !self.declared.insert(name.to_string()) {
            self.errors
                .push(Diagnostic::config(format!("option {name} declared twice")).at(pos));
            return;
        }
        self.out.push('\n');
        for line in doc {
            if line.is_empty() {
                self.out.push_str("//\n");
            } else {
                let _ = writeln!(self.out, "// {line}");
            }
        }
        let _ = write!(self.out, "func {name}({params}) Option {{\n{BODY}}}\n");
    }

    fn fields(&mut self, decl: &StructDecl<'_>) {
        let source = decl.source;
        for field in decl.fields {
            let doc = source.file.comment_lines(field.doc);
            for name in field.names.iter().filter(|n| n.is_exported()) {
                let pos = source.pos(name.span.start);
                if is_option_group(source, field) {
                    self.group(decl, field, &name.name, doc.clone(), pos);
                    continue;
                }
                let ty = source.text(field.ty);
                let params = if ty == "bool" {
                    String::new()
                } else {
                    format!("{} {ty}", param_name(&name.name))
                };
                self.func(&doc, &name.name, &params, pos);
            }
        }
    }

    fn group(
        &mut self,
        decl: &StructDecl<'_>,
        field: &Field,
        name: &str,
        mut doc: Vec<String>,
        pos: Position,
    ) {
        let Some((type_name, repeat)) = group_type(decl.source, field.ty) else {
            self.errors.push(
                Diagnostic::config(format!(
                    "option group {name} must be a struct, pointer to struct or slice of structs"
                ))
                .at(pos),
            );
            return;
        };
        let structs = self.structs;
        let Some(group) = structs.iter().find(|s| s.name == type_name) else {
            self.errors.push(
                Diagnostic::config(format!("option group {name}: struct {type_name} not found"))
                    .at(pos),
            );
            return;
        };
        if self.stack.iter().any(|s| s == type_name) {
            self.errors.push(
                Diagnostic::config(format!("option group {name}: {type_name} contains itself"))
                    .at(pos),
            );
            return;
        }
        if repeat {
            doc.push("@type:\"repeat\"".to_string());
        }
        self.func(&doc, name, "opts ...Option", pos);
        self.stack.push(type_name.to_string());
        self.fields(group);
        self.stack.pop();
    }
}

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

fn param_name(field: &str) -> String {
    let name = to_lower_camel(field);
    if KEYWORDS.contains(&name.as_str()) {
        format!("{name}Value")
    } else {
        name
    }
}
