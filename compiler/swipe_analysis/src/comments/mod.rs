//! Comment index.
//!
//! Doc and line comments are only available on the syntax tree, while the
//! normalizer and the plugins work from type objects. The index bridges the
//! two by keying every comment with the object identity from [`crate::ids`].

use rustc_hash::FxHashMap;
use swipe_syntax::ast::{CommentId, Decl, ExprId, ExprKind, Field, File, Spec};
use swipe_syntax::TokenKind;
use swipe_types::Program;

use crate::ids::{join, method_id, receiver_name};

#[derive(Clone, Debug, Default)]
pub struct CommentIndex {
    funcs: FxHashMap<String, Vec<String>>,
    objects: FxHashMap<String, Vec<String>>,
    fields: FxHashMap<(String, String), String>,
}

impl CommentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every parsed file of `prog`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn build(prog: &Program) -> Self {
        let mut index = CommentIndex::new();
        for pkg in prog.packages() {
            for &file in &pkg.files {
                index.add_file(&pkg.path, &prog.file(file).ast);
            }
        }
        tracing::debug!(
            funcs = index.funcs.len(),
            objects = index.objects.len(),
            fields = index.fields.len(),
            "comment index built"
        );
        index
    }

    /// Doc comment lines of a function or method.
    pub fn func_comment(&self, obj_id: &str) -> &[String] {
        self.funcs.get(obj_id).map_or(&[], Vec::as_slice)
    }

    /// Doc or line comment of a type, constant or variable.
    pub fn object_comment(&self, obj_id: &str) -> &[String] {
        self.objects.get(obj_id).map_or(&[], Vec::as_slice)
    }

    /// Trimmed comment of field `field` of the struct named `struct_obj_id`.
    pub fn field_comment(&self, struct_obj_id: &str, field: &str) -> &str {
        self.fields
            .get(&(struct_obj_id.to_string(), field.to_string()))
            .map_or("", String::as_str)
    }

    pub fn add_file(&mut self, pkg_path: &str, file: &File) {
        for decl in &file.decls {
            match decl {
                Decl::Func(func) => {
                    let lines = file.comment_lines(func.doc);
                    if lines.is_empty() {
                        continue;
                    }
                    let id = match func.recv.as_ref().and_then(|r| receiver_name(file, r.ty)) {
                        Some(recv) => method_id(pkg_path, recv, &func.name.name),
                        None => join(pkg_path, &func.name.name),
                    };
                    self.funcs.insert(id, lines);
                }
                Decl::Gen(gen) => {
                    // An ungrouped declaration keeps its doc on the decl.
                    let decl_doc = if gen.grouped { None } else { gen.doc };
                    for spec in &gen.specs {
                        match spec {
                            Spec::Type(ts) => {
                                let id = join(pkg_path, &ts.name.name);
                                let lines = doc_or_line(file, ts.doc.or(decl_doc), ts.comment);
                                if !lines.is_empty() {
                                    self.objects.insert(id.clone(), lines);
                                }
                                self.add_type_body(file, pkg_path, &id, ts.ty);
                            }
                            Spec::Value(vs) if gen.tok != TokenKind::Import => {
                                let lines = doc_or_line(file, vs.doc.or(decl_doc), vs.comment);
                                if lines.is_empty() {
                                    continue;
                                }
                                for name in &vs.names {
                                    self.objects.insert(join(pkg_path, &name.name), lines.clone());
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Decl::Bad(_) => {}
            }
        }
    }

    fn add_type_body(&mut self, file: &File, pkg_path: &str, owner: &str, ty: ExprId) {
        match &file.expr(file.unparen(ty)).kind {
            ExprKind::StructType { fields } => {
                for field in fields {
                    let text = field_text(file, field);
                    if text.is_empty() {
                        continue;
                    }
                    for name in field_names(file, field) {
                        self.fields
                            .insert((owner.to_string(), name.to_string()), text.clone());
                    }
                }
            }
            ExprKind::InterfaceType { elems } => {
                let iface = owner.rsplit('.').next().unwrap_or(owner);
                for elem in elems {
                    let Some(name) = elem.names.first() else {
                        continue;
                    };
                    let lines = doc_or_line(file, elem.doc, elem.comment);
                    if !lines.is_empty() {
                        self.funcs
                            .insert(method_id(pkg_path, iface, &name.name), lines);
                    }
                }
            }
            _ => {}
        }
    }
}

fn doc_or_line(file: &File, doc: Option<CommentId>, line: Option<CommentId>) -> Vec<String> {
    let lines = file.comment_lines(doc);
    if lines.is_empty() {
        file.comment_lines(line)
    } else {
        lines
    }
}

/// Trailing comment of a field, its doc comment otherwise, on one line.
fn field_text(file: &File, field: &Field) -> String {
    let lines = doc_or_line(file, field.comment, field.doc);
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Declared names of a field; an embedded field is named after its type.
fn field_names<'f>(file: &'f File, field: &'f Field) -> Vec<&'f str> {
    if field.names.is_empty() {
        receiver_name(file, field.ty).into_iter().collect()
    } else {
        field.names.iter().map(|n| n.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests;
