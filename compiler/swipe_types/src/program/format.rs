//! Go-syntax rendering of types for messages and tests.

use std::fmt::Write;

use super::Program;
use crate::{ChanDir, Signature, TypeData, TypeId};

impl Program {
    /// Render `ty` the way `go/types` prints it, qualifying named types
    /// with their package name.
    pub fn type_string(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty, 0);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId, depth: usize) {
        if depth > 16 {
            out.push_str("...");
            return;
        }
        let depth = depth + 1;
        match self.pool.get(ty) {
            TypeData::Basic(kind) => out.push_str(kind.name()),
            TypeData::Named(named) => {
                let obj = self.object(named.obj);
                if let Some(pkg) = obj.pkg {
                    let _ = write!(out, "{}.", self.package(pkg).name);
                }
                out.push_str(&obj.name);
            }
            TypeData::TypeParam { name, .. } => out.push_str(name),
            TypeData::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem, depth);
            }
            TypeData::Slice(elem) => {
                out.push_str("[]");
                self.write_type(out, *elem, depth);
            }
            TypeData::Array { len, elem } => {
                let _ = write!(out, "[{len}]");
                self.write_type(out, *elem, depth);
            }
            TypeData::Map { key, value } => {
                out.push_str("map[");
                self.write_type(out, *key, depth);
                out.push(']');
                self.write_type(out, *value, depth);
            }
            TypeData::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(out, *elem, depth);
            }
            TypeData::Struct(fields) => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(out, field.ty, depth);
                    if let Some(tag) = &field.tag {
                        let _ = write!(out, " {tag:?}");
                    }
                }
                out.push('}');
            }
            TypeData::Signature(sig) => {
                out.push_str("func");
                self.write_signature(out, sig, depth);
            }
            TypeData::Interface(iface) => {
                if iface.all.is_empty() && iface.embeddeds.is_empty() {
                    out.push_str("interface{}");
                    return;
                }
                out.push_str("interface{");
                for (i, m) in iface.all.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(&m.name);
                    if let TypeData::Signature(sig) = self.pool.get(m.sig) {
                        self.write_signature(out, sig, depth);
                    }
                }
                out.push('}');
            }
            TypeData::Tuple(types) => {
                out.push('(');
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, *t, depth);
                }
                out.push(')');
            }
        }
    }

    fn write_signature(&self, out: &mut String, sig: &Signature, depth: usize) {
        out.push('(');
        for (i, p) in sig.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if !p.name.is_empty() {
                out.push_str(&p.name);
                out.push(' ');
            }
            if sig.variadic && i + 1 == sig.params.len() {
                out.push_str("...");
                let elem = match self.pool.get(p.ty) {
                    TypeData::Slice(elem) => *elem,
                    _ => p.ty,
                };
                self.write_type(out, elem, depth);
            } else {
                self.write_type(out, p.ty, depth);
            }
        }
        out.push(')');
        match sig.results.as_slice() {
            [] => {}
            [single] if single.name.is_empty() => {
                out.push(' ');
                self.write_type(out, single.ty, depth);
            }
            results => {
                out.push_str(" (");
                for (i, r) in results.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if !r.name.is_empty() {
                        out.push_str(&r.name);
                        out.push(' ');
                    }
                    self.write_type(out, r.ty, depth);
                }
                out.push(')');
            }
        }
    }
}
