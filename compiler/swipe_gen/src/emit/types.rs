//! Printing IR types as Go source.

use swipe_ir::{IrArena, IrId, IrType, Sign, Var};

use crate::importer::Importer;

/// Go spelling of `id` as seen from the importer's package.
pub fn type_string(arena: &IrArena, importer: &mut Importer, id: IrId) -> String {
    let mut out = String::new();
    write_type(arena, importer, id, &mut out);
    out
}

fn star(out: &mut String, is_pointer: bool) {
    if is_pointer {
        out.push('*');
    }
}

fn write_type(arena: &IrArena, importer: &mut Importer, id: IrId, out: &mut String) {
    match arena.get(id) {
        IrType::Basic(b) => {
            star(out, b.is_pointer);
            out.push_str(&b.name);
        }
        IrType::Named(n) => {
            star(out, n.is_pointer);
            if let Some(pkg) = &n.pkg {
                out.push_str(&importer.qualifier(&pkg.name, &pkg.path));
            }
            out.push_str(&n.name.origin);
        }
        IrType::Struct(s) => {
            star(out, s.is_pointer);
            out.push_str("struct{");
            for (i, field) in s.fields.iter().enumerate() {
                if i > 0 {
                    out.push_str("; ");
                }
                if !field.var.embedded {
                    out.push_str(&field.var.name.origin);
                    out.push(' ');
                }
                write_type(arena, importer, field.var.ty, out);
            }
            out.push('}');
        }
        IrType::Iface(iface) => {
            if iface.methods.is_empty() && iface.embeddeds.is_empty() {
                out.push_str("interface{}");
                return;
            }
            out.push_str("interface{");
            let mut first = true;
            for &embedded in &iface.embeddeds {
                if !first {
                    out.push_str("; ");
                }
                first = false;
                write_type(arena, importer, embedded, out);
            }
            for method in &iface.explicit_methods {
                if !first {
                    out.push_str("; ");
                }
                first = false;
                out.push_str(&method.name.origin);
                write_signature(arena, importer, &method.sig, out);
            }
            out.push('}');
        }
        IrType::Sign(sig) => {
            out.push_str("func");
            write_signature(arena, importer, sig, out);
        }
        IrType::Map(m) => {
            star(out, m.is_pointer);
            out.push_str("map[");
            write_type(arena, importer, m.key, out);
            out.push(']');
            write_type(arena, importer, m.value, out);
        }
        IrType::Slice(s) => {
            star(out, s.is_pointer);
            out.push_str("[]");
            write_type(arena, importer, s.value, out);
        }
        IrType::Array(a) => {
            star(out, a.is_pointer);
            out.push('[');
            out.push_str(&a.len.to_string());
            out.push(']');
            write_type(arena, importer, a.value, out);
        }
    }
}

fn write_signature(arena: &IrArena, importer: &mut Importer, sig: &Sign, out: &mut String) {
    out.push('(');
    out.push_str(&signature_params(arena, importer, &sig.params, sig.is_variadic));
    out.push(')');
    let results = signature_results(arena, importer, &sig.results, sig.is_named);
    if !results.is_empty() {
        out.push(' ');
        out.push_str(&results);
    }
}

/// `ctx context.Context, ids ...int`
pub fn signature_params(
    arena: &IrArena,
    importer: &mut Importer,
    params: &[Var],
    is_variadic: bool,
) -> String {
    let mut out = String::new();
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.name.origin);
        out.push(' ');
        let last = i + 1 == params.len();
        match arena.get(param.ty) {
            IrType::Slice(s) if is_variadic && last => {
                out.push_str("...");
                write_type(arena, importer, s.value, &mut out);
            }
            _ => write_type(arena, importer, param.ty, &mut out),
        }
    }
    out
}

/// `error`, `(int, error)` or `(n int, err error)`; empty without results.
pub fn signature_results(
    arena: &IrArena,
    importer: &mut Importer,
    results: &[Var],
    named: bool,
) -> String {
    let mut parts = Vec::with_capacity(results.len());
    for result in results {
        let ty = type_string(arena, importer, result.ty);
        if named {
            parts.push(format!("{} {ty}", result.name.origin));
        } else {
            parts.push(ty);
        }
    }
    match parts.as_slice() {
        [] => String::new(),
        [single] if !named => single.clone(),
        _ => format!("({})", parts.join(", ")),
    }
}

/// Zero value of `id` as a Go expression.
pub fn zero_value(arena: &IrArena, importer: &mut Importer, id: IrId) -> String {
    let ty = arena.get(id);
    if ty.is_pointer() {
        return "nil".into();
    }
    match ty {
        IrType::Basic(b) if b.is_bool() => "false".into(),
        IrType::Basic(b) if b.is_string() => "\"\"".into(),
        IrType::Basic(b) if b.is_numeric() => "0".into(),
        IrType::Named(n) => match arena.get(n.ty) {
            IrType::Struct(_) | IrType::Array(_) => {
                format!("{}{{}}", type_string(arena, importer, id))
            }
            _ => zero_value(arena, importer, n.ty),
        },
        IrType::Struct(_) | IrType::Array(_) => {
            format!("{}{{}}", type_string(arena, importer, id))
        }
        _ => "nil".into(),
    }
}
