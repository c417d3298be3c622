//! Go snippets shared by the service generators.

use swipe_gen::emit::{signature_params, signature_results, type_string, CodeWriter};
use swipe_gen::{w, GenContext};
use swipe_ir::Var;

use super::model::{IfaceModel, MethodModel, VarBinding};
use crate::config::FieldKind;

pub fn iface_type(ctx: &mut GenContext<'_>, iface: &IfaceModel) -> String {
    type_string(ctx.arena, ctx.importer, iface.id)
}

/// `(ctx context.Context, id int) (r1 *User, r2 error)`; results are
/// always named so deferred middleware can read them.
pub fn method_signature(ctx: &mut GenContext<'_>, method: &MethodModel) -> String {
    let sig = &method.func.sig;
    let params = signature_params(ctx.arena, ctx.importer, &sig.params, sig.is_variadic);
    let results = signature_results(ctx.arena, ctx.importer, &sig.results, true);
    if results.is_empty() {
        format!("({params})")
    } else {
        format!("({params}) {results}")
    }
}

/// Arguments forwarding every parameter: `ctx, id, opts...`.
pub fn call_args(method: &MethodModel) -> String {
    let sig = &method.func.sig;
    let mut args: Vec<String> = sig.params.iter().map(|p| p.name.origin.clone()).collect();
    if sig.is_variadic {
        if let Some(last) = args.last_mut() {
            last.push_str("...");
        }
    }
    args.join(", ")
}

/// Request/response struct field of `var`.
pub fn field(var: &Var) -> &str {
    &var.name.upper
}

/// JSON key of `var`.
pub fn json_key(var: &Var) -> &str {
    &var.name.lower
}

/// Struct type with one JSON-tagged field per var.
pub fn write_struct(ctx: &mut GenContext<'_>, w: &mut CodeWriter, name: &str, vars: &[&Var]) {
    if vars.is_empty() {
        w!(w, "type {name} struct{{}}");
        return;
    }
    w.block(&format!("type {name} struct"), "}", |w| {
        for var in vars {
            let ty = type_string(ctx.arena, ctx.importer, var.ty);
            w!(w, "{} {ty} `json:\"{}\"`", field(var), json_key(var));
        }
    });
}

/// Parse the string `input` into `target` per the binding's kind. A
/// failure returns `nil` and an error labelled `label`.
pub fn write_parse(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    binding: &VarBinding,
    input: &str,
    target: &str,
    label: &str,
) {
    let ty = type_string(ctx.arena, ctx.importer, binding.param.ty);
    let strconv = ctx.importer.qualifier("", "strconv");
    let parse = match &binding.kind {
        FieldKind::String => {
            if ty == "string" {
                w!(w, "{target} = {input}");
            } else {
                w!(w, "{target} = {ty}({input})");
            }
            return;
        }
        FieldKind::Bool => format!("{strconv}ParseBool({input})"),
        FieldKind::Int { bits } => format!("{strconv}ParseInt({input}, 10, {bits})"),
        FieldKind::Uint { bits } => format!("{strconv}ParseUint({input}, 10, {bits})"),
        FieldKind::Float { bits } => format!("{strconv}ParseFloat({input}, {bits})"),
        FieldKind::Duration => {
            let time = ctx.importer.qualifier("", "time");
            format!("{time}ParseDuration({input})")
        }
        FieldKind::Slice(_) => return,
    };
    let fmt = ctx.importer.qualifier("", "fmt");
    let native = match &binding.kind {
        FieldKind::Bool => ty == "bool",
        FieldKind::Int { .. } => ty == "int64",
        FieldKind::Uint { .. } => ty == "uint64",
        FieldKind::Float { .. } => ty == "float64",
        _ => ty.ends_with("Duration") && ty.starts_with("time"),
    };
    w!(w, "v, err := {parse}");
    w.block("if err != nil", "}", |w| {
        w!(w, "return nil, {fmt}Errorf(\"{label}: %w\", err)");
    });
    if native {
        w!(w, "{target} = v");
    } else {
        w!(w, "{target} = {ty}(v)");
    }
}

/// Go expression formatting `value` of `kind` as a string.
pub fn format_value(ctx: &mut GenContext<'_>, binding: &VarBinding, value: &str) -> String {
    let ty = type_string(ctx.arena, ctx.importer, binding.param.ty);
    match binding.kind {
        FieldKind::String if ty == "string" => value.to_string(),
        FieldKind::String => format!("string({value})"),
        _ => {
            let fmt = ctx.importer.qualifier("", "fmt");
            format!("{fmt}Sprint({value})")
        }
    }
}
