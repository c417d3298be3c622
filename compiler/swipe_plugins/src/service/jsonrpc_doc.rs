//! `jsonrpc_doc.md`: Markdown reference of the JSON-RPC methods.

use std::fmt::Write as _;
use std::path::Path;

use swipe_diagnostic::Diagnostic;
use swipe_gen::{GenContext, Generator};
use swipe_ir::{IrArena, IrId, IrType, Package};

use super::model::ServiceModel;

pub struct JsonRpcDocGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> JsonRpcDocGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        JsonRpcDocGenerator { model }
    }
}

impl Generator for JsonRpcDocGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn output_path(&self) -> Option<&Path> {
        self.model.jsonrpc_doc.as_deref()
    }

    fn filename(&self) -> &str {
        "jsonrpc_doc.md"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let model = self.model;
        let arena = ctx.arena;
        let mut out = String::new();
        let title = if model.openapi_info.title.is_empty() {
            "JSON-RPC API"
        } else {
            &model.openapi_info.title
        };
        let _ = writeln!(out, "# {title}\n");
        if !model.openapi_info.description.is_empty() {
            let _ = writeln!(out, "{}\n", model.openapi_info.description);
        }
        let _ = writeln!(out, "Endpoint: `POST {}`\n", model.jsonrpc_path);

        out.push_str("## Methods\n\n");
        for (iface, method) in model.methods() {
            let rpc = method.rpc_name(iface);
            let _ = writeln!(out, "- [{rpc}](#{})", rpc.replace('.', "").to_lowercase());
        }
        out.push('\n');

        for (iface, method) in model.methods() {
            let _ = writeln!(out, "### {}\n", method.rpc_name(iface));
            for line in &method.func.comment {
                let _ = writeln!(out, "{line}");
            }
            if !method.func.comment.is_empty() {
                out.push('\n');
            }

            out.push_str("**Params**\n\n");
            if method.params().is_empty() {
                out.push_str("None.\n\n");
            } else {
                out.push_str("| Name | Type |\n|------|------|\n");
                for param in method.params() {
                    let _ = writeln!(out, "| {} | `{}` |", param.name.lower, js_type(arena, param.ty));
                }
                out.push('\n');
            }

            out.push_str("**Result**\n\n");
            let results = method.results(arena);
            if results.is_empty() {
                out.push_str("None.\n\n");
            } else {
                out.push_str("| Name | Type |\n|------|------|\n");
                for result in results {
                    let _ = writeln!(out, "| {} | `{}` |", result.name.lower, js_type(arena, result.ty));
                }
                out.push('\n');
            }

            let codes: Vec<_> = method
                .errors
                .iter()
                .filter_map(|e| e.error_code.map(|code| (code, &e.name)))
                .collect();
            if !codes.is_empty() {
                out.push_str("**Errors**\n\n| Code | Error |\n|------|-------|\n");
                for (code, name) in codes {
                    let _ = writeln!(out, "| {code} | {name} |");
                }
                out.push('\n');
            }
        }
        Ok(out.into_bytes())
    }
}

/// JavaScript-facing name of a type, as used in the docs and JSDoc.
pub fn js_type(arena: &IrArena, id: IrId) -> String {
    match arena.get(id) {
        IrType::Basic(b) if b.is_string() => "string".into(),
        IrType::Basic(b) if b.is_bool() => "boolean".into(),
        IrType::Basic(b) if b.is_numeric() => "number".into(),
        IrType::Basic(_) | IrType::Iface(_) | IrType::Sign(_) => "*".into(),
        IrType::Named(n) => match n.obj_id.as_str() {
            "time.Time" | "time.Duration" => "string".into(),
            _ if matches!(arena.get(n.ty), IrType::Struct(_)) => n.name.upper.clone(),
            _ => js_type(arena, n.ty),
        },
        IrType::Struct(_) => "Object".into(),
        IrType::Map(m) => format!("Object<string, {}>", js_type(arena, m.value)),
        IrType::Slice(s) => match arena.get(s.value) {
            IrType::Basic(b) if b.is_byte() => "string".into(),
            _ => format!("Array<{}>", js_type(arena, s.value)),
        },
        IrType::Array(a) => format!("Array<{}>", js_type(arena, a.value)),
    }
}
