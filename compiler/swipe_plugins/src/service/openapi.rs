//! `openapi.json`: an OpenAPI 3 description of the REST routes, or one
//! POST path per JSON-RPC method.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Map, Value};
use swipe_diagnostic::Diagnostic;
use swipe_gen::{GenContext, Generator};
use swipe_ir::{IrArena, IrId, IrType, Package, Var};

use super::model::{IfaceModel, MethodModel, ServiceModel};

pub struct OpenapiGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> OpenapiGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        OpenapiGenerator { model }
    }
}

impl Generator for OpenapiGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn output_path(&self) -> Option<&Path> {
        self.model.openapi_output.as_deref()
    }

    fn filename(&self) -> &str {
        "openapi.json"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let model = self.model;
        let mut schemas = Schemas::new(ctx.arena);
        let mut paths = Map::new();
        for (iface, method) in model.methods() {
            if model.jsonrpc {
                let path = format!("/{}", method.rpc_name(iface));
                let op = jsonrpc_operation(&mut schemas, iface, method);
                paths.insert(path, json!({ "post": op }));
            } else if let Some(route) = &method.route {
                let op = rest_operation(&mut schemas, iface, method);
                let entry = paths
                    .entry(route.plain_path())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(ops) = entry {
                    ops.insert(route.method.to_ascii_lowercase(), op);
                }
            }
        }

        let info = &model.openapi_info;
        let mut servers = Vec::new();
        if model.jsonrpc {
            servers.push(json!({ "url": model.jsonrpc_path }));
        }
        let doc = json!({
            "openapi": "3.0.0",
            "info": {
                "title": info.title,
                "description": info.description,
                "version": info.version,
            },
            "servers": servers,
            "paths": paths,
            "components": { "schemas": schemas.defs },
        });
        let mut out = serde_json::to_vec_pretty(&doc)
            .map_err(|e| Diagnostic::generate(format!("openapi: {e}")))?;
        out.push(b'\n');
        Ok(out)
    }
}

fn operation_id(iface: &IfaceModel, method: &MethodModel) -> String {
    format!("{}{}", iface.named.name.upper, method.func.name.upper)
}

fn description(method: &MethodModel) -> String {
    method.func.comment.join("\n")
}

fn object_schema(schemas: &mut Schemas<'_>, vars: &[&Var]) -> Value {
    let mut props = Map::new();
    for var in vars {
        props.insert(var.name.lower.clone(), schemas.schema(var.ty));
    }
    json!({ "type": "object", "properties": props })
}

fn rest_operation(schemas: &mut Schemas<'_>, iface: &IfaceModel, method: &MethodModel) -> Value {
    let mut op = Map::new();
    op.insert("operationId".into(), json!(operation_id(iface, method)));
    op.insert("tags".into(), json!([iface.named.name.origin]));
    let desc = description(method);
    if !desc.is_empty() {
        op.insert("description".into(), json!(desc));
    }

    let mut parameters = Vec::new();
    if let Some(route) = &method.route {
        for (location, bindings) in [
            ("path", &route.path_vars),
            ("query", &route.query_vars),
            ("header", &route.header_vars),
        ] {
            for binding in bindings {
                parameters.push(json!({
                    "name": binding.key,
                    "in": location,
                    "required": location == "path",
                    "schema": schemas.schema(binding.param.ty),
                }));
            }
        }
        let body = method.body_params();
        if route.has_body() && !body.is_empty() {
            op.insert(
                "requestBody".into(),
                json!({
                    "content": { "application/json": { "schema": object_schema(schemas, &body) } }
                }),
            );
        }
    }
    if !parameters.is_empty() {
        op.insert("parameters".into(), Value::Array(parameters));
    }

    let results: Vec<_> = method.results(schemas.arena).iter().collect();
    let mut response = object_schema(schemas, &results);
    if let Some(wrap) = &method.wrap_response {
        let mut props = Map::new();
        props.insert(wrap.clone(), response);
        response = json!({ "type": "object", "properties": props });
    }
    let mut responses = Map::new();
    responses.insert(
        "200".into(),
        json!({
            "description": "OK",
            "content": { "application/json": { "schema": response } }
        }),
    );
    for err in &method.errors {
        if let Some(code) = err.status_code {
            responses.insert(code.to_string(), error_response(&err.name));
        }
    }
    responses
        .entry("default".to_string())
        .or_insert_with(|| error_response("Error"));
    op.insert("responses".into(), Value::Object(responses));
    Value::Object(op)
}

fn error_response(name: &str) -> Value {
    json!({
        "description": name,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}

fn jsonrpc_operation(schemas: &mut Schemas<'_>, iface: &IfaceModel, method: &MethodModel) -> Value {
    let params: Vec<_> = method.params().iter().collect();
    let results: Vec<_> = method.results(schemas.arena).iter().collect();
    let rpc = method.rpc_name(iface);
    let mut codes = vec![json!({ "code": -32602, "message": "Invalid params" })];
    for err in &method.errors {
        if let Some(code) = err.error_code {
            codes.push(json!({ "code": code, "message": err.name }));
        }
    }
    json!({
        "operationId": operation_id(iface, method),
        "tags": [iface.named.name.origin],
        "description": description(method),
        "requestBody": {
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "properties": {
                            "jsonrpc": { "type": "string", "example": "2.0" },
                            "id": { "type": "string" },
                            "method": { "type": "string", "enum": [rpc] },
                            "params": object_schema(schemas, &params),
                        }
                    }
                }
            }
        },
        "responses": {
            "200": {
                "description": "OK",
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "properties": {
                                "jsonrpc": { "type": "string", "example": "2.0" },
                                "id": { "type": "string" },
                                "result": object_schema(schemas, &results),
                            }
                        }
                    }
                }
            }
        },
        "x-errors": codes,
    })
}

/// Schema builder; named struct types become shared components.
struct Schemas<'a> {
    arena: &'a IrArena,
    defs: BTreeMap<String, Value>,
}

impl<'a> Schemas<'a> {
    fn new(arena: &'a IrArena) -> Self {
        Schemas {
            arena,
            defs: BTreeMap::new(),
        }
    }

    fn schema(&mut self, id: IrId) -> Value {
        swipe_ir::ensure_sufficient_stack(|| self.schema_inner(id))
    }

    fn schema_inner(&mut self, id: IrId) -> Value {
        match self.arena.get(id) {
            IrType::Basic(b) if b.is_string() => json!({ "type": "string" }),
            IrType::Basic(b) if b.is_bool() => json!({ "type": "boolean" }),
            IrType::Basic(b) if b.is_any_int() || b.is_any_uint() => {
                let format = if b.bit_size() == 64 { "int64" } else { "int32" };
                json!({ "type": "integer", "format": format })
            }
            IrType::Basic(b) if b.is_any_float() => {
                let format = if b.bit_size() == 32 { "float" } else { "double" };
                json!({ "type": "number", "format": format })
            }
            IrType::Basic(_) | IrType::Iface(_) | IrType::Sign(_) => json!({}),
            IrType::Named(n) => {
                if n.obj_id == "time.Time" {
                    return json!({ "type": "string", "format": "date-time" });
                }
                if n.obj_id == "time.Duration" {
                    return json!({ "type": "string" });
                }
                if !matches!(self.arena.get(n.ty), IrType::Struct(_)) {
                    return self.schema(n.ty);
                }
                let name = n.name.upper.clone();
                if !self.defs.contains_key(&name) {
                    // Placeholder first; recursive types refer back to it.
                    self.defs.insert(name.clone(), json!({}));
                    let def = self.schema(n.ty);
                    self.defs.insert(name.clone(), def);
                }
                json!({ "$ref": format!("#/components/schemas/{name}") })
            }
            IrType::Struct(s) => {
                let mut props = Map::new();
                for field in &s.fields {
                    if !field.var.exported {
                        continue;
                    }
                    let key = match field.tags.get("json") {
                        Some(tag) if tag.name == "-" => continue,
                        Some(tag) if !tag.name.is_empty() => tag.name.clone(),
                        _ => field.var.name.origin.clone(),
                    };
                    props.insert(key, self.schema(field.var.ty));
                }
                json!({ "type": "object", "properties": props })
            }
            IrType::Map(m) => {
                json!({ "type": "object", "additionalProperties": self.schema(m.value) })
            }
            IrType::Slice(s) => {
                if matches!(self.arena.get(s.value), IrType::Basic(b) if b.is_byte()) {
                    return json!({ "type": "string", "format": "byte" });
                }
                json!({ "type": "array", "items": self.schema(s.value) })
            }
            IrType::Array(a) => json!({ "type": "array", "items": self.schema(a.value) }),
        }
    }
}
