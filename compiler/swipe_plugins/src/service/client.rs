//! `http_client.go`: an implementation of each interface that calls a
//! remote service over REST or JSON-RPC.
//!
//! Error codes received from the server are mapped back to the error
//! types the method may return, so callers can type-switch on them.

use swipe_diagnostic::Diagnostic;
use swipe_gen::emit::{quote, CodeWriter};
use swipe_gen::{w, GenContext, Generator};
use swipe_ir::Package;

use super::endpoint::ENDPOINT_PKG;
use super::model::{IfaceModel, MethodModel, RestRoute, ServiceModel};
use super::render::{field, format_value, iface_type, method_signature};
use super::server::{JSONRPC_PKG, KITHTTP_PKG};

pub struct ClientGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> ClientGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        ClientGenerator { model }
    }
}

impl Generator for ClientGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn filename(&self) -> &str {
        "http_client.go"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let mut w = CodeWriter::new();
        for iface in &self.model.ifaces {
            write_client_type(ctx, &mut w, iface);
            if self.model.jsonrpc {
                write_jsonrpc_constructor(ctx, &mut w, self.model, iface);
            } else {
                write_rest_constructor(ctx, &mut w, iface);
            }
            for method in &iface.methods {
                if self.model.jsonrpc {
                    write_jsonrpc_codec(ctx, &mut w, self.model, iface, method);
                } else if let Some(route) = &method.route {
                    write_rest_codec(ctx, &mut w, self.model, iface, method, route);
                }
                write_error_decode(ctx, &mut w, self.model, iface, method);
            }
        }
        if self.model.jsonrpc {
            let context = ctx.importer.qualifier("", "context");
            let json = ctx.importer.qualifier("", "encoding/json");
            w.block(
                &format!(
                    "func encodeJSONRPCRequest(_ {context}Context, request interface{{}}) ({json}RawMessage, error)"
                ),
                "}",
                |w| {
                    w!(w, "return {json}Marshal(request)");
                },
            );
        }
        Ok(w.into_bytes())
    }
}

fn client_type(iface: &IfaceModel) -> String {
    format!("client{}", iface.named.name.upper)
}

fn endpoint_field(method: &MethodModel) -> String {
    format!("{}Endpoint", method.func.name.lower)
}

fn write_client_type(ctx: &mut GenContext<'_>, w: &mut CodeWriter, iface: &IfaceModel) {
    let endpoint = ctx.importer.qualifier("", ENDPOINT_PKG);
    let ty = client_type(iface);
    w.block(&format!("type {ty} struct"), "}", |w| {
        for method in &iface.methods {
            w!(w, "{} {endpoint}Endpoint", endpoint_field(method));
        }
    });
    w.newline();

    for method in &iface.methods {
        let signature = method_signature(ctx, method);
        let context = if method.has_context() {
            method.func.sig.params[0].name.origin.clone()
        } else {
            let context = ctx.importer.qualifier("", "context");
            format!("{context}Background()")
        };
        let fields: Vec<String> = method
            .params()
            .iter()
            .map(|p| format!("{}: {}", field(p), p.name.origin))
            .collect();
        let request = format!("{}{{{}}}", method.request_type(iface), fields.join(", "));
        let arena = ctx.arena;
        let err = method.error_result(arena).map(|r| r.name.origin.clone());
        let results = method.results(arena);

        w.block(
            &format!("func (c *{ty}) {}{signature}", method.func.name.origin),
            "}",
            |w| {
                let call = format!("c.{}({context}, {request})", endpoint_field(method));
                match &err {
                    Some(err) => {
                        w!(w, "resp, err := {call}");
                        w.block("if err != nil", "}", |w| {
                            w!(w, "{err} = err");
                            w!(w, "return");
                        });
                    }
                    None => w!(w, "resp, _ := {call}"),
                }
                if results.is_empty() {
                    w!(w, "_ = resp");
                } else {
                    w.block(
                        &format!("if response, ok := resp.({}); ok", method.response_type(iface)),
                        "}",
                        |w| {
                            for result in results {
                                w!(w, "{} = response.{}", result.name.origin, field(result));
                            }
                        },
                    );
                }
                if !method.func.sig.results.is_empty() {
                    w!(w, "return");
                }
            },
        );
        w.newline();
    }
}

fn write_rest_constructor(ctx: &mut GenContext<'_>, w: &mut CodeWriter, iface: &IfaceModel) {
    let kithttp = ctx.importer.qualifier("kithttp", KITHTTP_PKG);
    let url = ctx.importer.qualifier("", "net/url");
    let svc = iface_type(ctx, iface);
    let upper = &iface.named.name.upper;

    w!(w, "// NewClientREST{upper} returns a {upper} calling the REST service at tgt.");
    w.block(
        &format!("func NewClientREST{upper}(tgt string, opts ...{kithttp}ClientOption) ({svc}, error)"),
        "}",
        |w| {
            w!(w, "u, err := {url}Parse(tgt)");
            w.block("if err != nil", "}", |w| {
                w!(w, "return nil, err");
            });
            w!(w, "c := &{}{{}}", client_type(iface));
            for method in &iface.methods {
                let Some(route) = &method.route else { continue };
                let name = &method.func.name.upper;
                w.group(
                    &format!("c.{} = {kithttp}NewClient(", endpoint_field(method)),
                    ").Endpoint()",
                    |w| {
                        w!(w, "{},", quote(&route.method));
                        w!(w, "u,");
                        w!(w, "encode{upper}{name}Request,");
                        w!(w, "decode{upper}{name}Response,");
                        w!(w, "opts...,");
                    },
                );
            }
            w!(w, "return c, nil");
        },
    );
    w.newline();
}

fn write_rest_codec(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    model: &ServiceModel,
    iface: &IfaceModel,
    method: &MethodModel,
    route: &RestRoute,
) {
    let context = ctx.importer.qualifier("", "context");
    let http = ctx.importer.qualifier("", "net/http");
    let json = ctx.importer.qualifier("", "encoding/json");
    let upper = &iface.named.name.upper;
    let name = &method.func.name.upper;
    let uses_req = !route.path_vars.is_empty()
        || !route.query_vars.is_empty()
        || !route.header_vars.is_empty()
        || route.has_body();

    w.block(
        &format!(
            "func encode{upper}{name}Request(_ {context}Context, r *{http}Request, request interface{{}}) error"
        ),
        "}",
        |w| {
            if uses_req {
                w!(w, "req := request.({})", method.request_type(iface));
            }
            let mut path = route.plain_path();
            let mut parts = Vec::new();
            for binding in &route.path_vars {
                let placeholder = format!("{{{}}}", binding.key);
                if let Some((head, tail)) = path.split_once(&placeholder) {
                    parts.push(quote(head));
                    parts.push(format_value(ctx, binding, &format!("req.{}", field(&binding.param))));
                    path = tail.to_string();
                }
            }
            if !path.is_empty() {
                parts.push(quote(&path));
            }
            w!(w, "r.URL.Path += {}", parts.join(" + "));
            if !route.query_vars.is_empty() {
                w!(w, "q := r.URL.Query()");
                for binding in &route.query_vars {
                    let value = format_value(ctx, binding, &format!("req.{}", field(&binding.param)));
                    w!(w, "q.Set({}, {value})", quote(&binding.key));
                }
                w!(w, "r.URL.RawQuery = q.Encode()");
            }
            for binding in &route.header_vars {
                let value = format_value(ctx, binding, &format!("req.{}", field(&binding.param)));
                w!(w, "r.Header.Set({}, {value})", quote(&binding.key));
            }
            if route.has_body() {
                let bytes = ctx.importer.qualifier("", "bytes");
                let io = ctx.importer.qualifier("", "io");
                w!(w, "var buf {bytes}Buffer");
                w.block(&format!("if err := {json}NewEncoder(&buf).Encode(req); err != nil"), "}", |w| {
                    w!(w, "return err");
                });
                w!(w, "r.Header.Set(\"Content-Type\", \"application/json; charset=utf-8\")");
                w!(w, "r.Body = {io}NopCloser(&buf)");
            }
            w!(w, "return nil");
        },
    );
    w.newline();

    let decode = model.error_decode_name(iface, method);
    w.block(
        &format!(
            "func decode{upper}{name}Response(_ {context}Context, r *{http}Response) (interface{{}}, error)"
        ),
        "}",
        |w| {
            w.block("if r.StatusCode >= 400", "}", |w| {
                let errors = ctx.importer.qualifier("", "errors");
                w.block(&format!("if err := {decode}(r.StatusCode); err != nil"), "}", |w| {
                    w!(w, "return nil, err");
                });
                w!(w, "var body struct {{ Error string `json:\"error\"` }}");
                w!(w, "_ = {json}NewDecoder(r.Body).Decode(&body)");
                w!(w, "return nil, {errors}New(body.Error)");
            });
            w!(w, "var resp {}", method.response_type(iface));
            match &method.wrap_response {
                Some(wrap) => {
                    w!(w, "var envelope map[string]{json}RawMessage");
                    w.block(&format!("if err := {json}NewDecoder(r.Body).Decode(&envelope); err != nil"), "}", |w| {
                        w!(w, "return nil, err");
                    });
                    w.block(&format!("if err := {json}Unmarshal(envelope[{}], &resp); err != nil", quote(wrap)), "}", |w| {
                        w!(w, "return nil, err");
                    });
                }
                None => {
                    w.block(&format!("if err := {json}NewDecoder(r.Body).Decode(&resp); err != nil"), "}", |w| {
                        w!(w, "return nil, err");
                    });
                }
            }
            w!(w, "return resp, nil");
        },
    );
    w.newline();
}

fn write_jsonrpc_constructor(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    model: &ServiceModel,
    iface: &IfaceModel,
) {
    let jsonrpc = ctx.importer.qualifier("", JSONRPC_PKG);
    let url = ctx.importer.qualifier("", "net/url");
    let svc = iface_type(ctx, iface);
    let upper = &iface.named.name.upper;

    w!(w, "// NewClientJSONRPC{upper} returns a {upper} calling the JSON-RPC service at tgt.");
    w.block(
        &format!("func NewClientJSONRPC{upper}(tgt string, opts ...{jsonrpc}ClientOption) ({svc}, error)"),
        "}",
        |w| {
            w!(w, "u, err := {url}Parse(tgt)");
            w.block("if err != nil", "}", |w| {
                w!(w, "return nil, err");
            });
            w!(w, "u.Path += {}", quote(&model.jsonrpc_path));
            w!(w, "c := &{}{{}}", client_type(iface));
            for method in &iface.methods {
                let name = &method.func.name.upper;
                w.group(
                    &format!("c.{} = {jsonrpc}NewClient(", endpoint_field(method)),
                    ").Endpoint()",
                    |w| {
                        w!(w, "u,");
                        w!(w, "{},", quote(&method.rpc_name(iface)));
                        w.literal(&format!("append([]{jsonrpc}ClientOption"), "}, opts...)...,", |w| {
                            w!(w, "{jsonrpc}ClientRequestEncoder(encodeJSONRPCRequest),");
                            w!(w, "{jsonrpc}ClientResponseDecoder(decode{upper}{name}JSONRPCResponse),");
                        });
                    },
                );
            }
            w!(w, "return c, nil");
        },
    );
    w.newline();
}

fn write_jsonrpc_codec(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    model: &ServiceModel,
    iface: &IfaceModel,
    method: &MethodModel,
) {
    let context = ctx.importer.qualifier("", "context");
    let jsonrpc = ctx.importer.qualifier("", JSONRPC_PKG);
    let json = ctx.importer.qualifier("", "encoding/json");
    let decode = model.error_decode_name(iface, method);

    w.block(
        &format!(
            "func decode{}{}JSONRPCResponse(_ {context}Context, response {jsonrpc}Response) (interface{{}}, error)",
            iface.named.name.upper, method.func.name.upper
        ),
        "}",
        |w| {
            w.block("if response.Error != nil", "}", |w| {
                w.block(&format!("if err := {decode}(response.Error.Code); err != nil"), "}", |w| {
                    w!(w, "return nil, err");
                });
                w!(w, "return nil, *response.Error");
            });
            w!(w, "var resp {}", method.response_type(iface));
            w.block(&format!("if err := {json}Unmarshal(response.Result, &resp); err != nil"), "}", |w| {
                w!(w, "return nil, err");
            });
            w!(w, "return resp, nil");
        },
    );
    w.newline();
}

/// `func createErrorDecode(code int) error` mapping the JSON-RPC error code
/// (or HTTP status for REST) of each error the method may return to a
/// fresh value of that error.
fn write_error_decode(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    model: &ServiceModel,
    iface: &IfaceModel,
    method: &MethodModel,
) {
    let name = model.error_decode_name(iface, method);
    let mut cases = Vec::new();
    for err in &method.errors {
        let code = if model.jsonrpc { err.error_code } else { err.status_code };
        let Some(code) = code else { continue };
        if cases.iter().any(|(c, _)| *c == code) {
            continue;
        }
        let qualifier = ctx.importer.qualifier(&err.pkg_name, &err.pkg_path);
        let amp = if err.pointer { "&" } else { "" };
        cases.push((code, format!("{amp}{qualifier}{}{{}}", err.name)));
    }

    w.block(&format!("func {name}(code int) error"), "}", |w| {
        if !cases.is_empty() {
            w!(w, "switch code {{");
            for (code, value) in &cases {
                w!(w, "case {code}:");
                w.indent();
                w!(w, "return {value}");
                w.dedent();
            }
            w!(w, "}}");
        }
        w!(w, "return nil");
    });
    w.newline();
}
