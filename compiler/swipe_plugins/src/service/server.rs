//! `http_server.go`: a REST (gorilla/mux) or JSON-RPC handler over the
//! endpoints.

use swipe_diagnostic::Diagnostic;
use swipe_gen::emit::{quote, CodeWriter};
use swipe_gen::{w, GenContext, Generator};
use swipe_ir::Package;

use super::model::{IfaceModel, MethodModel, RestRoute, ServiceModel};
use super::render::{field, iface_type, write_parse};

pub const KITHTTP_PKG: &str = "github.com/go-kit/kit/transport/http";
pub const JSONRPC_PKG: &str = "github.com/go-kit/kit/transport/http/jsonrpc";
pub const MUX_PKG: &str = "github.com/gorilla/mux";

pub struct ServerGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> ServerGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        ServerGenerator { model }
    }
}

impl Generator for ServerGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn filename(&self) -> &str {
        "http_server.go"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let mut w = CodeWriter::new();
        if self.model.jsonrpc {
            write_jsonrpc_handler(ctx, &mut w, self.model);
        } else {
            write_rest_handler(ctx, &mut w, self.model);
        }
        Ok(w.into_bytes())
    }
}

/// `svcSvc app.Svc, svcOther app.Other`
fn service_params(ctx: &mut GenContext<'_>, model: &ServiceModel) -> Vec<String> {
    model
        .ifaces
        .iter()
        .map(|iface| format!("{} {}", svc_var(iface), iface_type(ctx, iface)))
        .collect()
}

fn svc_var(iface: &IfaceModel) -> String {
    format!("svc{}", iface.named.name.upper)
}

fn write_rest_handler(ctx: &mut GenContext<'_>, w: &mut CodeWriter, model: &ServiceModel) {
    let http = ctx.importer.qualifier("", "net/http");
    let kithttp = ctx.importer.qualifier("kithttp", KITHTTP_PKG);
    let mux = ctx.importer.qualifier("", MUX_PKG);
    let mut params = service_params(ctx, model);
    params.push(format!("opts ...{kithttp}ServerOption"));

    w!(w, "// MakeHTTPHandler serves the service over REST.");
    w.block(
        &format!("func MakeHTTPHandler({}) {http}Handler", params.join(", ")),
        "}",
        |w| {
            w!(w, "r := {mux}NewRouter()");
            w!(w, "opts = append(opts, {kithttp}ServerErrorEncoder(encodeHTTPError))");
            for iface in &model.ifaces {
                let lower = &iface.named.name.lower;
                w!(w, "{lower}Endpoints := Make{}({})", iface.endpoints_type(), svc_var(iface));
                for method in &iface.methods {
                    let Some(route) = &method.route else { continue };
                    let encode = if method.wrap_response.is_some() {
                        format!("encode{}{}Response", iface.named.name.upper, method.func.name.upper)
                    } else {
                        "encodeHTTPResponse".to_string()
                    };
                    w.group(
                        &format!(
                            "r.Methods({}).Path({}).Handler({kithttp}NewServer(",
                            quote(&route.method),
                            quote(&route.path.template)
                        ),
                        "))",
                        |w| {
                            w!(w, "{lower}Endpoints.{}Endpoint,", method.func.name.upper);
                            w!(w, "decode{}{}Request,", iface.named.name.upper, method.func.name.upper);
                            w!(w, "{encode},");
                            w!(w, "opts...,");
                        },
                    );
                }
            }
            w!(w, "return r");
        },
    );
    w.newline();

    for iface in &model.ifaces {
        for method in &iface.methods {
            if let Some(route) = &method.route {
                write_rest_decode(ctx, w, iface, method, route);
                if let Some(wrap) = &method.wrap_response {
                    write_wrapped_encode(ctx, w, iface, method, wrap);
                }
            }
        }
    }
    write_rest_encoders(ctx, w);
}

fn write_rest_decode(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    iface: &IfaceModel,
    method: &MethodModel,
    route: &RestRoute,
) {
    let http = ctx.importer.qualifier("", "net/http");
    let context = ctx.importer.qualifier("", "context");
    let name = format!("decode{}{}Request", iface.named.name.upper, method.func.name.upper);
    let body = route.has_body() && !method.body_params().is_empty();

    w.block(
        &format!("func {name}(_ {context}Context, r *{http}Request) (interface{{}}, error)"),
        "}",
        |w| {
            w!(w, "var req {}", method.request_type(iface));
            if body {
                let json = ctx.importer.qualifier("", "encoding/json");
                w.block(
                    &format!("if err := {json}NewDecoder(r.Body).Decode(&req); err != nil"),
                    "}",
                    |w| {
                        w!(w, "return nil, err");
                    },
                );
            }
            if !route.path_vars.is_empty() {
                let mux = ctx.importer.qualifier("", MUX_PKG);
                w!(w, "vars := {mux}Vars(r)");
                for binding in &route.path_vars {
                    w.block(&format!("if s, ok := vars[{}]; ok", quote(&binding.key)), "}", |w| {
                        let target = format!("req.{}", field(&binding.param));
                        write_parse(ctx, w, binding, "s", &target, &format!("path variable {}", binding.key));
                    });
                }
            }
            if !route.query_vars.is_empty() {
                w!(w, "q := r.URL.Query()");
                for binding in &route.query_vars {
                    w.block(&format!("if s := q.Get({}); s != \"\"", quote(&binding.key)), "}", |w| {
                        let target = format!("req.{}", field(&binding.param));
                        write_parse(ctx, w, binding, "s", &target, &format!("query value {}", binding.key));
                    });
                }
            }
            for binding in &route.header_vars {
                w.block(
                    &format!("if s := r.Header.Get({}); s != \"\"", quote(&binding.key)),
                    "}",
                    |w| {
                        let target = format!("req.{}", field(&binding.param));
                        write_parse(ctx, w, binding, "s", &target, &format!("header {}", binding.key));
                    },
                );
            }
            w!(w, "return req, nil");
        },
    );
    w.newline();
}

fn write_wrapped_encode(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    iface: &IfaceModel,
    method: &MethodModel,
    wrap: &str,
) {
    let http = ctx.importer.qualifier("", "net/http");
    let context = ctx.importer.qualifier("", "context");
    w.block(
        &format!(
            "func encode{}{}Response(ctx {context}Context, w {http}ResponseWriter, response interface{{}}) error",
            iface.named.name.upper, method.func.name.upper
        ),
        "}",
        |w| {
            w!(w, "return encodeHTTPResponse(ctx, w, map[string]interface{{}}{{{}: response}})", quote(wrap));
        },
    );
    w.newline();
}

fn write_rest_encoders(ctx: &mut GenContext<'_>, w: &mut CodeWriter) {
    let http = ctx.importer.qualifier("", "net/http");
    let context = ctx.importer.qualifier("", "context");
    let json = ctx.importer.qualifier("", "encoding/json");

    w.block(
        &format!(
            "func encodeHTTPResponse(_ {context}Context, w {http}ResponseWriter, response interface{{}}) error"
        ),
        "}",
        |w| {
            w!(w, "w.Header().Set(\"Content-Type\", \"application/json; charset=utf-8\")");
            w!(w, "return {json}NewEncoder(w).Encode(response)");
        },
    );
    w.newline();
    w!(w, "// encodeHTTPError writes the error as JSON with the status code the");
    w!(w, "// error reports, or 500.");
    w.block(
        &format!("func encodeHTTPError(_ {context}Context, err error, w {http}ResponseWriter)"),
        "}",
        |w| {
            w!(w, "code := {http}StatusInternalServerError");
            w.block("if sc, ok := err.(interface{ StatusCode() int }); ok", "}", |w| {
                w!(w, "code = sc.StatusCode()");
            });
            w!(w, "w.Header().Set(\"Content-Type\", \"application/json; charset=utf-8\")");
            w!(w, "w.WriteHeader(code)");
            w!(w, "_ = {json}NewEncoder(w).Encode(map[string]interface{{}}{{\"error\": err.Error()}})");
        },
    );
}

fn write_jsonrpc_handler(ctx: &mut GenContext<'_>, w: &mut CodeWriter, model: &ServiceModel) {
    let http = ctx.importer.qualifier("", "net/http");
    let jsonrpc = ctx.importer.qualifier("", JSONRPC_PKG);
    let mux = ctx.importer.qualifier("", MUX_PKG);
    let json = ctx.importer.qualifier("", "encoding/json");
    let context = ctx.importer.qualifier("", "context");
    let mut params = service_params(ctx, model);
    params.push(format!("opts ...{jsonrpc}ServerOption"));

    w!(w, "// MakeHTTPHandler serves the service as JSON-RPC 2.0 on {}.", model.jsonrpc_path);
    w.block(
        &format!("func MakeHTTPHandler({}) {http}Handler", params.join(", ")),
        "}",
        |w| {
            w!(w, "r := {mux}NewRouter()");
            for iface in &model.ifaces {
                w!(
                    w,
                    "{}Endpoints := Make{}({})",
                    iface.named.name.lower,
                    iface.endpoints_type(),
                    svc_var(iface)
                );
            }
            w.literal(&format!("codecs := {jsonrpc}EndpointCodecMap"), "}", |w| {
                for iface in &model.ifaces {
                    let upper = &iface.named.name.upper;
                    for method in &iface.methods {
                        let method_name = &method.func.name.upper;
                        w.literal(
                            &format!("{}: {jsonrpc}EndpointCodec", quote(&method.rpc_name(iface))),
                            "},",
                            |w| {
                                w!(w, "Endpoint: {}Endpoints.{method_name}Endpoint,", iface.named.name.lower);
                                w!(w, "Decode: decode{upper}{method_name}JSONRPCRequest,");
                                w!(w, "Encode: encodeJSONRPCResponse,");
                            },
                        );
                    }
                }
            });
            w!(
                w,
                "r.Methods(\"POST\").Path({}).Handler({jsonrpc}NewServer(codecs, opts...))",
                quote(&model.jsonrpc_path)
            );
            w!(w, "return r");
        },
    );
    w.newline();

    for iface in &model.ifaces {
        for method in &iface.methods {
            w.block(
                &format!(
                    "func decode{}{}JSONRPCRequest(_ {context}Context, msg {json}RawMessage) (interface{{}}, error)",
                    iface.named.name.upper, method.func.name.upper
                ),
                "}",
                |w| {
                    w!(w, "var req {}", method.request_type(iface));
                    w.block("if len(msg) > 0", "}", |w| {
                        w.block(&format!("if err := {json}Unmarshal(msg, &req); err != nil"), "}", |w| {
                            w!(w, "return nil, {jsonrpc}Error{{Code: -32602, Message: err.Error()}}");
                        });
                    });
                    w!(w, "return req, nil");
                },
            );
            w.newline();
        }
    }

    w.block(
        &format!(
            "func encodeJSONRPCResponse(_ {context}Context, response interface{{}}) ({json}RawMessage, error)"
        ),
        "}",
        |w| {
            w!(w, "return {json}Marshal(response)");
        },
    );
}
