//! `endpoint.go`: request/response types and go-kit endpoints.

use swipe_diagnostic::Diagnostic;
use swipe_gen::emit::CodeWriter;
use swipe_gen::{w, GenContext, Generator};
use swipe_ir::Package;

use super::model::{IfaceModel, MethodModel, ServiceModel};
use super::render::{field, iface_type, write_struct};

pub const ENDPOINT_PKG: &str = "github.com/go-kit/kit/endpoint";

pub struct EndpointGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> EndpointGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        EndpointGenerator { model }
    }
}

impl Generator for EndpointGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn filename(&self) -> &str {
        "endpoint.go"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let mut w = CodeWriter::new();
        for iface in &self.model.ifaces {
            for method in &iface.methods {
                write_types(ctx, &mut w, iface, method);
                write_make_endpoint(ctx, &mut w, iface, method);
            }
            write_endpoints(ctx, &mut w, iface);
        }
        Ok(w.into_bytes())
    }
}

fn write_types(ctx: &mut GenContext<'_>, w: &mut CodeWriter, iface: &IfaceModel, method: &MethodModel) {
    let params: Vec<_> = method.params().iter().collect();
    write_struct(ctx, w, &method.request_type(iface), &params);
    w.newline();
    let results: Vec<_> = method.results(ctx.arena).iter().collect();
    write_struct(ctx, w, &method.response_type(iface), &results);
    w.newline();
}

fn write_make_endpoint(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    iface: &IfaceModel,
    method: &MethodModel,
) {
    let endpoint = ctx.importer.qualifier("", ENDPOINT_PKG);
    let context = ctx.importer.qualifier("", "context");
    let svc = iface_type(ctx, iface);
    let arena = ctx.arena;

    let mut args = Vec::new();
    if method.has_context() {
        args.push("ctx".to_string());
    }
    for param in method.params() {
        args.push(format!("req.{}", field(param)));
    }
    if method.func.sig.is_variadic {
        if let Some(last) = args.last_mut() {
            last.push_str("...");
        }
    }
    let results = method.results(arena);
    let has_error = method.error_result(arena).is_some();
    let mut lhs: Vec<String> = results.iter().map(|r| r.name.origin.clone()).collect();
    if has_error {
        lhs.push("err".into());
    }
    let call = format!("s.{}({})", method.func.name.origin, args.join(", "));

    w.block(
        &format!(
            "func make{}{}Endpoint(s {svc}) {endpoint}Endpoint",
            iface.named.name.upper, method.func.name.upper
        ),
        "}",
        |w| {
            w.block(
                &format!(
                    "return func(ctx {context}Context, request interface{{}}) (interface{{}}, error)"
                ),
                "}",
                |w| {
                    if !method.params().is_empty() {
                        w!(w, "req := request.({})", method.request_type(iface));
                    }
                    if lhs.is_empty() {
                        w!(w, "{call}");
                    } else {
                        w!(w, "{} := {call}", lhs.join(", "));
                    }
                    if has_error {
                        w.block("if err != nil", "}", |w| {
                            w!(w, "return nil, err");
                        });
                    }
                    let fields: Vec<String> = results
                        .iter()
                        .map(|r| format!("{}: {}", field(r), r.name.origin))
                        .collect();
                    w!(w, "return {}{{{}}}, nil", method.response_type(iface), fields.join(", "));
                },
            );
        },
    );
    w.newline();
}

fn write_endpoints(ctx: &mut GenContext<'_>, w: &mut CodeWriter, iface: &IfaceModel) {
    let endpoint = ctx.importer.qualifier("", ENDPOINT_PKG);
    let svc = iface_type(ctx, iface);
    let ty = iface.endpoints_type();

    w!(w, "// {ty} holds one endpoint per method of {}.", iface.named.name.origin);
    w.block(&format!("type {ty} struct"), "}", |w| {
        for method in &iface.methods {
            w!(w, "{}Endpoint {endpoint}Endpoint", method.func.name.upper);
        }
    });
    w.newline();
    w.block(
        &format!(
            "func Make{ty}(s {svc}, middleware ...{endpoint}Middleware) {ty}"
        ),
        "}",
        |w| {
            w.literal(&format!("ep := {ty}"), "}", |w| {
                for method in &iface.methods {
                    w!(
                        w,
                        "{}Endpoint: make{}{}Endpoint(s),",
                        method.func.name.upper,
                        iface.named.name.upper,
                        method.func.name.upper
                    );
                }
            });
            w.block("for _, mw := range middleware", "}", |w| {
                for method in &iface.methods {
                    let name = &method.func.name.upper;
                    w!(w, "ep.{name}Endpoint = mw(ep.{name}Endpoint)");
                }
            });
            w!(w, "return ep");
        },
    );
    w.newline();
}
