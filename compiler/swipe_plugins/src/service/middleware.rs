//! `logging.go` and `instrumenting.go`: service middleware built on go-kit
//! `log` and `metrics`.

use swipe_diagnostic::Diagnostic;
use swipe_gen::emit::{quote, CodeWriter};
use swipe_gen::{w, GenContext, Generator};
use swipe_ir::Package;

use super::model::{IfaceModel, MethodModel, ServiceModel};
use super::render::{call_args, iface_type, method_signature};

const LOG_PKG: &str = "github.com/go-kit/kit/log";
const METRICS_PKG: &str = "github.com/go-kit/kit/metrics";

pub struct LoggingGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> LoggingGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        LoggingGenerator { model }
    }
}

impl Generator for LoggingGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn filename(&self) -> &str {
        "logging.go"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let mut w = CodeWriter::new();
        for iface in &self.model.ifaces {
            let log = ctx.importer.qualifier("", LOG_PKG);
            let svc = iface_type(ctx, iface);
            let ty = format!("loggingMiddleware{}", iface.named.name.upper);

            w.block(&format!("type {ty} struct"), "}", |w| {
                w!(w, "next {svc}");
                w!(w, "logger {log}Logger");
            });
            w.newline();
            w!(w, "// LoggingMiddleware{} logs every call with its duration.", iface.named.name.upper);
            w.block(
                &format!(
                    "func LoggingMiddleware{}(logger {log}Logger) func({svc}) {svc}",
                    iface.named.name.upper
                ),
                "}",
                |w| {
                    w.block(&format!("return func(next {svc}) {svc}"), "}", |w| {
                        w!(w, "return &{ty}{{next: next, logger: logger}}");
                    });
                },
            );
            w.newline();
            for method in &iface.methods {
                write_logged_method(ctx, &mut w, &ty, method);
            }
        }
        Ok(w.into_bytes())
    }
}

fn write_logged_method(ctx: &mut GenContext<'_>, w: &mut CodeWriter, ty: &str, method: &MethodModel) {
    let signature = method_signature(ctx, method);
    let name = &method.func.name.origin;
    let arena = ctx.arena;
    let forward = forward(method);
    let time = if method.logging {
        ctx.importer.qualifier("", "time")
    } else {
        String::new()
    };
    let err = method.error_result(arena).map(|r| r.name.origin.clone());

    w.block(&format!("func (mw *{ty}) {name}{signature}"), "}", |w| {
        if method.logging {
            w.block(&format!("defer func(begin {time}Time)"), &format!("}}({time}Now())"), |w| {
                let mut kv = vec![quote("method"), quote(name)];
                for param in &method.logged {
                    kv.push(quote(param));
                    kv.push(param.clone());
                }
                if let Some(err) = &err {
                    kv.push(quote("err"));
                    kv.push(err.clone());
                }
                kv.push(quote("took"));
                kv.push(format!("{time}Since(begin)"));
                w!(w, "_ = mw.logger.Log({})", kv.join(", "));
            });
        }
        w!(w, "{forward}");
    });
    w.newline();
}

/// `return mw.next.M(args)` or a bare call for methods without results.
fn forward(method: &MethodModel) -> String {
    let call = format!("mw.next.{}({})", method.func.name.origin, call_args(method));
    if method.func.sig.results.is_empty() {
        call
    } else {
        format!("return {call}")
    }
}

pub struct InstrumentingGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> InstrumentingGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        InstrumentingGenerator { model }
    }
}

impl Generator for InstrumentingGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn filename(&self) -> &str {
        "instrumenting.go"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let mut w = CodeWriter::new();
        for iface in &self.model.ifaces {
            write_instrumenting(ctx, &mut w, iface);
        }
        Ok(w.into_bytes())
    }
}

fn write_instrumenting(ctx: &mut GenContext<'_>, w: &mut CodeWriter, iface: &IfaceModel) {
    let metrics = ctx.importer.qualifier("", METRICS_PKG);
    let svc = iface_type(ctx, iface);
    let upper = &iface.named.name.upper;
    let ty = format!("instrumentingMiddleware{upper}");

    w.block(&format!("type {ty} struct"), "}", |w| {
        w!(w, "next {svc}");
        w!(w, "requestCount {metrics}Counter");
        w!(w, "requestLatency {metrics}Histogram");
    });
    w.newline();
    w!(w, "// InstrumentingMiddleware{upper} counts calls and observes their latency.");
    w.block(
        &format!(
            "func InstrumentingMiddleware{upper}(requestCount {metrics}Counter, requestLatency {metrics}Histogram) func({svc}) {svc}"
        ),
        "}",
        |w| {
            w.block(&format!("return func(next {svc}) {svc}"), "}", |w| {
                w!(
                    w,
                    "return &{ty}{{next: next, requestCount: requestCount, requestLatency: requestLatency}}"
                );
            });
        },
    );
    w.newline();

    for method in &iface.methods {
        let signature = method_signature(ctx, method);
        let name = &method.func.name.origin;
        let failed = match method.error_result(ctx.arena) {
            Some(err) => {
                let fmt = ctx.importer.qualifier("", "fmt");
                format!("{fmt}Sprint({} != nil)", err.name.origin)
            }
            None => quote("false"),
        };
        let time = if method.instrumenting {
            ctx.importer.qualifier("", "time")
        } else {
            String::new()
        };
        w.block(&format!("func (mw *{ty}) {name}{signature}"), "}", |w| {
            if method.instrumenting {
                w.block(&format!("defer func(begin {time}Time)"), &format!("}}({time}Now())"), |w| {
                    let labels = format!("{}, {}, {}, {failed}", quote("method"), quote(name), quote("error"));
                    w!(w, "mw.requestCount.With({labels}).Add(1)");
                    w!(w, "mw.requestLatency.With({labels}).Observe({time}Since(begin).Seconds())");
                });
            }
            w!(w, "{}", forward(method));
        });
        w.newline();
    }
}
