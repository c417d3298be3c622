//! `jsonrpc_client.js`: a fetch-based JSON-RPC client with one class per
//! interface and one error class per known error code.

use std::collections::BTreeMap;
use std::path::Path;

use swipe_diagnostic::Diagnostic;
use swipe_gen::emit::CodeWriter;
use swipe_gen::{w, GenContext, Generator};
use swipe_ir::Package;

use super::jsonrpc_doc::js_type;
use super::model::ServiceModel;

pub struct JsClientGenerator<'m> {
    model: &'m ServiceModel,
}

impl<'m> JsClientGenerator<'m> {
    pub fn new(model: &'m ServiceModel) -> Self {
        JsClientGenerator { model }
    }
}

const TRANSPORT: &str = r"export class JSONRPCError extends Error {
	constructor(message, code, data) {
		super(message);
		this.name = 'JSONRPCError';
		this.code = code;
		this.data = data;
	}
}

class JSONRPCClient {
	constructor(url, headers = {}) {
		this.url = url;
		this.headers = headers;
		this.id = 0;
	}

	async call(method, params) {
		const response = await fetch(this.url, {
			method: 'POST',
			headers: { 'Content-Type': 'application/json', ...this.headers },
			body: JSON.stringify({ jsonrpc: '2.0', id: ++this.id, method, params }),
		});
		const body = await response.json();
		if (body.error) {
			throw decodeError(body.error);
		}
		return body.result;
	}
}
";

impl Generator for JsClientGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn output_path(&self) -> Option<&Path> {
        self.model.js_client.as_deref()
    }

    fn filename(&self) -> &str {
        "jsonrpc_client.js"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let model = self.model;
        let arena = ctx.arena;
        let mut w = CodeWriter::new();
        w.emit(TRANSPORT);
        w.newline();

        let mut errors = BTreeMap::new();
        for (_, method) in model.methods() {
            for err in &method.errors {
                if let Some(code) = err.error_code {
                    errors.entry(code).or_insert_with(|| err.name.clone());
                }
            }
        }
        for name in errors.values() {
            w.block(&format!("export class {name}Error extends JSONRPCError"), "}", |w| {
                w.block("constructor(message, code, data)", "}", |w| {
                    w!(w, "super(message, code, data);");
                    w!(w, "this.name = '{name}';");
                });
            });
            w.newline();
        }
        w.block("function decodeError(error)", "}", |w| {
            if !errors.is_empty() {
                w.block("switch (error.code)", "}", |w| {
                    for (code, name) in &errors {
                        w!(w, "case {code}:");
                        w.indent();
                        w!(w, "return new {name}Error(error.message, error.code, error.data);");
                        w.dedent();
                    }
                });
            }
            w!(w, "return new JSONRPCError(error.message, error.code, error.data);");
        });
        w.newline();

        for iface in &model.ifaces {
            let class = format!("JSONRPCClient{}", iface.named.name.upper);
            w.block(&format!("export class {class}"), "}", |w| {
                w.block("constructor(client)", "}", |w| {
                    w!(w, "this.client = client;");
                });
                for method in &iface.methods {
                    w.newline();
                    let params = method.params();
                    w!(w, "/**");
                    for line in &method.func.comment {
                        w!(w, " * {line}");
                    }
                    for param in params {
                        w!(w, " * @param {{{}}} {}", js_type(arena, param.ty), param.name.lower);
                    }
                    let results = method.results(arena);
                    let ret = match results {
                        [] => "void".to_string(),
                        _ => format!(
                            "{{{}}}",
                            results
                                .iter()
                                .map(|r| format!("{}: {}", r.name.lower, js_type(arena, r.ty)))
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    };
                    w!(w, " * @return {{Promise<{ret}>}}");
                    w!(w, " */");
                    let names: Vec<_> = params.iter().map(|p| p.name.lower.as_str()).collect();
                    w.block(&format!("{}({})", method.func.name.lower, names.join(", ")), "}", |w| {
                        w!(
                            w,
                            "return this.client.call('{}', {{ {} }});",
                            method.rpc_name(iface),
                            names.join(", ")
                        );
                    });
                }
            });
            w.newline();
        }

        w.block("export default function makeClient(url, headers = {})", "}", |w| {
            w!(w, "const client = new JSONRPCClient(url, headers);");
            w.block("return", "};", |w| {
                for iface in &model.ifaces {
                    w!(
                        w,
                        "{}: new JSONRPCClient{}(client),",
                        iface.named.name.lower,
                        iface.named.name.upper
                    );
                }
            });
        });
        Ok(w.into_bytes())
    }
}
