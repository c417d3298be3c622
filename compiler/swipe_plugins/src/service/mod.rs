//! The `Service` plugin: go-kit transports for Go interfaces.
//!
//! ```go
//! service.Service(
//!     service.Interface((*Svc)(nil), "svc"),
//!     service.HTTPServer(),
//!     service.MethodDefaultOptions(service.Logging(true)),
//!     service.MethodOptions(Svc.GetUser,
//!         service.RESTMethod("GET"),
//!         service.RESTPath("/users/{id:[0-9]+}"),
//!     ),
//! )
//! ```
//!
//! Per-method options inherit every option they leave unset from
//! `MethodDefaultOptions`.

mod client;
mod endpoint;
mod js_client;
mod jsonrpc_doc;
mod middleware;
mod model;
mod openapi;
mod render;
mod server;

use std::path::PathBuf;

use serde::Deserialize;
use swipe_diagnostic::Diagnostic;
use swipe_gen::path_template::parse_path_template;
use swipe_gen::{
    decode_options, inherit, ConfigureContext, Generator, Inherit, MethodRef, Plugin, TypeRef,
};
use swipe_ir::{to_lower_camel, IrArena, OptionValue};

pub use model::{IfaceModel, MethodModel, OpenapiInfo, RestRoute, ServiceModel, VarBinding};

pub const ID: &str = "Service";

pub const STUB: &str = r#"type Option string

type MethodOption string

// Service generates transports for one or more interfaces.
// @swipe:"Service"
func Service(opts ...Option) Option {
	return "implementation not generated, run swipe"
}

// Interface adds an interface, e.g. Interface((*Svc)(nil), "svc").
// The namespace prefixes JSON-RPC method names.
// @type:"repeat"
func Interface(iface interface{}, ns string) Option {
	return "implementation not generated, run swipe"
}

// HTTPServer generates an HTTP handler.
func HTTPServer() Option {
	return "implementation not generated, run swipe"
}

// HTTPClient generates an HTTP client.
func HTTPClient() Option {
	return "implementation not generated, run swipe"
}

// JSONRPCEnable switches the transports from REST to JSON-RPC.
func JSONRPCEnable() Option {
	return "implementation not generated, run swipe"
}

// JSONRPCPath sets the JSON-RPC endpoint path. Default: /rpc.
func JSONRPCPath(path string) Option {
	return "implementation not generated, run swipe"
}

// JSONRPCDocEnable generates Markdown documentation of the JSON-RPC methods.
func JSONRPCDocEnable(output string) Option {
	return "implementation not generated, run swipe"
}

// JSClientEnable generates a JavaScript JSON-RPC client.
func JSClientEnable(output string) Option {
	return "implementation not generated, run swipe"
}

// OpenapiEnable generates an OpenAPI document.
func OpenapiEnable() Option {
	return "implementation not generated, run swipe"
}

// OpenapiOutput sets the directory of the OpenAPI document.
func OpenapiOutput(output string) Option {
	return "implementation not generated, run swipe"
}

// OpenapiInfo sets the info block of the OpenAPI document.
func OpenapiInfo(title, description, version string) Option {
	return "implementation not generated, run swipe"
}

// MethodOptions sets options of one method, e.g. MethodOptions(Svc.Create, ...).
// @type:"repeat"
func MethodOptions(signature interface{}, opts ...MethodOption) Option {
	return "implementation not generated, run swipe"
}

// MethodDefaultOptions sets options inherited by every method.
func MethodDefaultOptions(opts ...MethodOption) Option {
	return "implementation not generated, run swipe"
}

// Logging enables the logging middleware for a method. Default: true.
func Logging(enable bool) MethodOption {
	return "implementation not generated, run swipe"
}

// LoggingParams limits the logged parameters.
func LoggingParams(includes []string, excludes []string) MethodOption {
	return "implementation not generated, run swipe"
}

// Instrumenting enables the instrumenting middleware for a method.
func Instrumenting(enable bool) MethodOption {
	return "implementation not generated, run swipe"
}

// RESTMethod sets the HTTP method.
func RESTMethod(method string) MethodOption {
	return "implementation not generated, run swipe"
}

// RESTPath sets the path template, e.g. "/users/{id:[0-9]+}".
func RESTPath(path string) MethodOption {
	return "implementation not generated, run swipe"
}

// RESTHeaderVars binds parameters to headers: []string{"param", "X-Header"}.
func RESTHeaderVars(vars []string) MethodOption {
	return "implementation not generated, run swipe"
}

// RESTQueryVars binds parameters to query values: []string{"param", "key"}.
func RESTQueryVars(vars []string) MethodOption {
	return "implementation not generated, run swipe"
}

// RESTWrapResponse wraps the response body in an object under name.
func RESTWrapResponse(name string) MethodOption {
	return "implementation not generated, run swipe"
}
"#;

const DEFAULT_JSONRPC_PATH: &str = "/rpc";

#[derive(Debug, Deserialize)]
struct ServiceOptions {
    #[serde(rename = "Interface")]
    interfaces: Vec<InterfaceOption>,
    #[serde(rename = "HTTPServer", default)]
    http_server: bool,
    #[serde(rename = "HTTPClient", default)]
    http_client: bool,
    #[serde(rename = "JSONRPCEnable", default)]
    jsonrpc: bool,
    #[serde(rename = "JSONRPCPath")]
    jsonrpc_path: Option<String>,
    #[serde(rename = "JSONRPCDocEnable")]
    jsonrpc_doc: Option<String>,
    #[serde(rename = "JSClientEnable")]
    js_client: Option<String>,
    #[serde(rename = "OpenapiEnable", default)]
    openapi: bool,
    #[serde(rename = "OpenapiOutput")]
    openapi_output: Option<String>,
    #[serde(rename = "OpenapiInfo")]
    openapi_info: Option<OpenapiInfo>,
    #[serde(rename = "MethodOptions", default)]
    method_options: Vec<PerMethodOptions>,
    #[serde(rename = "MethodDefaultOptions", default)]
    defaults: MethodOptions,
}

#[derive(Debug, Deserialize)]
struct InterfaceOption {
    iface: TypeRef,
    #[serde(default)]
    ns: String,
}

#[derive(Debug, Deserialize)]
struct PerMethodOptions {
    signature: MethodRef,
    #[serde(flatten)]
    opts: MethodOptions,
}

/// Options settable per method and in the defaults block.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MethodOptions {
    #[serde(rename = "Logging")]
    pub logging: Option<bool>,
    #[serde(rename = "LoggingParams")]
    pub logging_params: Option<LoggingParams>,
    #[serde(rename = "Instrumenting")]
    pub instrumenting: Option<bool>,
    #[serde(rename = "RESTMethod")]
    pub rest_method: Option<String>,
    #[serde(rename = "RESTPath")]
    pub rest_path: Option<String>,
    #[serde(rename = "RESTHeaderVars")]
    pub header_vars: Option<Vec<String>>,
    #[serde(rename = "RESTQueryVars")]
    pub query_vars: Option<Vec<String>>,
    #[serde(rename = "RESTWrapResponse")]
    pub wrap_response: Option<String>,
}

inherit!(MethodOptions {
    logging,
    logging_params,
    instrumenting,
    rest_method,
    rest_path,
    header_vars,
    query_vars,
    wrap_response,
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingParams {
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
}

#[derive(Default)]
pub struct ServicePlugin {
    model: Option<ServiceModel>,
}

impl ServicePlugin {
    pub fn boxed() -> Box<dyn Plugin> {
        Box::new(ServicePlugin::default())
    }

    pub fn model(&self) -> Option<&ServiceModel> {
        self.model.as_ref()
    }
}

impl Plugin for ServicePlugin {
    fn id(&self) -> &'static str {
        ID
    }

    fn configure(
        &mut self,
        ctx: &ConfigureContext<'_>,
        options: &OptionValue,
    ) -> Result<(), Vec<Diagnostic>> {
        let opts: ServiceOptions = decode_options(options).map_err(|e| vec![e.into()])?;
        let arena = ctx.arena();
        let mut errors = Vec::new();

        let mut ifaces = Vec::with_capacity(opts.interfaces.len());
        for option in &opts.interfaces {
            match IfaceModel::new(arena, option.iface.0, &option.ns) {
                Some(iface) => ifaces.push(iface),
                None => errors.push(Diagnostic::config(format!(
                    "Interface: {} is not an interface",
                    type_label(arena, option.iface)
                ))),
            }
        }
        if ifaces.is_empty() && errors.is_empty() {
            errors.push(Diagnostic::config("Service: at least one Interface is required"));
        }

        for per_method in &opts.method_options {
            if let Err(err) = apply_method_options(arena, &mut ifaces, per_method) {
                errors.push(err);
            }
        }

        let found = ctx.analysis.find_errors();
        let ids: Vec<_> = ifaces.iter().map(|i| i.id).collect();
        let iface_errors = ctx.analysis.iface_errors(&ids, &found);

        for iface in &mut ifaces {
            for method in &mut iface.methods {
                method.options.inherit(&opts.defaults);
                if let Err(mut errs) = method.resolve(arena, opts.jsonrpc) {
                    errors.append(&mut errs);
                }
                let list = iface_errors
                    .get(&iface.named.obj_id)
                    .and_then(|methods| methods.get(&method.func.name.origin));
                if let Some(list) = list {
                    for err in list {
                        if !method.errors.iter().any(|e| e.code() == err.code()) {
                            method.errors.push(err.clone());
                        }
                    }
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let info = opts.openapi_info.unwrap_or_default();
        self.model = Some(ServiceModel {
            pkg: ctx.inject.pkg.clone(),
            ifaces,
            http_server: opts.http_server,
            http_client: opts.http_client,
            jsonrpc: opts.jsonrpc,
            jsonrpc_path: opts
                .jsonrpc_path
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_JSONRPC_PATH.to_string()),
            jsonrpc_doc: opts.jsonrpc_doc.map(PathBuf::from),
            js_client: opts.js_client.map(PathBuf::from),
            openapi: opts.openapi,
            openapi_output: opts.openapi_output.map(PathBuf::from),
            openapi_info: info,
        });
        Ok(())
    }

    fn generators(&self) -> Vec<Box<dyn Generator + '_>> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        let mut gens: Vec<Box<dyn Generator + '_>> =
            vec![Box::new(endpoint::EndpointGenerator::new(model))];
        if model.methods().any(|(_, m)| m.logging) {
            gens.push(Box::new(middleware::LoggingGenerator::new(model)));
        }
        if model.methods().any(|(_, m)| m.instrumenting) {
            gens.push(Box::new(middleware::InstrumentingGenerator::new(model)));
        }
        if model.http_server {
            gens.push(Box::new(server::ServerGenerator::new(model)));
        }
        if model.http_client {
            gens.push(Box::new(client::ClientGenerator::new(model)));
        }
        if model.openapi {
            gens.push(Box::new(openapi::OpenapiGenerator::new(model)));
        }
        if model.jsonrpc && model.jsonrpc_doc.is_some() {
            gens.push(Box::new(jsonrpc_doc::JsonRpcDocGenerator::new(model)));
        }
        if model.jsonrpc && model.js_client.is_some() {
            gens.push(Box::new(js_client::JsClientGenerator::new(model)));
        }
        gens
    }
}

fn type_label(arena: &IrArena, ty: TypeRef) -> String {
    arena
        .named(ty.0)
        .map_or_else(|| "argument".to_string(), |n| n.name.origin.clone())
}

/// Attach the options of one `MethodOptions` call to its method.
fn apply_method_options(
    arena: &IrArena,
    ifaces: &mut [IfaceModel],
    per_method: &PerMethodOptions,
) -> Result<(), Diagnostic> {
    let signature = &per_method.signature;
    let owner = arena.named(signature.owner.0).map(|n| n.obj_id.as_str());
    let iface = ifaces
        .iter_mut()
        .find(|i| i.id == signature.owner.0 || Some(i.named.obj_id.as_str()) == owner)
        .ok_or_else(|| {
            Diagnostic::config(format!(
                "MethodOptions: {}.{} does not belong to a service interface",
                type_label(arena, signature.owner),
                signature.name
            ))
        })?;
    let iface_name = iface.named.name.origin.clone();
    let method = iface
        .methods
        .iter_mut()
        .find(|m| m.func.name.origin == signature.name)
        .ok_or_else(|| {
            Diagnostic::config(format!(
                "MethodOptions: {iface_name} has no method {}",
                signature.name
            ))
        })?;
    method.options = per_method.opts.clone();
    Ok(())
}

/// JSON-RPC method name: `ns.lowerCamel` or `lowerCamel`.
pub fn rpc_method_name(ns: &str, method: &str) -> String {
    if ns.is_empty() {
        to_lower_camel(method)
    } else {
        format!("{ns}.{}", to_lower_camel(method))
    }
}

/// Path template of a method without an explicit `RESTPath`.
pub fn default_rest_path(method: &str) -> String {
    format!("/{}", to_lower_camel(method))
}

/// Checked in [`MethodModel::resolve`].
fn check_template(path: &str) -> Result<swipe_gen::PathTemplate, Diagnostic> {
    parse_path_template(path).map_err(Diagnostic::from)
}
