use std::path::PathBuf;

use serde::Deserialize;
use swipe_analysis::ErrorType;
use swipe_diagnostic::Diagnostic;
use swipe_gen::PathTemplate;
use swipe_ir::{Func, IrArena, IrId, Named, Package, Var};

use super::{check_template, default_rest_path, rpc_method_name, MethodOptions};
use crate::config::{field_kind, FieldKind};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OpenapiInfo {
    pub title: String,
    pub description: String,
    pub version: String,
}

/// Everything the generators of one `Service` call need.
#[derive(Debug)]
pub struct ServiceModel {
    pub pkg: Package,
    pub ifaces: Vec<IfaceModel>,
    pub http_server: bool,
    pub http_client: bool,
    pub jsonrpc: bool,
    pub jsonrpc_path: String,
    pub jsonrpc_doc: Option<PathBuf>,
    pub js_client: Option<PathBuf>,
    pub openapi: bool,
    pub openapi_output: Option<PathBuf>,
    pub openapi_info: OpenapiInfo,
}

impl ServiceModel {
    pub fn methods(&self) -> impl Iterator<Item = (&IfaceModel, &MethodModel)> {
        self.ifaces
            .iter()
            .flat_map(|iface| iface.methods.iter().map(move |m| (iface, m)))
    }

    /// Name of the function mapping an error code of `method` back to an
    /// error value. Unprefixed when the service has a single interface.
    pub fn error_decode_name(&self, iface: &IfaceModel, method: &MethodModel) -> String {
        if self.ifaces.len() == 1 {
            format!("{}ErrorDecode", method.func.name.lower)
        } else {
            format!("{}{}ErrorDecode", iface.named.name.lower, method.func.name.upper)
        }
    }
}

#[derive(Debug)]
pub struct IfaceModel {
    pub id: IrId,
    pub named: Named,
    /// JSON-RPC namespace.
    pub ns: String,
    pub methods: Vec<MethodModel>,
}

impl IfaceModel {
    /// `None` unless `id` is a named interface.
    pub fn new(arena: &IrArena, id: IrId, ns: &str) -> Option<Self> {
        let named = arena.named(id)?;
        let iface = arena.iface(id)?;
        Some(IfaceModel {
            id,
            named: named.clone(),
            ns: ns.to_string(),
            methods: iface.methods.iter().cloned().map(MethodModel::new).collect(),
        })
    }

    pub fn endpoints_type(&self) -> String {
        format!("{}Endpoints", self.named.name.upper)
    }
}

/// A parameter bound to a path variable, query value or header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarBinding {
    pub param: Var,
    /// Variable, query key or header name.
    pub key: String,
    pub kind: FieldKind,
}

#[derive(Clone, Debug)]
pub struct RestRoute {
    pub method: String,
    pub path: PathTemplate,
    pub path_vars: Vec<VarBinding>,
    pub query_vars: Vec<VarBinding>,
    pub header_vars: Vec<VarBinding>,
}

impl RestRoute {
    fn is_bound(&self, param: &Var) -> bool {
        self.path_vars
            .iter()
            .chain(&self.query_vars)
            .chain(&self.header_vars)
            .any(|b| b.param.name == param.name)
    }

    /// Path with every variable pattern removed: `/users/{id}`.
    pub fn plain_path(&self) -> String {
        let mut out = self.path.template.clone();
        for var in &self.path.vars {
            let with_pattern = format!("{{{}:{}}}", var.name, var.pattern);
            out = out.replace(&with_pattern, &format!("{{{}}}", var.name));
        }
        out
    }

    pub fn has_body(&self) -> bool {
        !matches!(self.method.as_str(), "GET" | "DELETE" | "HEAD")
    }
}

#[derive(Debug)]
pub struct MethodModel {
    pub func: Func,
    /// Options after inheriting the defaults.
    pub options: MethodOptions,
    pub logging: bool,
    pub instrumenting: bool,
    /// Parameters the logging middleware writes.
    pub logged: Vec<String>,
    pub route: Option<RestRoute>,
    pub wrap_response: Option<String>,
    pub errors: Vec<ErrorType>,
}

impl MethodModel {
    fn new(func: Func) -> Self {
        MethodModel {
            func,
            options: MethodOptions::default(),
            logging: true,
            instrumenting: false,
            logged: Vec::new(),
            route: None,
            wrap_response: None,
            errors: Vec::new(),
        }
    }

    pub fn params(&self) -> &[Var] {
        self.func.sig.params_without_context()
    }

    pub fn has_context(&self) -> bool {
        self.func.sig.has_context()
    }

    /// The trailing `error` result, if any.
    pub fn error_result(&self, arena: &IrArena) -> Option<&Var> {
        self.func.sig.results.last().filter(|r| arena.is_error(r.ty))
    }

    /// Results other than the trailing error.
    pub fn results(&self, arena: &IrArena) -> &[Var] {
        let results = &self.func.sig.results;
        if self.error_result(arena).is_some() {
            &results[..results.len() - 1]
        } else {
            results
        }
    }

    pub fn request_type(&self, iface: &IfaceModel) -> String {
        format!("{}{}Request", iface.named.name.lower, self.func.name.upper)
    }

    pub fn response_type(&self, iface: &IfaceModel) -> String {
        format!("{}{}Response", iface.named.name.lower, self.func.name.upper)
    }

    pub fn rpc_name(&self, iface: &IfaceModel) -> String {
        rpc_method_name(&iface.ns, &self.func.name.origin)
    }

    /// Parameters carried in the request body.
    pub fn body_params(&self) -> Vec<&Var> {
        self.params()
            .iter()
            .filter(|p| self.route.as_ref().map_or(true, |r| !r.is_bound(p)))
            .collect()
    }

    /// Turn the inherited options into the flags and route the generators
    /// read.
    pub(super) fn resolve(&mut self, arena: &IrArena, jsonrpc: bool) -> Result<(), Vec<Diagnostic>> {
        let mut errors = Vec::new();
        self.logging = self.options.logging.unwrap_or(true);
        self.instrumenting = self.options.instrumenting.unwrap_or(false);
        self.wrap_response = self.options.wrap_response.clone().filter(|s| !s.is_empty());

        let params: Vec<String> = self.params().iter().map(|p| p.name.origin.clone()).collect();
        let (includes, excludes) = match &self.options.logging_params {
            Some(lp) => (
                lp.includes.clone().unwrap_or_default(),
                lp.excludes.clone().unwrap_or_default(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        for name in includes.iter().chain(&excludes) {
            if !params.contains(name) {
                errors.push(Diagnostic::config(format!(
                    "LoggingParams: {} has no parameter {name}",
                    self.func.name.origin
                )));
            }
        }
        self.logged = params
            .into_iter()
            .filter(|p| includes.is_empty() || includes.contains(p))
            .filter(|p| !excludes.contains(p))
            .collect();

        if !jsonrpc {
            match self.resolve_route(arena) {
                Ok(route) => self.route = Some(route),
                Err(mut errs) => errors.append(&mut errs),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn resolve_route(&self, arena: &IrArena) -> Result<RestRoute, Vec<Diagnostic>> {
        let method_name = &self.func.name.origin;
        let http_method = match &self.options.rest_method {
            Some(m) if !m.is_empty() => m.to_ascii_uppercase(),
            _ if self.params().is_empty() => "GET".to_string(),
            _ => "POST".to_string(),
        };
        let template = self
            .options
            .rest_path
            .clone()
            .unwrap_or_else(|| default_rest_path(method_name));
        let path = check_template(&template).map_err(|e| vec![e])?;

        let mut errors = Vec::new();
        let mut bind = |option: &str, name: &str, key: &str| -> Option<VarBinding> {
            let Some(param) = self.params().iter().find(|p| p.name.origin == name) else {
                errors.push(Diagnostic::config(format!(
                    "{option}: {name} is not a parameter of {method_name}"
                )));
                return None;
            };
            match field_kind(arena, param.ty) {
                Some(kind) if !matches!(kind, FieldKind::Slice(_)) => Some(VarBinding {
                    param: param.clone(),
                    key: key.to_string(),
                    kind,
                }),
                _ => {
                    errors.push(Diagnostic::config(format!(
                        "{option}: parameter {name} of {method_name} cannot be parsed from a string"
                    )));
                    None
                }
            }
        };

        let path_vars: Vec<_> = path
            .vars
            .iter()
            .filter_map(|v| bind("RESTPath", &v.name, &v.name))
            .collect();
        let mut pairs = |option: &str, vars: &Option<Vec<String>>| -> Vec<VarBinding> {
            let vars = vars.as_deref().unwrap_or_default();
            if vars.len() % 2 != 0 {
                return vec![];
            }
            vars.chunks(2)
                .filter_map(|pair| bind(option, &pair[0], &pair[1]))
                .collect()
        };
        let query_vars = pairs("RESTQueryVars", &self.options.query_vars);
        let header_vars = pairs("RESTHeaderVars", &self.options.header_vars);
        for (option, vars) in [
            ("RESTQueryVars", &self.options.query_vars),
            ("RESTHeaderVars", &self.options.header_vars),
        ] {
            if vars.as_ref().is_some_and(|v| v.len() % 2 != 0) {
                errors.push(Diagnostic::config(format!(
                    "{option}: {method_name} expects parameter/name pairs"
                )));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RestRoute {
            method: http_method,
            path,
            path_vars,
            query_vars,
            header_vars,
        })
    }
}
