use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde::Deserialize;
use swipe_ir::{FuncRef, IrId, OptionMap, OptionValue};

use super::{decode_options, Inherit, MethodRef, TypeRef};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
struct MethodDefaults {
    #[serde(rename = "Logging")]
    logging: Option<bool>,
    #[serde(rename = "RESTPath")]
    rest_path: Option<String>,
    #[serde(rename = "RESTQueryVars")]
    query_vars: Option<Vec<String>>,
}

crate::inherit!(MethodDefaults {
    logging,
    rest_path,
    query_vars,
});

#[derive(Debug, Deserialize)]
struct PerMethod {
    signature: MethodRef,
    #[serde(flatten)]
    opts: MethodDefaults,
}

#[derive(Debug, Deserialize)]
struct ServiceOptions {
    #[serde(rename = "Interface")]
    interfaces: Vec<IfaceOption>,
    #[serde(rename = "HTTPServer", default)]
    http_server: bool,
    #[serde(rename = "Timeout")]
    timeout: Option<f64>,
    #[serde(rename = "MethodOptions", default)]
    method_options: Vec<PerMethod>,
    #[serde(rename = "MethodDefaultOptions", default)]
    defaults: MethodDefaults,
}

#[derive(Debug, Deserialize)]
struct IfaceOption {
    iface: TypeRef,
    ns: String,
}

fn nested(entries: Vec<(&str, OptionValue)>) -> OptionValue {
    OptionValue::Nested(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<OptionMap>(),
    )
}

fn string(s: &str) -> OptionValue {
    OptionValue::String(s.to_string())
}

fn fixture() -> OptionValue {
    nested(vec![
        (
            "Interface",
            OptionValue::Slice(vec![nested(vec![
                ("iface", OptionValue::Named(IrId::from_raw(7))),
                ("ns", string("users")),
            ])]),
        ),
        ("HTTPServer", OptionValue::Bool(true)),
        ("Timeout", OptionValue::Float(1.5)),
        (
            "MethodOptions",
            OptionValue::Slice(vec![nested(vec![
                (
                    "signature",
                    OptionValue::Func(FuncRef {
                        owner: IrId::from_raw(7),
                        name: "Create".into(),
                    }),
                ),
                ("RESTPath", string("")),
                ("Logging", OptionValue::Bool(false)),
            ])]),
        ),
        (
            "MethodDefaultOptions",
            nested(vec![
                ("Logging", OptionValue::Bool(true)),
                ("RESTPath", string("/default")),
                (
                    "RESTQueryVars",
                    OptionValue::Slice(vec![string("q"), string("page")]),
                ),
            ]),
        ),
    ])
}

#[test]
fn decodes_typed_configuration() {
    let opts: ServiceOptions =
        decode_options(&fixture()).unwrap_or_else(|e| panic!("decode failed: {e}"));
    assert_eq!(opts.interfaces.len(), 1);
    assert_eq!(opts.interfaces[0].iface, TypeRef(IrId::from_raw(7)));
    assert_eq!(opts.interfaces[0].ns, "users");
    assert!(opts.http_server);
    assert_eq!(opts.timeout, Some(1.5));
    assert_eq!(
        opts.method_options[0].signature,
        MethodRef {
            owner: TypeRef(IrId::from_raw(7)),
            name: "Create".into()
        }
    );
}

#[test]
fn flattened_options_keep_presence() {
    let opts: ServiceOptions =
        decode_options(&fixture()).unwrap_or_else(|e| panic!("decode failed: {e}"));
    let per_method = &opts.method_options[0].opts;
    assert_eq!(per_method.logging, Some(false));
    assert_eq!(per_method.rest_path.as_deref(), Some(""));
    assert_eq!(per_method.query_vars, None);
}

#[test]
fn present_fields_override_defaults() {
    let opts: ServiceOptions =
        decode_options(&fixture()).unwrap_or_else(|e| panic!("decode failed: {e}"));
    let mut merged = opts.method_options[0].opts.clone();
    merged.inherit(&opts.defaults);
    assert_eq!(
        merged,
        MethodDefaults {
            logging: Some(false),
            rest_path: Some(String::new()),
            query_vars: Some(vec!["q".into(), "page".into()]),
        }
    );
}

#[test]
fn errors_name_the_failing_option() {
    let bad = nested(vec![
        (
            "Interface",
            OptionValue::Slice(vec![nested(vec![
                ("iface", string("not a type")),
                ("ns", string("")),
            ])]),
        ),
    ]);
    let err = decode_options::<ServiceOptions>(&bad).err();
    let err = err.unwrap_or_else(|| panic!("expected an error"));
    assert_eq!(err.path, "Interface[0].iface");
    assert_eq!(err.message, "expected a type, found string");
}

#[test]
fn integers_are_not_type_handles() {
    #[derive(Debug, Deserialize)]
    struct Opt {
        #[allow(dead_code)]
        value: TypeRef,
    }
    let err = decode_options::<Opt>(&nested(vec![("value", OptionValue::Int(0))])).err();
    let err = err.unwrap_or_else(|| panic!("expected an error"));
    assert_eq!(err.path, "value");
    assert_eq!(err.message, "expected a type, found int");
}

#[test]
fn missing_required_options_are_reported() {
    let err = decode_options::<ServiceOptions>(&nested(vec![])).err();
    let err = err.unwrap_or_else(|| panic!("expected an error"));
    assert!(err.message.contains("Interface"), "{}", err.message);
}

#[test]
fn null_decodes_to_none() {
    #[derive(Deserialize)]
    struct Opt {
        value: Option<TypeRef>,
    }
    let opt: Opt = decode_options(&nested(vec![("value", OptionValue::Null)]))
        .unwrap_or_else(|e| panic!("decode failed: {e}"));
    assert_eq!(opt.value, None);
}

fn maybe_bool() -> impl Strategy<Value = Option<bool>> {
    prop_oneof![Just(None), any::<bool>().prop_map(Some)]
}

fn maybe_string() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-z/]{0,6}".prop_map(Some)]
}

fn to_tree(opts: &MethodDefaults) -> OptionValue {
    let mut entries = Vec::new();
    if let Some(b) = opts.logging {
        entries.push(("Logging", OptionValue::Bool(b)));
    }
    if let Some(path) = &opts.rest_path {
        entries.push(("RESTPath", string(path)));
    }
    nested(entries)
}

proptest! {
    #[test]
    fn inheritance_prefers_present_fields(
        logging in maybe_bool(),
        rest_path in maybe_string(),
        default_logging in maybe_bool(),
        default_path in maybe_string(),
    ) {
        let own = MethodDefaults { logging, rest_path: rest_path.clone(), query_vars: None };
        let defaults = MethodDefaults {
            logging: default_logging,
            rest_path: default_path.clone(),
            query_vars: None,
        };
        let mut decoded: MethodDefaults =
            decode_options(&to_tree(&own)).unwrap_or_else(|e| panic!("{e}"));
        let decoded_defaults: MethodDefaults =
            decode_options(&to_tree(&defaults)).unwrap_or_else(|e| panic!("{e}"));
        decoded.inherit(&decoded_defaults);
        prop_assert_eq!(decoded.logging, logging.or(default_logging));
        prop_assert_eq!(decoded.rest_path, rest_path.or(default_path));
    }
}
