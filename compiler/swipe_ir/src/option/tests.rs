use super::*;
use pretty_assertions::assert_eq;

#[test]
fn single_valued_options_keep_last_assignment() {
    let mut root = OptionValue::Nested(OptionMap::new());
    root.insert("RESTPath", OptionValue::String("/a".into()), false);
    root.insert("RESTPath", OptionValue::String("/b".into()), false);
    assert_eq!(
        root.as_nested().and_then(|m| m.get("RESTPath")),
        Some(&OptionValue::String("/b".into()))
    );
}

#[test]
fn repeat_options_accumulate_in_order() {
    let mut root = OptionValue::Nested(OptionMap::new());
    root.insert("Interface", OptionValue::Int(1), true);
    root.insert("Interface", OptionValue::Int(2), true);
    assert_eq!(
        root.as_nested().and_then(|m| m.get("Interface")),
        Some(&OptionValue::Slice(vec![
            OptionValue::Int(1),
            OptionValue::Int(2)
        ]))
    );
}

#[test]
fn insert_into_scalar_is_ignored() {
    let mut v = OptionValue::Bool(true);
    v.insert("x", OptionValue::Null, false);
    assert_eq!(v, OptionValue::Bool(true));
}

#[test]
fn display_is_readable() {
    let mut map = OptionMap::new();
    map.insert("Logging".into(), OptionValue::Bool(true));
    map.insert("Tags".into(), OptionValue::Slice(vec![OptionValue::String("a".into())]));
    assert_eq!(
        OptionValue::Nested(map).to_string(),
        r#"{Logging: true, Tags: ["a"]}"#
    );
}
