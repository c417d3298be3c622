use super::*;
use pretty_assertions::assert_eq;

#[test]
fn name_variants_for_method() {
    let name = Name::new("GetUser");
    assert_eq!(name.upper, "GetUser");
    assert_eq!(name.lower, "getUser");
    assert_eq!(name.snake(), "get_user");
}

#[test]
fn acronym_runs_split_before_last_capital() {
    assert_eq!(to_lower_camel("HTTPServer"), "httpServer");
    assert_eq!(to_snake("HTTPServer"), "http_server");
    assert_eq!(to_snake("JSONRPCServer"), "jsonrpc_server");
}

#[test]
fn all_caps_identifier_is_one_word() {
    assert_eq!(to_lower_camel("ID"), "id");
    assert_eq!(to_upper_camel("ID"), "ID");
    assert_eq!(to_snake("ID"), "id");
}

#[test]
fn separators_are_dropped() {
    assert_eq!(to_upper_camel("fld_string_req"), "FldStringReq");
    assert_eq!(to_lower_camel("user-id"), "userId");
    assert_eq!(to_snake("Config"), "config");
}

#[test]
fn digits_stay_with_previous_word() {
    assert_eq!(to_snake("Base64Value"), "base64_value");
    assert_eq!(to_snake("int64"), "int64");
}

#[test]
fn empty_input() {
    assert_eq!(to_upper_camel(""), "");
    assert_eq!(to_lower_camel(""), "");
    assert_eq!(to_snake(""), "");
}
