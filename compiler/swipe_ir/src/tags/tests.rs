use super::*;
use pretty_assertions::assert_eq;

#[test]
fn parses_json_with_options() {
    let set = TagSet::parse(r#"json:"name,omitempty""#).unwrap();
    let tag = set.get("json").unwrap();
    assert_eq!(tag.name, "name");
    assert_eq!(tag.options, vec!["omitempty".to_string()]);
    assert!(tag.has_option("omitempty"));
}

#[test]
fn parses_multiple_keys() {
    let set = TagSet::parse(r#"json:"id" env:"ID,required""#).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("json").unwrap().name, "id");
    assert!(set.get("env").unwrap().has_option("required"));
}

#[test]
fn env_desc_swallows_commas() {
    let set =
        TagSet::parse(r#"env:"ADDR,required,use_flag,desc:Listen address, host:port""#).unwrap();
    let tag = set.get("env").unwrap();
    assert_eq!(tag.name, "ADDR");
    assert!(tag.has_option("required"));
    assert!(tag.has_option("use_flag"));
    assert_eq!(tag.option_value("desc"), Some("Listen address, host:port"));
}

#[test]
fn escaped_quotes_in_value() {
    let set = TagSet::parse(r#"doc:"say \"hi\"""#).unwrap();
    assert_eq!(set.get("doc").unwrap().value, r#"say "hi""#);
}

#[test]
fn repeated_keys_are_kept() {
    let set = TagSet::parse(r#"x:"a" x:"b""#).unwrap();
    let all: Vec<_> = set.get_all("x").map(|t| t.name.as_str()).collect();
    assert_eq!(all, vec!["a", "b"]);
}

#[test]
fn empty_tag_is_empty_set() {
    assert!(TagSet::parse("").unwrap().is_empty());
    assert!(TagSet::parse("   ").unwrap().is_empty());
}

#[test]
fn malformed_tags_are_rejected() {
    assert!(TagSet::parse("json").is_err());
    assert!(TagSet::parse(r#"json:name"#).is_err());
    assert!(TagSet::parse(r#"json:"unterminated"#).is_err());
    assert!(TagSet::parse(r#":"x""#).is_err());
}

#[allow(clippy::disallowed_types, reason = "proptest macros internally use Arc")]
mod proptest_tags {
    use super::super::TagSet;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn written_tags_parse_back(
            key in "[a-z]{1,8}",
            name in "[A-Za-z_]{0,12}",
            opts in proptest::collection::vec("[a-z_]{1,8}", 0..4),
        ) {
            let mut value = name.clone();
            for o in &opts {
                value.push(',');
                value.push_str(o);
            }
            let raw = format!("{key}:\"{value}\"");
            let set = TagSet::parse(&raw).unwrap();
            let tag = set.get(&key).unwrap();
            prop_assert_eq!(&tag.name, &name);
            prop_assert_eq!(&tag.options, &opts);
        }
    }
}
