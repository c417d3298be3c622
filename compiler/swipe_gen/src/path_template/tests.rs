use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{brace_indices, parse_path_template, PathTemplateError, DEFAULT_PATTERN};

#[test]
fn extracts_variables_with_patterns() {
    let tpl = parse_path_template("/users/{id:[0-9]+}")
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(tpl.var_map().into_iter().collect::<Vec<_>>(), vec![("id", "[0-9]+")]);
    let re = regex::Regex::new(&tpl.regex).unwrap_or_else(|e| panic!("{e}"));
    let caps = re.captures("/users/42").unwrap_or_else(|| panic!("no match"));
    assert_eq!(&caps["v0"], "42");
    assert!(!re.is_match("/users/abc"));
}

#[test]
fn variables_default_to_a_path_segment() {
    let tpl = parse_path_template("/a/{x}/b/{ y }.json")
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    let names: Vec<_> = tpl.vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
    assert!(tpl.vars.iter().all(|v| v.pattern == DEFAULT_PATTERN));
    let re = regex::Regex::new(&tpl.regex).unwrap_or_else(|e| panic!("{e}"));
    assert!(re.is_match("/a/1/b/2.json"));
    assert!(!re.is_match("/a/1/b/2xjson"));
    assert!(tpl.has_var("y"));
}

#[test]
fn nested_braces_stay_inside_the_pattern() {
    let tpl = parse_path_template("/{year:[0-9]{4}}/{slug}")
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(tpl.vars[0].pattern, "[0-9]{4}");
    assert_eq!(tpl.vars[1].name, "slug");
}

#[test]
fn unbalanced_braces_are_rejected() {
    let err = parse_path_template("/users/{id").err();
    assert_eq!(err, Some(PathTemplateError::Unbalanced("/users/{id".into())));
    assert_eq!(
        err.map(|e| e.to_string()).as_deref(),
        Some("mux: unbalanced braces in \"/users/{id\"")
    );
    assert!(parse_path_template("/users/id}").is_err());
    assert!(parse_path_template("/}{").is_err());
}

#[test]
fn empty_names_and_bad_patterns_are_rejected() {
    assert!(matches!(
        parse_path_template("/{:[0-9]+}"),
        Err(PathTemplateError::MissingName(_))
    ));
    assert!(matches!(
        parse_path_template("/{id:[0-9}"),
        Err(PathTemplateError::InvalidPattern { .. })
    ));
}

fn balanced(s: &str) -> bool {
    let mut depth = 0i32;
    for c in s.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

proptest! {
    #[test]
    fn accepts_exactly_balanced_strings(s in "[a/{}]{0,16}") {
        prop_assert_eq!(brace_indices(&s).is_ok(), balanced(&s));
    }

    #[test]
    fn spans_come_out_in_source_order(
        parts in prop::collection::vec(("[a-z/]{0,4}", "[a-z]{1,4}"), 0..6),
    ) {
        let template: String = parts.iter().map(|(lit, var)| format!("{lit}{{{var}}}")).collect();
        let tpl = parse_path_template(&template).unwrap_or_else(|e| panic!("{e}"));
        let names: Vec<_> = tpl.vars.iter().map(|v| v.name.clone()).collect();
        let want: Vec<_> = parts.iter().map(|(_, var)| var.clone()).collect();
        prop_assert_eq!(names, want);
    }
}
