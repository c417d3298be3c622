use pretty_assertions::assert_eq;

use super::{EnumConst, EnumMap, EnumValue};
use crate::test_support::load_app;

fn int(name: &str, value: i64) -> EnumValue {
    EnumValue {
        name: name.into(),
        value: EnumConst::Int(value),
    }
}

fn string(name: &str, value: &str) -> EnumValue {
    EnumValue {
        name: name.into(),
        value: EnumConst::String(value.into()),
    }
}

#[test]
fn iota_groups_count_positions_and_resets() {
    let prog = load_app(
        "package app

type Level int

const (
	Debug Level = iota
	Info
	_
	Error
	Fatal = Level(10)
	Panic
	Trace Level = iota * 2
)
",
    );
    let enums = EnumMap::build(&prog);
    assert_eq!(
        enums.get("example.com/app.Level"),
        Some(
            [
                int("Debug", 0),
                int("Info", 1),
                int("Error", 3),
                int("Fatal", 10),
                int("Panic", 10),
                int("Trace", 12),
            ]
            .as_slice()
        )
    );
}

#[test]
fn string_groups_are_unquoted() {
    let prog = load_app(
        "package app

type Color string

const (
	Red   Color = \"red\"
	Green Color = `green`
	Blue  Color = \"bl\\u0075e\"
)
",
    );
    let enums = EnumMap::build(&prog);
    assert_eq!(
        enums.get("example.com/app.Color"),
        Some([string("Red", "red"), string("Green", "green"), string("Blue", "blue")].as_slice())
    );
}

#[test]
fn untyped_and_ungrouped_constants_are_ignored() {
    let prog = load_app(
        "package app

type Mode int

const Single Mode = 1

const (
	A = 1
	B = \"b\"
)

type Ratio float64

const (
	Half Ratio = 0.5
)
",
    );
    let enums = EnumMap::build(&prog);
    assert!(enums.is_empty(), "{enums:?}");
    assert_eq!(enums.get("example.com/app.Mode"), None);
}
