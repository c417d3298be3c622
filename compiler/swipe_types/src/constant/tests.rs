use super::*;
use pretty_assertions::assert_eq;

#[test]
fn literals() {
    assert_eq!(
        ConstValue::from_literal(LitKind::Int, "0x10"),
        Some(ConstValue::Int(16))
    );
    assert_eq!(
        ConstValue::from_literal(LitKind::Char, "'a'"),
        Some(ConstValue::Int(97))
    );
    assert_eq!(
        ConstValue::from_literal(LitKind::String, r#""ok\n""#),
        Some(ConstValue::String("ok\n".into()))
    );
    assert_eq!(ConstValue::from_literal(LitKind::Imag, "1i"), None);
}

#[test]
fn integer_arithmetic() {
    let two = ConstValue::Int(2);
    let seven = ConstValue::Int(7);
    assert_eq!(
        ConstValue::binary(TokenKind::Quo, &seven, &two, true),
        Some(ConstValue::Int(3))
    );
    assert_eq!(
        ConstValue::binary(TokenKind::Quo, &seven, &two, false),
        Some(ConstValue::Float(3.5))
    );
    assert_eq!(
        ConstValue::binary(TokenKind::Shl, &ConstValue::Int(1), &ConstValue::Int(10), true),
        Some(ConstValue::Int(1024))
    );
    assert_eq!(ConstValue::binary(TokenKind::Quo, &seven, &ConstValue::Int(0), true), None);
    assert_eq!(
        ConstValue::unary(TokenKind::Sub, &ConstValue::Int(32001)),
        Some(ConstValue::Int(-32001))
    );
}

#[test]
fn strings_and_comparisons() {
    let a = ConstValue::String("a".into());
    let b = ConstValue::String("b".into());
    assert_eq!(
        ConstValue::binary(TokenKind::Add, &a, &b, false),
        Some(ConstValue::String("ab".into()))
    );
    assert_eq!(ConstValue::compare(TokenKind::Lss, &a, &b), Some(true));
    assert_eq!(
        ConstValue::compare(TokenKind::Geq, &ConstValue::Int(2), &ConstValue::Float(2.0)),
        Some(true)
    );
}

#[test]
fn conversions() {
    assert_eq!(
        ConstValue::Int(65).convert(BasicKind::String),
        Some(ConstValue::String("A".into()))
    );
    assert_eq!(
        ConstValue::Float(3.0).convert(BasicKind::Int64),
        Some(ConstValue::Int(3))
    );
    assert_eq!(ConstValue::Float(3.5).convert(BasicKind::Int), None);
    assert_eq!(
        ConstValue::Int(3).convert(BasicKind::UntypedFloat),
        Some(ConstValue::Float(3.0))
    );
}
