//! Token kinds and the token value produced by the lexer.

use std::fmt;

use swipe_ir::Span;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // ─── Literals and names ───
    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,

    // ─── Operators ───
    Add,       // +
    Sub,       // -
    Mul,       // *
    Quo,       // /
    Rem,       // %
    And,       // &
    Or,        // |
    Xor,       // ^
    Shl,       // <<
    Shr,       // >>
    AndNot,    // &^
    AddAssign, // +=
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    LAnd,   // &&
    LOr,    // ||
    Arrow,  // <-
    Inc,    // ++
    Dec,    // --
    Eql,    // ==
    Lss,    // <
    Gtr,    // >
    Assign, // =
    Not,    // !
    Neq,    // !=
    Leq,    // <=
    Geq,    // >=
    Define, // :=
    Ellipsis,
    LParen,
    LBrack,
    LBrace,
    Comma,
    Period,
    RParen,
    RBrack,
    RBrace,
    Semicolon,
    Colon,
    Tilde,

    // ─── Keywords ───
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    Illegal,
    Eof,
}

impl TokenKind {
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "chan" => TokenKind::Chan,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "default" => TokenKind::Default,
            "defer" => TokenKind::Defer,
            "else" => TokenKind::Else,
            "fallthrough" => TokenKind::Fallthrough,
            "for" => TokenKind::For,
            "func" => TokenKind::Func,
            "go" => TokenKind::Go,
            "goto" => TokenKind::Goto,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "interface" => TokenKind::Interface,
            "map" => TokenKind::Map,
            "package" => TokenKind::Package,
            "range" => TokenKind::Range,
            "return" => TokenKind::Return,
            "select" => TokenKind::Select,
            "struct" => TokenKind::Struct,
            "switch" => TokenKind::Switch,
            "type" => TokenKind::Type,
            "var" => TokenKind::Var,
            _ => return None,
        })
    }

    /// A newline after this token inserts a semicolon.
    pub fn inserts_semicolon(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imag
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::RParen
                | TokenKind::RBrack
                | TokenKind::RBrace
        )
    }

    /// Binary operator precedence (`0` for non-operators).
    pub fn precedence(self) -> u8 {
        match self {
            TokenKind::LOr => 1,
            TokenKind::LAnd => 2,
            TokenKind::Eql
            | TokenKind::Neq
            | TokenKind::Lss
            | TokenKind::Leq
            | TokenKind::Gtr
            | TokenKind::Geq => 3,
            TokenKind::Add | TokenKind::Sub | TokenKind::Or | TokenKind::Xor => 4,
            TokenKind::Mul
            | TokenKind::Quo
            | TokenKind::Rem
            | TokenKind::Shl
            | TokenKind::Shr
            | TokenKind::And
            | TokenKind::AndNot => 5,
            _ => 0,
        }
    }

    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::Define
                | TokenKind::AddAssign
                | TokenKind::SubAssign
                | TokenKind::MulAssign
                | TokenKind::QuoAssign
                | TokenKind::RemAssign
                | TokenKind::AndAssign
                | TokenKind::OrAssign
                | TokenKind::XorAssign
                | TokenKind::ShlAssign
                | TokenKind::ShrAssign
                | TokenKind::AndNotAssign
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::Imag | TokenKind::Char | TokenKind::String
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Imag => "imaginary literal",
            TokenKind::Char => "rune literal",
            TokenKind::String => "string literal",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Quo => "/",
            TokenKind::Rem => "%",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Xor => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::AndNot => "&^",
            TokenKind::AddAssign => "+=",
            TokenKind::SubAssign => "-=",
            TokenKind::MulAssign => "*=",
            TokenKind::QuoAssign => "/=",
            TokenKind::RemAssign => "%=",
            TokenKind::AndAssign => "&=",
            TokenKind::OrAssign => "|=",
            TokenKind::XorAssign => "^=",
            TokenKind::ShlAssign => "<<=",
            TokenKind::ShrAssign => ">>=",
            TokenKind::AndNotAssign => "&^=",
            TokenKind::LAnd => "&&",
            TokenKind::LOr => "||",
            TokenKind::Arrow => "<-",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Eql => "==",
            TokenKind::Lss => "<",
            TokenKind::Gtr => ">",
            TokenKind::Assign => "=",
            TokenKind::Not => "!",
            TokenKind::Neq => "!=",
            TokenKind::Leq => "<=",
            TokenKind::Geq => ">=",
            TokenKind::Define => ":=",
            TokenKind::Ellipsis => "...",
            TokenKind::LParen => "(",
            TokenKind::LBrack => "[",
            TokenKind::LBrace => "{",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::RParen => ")",
            TokenKind::RBrack => "]",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Tilde => "~",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Chan => "chan",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Defer => "defer",
            TokenKind::Else => "else",
            TokenKind::Fallthrough => "fallthrough",
            TokenKind::For => "for",
            TokenKind::Func => "func",
            TokenKind::Go => "go",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::Interface => "interface",
            TokenKind::Map => "map",
            TokenKind::Package => "package",
            TokenKind::Range => "range",
            TokenKind::Return => "return",
            TokenKind::Select => "select",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::Type => "type",
            TokenKind::Var => "var",
            TokenKind::Illegal => "illegal token",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scanned token.
///
/// Text is recovered by slicing the source with `span`. An automatically
/// inserted semicolon has an empty span at the newline (or EOF) that
/// produced it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: u32,
    /// 1-based line of `span.end`; differs from `line` for multi-line raw
    /// strings.
    pub end_line: u32,
    /// Comment group ending on the line right above this token.
    pub lead_comment: Option<u32>,
    /// Comment group following this token on its line.
    pub line_comment: Option<u32>,
}

impl Token {
    pub fn is_implicit_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.span.is_empty()
    }
}
