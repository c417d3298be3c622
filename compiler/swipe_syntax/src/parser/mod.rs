//! Recursive-descent Go parser.
//!
//! The parser follows the structure of the Go grammar: [`parse_file`]
//! reads the package clause, imports, and top-level declarations; the
//! `expr` and `stmt` submodules handle everything inside them.
//!
//! # Error Recovery
//!
//! Errors are collected, never thrown. After an error the parser emits a
//! `Bad` node and skips ahead to a synchronization token (`;`, `}`, or a
//! declaration keyword), so one malformed declaration does not hide the
//! rest of the file.
//!
//! # Composite Literal Ambiguity
//!
//! In `if x == T{} {` the first `{` would be read as a composite literal.
//! As in `go/parser`, `expr_lev` is negative while parsing control clause
//! headers and bare type names followed by `{` are then not treated as
//! literal types. Parentheses restore the normal level.

use swipe_ir::Span;

use crate::ast::{
    CommentId, Decl, Field, File, FuncDecl, FuncSig, GenDecl, Ident, ImportSpec, Spec, TypeSpec,
    ValueSpec,
};
use crate::build_constraint::find_constraint;
use crate::lexer::tokenize;
use crate::literal::unquote;
use crate::token::{Token, TokenKind};

mod expr;
mod stmt;

/// A syntax error with its resolved location.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub span: Span,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Parse one Go source file.
///
/// Always returns a [`File`]; syntax errors are returned alongside it.
pub fn parse_file(src: &str) -> (File, Vec<ParseError>) {
    let lexed = tokenize(src);
    let mut parser = Parser {
        src,
        tokens: lexed.tokens,
        pos: 0,
        last_real: 0,
        expr_lev: 0,
        file: File {
            comments: lexed.groups,
            lines: lexed.lines,
            build_constraint: find_constraint(src),
            ..File::default()
        },
        errors: Vec::new(),
    };
    for err in lexed.errors {
        parser.error_at(err.span, err.message);
    }
    parser.parse_source_file();
    let Parser { file, errors, .. } = parser;
    tracing::trace!(
        package = file.package_name(),
        decls = file.decls.len(),
        errors = errors.len(),
        "parsed file"
    );
    (file, errors)
}

pub(crate) struct Parser<'src> {
    src: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    /// Index of the last consumed token that is not an implicit semicolon.
    last_real: usize,
    /// `< 0` inside control clause headers.
    expr_lev: i32,
    file: File,
    errors: Vec<ParseError>,
}

/// Tokens that may start a top-level declaration.
fn is_decl_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Func | TokenKind::Type | TokenKind::Var | TokenKind::Const | TokenKind::Import
    )
}

impl<'src> Parser<'src> {
    // ─── Cursor ───

    #[inline]
    fn tok(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    fn kind(&self) -> TokenKind {
        self.tok().kind
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn text(&self, tok: Token) -> &'src str {
        &self.src[tok.span.start as usize..tok.span.end as usize]
    }

    fn bump(&mut self) -> Token {
        let tok = self.tok();
        if tok.kind != TokenKind::Eof {
            if !tok.is_implicit_semicolon() {
                self.last_real = self.pos;
            }
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> u32 {
        self.tokens.get(self.last_real).map_or(0, |t| t.span.end)
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    fn lead_comment(&self) -> Option<CommentId> {
        self.tok().lead_comment
    }

    /// Line comment trailing the last consumed token.
    fn line_comment(&self) -> Option<CommentId> {
        self.tokens.get(self.last_real).and_then(|t| t.line_comment)
    }

    // ─── Errors ───

    fn error_at(&mut self, span: Span, message: impl Into<String>) {
        let (line, column) = self.file.lines.line_col(span.start);
        // One error per line keeps cascades readable.
        if self.errors.last().is_some_and(|e| e.line == line) {
            return;
        }
        self.errors.push(ParseError {
            span,
            line,
            column,
            message: message.into(),
        });
    }

    fn error_expected(&mut self, what: &str) {
        let tok = self.tok();
        let found = if tok.is_implicit_semicolon() {
            "newline".to_string()
        } else if tok.kind == TokenKind::Ident || tok.kind.is_literal() {
            self.text(tok).to_string()
        } else {
            tok.kind.as_str().to_string()
        };
        self.error_at(tok.span, format!("expected {what}, found {found}"));
    }

    fn expect(&mut self, kind: TokenKind) -> Span {
        let tok = self.tok();
        if tok.kind == kind {
            self.bump();
        } else {
            self.error_expected(&format!("'{}'", kind.as_str()));
        }
        tok.span
    }

    /// Accept `;`, or nothing before a closing `)` / `}`.
    fn expect_semi(&mut self) {
        match self.kind() {
            TokenKind::Semicolon => {
                self.bump();
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => {}
            _ => {
                self.error_expected("';'");
                self.sync_stmt();
            }
        }
    }

    /// Skip to the next `;` or `}` at or below the current nesting level.
    fn sync_stmt(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.kind() {
                TokenKind::Eof => return,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBrack => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBrack => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Skip to the next top-level declaration keyword.
    fn sync_decl(&mut self) {
        while !self.at(TokenKind::Eof) {
            let after_semi = self.pos == 0 || self.tokens[self.pos - 1].kind == TokenKind::Semicolon;
            if is_decl_start(self.kind()) && after_semi {
                return;
            }
            self.bump();
        }
    }

    fn parse_ident(&mut self) -> Ident {
        let tok = self.tok();
        if tok.kind == TokenKind::Ident {
            self.bump();
            Ident {
                name: self.text(tok).to_string(),
                span: tok.span,
            }
        } else {
            self.error_expected("identifier");
            Ident {
                name: "_".to_string(),
                span: Span::new(tok.span.start, tok.span.start),
            }
        }
    }

    fn parse_ident_list(&mut self) -> Vec<Ident> {
        let mut list = vec![self.parse_ident()];
        while self.eat(TokenKind::Comma) {
            list.push(self.parse_ident());
        }
        list
    }

    // ─── Source file ───

    fn parse_source_file(&mut self) {
        self.file.doc = self.lead_comment();
        if !self.at(TokenKind::Package) {
            self.error_expected("'package'");
            return;
        }
        self.bump();
        let name = self.parse_ident();
        self.file.package = Some(name);
        self.expect_semi();

        while self.at(TokenKind::Import) {
            let decl = self.parse_gen_decl(TokenKind::Import);
            self.file.decls.push(Decl::Gen(decl));
        }

        while !self.at(TokenKind::Eof) {
            let before = self.pos;
            let decl = self.parse_decl();
            self.file.decls.push(decl);
            if self.pos == before {
                self.bump();
            }
        }
    }

    fn parse_decl(&mut self) -> Decl {
        match self.kind() {
            TokenKind::Const | TokenKind::Type | TokenKind::Var => {
                let kind = self.kind();
                Decl::Gen(self.parse_gen_decl(kind))
            }
            TokenKind::Func => Decl::Func(self.parse_func_decl()),
            TokenKind::Import => {
                self.error_at(self.tok().span, "imports must appear before other declarations");
                Decl::Gen(self.parse_gen_decl(TokenKind::Import))
            }
            TokenKind::Semicolon => {
                let span = self.bump().span;
                Decl::Bad(span)
            }
            _ => {
                let start = self.tok().span.start;
                self.error_expected("declaration");
                self.bump();
                self.sync_decl();
                Decl::Bad(self.span_from(start))
            }
        }
    }

    pub(crate) fn parse_gen_decl(&mut self, kind: TokenKind) -> GenDecl {
        let doc = self.lead_comment();
        let start = self.expect(kind).start;
        let mut specs = Vec::new();
        let grouped = self.eat(TokenKind::LParen);
        if grouped {
            let mut iota = 0u32;
            while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
                let before = self.pos;
                let spec_doc = self.lead_comment();
                specs.push(self.parse_spec(kind, spec_doc, iota));
                iota += 1;
                if self.pos == before {
                    self.bump();
                }
            }
            self.expect(TokenKind::RParen);
            self.expect_semi();
        } else {
            specs.push(self.parse_spec(kind, None, 0));
        }
        GenDecl {
            tok: kind,
            doc,
            specs,
            grouped,
            span: self.span_from(start),
        }
    }

    fn parse_spec(&mut self, kind: TokenKind, doc: Option<CommentId>, iota: u32) -> Spec {
        match kind {
            TokenKind::Import => Spec::Import(self.parse_import_spec(doc)),
            TokenKind::Type => Spec::Type(self.parse_type_spec(doc)),
            _ => Spec::Value(self.parse_value_spec(doc, kind, iota)),
        }
    }

    fn parse_import_spec(&mut self, doc: Option<CommentId>) -> ImportSpec {
        let start = self.tok().span.start;
        let name = match self.kind() {
            TokenKind::Ident => Some(self.parse_ident()),
            TokenKind::Period => {
                let tok = self.bump();
                Some(Ident {
                    name: ".".to_string(),
                    span: tok.span,
                })
            }
            _ => None,
        };
        let tok = self.tok();
        let path = if tok.kind == TokenKind::String {
            self.bump();
            match unquote(self.text(tok)) {
                Ok(path) => path,
                Err(err) => {
                    self.error_at(tok.span, err.to_string());
                    String::new()
                }
            }
        } else {
            self.error_expected("import path");
            String::new()
        };
        let span = self.span_from(start);
        let comment = self.line_comment();
        self.expect_semi();
        ImportSpec {
            doc,
            name,
            path,
            path_span: tok.span,
            comment,
            span,
        }
    }

    fn parse_value_spec(&mut self, doc: Option<CommentId>, kind: TokenKind, iota: u32) -> ValueSpec {
        let start = self.tok().span.start;
        let names = self.parse_ident_list();
        let ty = if matches!(
            self.kind(),
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::RParen
        ) {
            None
        } else {
            Some(self.parse_type())
        };
        let mut values = Vec::new();
        if self.eat(TokenKind::Assign) {
            values = self.parse_expr_list();
        } else if kind == TokenKind::Var && ty.is_none() {
            self.error_expected("type");
        }
        let span = self.span_from(start);
        let comment = self.line_comment();
        self.expect_semi();
        ValueSpec {
            doc,
            names,
            ty,
            values,
            comment,
            iota,
            span,
        }
    }

    fn parse_type_spec(&mut self, doc: Option<CommentId>) -> TypeSpec {
        let start = self.tok().span.start;
        let name = self.parse_ident();
        let mut type_params = Vec::new();
        if self.at(TokenKind::LBrack) && self.looks_like_type_params() {
            type_params = self.parse_type_params();
        }
        let alias = self.eat(TokenKind::Assign);
        let ty = self.parse_type();
        let span = self.span_from(start);
        let comment = self.line_comment();
        self.expect_semi();
        TypeSpec {
            doc,
            name,
            type_params,
            alias,
            ty,
            comment,
            span,
        }
    }

    /// After `type Name`, decide whether `[` opens a type parameter list
    /// (`[T any]`, `[K comparable, V any]`) or an array length (`[4]int`).
    fn looks_like_type_params(&self) -> bool {
        if self.peek_kind(1) != TokenKind::Ident {
            return false;
        }
        matches!(
            self.peek_kind(2),
            TokenKind::Ident
                | TokenKind::Comma
                | TokenKind::Interface
                | TokenKind::Tilde
                | TokenKind::Mul
                | TokenKind::LBrack
                | TokenKind::Func
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Struct
                | TokenKind::LParen
        )
    }

    /// `[T any, U ~int | ~string]`.
    fn parse_type_params(&mut self) -> Vec<Field> {
        self.expect(TokenKind::LBrack);
        let mut fields = Vec::new();
        while !self.at(TokenKind::RBrack) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            let start = self.tok().span.start;
            let names = self.parse_ident_list();
            let ty = self.parse_type_elem();
            fields.push(Field {
                doc: None,
                names,
                ty,
                tag: None,
                comment: None,
                span: self.span_from(start),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrack);
        fields
    }

    fn parse_func_decl(&mut self) -> FuncDecl {
        let doc = self.lead_comment();
        let start = self.expect(TokenKind::Func).start;
        let recv = if self.at(TokenKind::LParen) {
            let params = self.parse_params();
            if params.len() != 1 {
                self.error_at(self.span_from(start), "method has multiple receivers");
            }
            params.into_iter().next()
        } else {
            None
        };
        let name = self.parse_ident();
        let sig_start = self.tok().span.start;
        let type_params = if self.at(TokenKind::LBrack) {
            self.parse_type_params()
        } else {
            Vec::new()
        };
        let params = self.parse_params();
        let results = self.parse_results();
        let sig = FuncSig {
            type_params,
            params,
            results,
            span: self.span_from(sig_start),
        };
        let body = if self.at(TokenKind::LBrace) {
            let saved = self.expr_lev;
            self.expr_lev = 0;
            let body = self.parse_block();
            self.expr_lev = saved;
            Some(body)
        } else {
            None
        };
        let span = self.span_from(start);
        self.expect_semi();
        FuncDecl {
            doc,
            recv,
            name,
            sig,
            body,
            span,
        }
    }
}

#[cfg(test)]
mod tests;
