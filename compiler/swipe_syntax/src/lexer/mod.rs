//! Go scanner with automatic semicolon insertion and comment capture.
//!
//! The scanner makes a single pass over the source bytes and produces:
//!
//! - the token stream, with implicit semicolons inserted where the Go
//!   grammar requires them (newline or EOF after an identifier,
//!   literal, `break`/`continue`/`fallthrough`/`return`, `++`/`--`, or a
//!   closing bracket);
//! - every comment, grouped into [`CommentGroup`]s and linked to the token
//!   they document (lead) or trail (line).
//!
//! Scanning never fails: malformed input yields `Illegal` tokens plus an
//! entry in [`Lexed::errors`], and the parser reports those.

use swipe_ir::Span;

use crate::lines::LineIndex;
use crate::token::{Token, TokenKind};

/// A single `//` or `/* */` comment, text included.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Comment {
    pub span: Span,
    pub text: String,
}

/// Adjacent comments with no token and no blank line between them.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn span(&self) -> Span {
        match (self.list.first(), self.list.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::DUMMY,
        }
    }

    /// Comment text without markers, in the manner of `go/ast`.
    ///
    /// Comment markers and one leading space are removed, compiler
    /// directives (`//go:build`, `//line ...`) are dropped, trailing
    /// whitespace is trimmed from every line, and leading and trailing
    /// blank lines are removed. Lines are joined with `\n` and the result
    /// ends with a newline unless empty.
    pub fn text(&self) -> String {
        let lines = self.lines();
        if lines.is_empty() {
            return String::new();
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Same as [`text`](Self::text), split into lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for c in &self.list {
            let text = c.text.as_str();
            if let Some(body) = text.strip_prefix("//") {
                if is_directive(body) {
                    continue;
                }
                let body = body.strip_prefix(' ').unwrap_or(body);
                lines.push(body.trim_end().to_string());
            } else {
                let body = text
                    .strip_prefix("/*")
                    .and_then(|t| t.strip_suffix("*/"))
                    .unwrap_or(text);
                for line in body.split('\n') {
                    lines.push(line.trim_end().to_string());
                }
            }
        }
        while lines.first().is_some_and(String::is_empty) {
            lines.remove(0);
        }
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        // Collapse runs of blank lines into one.
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        for line in lines {
            if line.is_empty() && out.last().is_some_and(String::is_empty) {
                continue;
            }
            out.push(line);
        }
        out
    }
}

/// `//go:build`, `//line f.go:1`, `//export Foo`, `//extern`.
fn is_directive(body: &str) -> bool {
    if body.starts_with("line ") || body.starts_with("extern ") || body.starts_with("export ") {
        return true;
    }
    // [a-z0-9]+:[a-z0-9]
    let Some(colon) = body.find(':') else {
        return false;
    };
    let (prefix, rest) = body.split_at(colon);
    !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        && rest[1..]
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LexError {
    pub span: Span,
    pub message: String,
}

/// Output of [`tokenize`].
#[derive(Clone, Debug, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub groups: Vec<CommentGroup>,
    pub errors: Vec<LexError>,
    pub lines: LineIndex,
}

/// Scan `src` into tokens and comment groups.
pub fn tokenize(src: &str) -> Lexed {
    let lines = LineIndex::new(src);
    let mut scanner = Scanner {
        src,
        bytes: src.as_bytes(),
        pos: 0,
        insert_semi: false,
        tokens: Vec::new(),
        comments: Vec::new(),
        errors: Vec::new(),
        lines: &lines,
    };
    scanner.run();
    let Scanner {
        mut tokens,
        comments,
        errors,
        ..
    } = scanner;
    let groups = attach_comments(&mut tokens, comments, &lines);
    Lexed {
        tokens,
        groups,
        errors,
        lines,
    }
}

// ─── Scanner ────────────────────────────────────────────────────────────

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    insert_semi: bool,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    errors: Vec<LexError>,
    lines: &'a LineIndex,
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn is_letter(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    is_letter(c) || c.is_numeric()
}

impl<'a> Scanner<'a> {
    #[inline]
    fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    #[inline]
    fn peek_at(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(0)
    }

    fn current_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let span = Span::new(to_u32(start), to_u32(self.pos));
        let line = self.lines.line(span.start);
        let end_line = if span.is_empty() {
            line
        } else {
            self.lines.line(span.end - 1)
        };
        self.tokens.push(Token {
            kind,
            span,
            line,
            end_line,
            lead_comment: None,
            line_comment: None,
        });
        self.insert_semi = kind.inserts_semicolon();
    }

    fn implicit_semicolon(&mut self, at: usize) {
        let span = Span::new(to_u32(at), to_u32(at));
        let line = self.lines.line(span.start);
        self.tokens.push(Token {
            kind: TokenKind::Semicolon,
            span,
            line,
            end_line: line,
            lead_comment: None,
            line_comment: None,
        });
        self.insert_semi = false;
    }

    fn error(&mut self, start: usize, message: impl Into<String>) {
        self.errors.push(LexError {
            span: Span::new(to_u32(start), to_u32(self.pos.max(start + 1))),
            message: message.into(),
        });
    }

    fn run(&mut self) {
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                if self.insert_semi {
                    self.implicit_semicolon(self.pos);
                }
                let at = self.pos;
                self.push(TokenKind::Eof, at);
                return;
            }
            let start = self.pos;
            let b = self.peek();
            match b {
                b'\n' => {
                    if self.insert_semi {
                        self.implicit_semicolon(start);
                    }
                    self.pos += 1;
                }
                b'/' if self.peek_at(1) == b'/' => self.line_comment(),
                b'/' if self.peek_at(1) == b'*' => self.block_comment(),
                b'"' => self.interpreted_string(),
                b'`' => self.raw_string(),
                b'\'' => self.rune(),
                b'0'..=b'9' => self.number(),
                b'.' if self.peek_at(1).is_ascii_digit() => self.number(),
                _ if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 => self.ident(),
                _ => self.operator(),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\r') {
            self.pos += 1;
        }
    }

    // ─── Comments ───

    fn line_comment(&mut self) {
        let start = self.pos;
        let end = memchr::memchr(b'\n', &self.bytes[start..]).map_or(self.bytes.len(), |i| start + i);
        self.pos = end;
        let text = self.src[start..end].trim_end_matches('\r').to_string();
        self.comments.push(Comment {
            span: Span::new(to_u32(start), to_u32(start + text.len())),
            text,
        });
        // The newline itself (if any) is handled by the main loop, which
        // inserts the semicolon.
    }

    fn block_comment(&mut self) {
        let start = self.pos;
        let body = &self.bytes[start + 2..];
        let end = memchr::memmem::find(body, b"*/").map(|i| start + 2 + i + 2);
        let Some(end) = end else {
            self.pos = self.bytes.len();
            self.error(start, "comment not terminated");
            return;
        };
        let has_newline = memchr::memchr(b'\n', &self.bytes[start..end]).is_some();
        if has_newline && self.insert_semi {
            self.implicit_semicolon(start);
        }
        self.pos = end;
        self.comments.push(Comment {
            span: Span::new(to_u32(start), to_u32(end)),
            text: self.src[start..end].to_string(),
        });
    }

    // ─── Literals ───

    fn ident(&mut self) {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if !is_ident_continue(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.pos == start {
            // Non-letter Unicode character.
            let width = self.current_char().map_or(1, char::len_utf8);
            self.pos += width;
            self.error(start, "invalid character");
            self.push(TokenKind::Illegal, start);
            return;
        }
        if let Some(c) = self.src[start..].chars().next() {
            if !is_letter(c) {
                self.error(start, "identifier cannot begin with digit");
            }
        }
        let kind = TokenKind::keyword(&self.src[start..self.pos]).unwrap_or(TokenKind::Ident);
        self.push(kind, start);
    }

    /// Digits of `radix` plus `_` separators. Decimal digits are accepted
    /// for binary and octal so that `0b102` is one bad literal, not two.
    fn digits(&mut self, radix: u32) {
        loop {
            let b = self.peek();
            let ok = b == b'_' || (b as char).is_digit(radix) || (radix < 10 && b.is_ascii_digit());
            if !ok {
                break;
            }
            self.pos += 1;
        }
    }

    fn number(&mut self) {
        let start = self.pos;
        let mut kind = TokenKind::Int;
        let mut radix = 10;

        if self.peek() == b'0' {
            match self.peek_at(1) {
                b'x' | b'X' => {
                    radix = 16;
                    self.pos += 2;
                }
                b'o' | b'O' => {
                    radix = 8;
                    self.pos += 2;
                }
                b'b' | b'B' => {
                    radix = 2;
                    self.pos += 2;
                }
                _ => {}
            }
        }

        if self.peek() != b'.' {
            self.digits(radix);
        }
        if self.peek() == b'.' && radix != 2 && radix != 8 {
            kind = TokenKind::Float;
            self.pos += 1;
            self.digits(radix);
        }
        let exp = self.peek().to_ascii_lowercase();
        if (exp == b'e' && radix == 10) || (exp == b'p' && radix == 16) {
            kind = TokenKind::Float;
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            let before = self.pos;
            self.digits(10);
            if before == self.pos {
                self.error(start, "exponent has no digits");
            }
        }
        if self.peek() == b'i' {
            kind = TokenKind::Imag;
            self.pos += 1;
        }
        self.push(kind, start);
    }

    /// Consume one escape sequence after the backslash.
    fn escape(&mut self, quote: u8) {
        let start = self.pos;
        self.pos += 1; // backslash
        let (n, radix) = match self.peek() {
            b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => {
                self.pos += 1;
                return;
            }
            c if c == quote => {
                self.pos += 1;
                return;
            }
            b'0'..=b'7' => (3, 8),
            b'x' => {
                self.pos += 1;
                (2, 16)
            }
            b'u' => {
                self.pos += 1;
                (4, 16)
            }
            b'U' => {
                self.pos += 1;
                (8, 16)
            }
            _ => {
                self.error(start, "unknown escape sequence");
                return;
            }
        };
        for _ in 0..n {
            if !(self.peek() as char).is_digit(radix) {
                self.error(start, "illegal character in escape sequence");
                return;
            }
            self.pos += 1;
        }
    }

    fn interpreted_string(&mut self) {
        let start = self.pos;
        self.pos += 1;
        loop {
            if self.pos >= self.bytes.len() || self.peek() == b'\n' {
                self.error(start, "string literal not terminated");
                break;
            }
            match self.peek() {
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => self.escape(b'"'),
                _ => self.pos += 1,
            }
        }
        self.push(TokenKind::String, start);
    }

    fn raw_string(&mut self) {
        let start = self.pos;
        match memchr::memchr(b'`', &self.bytes[start + 1..]) {
            Some(i) => self.pos = start + 1 + i + 1,
            None => {
                self.pos = self.bytes.len();
                self.error(start, "raw string literal not terminated");
            }
        }
        self.push(TokenKind::String, start);
    }

    fn rune(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let mut n = 0;
        loop {
            if self.pos >= self.bytes.len() || self.peek() == b'\n' {
                self.error(start, "rune literal not terminated");
                break;
            }
            match self.peek() {
                b'\'' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => {
                    self.escape(b'\'');
                    n += 1;
                }
                _ => {
                    let width = self.current_char().map_or(1, char::len_utf8);
                    self.pos += width;
                    n += 1;
                }
            }
        }
        if n != 1 {
            self.error(start, "illegal rune literal");
        }
        self.push(TokenKind::Char, start);
    }

    // ─── Operators ───

    fn operator(&mut self) {
        let start = self.pos;
        let b0 = self.peek();
        let b1 = self.peek_at(1);
        let b2 = self.peek_at(2);
        let (kind, len) = match (b0, b1, b2) {
            (b'.', b'.', b'.') => (TokenKind::Ellipsis, 3),
            (b'<', b'<', b'=') => (TokenKind::ShlAssign, 3),
            (b'>', b'>', b'=') => (TokenKind::ShrAssign, 3),
            (b'&', b'^', b'=') => (TokenKind::AndNotAssign, 3),
            (b'+', b'=', _) => (TokenKind::AddAssign, 2),
            (b'-', b'=', _) => (TokenKind::SubAssign, 2),
            (b'*', b'=', _) => (TokenKind::MulAssign, 2),
            (b'/', b'=', _) => (TokenKind::QuoAssign, 2),
            (b'%', b'=', _) => (TokenKind::RemAssign, 2),
            (b'&', b'=', _) => (TokenKind::AndAssign, 2),
            (b'|', b'=', _) => (TokenKind::OrAssign, 2),
            (b'^', b'=', _) => (TokenKind::XorAssign, 2),
            (b'<', b'<', _) => (TokenKind::Shl, 2),
            (b'>', b'>', _) => (TokenKind::Shr, 2),
            (b'&', b'^', _) => (TokenKind::AndNot, 2),
            (b'&', b'&', _) => (TokenKind::LAnd, 2),
            (b'|', b'|', _) => (TokenKind::LOr, 2),
            (b'<', b'-', _) => (TokenKind::Arrow, 2),
            (b'+', b'+', _) => (TokenKind::Inc, 2),
            (b'-', b'-', _) => (TokenKind::Dec, 2),
            (b'=', b'=', _) => (TokenKind::Eql, 2),
            (b'!', b'=', _) => (TokenKind::Neq, 2),
            (b'<', b'=', _) => (TokenKind::Leq, 2),
            (b'>', b'=', _) => (TokenKind::Geq, 2),
            (b':', b'=', _) => (TokenKind::Define, 2),
            (b'+', _, _) => (TokenKind::Add, 1),
            (b'-', _, _) => (TokenKind::Sub, 1),
            (b'*', _, _) => (TokenKind::Mul, 1),
            (b'/', _, _) => (TokenKind::Quo, 1),
            (b'%', _, _) => (TokenKind::Rem, 1),
            (b'&', _, _) => (TokenKind::And, 1),
            (b'|', _, _) => (TokenKind::Or, 1),
            (b'^', _, _) => (TokenKind::Xor, 1),
            (b'<', _, _) => (TokenKind::Lss, 1),
            (b'>', _, _) => (TokenKind::Gtr, 1),
            (b'=', _, _) => (TokenKind::Assign, 1),
            (b'!', _, _) => (TokenKind::Not, 1),
            (b'(', _, _) => (TokenKind::LParen, 1),
            (b'[', _, _) => (TokenKind::LBrack, 1),
            (b'{', _, _) => (TokenKind::LBrace, 1),
            (b',', _, _) => (TokenKind::Comma, 1),
            (b'.', _, _) => (TokenKind::Period, 1),
            (b')', _, _) => (TokenKind::RParen, 1),
            (b']', _, _) => (TokenKind::RBrack, 1),
            (b'}', _, _) => (TokenKind::RBrace, 1),
            (b';', _, _) => (TokenKind::Semicolon, 1),
            (b':', _, _) => (TokenKind::Colon, 1),
            (b'~', _, _) => (TokenKind::Tilde, 1),
            _ => (TokenKind::Illegal, 1),
        };
        self.pos += len;
        if kind == TokenKind::Illegal {
            self.error(start, format!("invalid character {:?}", b0 as char));
        }
        self.push(kind, start);
    }
}

// ─── Comment attachment ─────────────────────────────────────────────────

/// Group comments and link them to tokens.
///
/// A group that starts on the line of the previous token holds only
/// comments on that line and becomes the token's line comment if the next
/// token is on a later line. Other groups span adjacent lines; the last one
/// before a token becomes that token's lead comment if it ends on the line
/// right above it.
fn attach_comments(tokens: &mut [Token], comments: Vec<Comment>, lines: &LineIndex) -> Vec<CommentGroup> {
    let real: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_implicit_semicolon())
        .map(|(i, _)| i)
        .collect();

    let neighbours = |c: &Comment| -> (Option<usize>, Option<usize>) {
        let idx = real.partition_point(|&i| tokens[i].span.end <= c.span.start);
        let prev = idx.checked_sub(1).map(|i| real[i]);
        let next = real[idx..]
            .iter()
            .copied()
            .find(|&i| tokens[i].span.start >= c.span.end);
        (prev, next)
    };
    let end_line = |c: &Comment| lines.line(c.span.end.saturating_sub(1).max(c.span.start));

    let mut groups = Vec::new();
    let mut lead_links: Vec<(usize, u32)> = Vec::new();
    let mut line_links: Vec<(usize, u32)> = Vec::new();

    let mut ci = 0;
    while ci < comments.len() {
        let (prev, next) = neighbours(&comments[ci]);
        let first_line = lines.line(comments[ci].span.start);
        let same_line = prev.is_some_and(|p| tokens[p].end_line == first_line);
        let window = u32::from(!same_line);

        let mut endline = end_line(&comments[ci]);
        let mut cj = ci + 1;
        while cj < comments.len() {
            let (p2, _) = neighbours(&comments[cj]);
            if p2 != prev || lines.line(comments[cj].span.start) > endline + window {
                break;
            }
            endline = end_line(&comments[cj]);
            cj += 1;
        }

        let group_id = u32::try_from(groups.len()).unwrap_or(u32::MAX);
        groups.push(CommentGroup {
            list: comments[ci..cj].to_vec(),
        });

        if same_line {
            if let Some(p) = prev {
                let next_on_other_line = next.map_or(true, |n| {
                    tokens[n].line != endline
                        || matches!(tokens[n].kind, TokenKind::Semicolon | TokenKind::Eof)
                });
                if next_on_other_line {
                    line_links.push((p, group_id));
                }
            }
        } else if let Some(n) = next {
            if endline + 1 == tokens[n].line {
                lead_links.push((n, group_id));
            }
        }
        ci = cj;
    }

    for (tok, g) in lead_links {
        tokens[tok].lead_comment = Some(g);
    }
    for (tok, g) in line_links {
        tokens[tok].line_comment = Some(g);
    }
    groups
}

#[cfg(test)]
mod tests;
