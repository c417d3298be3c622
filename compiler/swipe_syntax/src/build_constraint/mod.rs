//! `//go:build` evaluation and GOOS/GOARCH file-name filtering.
//!
//! The package lister already applies constraints; this module is used by
//! the in-memory driver and when parsing a directory without `go list`
//! (the `options` command).

/// Target platform and tag set constraints are evaluated against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub tags: Vec<String>,
}

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "arm", "arm64", "loong64", "mips", "mipsle", "mips64", "mips64le", "ppc64",
    "ppc64le", "riscv64", "s390x", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

impl BuildContext {
    /// Context of the running host with the `swipe` tag enabled.
    pub fn host() -> Self {
        let goos = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let goarch = match std::env::consts::ARCH {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            "powerpc64" => "ppc64",
            other => other,
        };
        BuildContext {
            goos: goos.to_string(),
            goarch: goarch.to_string(),
            tags: vec!["swipe".to_string()],
        }
    }

    fn has_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch || tag == "gc" {
            return true;
        }
        if tag == "unix" {
            return UNIX_OS.contains(&self.goos.as_str());
        }
        // Release tags: every go1.N is satisfied.
        if let Some(minor) = tag.strip_prefix("go1.") {
            return minor.bytes().all(|b| b.is_ascii_digit());
        }
        self.tags.iter().any(|t| t == tag)
    }

    /// Evaluate a `//go:build` expression. Malformed expressions are false.
    pub fn eval(&self, expr: &str) -> bool {
        let tokens = tokenize(expr);
        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
            ctx: self,
        };
        match parser.or() {
            Some(v) if parser.pos == tokens.len() => v,
            _ => false,
        }
    }

    /// Check a file name and its optional `//go:build` line.
    pub fn matches(&self, file_name: &str, constraint: Option<&str>) -> bool {
        file_name_matches(self, file_name) && constraint.map_or(true, |c| self.eval(c))
    }
}

/// Apply the `_test`, `_GOOS`, `_GOARCH`, and `_GOOS_GOARCH` name rules.
pub fn file_name_matches(ctx: &BuildContext, file_name: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".go") else {
        return false;
    };
    if stem.ends_with("_test") || file_name.starts_with('_') || file_name.starts_with('.') {
        return false;
    }
    let parts: Vec<&str> = stem.split('_').collect();
    let n = parts.len();
    if n >= 3 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
        return ctx.has_tag(parts[n - 2]) && ctx.has_tag(parts[n - 1]);
    }
    if n >= 2 {
        let last = parts[n - 1];
        if KNOWN_OS.contains(&last) || KNOWN_ARCH.contains(&last) {
            return ctx.has_tag(last);
        }
    }
    true
}

/// Find the `//go:build` expression in the file header (before `package`).
pub fn find_constraint(src: &str) -> Option<String> {
    for line in src.lines() {
        let line = line.trim();
        if line.is_empty() || (line.starts_with("//") && !line.starts_with("//go:build")) {
            continue;
        }
        if let Some(expr) = line.strip_prefix("//go:build") {
            if expr.is_empty() || expr.starts_with([' ', '\t']) {
                return Some(expr.trim().to_string());
            }
            continue;
        }
        // Block comments and the package clause end the header.
        return None;
    }
    None
}

// ─── Expression evaluation ──────────────────────────────────────────────

#[derive(Clone, Debug, Eq, PartialEq)]
enum Tok {
    Tag(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Vec<Tok> {
    let bytes = expr.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' => i += 1,
            b'!' => {
                out.push(Tok::Not);
                i += 1;
            }
            b'(' => {
                out.push(Tok::LParen);
                i += 1;
            }
            b')' => {
                out.push(Tok::RParen);
                i += 1;
            }
            b'&' if bytes.get(i + 1) == Some(&b'&') => {
                out.push(Tok::And);
                i += 2;
            }
            b'|' if bytes.get(i + 1) == Some(&b'|') => {
                out.push(Tok::Or);
                i += 2;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.') {
                    i += 1;
                }
                out.push(Tok::Tag(expr[start..i].to_string()));
            }
            _ => {
                // Unknown character: poison the expression.
                out.push(Tok::RParen);
                out.push(Tok::LParen);
                i += 1;
            }
        }
    }
    out
}

struct ExprParser<'a> {
    tokens: &'a [Tok],
    pos: usize,
    ctx: &'a BuildContext,
}

impl ExprParser<'_> {
    fn or(&mut self) -> Option<bool> {
        let mut v = self.and()?;
        while self.tokens.get(self.pos) == Some(&Tok::Or) {
            self.pos += 1;
            let rhs = self.and()?;
            v = v || rhs;
        }
        Some(v)
    }

    fn and(&mut self) -> Option<bool> {
        let mut v = self.not()?;
        while self.tokens.get(self.pos) == Some(&Tok::And) {
            self.pos += 1;
            let rhs = self.not()?;
            v = v && rhs;
        }
        Some(v)
    }

    fn not(&mut self) -> Option<bool> {
        match self.tokens.get(self.pos)? {
            Tok::Not => {
                self.pos += 1;
                Some(!self.not()?)
            }
            Tok::LParen => {
                self.pos += 1;
                let v = self.or()?;
                if self.tokens.get(self.pos) != Some(&Tok::RParen) {
                    return None;
                }
                self.pos += 1;
                Some(v)
            }
            Tok::Tag(tag) => {
                self.pos += 1;
                Some(self.ctx.has_tag(tag))
            }
            Tok::And | Tok::Or | Tok::RParen => None,
        }
    }
}

#[cfg(test)]
mod tests;
