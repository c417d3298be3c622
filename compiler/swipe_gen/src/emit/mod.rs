//! Code emission helpers for generators.
//!
//! [`CodeWriter`] builds Go source line by line with tab indentation, the
//! way gofmt lays it out, so the formatter has little to change.
//! [`types`] prints IR types, registering imports as it goes.

pub mod types;

use std::fmt::{self, Write as _};

pub use types::{signature_params, signature_results, type_string, zero_value};

#[derive(Default)]
pub struct CodeWriter {
    buffer: String,
    indent: usize,
    at_line_start: bool,
}

impl CodeWriter {
    pub fn new() -> Self {
        CodeWriter {
            buffer: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Emit a text fragment, indenting it if it starts a line.
    pub fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent {
                self.buffer.push('\t');
            }
            self.at_line_start = false;
        }
        self.buffer.push_str(text);
    }

    pub fn newline(&mut self) {
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    /// Emit `text` as a complete line.
    pub fn line(&mut self, text: &str) {
        self.emit(text);
        self.newline();
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// `header {`, the body one level deeper, then `footer`.
    pub fn block(&mut self, header: &str, footer: &str, body: impl FnOnce(&mut Self)) {
        self.group(&format!("{header} {{"), footer, body);
    }

    /// Composite literal: `ty{`, the elements one level deeper, then
    /// `footer`.
    pub fn literal(&mut self, ty: &str, footer: &str, body: impl FnOnce(&mut Self)) {
        self.group(&format!("{ty}{{"), footer, body);
    }

    /// `open` as given, the body one level deeper, then `footer`. Used for
    /// argument lists split over several lines.
    pub fn group(&mut self, open: &str, footer: &str, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(footer);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Output with trailing blank lines trimmed to a single newline.
    pub fn finish(mut self) -> String {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.finish().into_bytes()
    }

    /// Lets `write!` target a writer directly; writing to a `String` cannot
    /// fail.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::Write::write_fmt(self, args);
    }
}

impl fmt::Write for CodeWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n').peekable();
        while let Some(part) = lines.next() {
            self.emit(part);
            if lines.peek().is_some() {
                self.newline();
            }
        }
        Ok(())
    }
}

/// `writeln!` for a [`CodeWriter`].
#[macro_export]
macro_rules! w {
    ($w:expr) => {
        $w.newline()
    };
    ($w:expr, $($arg:tt)*) => {{
        $w.write_fmt(format_args!($($arg)*));
        $w.newline();
    }};
}

/// Go string literal for `s`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests;
