//! The [`Diagnostic`] value and its [`ErrorKind`].

use std::fmt;

use swipe_ir::Position;

/// Error taxonomy shared by every stage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorKind {
    /// DSL misuse: missing option, wrong argument shape, bad path template.
    Config,
    /// Package lister or type checker failure, missing module, no packages.
    Load,
    /// Unresolvable argument expression or unexpected syntax in a DSL call.
    Decode,
    /// Type graph inconsistency.
    Find,
    /// A generator failed; other generators still ran.
    Generate,
    /// Formatter spawn or output failure.
    Format,
    /// Write failures and `.gitattributes` corruption.
    Io,
    Cancelled,
    /// Non-fatal.
    Warn,
}

impl ErrorKind {
    pub fn is_fatal(self) -> bool {
        self != ErrorKind::Warn
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Load => "load",
            ErrorKind::Decode => "decode",
            ErrorKind::Find => "find",
            ErrorKind::Generate => "generate",
            ErrorKind::Format => "format",
            ErrorKind::Io => "io",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Warn => "warning",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reportable problem.
///
/// Displays as `file:line:col: message` when the position is known.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("{}{message}", position_prefix(.pos.as_ref()))]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub pos: Option<Position>,
}

fn position_prefix(pos: Option<&Position>) -> String {
    pos.map(|p| format!("{p}: ")).unwrap_or_default()
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            pos: None,
        }
    }

    #[must_use]
    pub fn at(mut self, pos: Position) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub fn at_opt(mut self, pos: Option<Position>) -> Self {
        if pos.is_some() {
            self.pos = pos;
        }
        self
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Load, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn find(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Find, message)
    }

    pub fn generate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generate, message)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation cancelled")
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Warn, message)
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

#[cfg(test)]
mod tests;
