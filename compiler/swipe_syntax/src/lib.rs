//! Go front end: scanner, arena AST, parser, and build constraints.
//!
//! Swipe only needs enough of Go to type-check declarations and the bodies
//! of the user's packages, so the parser accepts the full statement and
//! expression grammar but keeps no information that Swipe never reads
//! (no position table per token, no object resolution).
//!
//! # Pipeline
//!
//! ```text
//! source ──► lexer::tokenize ──► Vec<Token> + CommentGroups
//!                                   │
//!                                   ▼
//!                             parser::parse_file ──► ast::File
//! ```
//!
//! Comment groups are attached the way `go/ast` does it: a *lead* group
//! ends on the line right above a declaration, spec or field; a *line*
//! group starts on the same line as the last token of the node.

pub mod ast;
pub mod build_constraint;
mod lexer;
mod lines;
pub mod literal;
mod parser;
mod token;

pub use build_constraint::{file_name_matches, BuildContext};
pub use lexer::{tokenize, Comment, CommentGroup, Lexed};
pub use lines::LineIndex;
pub use parser::{parse_file, ParseError};
pub use token::{Token, TokenKind};
