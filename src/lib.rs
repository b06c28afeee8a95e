//! A small interactive shell.
//!
//! A line goes through three stages: [`split_into_tokens`] scans it (asking a
//! [`reader::LineReader`] for more input when the line is incomplete), [`Parser`] builds a
//! list of [`Command`] trees, and [`Interpreter`] evaluates them with `;`, `&&` and `||`
//! semantics, running programs through a [`command::ProcessRunner`]. Errors from every
//! stage are collected in an [`ErrorState`].
//!
//! [`Shell`] wires the stages together for one line and [`repl::run`] drives it from an
//! interactive line editor.

mod ast;
mod builtin;
pub mod command;
mod errors;
mod external;
mod interpreter;
mod lexer;
mod parser;
pub mod reader;
pub mod repl;
mod shell;
mod token;

pub use ast::{Command, LogicalCommand, LogicalOperator, PrimaryCommand, print_program};
pub use errors::{ErrorState, Report};
pub use external::{ExternalCommand, find_command_path};
pub use interpreter::Interpreter;
pub use lexer::{LexingError, split_into_tokens};
pub use parser::Parser;
pub use shell::Shell;
pub use token::{Token, TokenKind};
