use crate::token::{Token, TokenKind};
use std::fmt;

/// AST node for the shell.
///
/// A line parses into a list of these, one per `;`-separated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A single program invocation.
    Primary(PrimaryCommand),
    /// Two commands joined by `&&` or `||`.
    Logical(LogicalCommand),
}

/// A **simple command**: the program name followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryCommand {
    /// Always a `ProgramName` token.
    pub program_name: Token,
    /// `Argument` tokens in source order.
    pub arguments: Vec<Token>,
}

/// A **logical command** `left && right` or `left || right`.
///
/// Chains nest to the right: `a && b || c` is `a && (b || c)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalCommand {
    pub left: Box<Command>,
    pub operator: LogicalOperator,
    pub right: Box<Command>,
}

/// `&&` or `||`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }

    pub fn token_kind(self) -> TokenKind {
        match self {
            LogicalOperator::And => TokenKind::And,
            LogicalOperator::Or => TokenKind::Or,
        }
    }
}

impl PrimaryCommand {
    pub fn program(&self) -> &str {
        &self.program_name.lexeme
    }

    pub fn args(&self) -> Vec<&str> {
        self.arguments.iter().map(|a| a.lexeme.as_str()).collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Primary(primary) => {
                write!(f, "{}", primary.program())?;
                for argument in primary.args() {
                    write!(f, " {argument}")?;
                }
                Ok(())
            }
            Command::Logical(logical) => write!(
                f,
                "({} {} {})",
                logical.left,
                logical.operator.as_str(),
                logical.right
            ),
        }
    }
}

/// Render a statement list as `first; second`.
pub fn print_program(commands: &[Command]) -> String {
    commands
        .iter()
        .map(Command::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
