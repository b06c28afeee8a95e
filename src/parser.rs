use crate::ast::{Command, LogicalCommand, LogicalOperator, PrimaryCommand};
use crate::token::{Token, TokenKind};

/// Recursive-descent parser over a scanned token sequence.
///
/// ```text
/// program   := statement* EOF
/// statement := logical ';'?
/// logical   := primary ( ('&&' | '||') logical )?
/// primary   := PROGRAM_NAME ARGUMENT*
/// ```
///
/// Parsing never fails: tokens that cannot start a command are skipped, and an operator
/// missing one of its operands collapses to the operand that is present.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parse every statement up to the end-of-input token.
    pub fn parse(mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        while !self.is_at_end() {
            if let Some(command) = self.statement() {
                commands.push(command);
            }
        }
        tracing::debug!(statements = commands.len(), "parsed");
        commands
    }

    fn statement(&mut self) -> Option<Command> {
        let command = self.logical();
        self.match_kind(&[TokenKind::Semicolon]);
        command
    }

    /// Parse a logical chain: primary (('&&' | '||') logical)?
    fn logical(&mut self) -> Option<Command> {
        let left = self.primary();
        if left.is_none() {
            // Make progress past a token that cannot start a command.
            self.advance();
        }

        let Some(operator) = self.match_operator() else {
            return left;
        };
        let right = self.logical();

        match (left, right) {
            (Some(left), Some(right)) => Some(Command::Logical(LogicalCommand {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            })),
            (left, None) => left,
            (None, right) => right,
        }
    }

    /// Parse a simple command: PROGRAM_NAME ARGUMENT*
    fn primary(&mut self) -> Option<Command> {
        let program_name = self.match_kind(&[TokenKind::ProgramName])?;
        let mut arguments = Vec::new();
        while let Some(argument) = self.match_kind(&[TokenKind::Argument]) {
            arguments.push(argument);
        }
        Some(Command::Primary(PrimaryCommand {
            program_name,
            arguments,
        }))
    }

    /// Consume and return the current token if its kind is one of `kinds`.
    fn match_kind(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        let token = self.peek().filter(|t| kinds.contains(&t.kind))?.clone();
        self.pos += 1;
        Some(token)
    }

    /// Consume the current token if it is `&&` or `||`.
    fn match_operator(&mut self) -> Option<LogicalOperator> {
        let operator = match self.peek()?.kind {
            TokenKind::And => LogicalOperator::And,
            TokenKind::Or => LogicalOperator::Or,
            _ => return None,
        };
        self.pos += 1;
        Some(operator)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// The current token; `None` once the end-of-input token is reached.
    fn peek(&self) -> Option<&Token> {
        self.tokens
            .get(self.pos)
            .filter(|t| t.kind != TokenKind::EndOfInput)
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_none()
    }
}
