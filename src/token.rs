use std::fmt;

/// Kind of a token produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Always the last token of a successful scan.
    EndOfInput,
    /// First word of a command.
    ProgramName,
    /// Any following word of a command.
    Argument,
    /// `;`
    Semicolon,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::EndOfInput => "EOF",
            TokenKind::ProgramName => "PROGRAM_NAME",
            TokenKind::Argument => "ARGUMENT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
        }
    }
}

/// A scanned token: its kind plus the text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }

    pub fn end_of_input() -> Self {
        Self::new(TokenKind::EndOfInput, "")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind.as_str(), self.lexeme)
    }
}
