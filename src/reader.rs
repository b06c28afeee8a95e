//! The continuation-line collaborator used by the scanner.

use thiserror::Error;

/// Prompt used when a line ends with a backslash.
pub const CONTINUATION_PROMPT: &str = ">";
/// Prompt used when a line ends with `&&`.
pub const AND_PROMPT: &str = "cmdand>";
/// Prompt used when a line ends with `||`.
pub const OR_PROMPT: &str = "cmdor>";

/// Failure to obtain a continuation line. Always fatal to the current scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("reader: ^C pressed")]
    Interrupted,
    #[error("reader: end of input")]
    Eof,
    #[error("reader: {0}")]
    Other(String),
}

/// Source of additional input lines for commands spanning several lines.
pub trait LineReader {
    /// Show `prompt` and block until a line (or an error) is available.
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError>;
}

/// Reader for non-interactive input: there is never another line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContinuation;

impl LineReader for NoContinuation {
    fn read_line(&mut self, _prompt: &str) -> Result<String, ReadError> {
        Err(ReadError::Eof)
    }
}

/// Test reader replaying a fixed list of replies and recording the prompts it was shown.
///
/// `"^C"` replays as [`ReadError::Interrupted`]; running out of replies yields [`ReadError::Eof`].
#[cfg(test)]
pub(crate) struct ScriptedReader {
    replies: std::collections::VecDeque<String>,
    pub(crate) prompts: Vec<String>,
}

#[cfg(test)]
impl ScriptedReader {
    pub(crate) fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|s| s.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

#[cfg(test)]
impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError> {
        self.prompts.push(prompt.to_string());
        match self.replies.pop_front() {
            Some(reply) if reply == "^C" => Err(ReadError::Interrupted),
            Some(reply) => Ok(reply),
            None => Err(ReadError::Eof),
        }
    }
}
