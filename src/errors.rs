use crossterm::style::Stylize;
use std::fmt;

/// Prefix for the known, redundant part of process-execution error messages.
const EXEC_PREFIX: &str = "exec: ";

/// How recorded messages are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Report {
    /// Record only.
    #[default]
    Silent,
    /// Print `simp-shell: <message>` to stderr.
    Plain,
    /// Like `Plain`, in red.
    Colored,
}

/// Error accumulator shared by the scanner, the interpreter and the driving loop.
///
/// The state lives for a whole session:
/// - `had_error`: the current line (or statement) hit a lexical error, a failed command
///   or the `exit` builtin.
/// - `had_interpreter_error`: the most recent command failed to run or exited non-zero.
/// - `had_exit_error`: `exit` fired; the session should terminate.
/// - `messages`: human-readable messages recorded since the last clear, in order.
#[derive(Debug, Clone, Default)]
pub struct ErrorState {
    pub had_error: bool,
    pub had_interpreter_error: bool,
    pub had_exit_error: bool,
    pub messages: Vec<String>,
    /// Status requested by `exit`; 0 unless `exit` was given one.
    pub exit_status: i32,
    report: Report,
}

impl ErrorState {
    pub fn new(report: Report) -> Self {
        Self {
            report,
            ..Self::default()
        }
    }

    /// A command failed; the `exec: ` prefix is dropped from the message.
    pub fn interpreter_error(&mut self, message: &str) {
        let message = message.strip_prefix(EXEC_PREFIX).unwrap_or(message);
        self.had_interpreter_error = true;
        self.record(message.to_string());
    }

    /// Raised by the `exit` builtin.
    pub fn exit_error(&mut self, status: i32) {
        self.had_exit_error = true;
        self.had_error = true;
        self.exit_status = status;
    }

    /// Record an already formatted message as an error.
    pub fn record(&mut self, message: String) {
        tracing::debug!(%message, "error recorded");
        self.had_error = true;
        match self.report {
            Report::Silent => {}
            Report::Plain => eprintln!("simp-shell: {message}"),
            Report::Colored => eprintln!("{}", format!("simp-shell: {message}").red()),
        }
        self.messages.push(message);
    }

    /// Clear the per-statement part of the state: `had_error` and the messages.
    pub fn clear_transient(&mut self) {
        self.had_error = false;
        self.messages.clear();
    }

    /// Return to the freshly constructed state, keeping only the reporting mode.
    pub fn reset(&mut self) {
        *self = Self::new(self.report);
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("\n"))
    }
}
