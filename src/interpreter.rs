use crate::ast::{Command, LogicalCommand, LogicalOperator, PrimaryCommand};
use crate::builtin::Builtin;
use crate::command::ProcessRunner;
use crate::errors::ErrorState;
use crate::external::ExternalCommand;

/// Tree-walking evaluator for parsed statement lists.
///
/// Builtins run in-process; every other command goes to the [`ProcessRunner`]. Failures
/// are recorded into the [`ErrorState`] passed to [`Interpreter::interpret`] and never
/// abort the walk, except for `exit`, which stops the remaining statements.
///
/// Example
/// ```no_run
/// use simp_shell::{ErrorState, ExternalCommand, Interpreter, Parser, Report, split_into_tokens};
/// use simp_shell::reader::NoContinuation;
///
/// let tokens = split_into_tokens("true && echo ok", &mut NoContinuation).unwrap();
/// let mut errors = ErrorState::new(Report::Plain);
/// let mut interpreter = Interpreter::new(ExternalCommand::new());
/// interpreter.interpret(&Parser::new(tokens).parse(), &mut errors);
/// assert!(!errors.had_interpreter_error);
/// ```
pub struct Interpreter<R = ExternalCommand> {
    runner: R,
}

impl Default for Interpreter<ExternalCommand> {
    fn default() -> Self {
        Self::new(ExternalCommand::new())
    }
}

impl<R: ProcessRunner> Interpreter<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Evaluate each statement in order.
    ///
    /// After every statement the transient error state is cleared, so a failure in one
    /// statement does not affect the next. A top-level `||` that ended without an error
    /// also clears `had_interpreter_error`.
    pub fn interpret(&mut self, commands: &[Command], errors: &mut ErrorState) {
        for command in commands {
            self.evaluate(command, errors);

            let is_or =
                matches!(command, Command::Logical(l) if l.operator == LogicalOperator::Or);
            if is_or && !errors.had_error {
                errors.had_interpreter_error = false;
            }

            if errors.had_exit_error {
                tracing::debug!(status = errors.exit_status, "exit requested");
                break;
            }
            errors.clear_transient();
        }
    }

    fn evaluate(&mut self, command: &Command, errors: &mut ErrorState) {
        match command {
            Command::Primary(primary) => self.evaluate_primary(primary, errors),
            Command::Logical(logical) => self.evaluate_logical(logical, errors),
        }
    }

    fn evaluate_logical(&mut self, command: &LogicalCommand, errors: &mut ErrorState) {
        self.evaluate(&command.left, errors);
        match command.operator {
            LogicalOperator::And => {
                if errors.had_error {
                    return;
                }
            }
            LogicalOperator::Or => {
                // `exit` on the left is not a failure `||` can recover from.
                if !errors.had_error || errors.had_exit_error {
                    return;
                }
                errors.clear_transient();
            }
        }
        self.evaluate(&command.right, errors);
    }

    fn evaluate_primary(&mut self, command: &PrimaryCommand, errors: &mut ErrorState) {
        let program = command.program();
        let args = command.args();
        tracing::debug!(program, ?args, "dispatch");

        if let Some(builtin) = Builtin::from_name(program) {
            builtin.run(&args, &mut std::io::stdout(), errors);
            return;
        }

        if let Err(e) = self.runner.run(program, &args) {
            tracing::debug!(program, error = %e, "command failed");
            errors.interpreter_error(&e.to_string());
        }
    }
}
