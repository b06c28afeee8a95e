use crate::ast::{Command, print_program};
use crate::command::ProcessRunner;
use crate::errors::{ErrorState, Report};
use crate::external::ExternalCommand;
use crate::interpreter::Interpreter;
use crate::lexer::split_into_tokens;
use crate::parser::Parser;
use crate::reader::LineReader;

/// Runs lines through the scan, parse and evaluate pipeline against one session state.
pub struct Shell<R = ExternalCommand> {
    interpreter: Interpreter<R>,
    errors: ErrorState,
    dump_ast: bool,
}

impl Shell<ExternalCommand> {
    pub fn new(report: Report) -> Self {
        Self::with_runner(ExternalCommand::new(), report)
    }
}

impl<R: ProcessRunner> Shell<R> {
    pub fn with_runner(runner: R, report: Report) -> Self {
        Self {
            interpreter: Interpreter::new(runner),
            errors: ErrorState::new(report),
            dump_ast: false,
        }
    }

    /// Print each parsed line to stdout before running it.
    pub fn dump_ast(mut self, enabled: bool) -> Self {
        self.dump_ast = enabled;
        self
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn runner(&self) -> &R {
        self.interpreter.runner()
    }

    /// Scan, parse and evaluate one line.
    ///
    /// A lexical or continuation error is recorded and nothing from the line runs.
    pub fn run_line(&mut self, line: &str, reader: &mut dyn LineReader) {
        let tokens = match split_into_tokens(line, reader) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.errors.record(e.to_string());
                return;
            }
        };

        let commands: Vec<Command> = Parser::new(tokens).parse();
        tracing::debug!(ast = %print_program(&commands), "evaluating");
        if self.dump_ast {
            println!("{}", print_program(&commands));
        }
        self.interpreter.interpret(&commands, &mut self.errors);
    }

    /// `exit` ran; the session should end.
    pub fn should_exit(&self) -> bool {
        self.errors.had_exit_error
    }

    /// Process exit code for a finished non-interactive run.
    pub fn exit_code(&self) -> i32 {
        if self.errors.had_exit_error {
            self.errors.exit_status
        } else if self.errors.had_error || self.errors.had_interpreter_error {
            1
        } else {
            0
        }
    }

    /// Forget everything from the previous line.
    pub fn reset(&mut self) {
        self.errors.reset();
    }
}
