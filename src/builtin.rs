use crate::errors::ErrorState;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::io::Write;

/// Commands the shell runs in-process instead of spawning a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Exit,
}

impl Builtin {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            n if n == Exit::name() => Some(Builtin::Exit),
            _ => None,
        }
    }

    /// Parse `args` for this builtin and run it.
    ///
    /// Usage errors are recorded as interpreter errors; `--help` output goes to `stdout`.
    pub(crate) fn run(self, args: &[&str], stdout: &mut dyn Write, errors: &mut ErrorState) {
        let outcome = match self {
            Builtin::Exit => invoke::<Exit>(args, stdout, errors),
        };
        if let Err(e) = outcome {
            errors.interpreter_error(&format!("{e:#}"));
        }
    }
}

/// A builtin with an `argh` command line.
trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "exit".
    fn name() -> &'static str;

    fn execute(self, stdout: &mut dyn Write, errors: &mut ErrorState) -> Result<()>;
}

fn invoke<T: BuiltinCommand>(
    args: &[&str],
    stdout: &mut dyn Write,
    errors: &mut ErrorState,
) -> Result<()> {
    match T::from_args(&[T::name()], args) {
        Ok(command) => command.execute(stdout, errors),
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => {
            stdout.write_all(output.as_bytes())?;
            Ok(())
        }
        Err(EarlyExit {
            output,
            status: Err(()),
        }) => {
            tracing::debug!(command = T::name(), %output, "usage error");
            Err(anyhow::anyhow!("{}: {}", T::name(), output.trim_end()))
        }
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub(crate) struct Exit {
    #[argh(positional)]
    /// exit status of the shell; 0 when omitted.
    pub status: Option<i32>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, errors: &mut ErrorState) -> Result<()> {
        errors.exit_error(self.status.unwrap_or(0));
        Ok(())
    }
}
