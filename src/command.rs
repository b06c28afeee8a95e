use thiserror::Error;

/// Why an external command did not complete successfully.
///
/// Spawn failures carry the `exec: ` prefix; the error state drops it when reporting.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("exec: {program:?}: executable file not found in $PATH")]
    NotFound { program: String },
    #[error("exec: {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("wait: {0}")]
    Wait(#[source] std::io::Error),
    #[error("exit status {0}")]
    ExitStatus(i32),
    #[error("signal: {0}")]
    Signal(i32),
}

/// Object-safe trait for whatever actually launches programs for the interpreter.
///
/// The child inherits the shell's standard streams and the call blocks until it exits.
/// `Ok(())` means the program ran and exited with status 0.
pub trait ProcessRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<(), ExecError>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for Box<T> {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<(), ExecError> {
        (**self).run(program, args)
    }
}

/// Test runner that records every invocation and fails for the names it was told about.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingRunner {
    pub(crate) calls: Vec<Vec<String>>,
    failing: Vec<String>,
}

#[cfg(test)]
impl RecordingRunner {
    pub(crate) fn failing(names: &[&str]) -> Self {
        Self {
            calls: Vec::new(),
            failing: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub(crate) fn programs(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c[0].as_str()).collect()
    }
}

#[cfg(test)]
impl ProcessRunner for RecordingRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<(), ExecError> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.push(call);
        if self.failing.iter().any(|f| f == program) {
            Err(ExecError::NotFound {
                program: program.to_string(),
            })
        } else {
            Ok(())
        }
    }
}
