use crate::command::ProcessRunner;
use crate::reader::{LineReader, ReadError};
use crate::shell::Shell;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub const DEFAULT_PROMPT: &str = "$ ";

const INTERRUPT_HINT: &str = "To exit, press Ctrl+C again or Ctrl+D";

/// Continuation reader backed by the REPL's own line editor.
pub struct EditorReader<'a> {
    editor: &'a mut DefaultEditor,
}

impl<'a> EditorReader<'a> {
    pub fn new(editor: &'a mut DefaultEditor) -> Self {
        Self { editor }
    }
}

impl LineReader for EditorReader<'_> {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError> {
        self.editor.readline(prompt).map_err(|e| match e {
            ReadlineError::Interrupted => ReadError::Interrupted,
            ReadlineError::Eof => ReadError::Eof,
            other => ReadError::Other(other.to_string()),
        })
    }
}

/// Tracks a pending `^C` so a second one in a row ends the session.
#[derive(Debug, Default)]
struct InterruptGuard {
    armed: bool,
}

impl InterruptGuard {
    /// Returns `true` when this is the second `^C` in a row.
    fn interrupt(&mut self) -> bool {
        std::mem::replace(&mut self.armed, true)
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

/// Run the interactive loop until `^D`, two `^C` in a row, or `exit`.
///
/// Returns the status requested by `exit`, or 0.
pub fn run<R: ProcessRunner>(shell: &mut Shell<R>, prompt: &str) -> Result<i32> {
    let mut rl = DefaultEditor::new().context("Failed to create editor")?;
    let mut guard = InterruptGuard::default();

    loop {
        let line = match rl.readline(prompt) {
            Ok(line) => {
                guard.disarm();
                line
            }
            Err(ReadlineError::Interrupted) => {
                if guard.interrupt() {
                    break;
                }
                println!("{INTERRUPT_HINT}");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("Failed to read line"),
        };
        if line.is_empty() {
            continue;
        }

        if let Err(e) = rl.add_history_entry(line.as_str()) {
            tracing::warn!("Failed to add history entry: {}", e);
        }

        shell.run_line(&line, &mut EditorReader::new(&mut rl));
        if shell.should_exit() {
            return Ok(shell.exit_code());
        }
        shell.reset();
    }

    Ok(0)
}
