use crate::command::{ExecError, ProcessRunner};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Runs programs as child processes with the shell's stdin, stdout and stderr.
///
/// The program is resolved through `search_paths` (normally `PATH`) before spawning so
/// unknown names are reported as [`ExecError::NotFound`].
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    search_paths: Option<OsString>,
}

impl ExternalCommand {
    /// A runner searching the directories of the current `PATH`.
    pub fn new() -> Self {
        Self {
            search_paths: std::env::var_os("PATH"),
        }
    }

    /// A runner searching only `search_paths`, a `PATH`-style list.
    pub fn with_search_paths(search_paths: impl Into<OsString>) -> Self {
        Self {
            search_paths: Some(search_paths.into()),
        }
    }
}

impl Default for ExternalCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for ExternalCommand {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<(), ExecError> {
        let search_paths = self.search_paths.as_deref().unwrap_or_default();
        let executable = find_command_path(search_paths, Path::new(program)).ok_or_else(|| {
            ExecError::NotFound {
                program: program.to_string(),
            }
        })?;
        tracing::debug!(executable = %executable.display(), ?args, "spawning");

        let mut child = std::process::Command::new(&*executable)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;
        let exit_status = child.wait().map_err(ExecError::Wait)?;
        tracing::debug!(%exit_status, "child exited");

        match exit_status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ExecError::ExitStatus(code)),
            None => Err(terminated_by_signal(exit_status)),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExecError {
    use std::os::unix::process::ExitStatusExt;
    match exit_status.signal() {
        Some(signal) => ExecError::Signal(signal),
        None => ExecError::ExitStatus(-1),
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExecError {
    ExecError::ExitStatus(-1)
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing file.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| candidate.is_file())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
