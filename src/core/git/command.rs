use std::{
    ffi::OsStr,
    io,
    path::Path,
    process::{Command, Output},
};

use tracing::debug;

use crate::error::{Error, Result};

/// Run the git executable against `git_dir` and return its stdout.
///
/// # Errors
/// [`Error::EngineMissing`] when git is not installed, [`Error::Engine`]
/// when it exits unsuccessfully.
pub fn run_git<I, S>(git_dir: &Path, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let rendered = std::iter::once("git".to_string())
        .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ");
    debug!(git_dir = %git_dir.display(), command = %rendered, "running git");

    let output = Command::new("git")
        .arg(format!("--git-dir={}", git_dir.to_string_lossy()))
        .args(&args)
        .output()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::EngineMissing { source },
            _ => Error::Io(source),
        })?;

    check_status(&rendered, &output)?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        debug!(command = %rendered, "{}", stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn check_status(command: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(Error::Engine {
        command: command.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
