use std::{ffi::OsString, path::Path};

use super::command::run_git;
use crate::error::Result;

/// Archive formats git can write for this repository (`git archive --list`).
///
/// # Errors
/// Returns an error if git is missing or the listing fails.
pub fn list_formats(git_dir: &Path) -> Result<Vec<String>> {
    let out = run_git(git_dir, ["archive", "--list"])?;
    Ok(parse_format_list(&out))
}

/// Write an archive of `HEAD` to `dest`.
///
/// Without a format git infers one from the extension of `dest`, falling
/// back to tar.
///
/// # Errors
/// Returns an error if git is missing or `git archive` fails.
pub fn archive_head(git_dir: &Path, format: Option<&str>, dest: &Path) -> Result<()> {
    let mut args: Vec<OsString> = vec!["archive".into()];
    if let Some(format) = format {
        args.push(format!("--format={format}").into());
    }
    args.push("-o".into());
    args.push(dest.as_os_str().to_owned());
    args.push("HEAD".into());

    run_git(git_dir, args)?;
    Ok(())
}

fn parse_format_list(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}
