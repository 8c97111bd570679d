use std::path::Path;

use super::command::run_git;
use crate::error::Result;

/// Compact repository storage with `git gc`.
///
/// With `auto` git decides whether any housekeeping is warranted; otherwise
/// a full collection always runs. `aggressive` is passed through in both
/// modes.
///
/// # Errors
/// Returns an error if git is missing or `git gc` fails.
pub fn gc(git_dir: &Path, auto: bool, aggressive: bool) -> Result<String> {
    run_git(git_dir, gc_args(auto, aggressive))
}

fn gc_args(auto: bool, aggressive: bool) -> Vec<&'static str> {
    let mut args = vec!["gc"];
    if auto {
        args.push("--auto");
    }
    if aggressive {
        args.push("--aggressive");
    }
    args
}
