//! Validation of candidate repository paths.
//!
//! [`assert_repository`] reports exactly why a path cannot be used, while
//! [`is_repository`] folds the ordinary "not a repository" outcomes into
//! `Ok(false)`. An [`Error::InsecureRepository`] is never folded: it always
//! reaches the caller.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use git2::Repository;
use tracing::{debug, warn};

use super::env::Environment;
use crate::error::{Error, Result};

const ENGINE_NAME: &str = "git";
const EXECUTABLE_SUFFIXES: [&str; 4] = [".exe", ".com", ".bat", ".cmd"];

/// Fail unless `path` opens as a repository (non-bare unless `allow_bare`).
///
/// # Errors
/// - [`Error::NoSuchPath`] when `path` is `None` or nothing exists there.
/// - [`Error::PermissionDenied`] when the path cannot be inspected.
/// - [`Error::InvalidRepository`] when the path is not a directory or
///   `*.git` path, cannot be opened, or is bare and bare is not allowed.
/// - [`Error::InsecureRepository`] when the directory holds a file that
///   would shadow the git executable on this platform.
pub fn assert_repository(path: Option<&Path>, allow_bare: bool, env: &dyn Environment) -> Result<()> {
    let path = path.ok_or_else(|| Error::NoSuchPath {
        path: PathBuf::new(),
    })?;

    if !exists(path)? {
        return Err(Error::NoSuchPath {
            path: path.to_path_buf(),
        });
    }

    let is_dir = path.is_dir();
    if !(is_dir || path.to_string_lossy().ends_with(".git")) {
        return Err(Error::invalid_repository(
            path,
            "neither a directory nor a .git path",
        ));
    }

    if is_dir && env.platform().resolves_executables_from_cwd() {
        check_engine_shadowing(path)?;
    }

    let repo = Repository::open(path)
        .map_err(|e| Error::invalid_repository(path, e.message().to_string()))?;
    if !allow_bare && repo.is_bare() {
        return Err(Error::invalid_repository(path, "repository is bare"));
    }

    Ok(())
}

/// Boolean form of [`assert_repository`].
///
/// # Errors
/// Returns every failure other than the "not a repository" kinds, in
/// particular [`Error::InsecureRepository`].
pub fn is_repository(path: Option<&Path>, allow_bare: bool, env: &dyn Environment) -> Result<bool> {
    match assert_repository(path, allow_bare, env) {
        Ok(()) => Ok(true),
        Err(err) if err.is_not_a_repository() => {
            debug!(path = ?path, "not a repository: {err}");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

fn exists(path: &Path) -> Result<bool> {
    path.try_exists().map_err(|source| permission_or_io(path, source))
}

fn permission_or_io(path: &Path, source: io::Error) -> Error {
    if source.kind() == io::ErrorKind::PermissionDenied {
        Error::PermissionDenied {
            path: path.to_path_buf(),
            source,
        }
    } else {
        Error::Io(source)
    }
}

// Windows resolves a bare `git` against the working directory before PATH,
// so a file named like the engine inside the repository would run instead.
fn check_engine_shadowing(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| permission_or_io(dir, e))?;

    let mut offenders = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| permission_or_io(dir, e))?;
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !is_engine_name(&name) {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        offenders.push(name);
    }

    if offenders.is_empty() {
        return Ok(());
    }

    warn!(dir = %dir.display(), ?offenders, "repository contains a git executable lookalike");
    Err(Error::InsecureRepository {
        path: dir.to_path_buf(),
        reason: format!(
            "{} could shadow the system git executable",
            offenders.join(", ")
        ),
    })
}

fn is_engine_name(lowercase_name: &str) -> bool {
    lowercase_name == ENGINE_NAME
        || EXECUTABLE_SUFFIXES
            .iter()
            .any(|suffix| lowercase_name.strip_suffix(suffix) == Some(ENGINE_NAME))
}
