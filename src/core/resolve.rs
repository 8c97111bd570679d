//! Turning a possibly-absent path into a repository root.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{
    env::Environment,
    guard::{assert_repository, is_repository},
};
use crate::error::{Error, Result};

/// Replace a leading `~` with the user's home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Nearest existing directory at or above `path`.
///
/// Returns `None` when `path` is `None`, when nothing exists at `path`, or
/// when no ancestor is a directory.
#[must_use]
pub fn find_containing_directory(path: Option<&Path>) -> Option<PathBuf> {
    let path = expand_home(path?);
    if !path.exists() {
        return None;
    }

    let mut current = path.as_path();
    while !current.is_dir() {
        // a bare relative name like `notes.txt` has `""` as its parent
        current = match current.parent()? {
            p if !p.as_os_str().is_empty() => p,
            _ if current == Path::new(".") => return None,
            _ => Path::new("."),
        };
    }
    Some(current.to_path_buf())
}

/// First usable starting point: the working directory, then the path the
/// program was invoked as, then the running executable.
#[must_use]
pub fn default_location(env: &dyn Environment) -> Option<PathBuf> {
    let probes = [
        ("current dir", env.current_dir()),
        ("argv[0]", env.invoked_as()),
        ("executable", env.entry_point()),
    ];
    probes.into_iter().find_map(|(source, candidate)| {
        let found = find_containing_directory(candidate.as_deref())?;
        debug!(source, path = %found.display(), "guessed default location");
        Some(found)
    })
}

/// Resolve `candidate` (or a guessed default) to the root of the nearest
/// enclosing non-bare repository.
///
/// Every directory visited on the way up goes through [`is_repository`], so
/// an insecure directory anywhere on the walk aborts resolution.
///
/// # Errors
/// - [`Error::NoPath`] when no candidate is given and none can be guessed.
/// - [`Error::NoSuchPath`] when the candidate does not exist.
/// - [`Error::InvalidRepository`] when no enclosing repository exists.
/// - [`Error::InsecureRepository`] from the guard, unchanged.
pub fn resolve_repository(
    candidate: Option<&Path>,
    allow_guess: bool,
    env: &dyn Environment,
) -> Result<PathBuf> {
    let candidate = match candidate {
        Some(path) => Some(path.to_path_buf()),
        None if allow_guess => default_location(env),
        None => None,
    };
    let candidate = expand_home(&candidate.ok_or(Error::NoPath)?);

    if !candidate.exists() {
        return Err(Error::NoSuchPath { path: candidate });
    }
    let mut current = dunce::canonicalize(&candidate)?;

    while !is_repository(Some(&current), false, env)? {
        let Some(parent) = current.parent() else {
            break;
        };
        current = parent.to_path_buf();
    }

    assert_repository(Some(&current), false, env)?;
    debug!(path = %current.display(), "resolved repository root");
    Ok(current)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use git2::Repository;

    use super::*;
    use crate::core::env::testing::FakeEnvironment;

    #[test]
    fn existing_directory_is_returned_unchanged() {
        let td = tempfile::tempdir().unwrap();
        let nested = td.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_containing_directory(Some(td.path())), Some(td.path().to_path_buf()));
        assert_eq!(find_containing_directory(Some(&nested)), Some(nested));
    }

    #[test]
    fn file_resolves_to_its_directory() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("report.txt");
        fs::write(&file, "x").unwrap();

        assert_eq!(find_containing_directory(Some(&file)), Some(td.path().to_path_buf()));
    }

    #[test]
    fn bare_relative_file_resolves_to_working_directory() {
        // unit tests run from the package root
        assert_eq!(
            find_containing_directory(Some(Path::new("Cargo.toml"))),
            Some(PathBuf::from("."))
        );
        assert_eq!(find_containing_directory(Some(Path::new("no-such-file.txt"))), None);
    }

    #[test]
    fn missing_or_absent_path_is_none() {
        let td = tempfile::tempdir().unwrap();
        assert_eq!(find_containing_directory(Some(&td.path().join("missing/deeper"))), None);
        assert_eq!(find_containing_directory(None), None);
    }

    #[test]
    fn home_shorthand_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home(Path::new("~")), home);
        assert_eq!(expand_home(Path::new("~/docs")), home.join("docs"));
        assert_eq!(expand_home(Path::new("/srv/~x")), PathBuf::from("/srv/~x"));
    }

    #[test]
    fn walks_up_from_any_depth() {
        let td = tempfile::tempdir().unwrap();
        Repository::init(td.path()).unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        let env = FakeEnvironment::unix();

        let mut dir = root.clone();
        for depth in 0..6 {
            dir = dir.join(format!("level{depth}"));
            fs::create_dir_all(&dir).unwrap();
            assert_eq!(resolve_repository(Some(&dir), false, &env).unwrap(), root);
        }

        let file = dir.join("leaf.txt");
        fs::write(&file, "x").unwrap();
        assert_eq!(resolve_repository(Some(&file), false, &env).unwrap(), root);
    }

    #[test]
    fn absent_path_without_guessing_is_no_path() {
        let err = resolve_repository(None, false, &FakeEnvironment::unix()).unwrap_err();
        assert!(matches!(err, Error::NoPath), "{err}");
    }

    #[test]
    fn nothing_to_guess_is_no_path() {
        let err = resolve_repository(None, true, &FakeEnvironment::unix()).unwrap_err();
        assert!(matches!(err, Error::NoPath), "{err}");
    }

    #[test]
    fn missing_candidate_is_no_such_path() {
        let td = tempfile::tempdir().unwrap();
        let err =
            resolve_repository(Some(&td.path().join("gone")), false, &FakeEnvironment::unix())
                .unwrap_err();
        assert!(matches!(err, Error::NoSuchPath { .. }), "{err}");
    }

    #[test]
    fn guesses_from_current_dir() {
        let td = tempfile::tempdir().unwrap();
        Repository::init(td.path()).unwrap();
        let sub = td.path().join("src");
        fs::create_dir(&sub).unwrap();

        let env = FakeEnvironment {
            current_dir: Some(sub),
            ..FakeEnvironment::unix()
        };
        let root = resolve_repository(None, true, &env).unwrap();
        assert_eq!(root, dunce::canonicalize(td.path()).unwrap());
    }

    #[test]
    fn probe_order_is_first_match_wins() {
        let td = tempfile::tempdir().unwrap();
        let first = td.path().join("first");
        let second = td.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        let exe = second.join("tool");
        fs::write(&exe, "").unwrap();

        let env = FakeEnvironment {
            current_dir: Some(td.path().join("vanished")),
            invoked_as: Some(exe),
            entry_point: Some(first),
            ..FakeEnvironment::unix()
        };
        assert_eq!(default_location(&env), Some(second));

        assert_eq!(default_location(&FakeEnvironment::unix()), None);
    }

    #[test]
    fn insecure_ancestor_aborts_resolution() {
        let td = tempfile::tempdir().unwrap();
        Repository::init(td.path()).unwrap();
        let sub = td.path().join("tools");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("git.bat"), "").unwrap();

        let err = resolve_repository(Some(&sub), false, &FakeEnvironment::windows()).unwrap_err();
        assert!(matches!(err, Error::InsecureRepository { .. }), "{err}");
    }
}
