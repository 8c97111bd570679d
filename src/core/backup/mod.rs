//! The backup workflow: resolve, commit, clean up, archive.
//!
//! [`auto_backup`] resolves and then hands off to [`backup_repository`],
//! which owns the repository handle for the whole run; every step after
//! resolution is driven through [`SnapshotEngine`] by [`run_backup`].
//! Errors from any step end the run and are returned unchanged.

pub mod format;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use format::resolve_archive_format;

use super::{
    env::Environment,
    git::{GitRepository, SnapshotEngine},
    resolve::{expand_home, find_containing_directory, resolve_repository},
};
use crate::{
    config::{ArchiveSpec, BackupConfig, CleanupMode, CleanupSpec},
    error::{Error, Result},
};

const DEFAULT_MESSAGE_LABEL: &str = "Autosave";
const DEFAULT_ARCHIVE_EXTENSION: &str = "tar";

/// Steps of a backup run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Committing,
    CleaningUp,
    Archiving,
    Done,
}

fn enter(phase: Phase) {
    debug!(?phase, "backup phase");
}

/// Resolve the repository for `repo_path` and back it up.
///
/// Returns whether a commit was created.
///
/// # Errors
/// Resolution errors from [`resolve_repository`], and any failure of the
/// commit, tag, cleanup or archive steps.
pub fn auto_backup(
    repo_path: Option<&Path>,
    allow_guess: bool,
    config: &BackupConfig,
    env: &dyn Environment,
) -> Result<bool> {
    enter(Phase::Resolving);
    let root = resolve_repository(repo_path, allow_guess, env)?;
    backup_repository(&root, config)
}

/// Back up a repository root that has already been resolved and guarded.
///
/// # Errors
/// [`Error::InvalidRepository`] if `root` no longer opens as a working
/// tree, and any failure of the commit, tag, cleanup or archive steps.
pub fn backup_repository(root: &Path, config: &BackupConfig) -> Result<bool> {
    let repo = GitRepository::open(root)?;
    info!(
        path = %repo.root().display(),
        force = config.force_commit,
        "backing up repository"
    );

    run_backup(&repo, config)
}

/// Run the commit, cleanup and archive steps against an open repository.
///
/// # Errors
/// The first failing step's error; later steps do not run.
pub fn run_backup<E: SnapshotEngine + ?Sized>(engine: &E, config: &BackupConfig) -> Result<bool> {
    enter(Phase::Committing);
    let committed = commit_changes(engine, config)?;

    enter(Phase::CleaningUp);
    clean_up(engine, config.cleanup)?;

    if let Some(archive) = &config.archive {
        enter(Phase::Archiving);
        write_archives(engine, archive)?;
    }

    enter(Phase::Done);
    Ok(committed)
}

/// `"Autosave on <local time>"`, or just `"Autosave"` if the local time
/// cannot be determined.
#[must_use]
pub fn default_commit_message() -> String {
    local_timestamp().map_or_else(
        || DEFAULT_MESSAGE_LABEL.to_string(),
        |ts| format!("{DEFAULT_MESSAGE_LABEL} on {ts}"),
    )
}

fn local_timestamp() -> Option<String> {
    use time::{OffsetDateTime, macros::format_description};
    let now = OffsetDateTime::now_local().ok()?;
    now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .ok()
}

fn commit_changes<E: SnapshotEngine + ?Sized>(engine: &E, config: &BackupConfig) -> Result<bool> {
    if !config.force_commit && !engine.is_dirty()? {
        info!("working tree is clean; no commit needed");
        return Ok(false);
    }

    let skipped = engine.stage_all()?;
    if skipped > 0 {
        warn!(skipped, "some files could not be staged");
    }

    if config.verbose {
        let status = engine.short_status()?;
        if !status.is_empty() {
            info!("pending changes:\n{status}");
        }
    }

    let message = config
        .commit_message()
        .map_or_else(default_commit_message, ToString::to_string);
    let id = engine.commit(&message, config.force_commit)?;
    info!(commit = %id, message = %message, "created backup commit");

    if let Some(tag) = &config.tag {
        engine.tag(&tag.name, tag.message.as_deref(), tag.force)?;
        info!(tag = %tag.name, commit = %id, "tagged backup commit");
    }

    Ok(true)
}

fn clean_up<E: SnapshotEngine + ?Sized>(engine: &E, cleanup: CleanupSpec) -> Result<()> {
    if cleanup.mode == CleanupMode::Never {
        debug!("cleanup disabled");
        return Ok(());
    }

    let out = engine.compact(cleanup.mode == CleanupMode::Auto, cleanup.aggressive)?;
    if !out.trim().is_empty() {
        debug!("{}", out.trim());
    }
    info!(mode = ?cleanup.mode, aggressive = cleanup.aggressive, "compacted repository");
    Ok(())
}

fn write_archives<E: SnapshotEngine + ?Sized>(engine: &E, spec: &ArchiveSpec) -> Result<()> {
    if spec.destinations.is_empty() {
        return Ok(());
    }

    let format = resolve_archive_format(engine, spec.format.as_deref())?;
    for dest in &spec.destinations {
        let target = archive_target(engine, dest, format.as_deref())?;
        engine.archive(format.as_deref(), &target)?;
        info!(
            path = %target.display(),
            format = format.as_deref().unwrap_or("auto"),
            "wrote archive"
        );
    }
    Ok(())
}

// An existing directory receives a generated file name; anything else is
// taken as the archive file itself, whose directory must already exist.
fn archive_target<E: SnapshotEngine + ?Sized>(
    engine: &E,
    dest: &Path,
    format: Option<&str>,
) -> Result<PathBuf> {
    let dest = expand_home(dest);
    match find_containing_directory(Some(&dest)) {
        Some(dir) if dir == dest => {
            let ext = format.unwrap_or(DEFAULT_ARCHIVE_EXTENSION);
            Ok(dir.join(format!("{}.{ext}", engine.archive_stem()?)))
        }
        Some(_) => Ok(dest),
        None => {
            let parent = dest
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            match find_containing_directory(Some(parent)) {
                Some(dir) if dir == parent => Ok(dest),
                _ => Err(Error::NoSuchPath {
                    path: parent.to_path_buf(),
                }),
            }
        }
    }
}
