pub mod archive;
pub mod command;
pub mod gc;
pub mod repo;
pub mod snapshot;
pub mod tag;

use std::path::Path;

pub use repo::GitRepository;

use crate::error::Result;

/// Repository operations the backup workflow drives.
///
/// [`GitRepository`] is the production implementation; the orchestrator
/// only decides whether and how to call these.
pub trait SnapshotEngine {
    /// Tracked modifications or untracked, non-ignored files exist.
    fn is_dirty(&self) -> Result<bool>;

    /// Stage every pending change, skipping files that cannot be staged.
    /// Returns how many files were skipped.
    fn stage_all(&self) -> Result<usize>;

    /// One `XY path` line per pending change.
    fn short_status(&self) -> Result<String>;

    /// Commit the index onto `HEAD` and return the short commit id.
    fn commit(&self, message: &str, allow_empty: bool) -> Result<String>;

    /// Tag `HEAD`; a message makes the tag annotated.
    fn tag(&self, name: &str, message: Option<&str>, force: bool) -> Result<()>;

    /// Run object compaction and return whatever the engine printed.
    fn compact(&self, auto: bool, aggressive: bool) -> Result<String>;

    fn archive_formats(&self) -> Result<Vec<String>>;

    /// Default file stem for an archive of `HEAD`.
    fn archive_stem(&self) -> Result<String>;

    /// Export `HEAD` to `dest`; without a format the engine picks one.
    fn archive(&self, format: Option<&str>, dest: &Path) -> Result<()>;
}
