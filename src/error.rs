use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use git2::ErrorCode;

/// Exit code when a commit was created.
pub const EXIT_COMMITTED: i32 = 0;
/// Exit code when the run succeeded but nothing needed committing.
pub const EXIT_NO_CHANGES: i32 = 1;
pub const EXIT_ENGINE_MISSING: i32 = -1;
pub const EXIT_NO_SUCH_PATH: i32 = -2;
pub const EXIT_INVALID_REPOSITORY: i32 = -3;
pub const EXIT_CONFLICT: i32 = -4;
pub const EXIT_INVALID_ARCHIVE_FORMAT: i32 = -5;
pub const EXIT_INSECURE_REPOSITORY: i32 = -6;
pub const EXIT_FAILURE: i32 = -7;

// stderr fragments git prints when another process holds the repository
const LOCK_CONTENTION_MARKERS: [&str; 3] = [
    ".lock': File exists",
    "gc is already running",
    "Another git process seems to be running",
];

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures raised while resolving a repository or running a backup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no repository path was given and none could be guessed")]
    NoPath,

    /// An empty `path` means none was supplied.
    #[error("no such path: {}", describe_path(path))]
    NoSuchPath { path: PathBuf },

    #[error("not a usable repository: {} ({reason})", path.display())]
    InvalidRepository { path: PathBuf, reason: String },

    /// Never downgraded to `false` by [`crate::core::guard::is_repository`].
    #[error("refusing to use insecure repository {}: {reason}", path.display())]
    InsecureRepository { path: PathBuf, reason: String },

    #[error(
        "invalid archive format '{format}', expected one of: {}",
        valid.join(", ")
    )]
    InvalidArchiveFormat { format: String, valid: Vec<String> },

    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git executable not found; is git installed and on PATH?")]
    EngineMissing {
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Engine {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("nothing to commit in {}", path.display())]
    NothingToCommit { path: PathBuf },

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_path(path: &Path) -> Cow<'_, str> {
    if path.as_os_str().is_empty() {
        Cow::Borrowed("<none given>")
    } else {
        path.to_string_lossy()
    }
}

fn is_lock_contention(stderr: &str) -> bool {
    LOCK_CONTENTION_MARKERS
        .iter()
        .any(|marker| stderr.contains(marker))
}

impl Error {
    pub(crate) fn invalid_repository(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRepository {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Failure classes the boolean repository check treats as "not a repository".
    #[must_use]
    pub const fn is_not_a_repository(&self) -> bool {
        matches!(
            self,
            Self::InvalidRepository { .. } | Self::NoSuchPath { .. } | Self::PermissionDenied { .. }
        )
    }

    /// Process exit code for this failure class.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EngineMissing { .. } => EXIT_ENGINE_MISSING,
            Self::NoPath | Self::NoSuchPath { .. } | Self::PermissionDenied { .. } => {
                EXIT_NO_SUCH_PATH
            }
            Self::InvalidRepository { .. } => EXIT_INVALID_REPOSITORY,
            Self::NothingToCommit { .. } => EXIT_CONFLICT,
            Self::InvalidArchiveFormat { .. } => EXIT_INVALID_ARCHIVE_FORMAT,
            Self::InsecureRepository { .. } => EXIT_INSECURE_REPOSITORY,
            Self::Git(err) => match err.code() {
                ErrorCode::Locked
                | ErrorCode::Exists
                | ErrorCode::Conflict
                | ErrorCode::MergeConflict
                | ErrorCode::Uncommitted => EXIT_CONFLICT,
                _ => EXIT_FAILURE,
            },
            Self::Io(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                EXIT_NO_SUCH_PATH
            }
            Self::Engine { stderr, .. } if is_lock_contention(stderr) => EXIT_CONFLICT,
            Self::Engine { .. } | Self::Io(_) => EXIT_FAILURE,
        }
    }
}
