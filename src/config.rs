use std::{path::Path, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use git2::Repository;
use tracing::warn;

/// Console verbosity chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Debug,
    Trace,
}

impl Verbosity {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[must_use]
    pub const fn filter(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// When compaction runs after the commit step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupMode {
    /// Run `git gc --auto` and let git decide.
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for CleanupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" | "force" | "true" => Ok(Self::Always),
            "never" | "skip" | "false" => Ok(Self::Never),
            other => Err(format!("unknown cleanup mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupSpec {
    pub mode: CleanupMode,
    pub aggressive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub name: String,
    /// Present for annotated tags.
    pub message: Option<String>,
    /// Replace an existing tag of the same name.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    pub destinations: Vec<PathBuf>,
    pub format: Option<String>,
}

/// Everything one backup run needs, fixed before the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackupConfig {
    /// Blank or missing messages are replaced with a generated one.
    pub message: Option<String>,
    /// Commit even when nothing changed.
    pub force_commit: bool,
    pub tag: Option<TagSpec>,
    pub cleanup: CleanupSpec,
    pub archive: Option<ArchiveSpec>,
    /// Log the short status before committing.
    pub verbose: bool,
}

impl BackupConfig {
    /// Supplied message if it has content.
    #[must_use]
    pub fn commit_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Per-repository defaults sourced from git config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackupDefaults {
    /// `autobackup.cleanup`
    pub cleanup: Option<CleanupMode>,
    /// `autobackup.aggressive`
    pub aggressive: bool,
    /// `autobackup.archive-format`
    pub archive_format: Option<String>,
}

impl BackupDefaults {
    /// Load defaults with git's usual precedence: local → global → system.
    ///
    /// # Errors
    /// Returns an error if the repository or its config cannot be opened.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let repo = Repository::open(repo_root)
            .with_context(|| format!("failed to open Git repository at {}", repo_root.display()))?;
        let cfg = repo.config().context("failed to open git config")?;

        let mut out = Self::default();

        if let Ok(v) = cfg.get_string("autobackup.cleanup") {
            match v.parse() {
                Ok(mode) => out.cleanup = Some(mode),
                Err(e) => warn!("ignoring autobackup.cleanup: {e}"),
            }
        }
        if let Ok(v) = cfg.get_bool("autobackup.aggressive") {
            out.aggressive = v;
        }
        if let Ok(v) = cfg.get_string("autobackup.archive-format")
            && !v.trim().is_empty()
        {
            out.archive_format = Some(v.trim().to_string());
        }

        Ok(out)
    }
}
