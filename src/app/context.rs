use std::path::PathBuf;

use anyhow::Result;

use crate::{
    cli::Cli,
    config::{ArchiveSpec, BackupConfig, BackupDefaults, CleanupSpec, TagSpec, Verbosity},
    core::{env::Environment, resolve::resolve_repository},
};

/// Everything a run needs once the repository has been found.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub repo_root: PathBuf,
    pub config: BackupConfig,
}

impl AppContext {
    pub const fn new(repo_root: PathBuf, config: BackupConfig) -> Self {
        Self { repo_root, config }
    }

    /// Resolve the repository named on the command line and merge its
    /// `autobackup.*` git config under the flags.
    ///
    /// # Errors
    /// Returns an error if the repository cannot be resolved or its config read.
    pub fn from_cli(cli: &Cli, env: &dyn Environment) -> Result<Self> {
        let root = resolve_repository(cli.repo_path().as_deref(), !cli.no_guess, env)?;
        let defaults = BackupDefaults::load(&root)?;
        let config = backup_config(cli, &defaults);
        Ok(Self::new(root, config))
    }
}

/// Flags win over git config defaults.
#[must_use]
pub fn backup_config(cli: &Cli, defaults: &BackupDefaults) -> BackupConfig {
    let tag = cli.tag.as_ref().map(|name| TagSpec {
        name: name.clone(),
        message: cli.tag_message.clone(),
        force: cli.force_tag,
    });

    let archive = (!cli.archive.is_empty()).then(|| ArchiveSpec {
        destinations: cli.archive.clone(),
        format: cli
            .archive_format
            .clone()
            .or_else(|| defaults.archive_format.clone()),
    });

    BackupConfig {
        message: cli.commit_message(),
        force_commit: cli.force,
        tag,
        cleanup: CleanupSpec {
            mode: cli
                .cleanup_mode()
                .or(defaults.cleanup)
                .unwrap_or_default(),
            aggressive: cli.aggressive || defaults.aggressive,
        },
        archive,
        verbose: cli.verbosity() != Verbosity::Quiet,
    }
}
