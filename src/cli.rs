use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{CleanupMode, Verbosity};

/// git-autobackup command-line interface
#[derive(Parser, Debug, Clone)]
#[command(
    name = "git-autobackup",
    version,
    about = "Commit, compact and archive a Git working tree in one scheduled run",
    long_about = None
)]
pub struct Cli {
    /// Repository, or any path inside it (guessed from the working directory if omitted)
    #[arg(
        short = 'p',
        long = "path",
        visible_aliases = ["repo", "dest"],
        short_aliases = ['d', 'r'],
        value_name = "PATH"
    )]
    pub path: Option<String>,

    /// Commit message (defaults to "Autosave on <date> <time>")
    #[arg(
        short,
        long,
        visible_alias = "commit-message",
        aliases = ["body", "cm", "name", "cn", "commit_message", "commit_name"],
        short_aliases = ['b', 'c', 'n'],
        value_name = "MESSAGE"
    )]
    pub message: Option<String>,

    /// Commit even if nothing changed
    #[arg(short, long, visible_alias = "force-commit", alias = "forcecommit")]
    pub force: bool,

    /// Tag the new commit
    #[arg(short, long, value_name = "NAME")]
    pub tag: Option<String>,

    /// Make the tag annotated with this message
    #[arg(long, requires = "tag", value_name = "MESSAGE")]
    pub tag_message: Option<String>,

    /// Move the tag if it already exists
    #[arg(long, requires = "tag")]
    pub force_tag: bool,

    /// Compact the object database even if git would skip it
    #[arg(
        long,
        visible_alias = "fc",
        alias = "forcecompress",
        conflicts_with = "skip_cleanup"
    )]
    pub force_cleanup: bool,

    /// Do not compact the object database
    #[arg(long, visible_alias = "fnc", alias = "forcenocompress")]
    pub skip_cleanup: bool,

    /// Compact aggressively (slower, smaller)
    #[arg(long, conflicts_with = "skip_cleanup")]
    pub aggressive: bool,

    /// Export HEAD to this file or directory (repeatable)
    #[arg(short, long = "archive", value_name = "PATH")]
    pub archive: Vec<PathBuf>,

    /// Archive format, as listed by `git archive --list`
    #[arg(long, requires = "archive", value_name = "FORMAT")]
    pub archive_format: Option<String>,

    /// Fail instead of guessing the repository when --path is omitted
    #[arg(long)]
    pub no_guess: bool,

    /// Increase verbosity (-v, -vv). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    /// Cleanup mode selected by flags, if any.
    #[must_use]
    pub const fn cleanup_mode(&self) -> Option<CleanupMode> {
        if self.force_cleanup {
            Some(CleanupMode::Always)
        } else if self.skip_cleanup {
            Some(CleanupMode::Never)
        } else {
            None
        }
    }

    /// `--path` with surrounding shell quotes removed.
    #[must_use]
    pub fn repo_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(|p| PathBuf::from(strip_quotes(p)))
    }

    /// `--message` with surrounding shell quotes removed.
    #[must_use]
    pub fn commit_message(&self) -> Option<String> {
        self.message.as_deref().map(|m| strip_quotes(m).to_string())
    }
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('\'').trim_matches('"')
}
