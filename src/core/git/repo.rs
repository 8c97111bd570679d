use std::path::{Path, PathBuf};

use git2::{Commit, Repository, Signature, Status, StatusOptions};

use super::{SnapshotEngine, archive, gc, snapshot, tag};
use crate::error::{Error, Result};

/// An open working-tree repository.
///
/// Owned by the backup run that opened it and released when dropped.
pub struct GitRepository {
    repo: Repository,
    root: PathBuf,
}

impl GitRepository {
    /// Open the repository rooted at `root`.
    ///
    /// # Errors
    /// [`Error::InvalidRepository`] if `root` cannot be opened or has no
    /// working tree.
    pub fn open(root: &Path) -> Result<Self> {
        let repo = Repository::open(root)
            .map_err(|e| Error::invalid_repository(root, e.message().to_string()))?;
        let root = repo
            .workdir()
            .ok_or_else(|| Error::invalid_repository(root, "repository has no working directory"))?
            .to_path_buf();
        Ok(Self { repo, root })
    }

    /// Working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.git` directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    pub(crate) const fn inner(&self) -> &Repository {
        &self.repo
    }

    /// Commit signature from git config, with a fixed identity as fallback.
    pub(crate) fn signature(&self) -> Result<Signature<'static>> {
        let cfg = self.repo.config()?;
        let name = cfg
            .get_string("user.name")
            .unwrap_or_else(|_| "git-autobackup".to_string());
        let email = cfg
            .get_string("user.email")
            .unwrap_or_else(|_| "git-autobackup@local".to_string());
        Ok(Signature::now(&name, &email)?)
    }

    /// Commit `HEAD` points at, or `None` on an unborn branch.
    pub(crate) fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => match head.target() {
                Some(oid) => Ok(Some(self.repo.find_commit(oid)?)),
                None => Ok(None),
            },
            Err(_) => Ok(None),
        }
    }

    fn pending_changes(&self) -> Result<git2::Statuses<'_>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        Ok(self.repo.statuses(Some(&mut opts))?)
    }
}

impl SnapshotEngine for GitRepository {
    fn is_dirty(&self) -> Result<bool> {
        Ok(!self.pending_changes()?.is_empty())
    }

    fn stage_all(&self) -> Result<usize> {
        snapshot::stage_all(self)
    }

    fn short_status(&self) -> Result<String> {
        let statuses = self.pending_changes()?;
        let lines: Vec<String> = statuses
            .iter()
            .map(|entry| {
                let path = entry.path().unwrap_or("<non-utf8 path>");
                let (x, y) = status_codes(entry.status());
                format!("{x}{y} {path}")
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<String> {
        snapshot::commit(self, message, allow_empty)
    }

    fn tag(&self, name: &str, message: Option<&str>, force: bool) -> Result<()> {
        tag::tag_head(self, name, message, force)
    }

    fn compact(&self, auto: bool, aggressive: bool) -> Result<String> {
        gc::gc(self.git_dir(), auto, aggressive)
    }

    fn archive_formats(&self) -> Result<Vec<String>> {
        archive::list_formats(self.git_dir())
    }

    fn archive_stem(&self) -> Result<String> {
        let name = self
            .root
            .file_name()
            .map_or_else(|| "repository".to_string(), |n| n.to_string_lossy().into_owned());
        let head = self.repo.head()?.peel_to_commit()?;
        let short = head.as_object().short_id()?;
        Ok(format!("{name}-{}", short.as_str().unwrap_or("HEAD")))
    }

    fn archive(&self, format: Option<&str>, dest: &Path) -> Result<()> {
        archive::archive_head(self.git_dir(), format, dest)
    }
}

// Two-column code as printed by `git status --short`.
fn status_codes(status: Status) -> (char, char) {
    if status.contains(Status::WT_NEW) && !status.intersects(index_flags()) {
        return ('?', '?');
    }
    if status.contains(Status::CONFLICTED) {
        return ('U', 'U');
    }

    let x = if status.contains(Status::INDEX_NEW) {
        'A'
    } else if status.contains(Status::INDEX_MODIFIED) {
        'M'
    } else if status.contains(Status::INDEX_DELETED) {
        'D'
    } else if status.contains(Status::INDEX_RENAMED) {
        'R'
    } else if status.contains(Status::INDEX_TYPECHANGE) {
        'T'
    } else {
        ' '
    };
    let y = if status.contains(Status::WT_MODIFIED) {
        'M'
    } else if status.contains(Status::WT_DELETED) {
        'D'
    } else if status.contains(Status::WT_RENAMED) {
        'R'
    } else if status.contains(Status::WT_TYPECHANGE) {
        'T'
    } else if status.contains(Status::WT_NEW) {
        '?'
    } else {
        ' '
    };
    (x, y)
}

const fn index_flags() -> Status {
    Status::INDEX_NEW
        .union(Status::INDEX_MODIFIED)
        .union(Status::INDEX_DELETED)
        .union(Status::INDEX_RENAMED)
        .union(Status::INDEX_TYPECHANGE)
}
