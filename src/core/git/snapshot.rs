use std::path::Path;

use git2::{Commit, Status, StatusOptions};
use tracing::{debug, warn};

use super::repo::GitRepository;
use crate::error::{Error, Result};

/// Stage additions, modifications and deletions across the working tree.
///
/// A file that cannot be staged is logged and skipped instead of failing the
/// whole operation. Returns the number of skipped files.
pub fn stage_all(repo: &GitRepository) -> Result<usize> {
    let git = repo.inner();
    let mut index = git.index()?;

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);
    let statuses = git.statuses(Some(&mut opts))?;

    let mut skipped = 0usize;
    for entry in statuses.iter() {
        let Some(path) = entry.path() else {
            warn!(path = ?String::from_utf8_lossy(entry.path_bytes()), "skipping non-UTF-8 path");
            skipped += 1;
            continue;
        };
        let status = entry.status();

        let staged = if status.contains(Status::WT_DELETED) {
            index.remove_path(Path::new(path))
        } else if status.intersects(
            Status::WT_NEW | Status::WT_MODIFIED | Status::WT_TYPECHANGE | Status::WT_RENAMED,
        ) || status.contains(Status::CONFLICTED)
        {
            index.add_path(Path::new(path))
        } else {
            continue;
        };

        if let Err(e) = staged {
            warn!(path, "could not stage file, skipping: {}", e.message());
            skipped += 1;
        }
    }

    index.write()?;
    debug!(skipped, "staged working tree");
    Ok(skipped)
}

/// Commit the current index onto `HEAD`.
///
/// # Errors
/// [`Error::NothingToCommit`] when the index matches `HEAD` and
/// `allow_empty` is false.
pub fn commit(repo: &GitRepository, message: &str, allow_empty: bool) -> Result<String> {
    let git = repo.inner();
    let mut index = git.index()?;
    let tree_id = index.write_tree()?;
    let tree = git.find_tree(tree_id)?;

    let parent = repo.head_commit()?;
    let unchanged = match &parent {
        Some(head) => head.tree_id() == tree_id,
        None => tree.is_empty(),
    };
    if unchanged && !allow_empty {
        return Err(Error::NothingToCommit {
            path: repo.root().to_path_buf(),
        });
    }

    let sig = repo.signature()?;
    let parents: Vec<&Commit> = parent.iter().collect();
    let oid = git.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

    let short = git.find_object(oid, None)?.short_id()?;
    Ok(short.as_str().map_or_else(|| oid.to_string(), ToString::to_string))
}
