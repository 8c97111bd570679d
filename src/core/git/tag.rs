use git2::ObjectType;
use tracing::debug;

use super::repo::GitRepository;
use crate::error::Result;

/// Tag the commit at `HEAD`.
///
/// With a `message` the tag is annotated, otherwise lightweight. An existing
/// tag of the same name is replaced only when `force` is set; otherwise git2
/// reports an [`git2::ErrorCode::Exists`] error.
pub fn tag_head(repo: &GitRepository, name: &str, message: Option<&str>, force: bool) -> Result<()> {
    let git = repo.inner();
    let target = git.head()?.peel(ObjectType::Commit)?;

    let oid = match message {
        Some(msg) => {
            let tagger = repo.signature()?;
            git.tag(name, &target, &tagger, msg, force)?
        }
        None => git.tag_lightweight(name, &target, force)?,
    };
    debug!(name, %oid, annotated = message.is_some(), "created tag");
    Ok(())
}
