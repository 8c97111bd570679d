#![allow(dead_code)]

use std::{fs, path::Path};

use git2::Repository;

/// Exit status as observed by the parent process.
pub fn status_code(code: i32) -> i32 {
    if cfg!(unix) { code & 0xff } else { code }
}

/// Init a repository with one untracked file.
pub fn dirty_repo(root: &Path) -> Repository {
    let repo = Repository::init(root).expect("git init");
    fs::write(root.join("notes.txt"), "first draft\n").expect("write file");
    repo
}

pub fn commit_count(root: &Path) -> usize {
    let repo = Repository::open(root).expect("open repo");
    let mut walk = repo.revwalk().expect("revwalk");
    if walk.push_head().is_err() {
        return 0;
    }
    walk.count()
}

pub fn head_message(root: &Path) -> String {
    let repo = Repository::open(root).expect("open repo");
    let commit = repo.head().expect("head").peel_to_commit().expect("commit");
    commit.message().unwrap_or_default().to_string()
}
