use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use git_autobackup::error::{
    EXIT_COMMITTED, EXIT_CONFLICT, EXIT_INVALID_REPOSITORY, EXIT_NO_CHANGES, EXIT_NO_SUCH_PATH,
};
use predicates::prelude::predicate;
use tempfile::tempdir;

mod support;
use support::{commit_count, dirty_repo, head_message, status_code};

#[test]
fn dirty_repository_is_committed_once() {
    let td = tempdir().unwrap();
    dirty_repo(td.path());

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .args(["--skip-cleanup", "-m", "nightly backup"])
        .assert()
        .code(status_code(EXIT_COMMITTED));
    assert_eq!(commit_count(td.path()), 1);
    assert_eq!(head_message(td.path()), "nightly backup");

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .arg("--skip-cleanup")
        .assert()
        .code(status_code(EXIT_NO_CHANGES));
    assert_eq!(commit_count(td.path()), 1);
}

#[test]
fn forced_commit_on_clean_repository() {
    let td = tempdir().unwrap();
    dirty_repo(td.path());

    for _ in 0..2 {
        cargo_bin_cmd!("git-autobackup")
            .arg("--repo")
            .arg(td.path())
            .args(["--fnc", "--force"])
            .assert()
            .code(status_code(EXIT_COMMITTED));
    }
    assert_eq!(commit_count(td.path()), 2);
    assert!(head_message(td.path()).starts_with("Autosave"));
}

#[test]
fn guesses_repository_from_working_directory() {
    let td = tempdir().unwrap();
    dirty_repo(td.path());
    let nested = td.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();

    cargo_bin_cmd!("git-autobackup")
        .current_dir(&nested)
        .arg("--skip-cleanup")
        .assert()
        .code(status_code(EXIT_COMMITTED));
    assert_eq!(commit_count(td.path()), 1);
}

#[test]
fn forced_cleanup_runs_git_gc() {
    let td = tempdir().unwrap();
    dirty_repo(td.path());

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .args(["--force-cleanup", "-q"])
        .assert()
        .code(status_code(EXIT_COMMITTED));
    assert!(td.path().join(".git/packed-refs").exists());
}

#[test]
fn plain_directory_is_not_a_repository() {
    let td = tempdir().unwrap();

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .assert()
        .code(status_code(EXIT_INVALID_REPOSITORY))
        .stderr(predicate::str::contains("not a usable repository"));
}

#[test]
fn missing_path_is_reported() {
    let td = tempdir().unwrap();

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path().join("does-not-exist"))
        .assert()
        .code(status_code(EXIT_NO_SUCH_PATH))
        .stderr(predicate::str::contains("no such path"));
}

#[test]
fn existing_tag_needs_force() {
    let td = tempdir().unwrap();
    dirty_repo(td.path());

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .args(["--fnc", "-t", "latest"])
        .assert()
        .code(status_code(EXIT_COMMITTED));

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .args(["--fnc", "--force", "-t", "latest"])
        .assert()
        .code(status_code(EXIT_CONFLICT));

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .args(["--fnc", "--force", "-t", "latest", "--force-tag"])
        .assert()
        .code(status_code(EXIT_COMMITTED));

    let repo = git2::Repository::open(td.path()).unwrap();
    let tagged = repo.find_reference("refs/tags/latest").unwrap().target();
    assert_eq!(tagged, repo.head().unwrap().target());
}

#[test]
fn log_dir_receives_log_file() {
    let td = tempdir().unwrap();
    let logs = tempdir().unwrap();
    dirty_repo(td.path());

    cargo_bin_cmd!("git-autobackup")
        .arg("--path")
        .arg(td.path())
        .arg("--fnc")
        .arg("--log-dir")
        .arg(logs.path())
        .assert()
        .code(status_code(EXIT_COMMITTED));

    let written = fs::read_dir(logs.path())
        .unwrap()
        .filter_map(Result::ok)
        .any(|e| e.file_name().to_string_lossy().starts_with("autobackup.log"));
    assert!(written, "no log file in {}", logs.path().display());
}
