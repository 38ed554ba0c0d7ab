use crate::common::file::write_generated_file;
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "Fake User";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn git_repository(repository_dir: TempDir) -> TempDir {
    run_git_command(repository_dir.path(), &["init", "-b", "main"])
        .assert()
        .success();

    repository_dir
}

/// `Commit 1` .. `Commit 5` on `main`, newest last
#[fixture]
pub fn linear_repository(git_repository: TempDir) -> TempDir {
    for i in 1..=5 {
        git_commit(git_repository.path(), &format!("Commit {}", i));
    }

    git_repository
}

/// `main` and `feature` diverge after `Base` and are merged back:
///
/// ```text
/// Merge branch 'feature'
/// |\
/// | Feature work
/// Main work
/// |/
/// Base
/// ```
#[fixture]
pub fn merge_repository(git_repository: TempDir) -> TempDir {
    let dir = git_repository.path();
    git_commit(dir, "Base");
    run_git_command(dir, &["checkout", "-b", "feature"])
        .assert()
        .success();
    git_commit(dir, "Feature work");
    run_git_command(dir, &["checkout", "main"]).assert().success();
    git_commit(dir, "Main work");
    run_git_command(
        dir,
        &["merge", "--no-ff", "--no-edit", "-m", "Merge branch 'feature'", "feature"],
    )
    .assert()
    .success();

    git_repository
}

pub fn run_commit_view_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("commit-view").expect("Failed to find commit-view binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    cmd.args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", AUTHOR_NAME),
        ("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GIT_AUTHOR_DATE", AUTHOR_DATE),
        ("GIT_COMMITTER_NAME", AUTHOR_NAME),
        ("GIT_COMMITTER_EMAIL", AUTHOR_EMAIL),
        ("GIT_COMMITTER_DATE", AUTHOR_DATE),
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Change a file and commit it with `message`
pub fn git_commit(dir: &Path, message: &str) {
    let file_name = format!("{}.txt", message.replace(|c: char| !c.is_alphanumeric(), "_"));
    write_generated_file(dir, &file_name);

    run_git_command(dir, &["add", "."]).assert().success();
    run_git_command(dir, &["commit", "--allow-empty", "-m", message])
        .assert()
        .success();
}

/// Full hash of a revision
pub fn rev_parse(dir: &Path, revision: &str) -> String {
    let output = run_git_command(dir, &["rev-parse", revision])
        .output()
        .expect("Failed to run git rev-parse");

    String::from_utf8(output.stdout)
        .expect("git rev-parse printed invalid UTF-8")
        .trim()
        .to_string()
}
