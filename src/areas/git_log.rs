//! Commit loading from a git repository
//!
//! Runs the `git` binary rather than reading objects directly: the panel
//! needs parsed log entries, decorations and push state, all of which
//! `git log` and `git rev-list` already compute.

use crate::areas::commit_store::CommitLoader;
use crate::artifacts::objects::commit::{Commit, CommitStatus, LOG_FORMAT};
use crate::artifacts::objects::sha::Sha;
use anyhow::Context;
use derive_new::new;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

const MAIN_BRANCHES: [&str; 2] = ["main", "master"];

#[derive(Debug, Clone, new)]
pub struct GitLogLoader {
    repository: PathBuf,
}

impl GitLogLoader {
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    /// Fail unless the path is inside a git work tree or repository
    pub async fn ensure_repository(&self) -> anyhow::Result<()> {
        let output = self.git(&["rev-parse", "--git-dir"]).await?;
        if !output.status.success() {
            anyhow::bail!("not a git repository: {}", self.repository.display());
        }
        Ok(())
    }

    /// Load the history, newest first
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of commits; `None` loads everything
    /// * `all_branches` - Follow every ref instead of only `HEAD`
    ///
    /// # Returns
    ///
    /// The commits with their push status filled in; empty for a repository
    /// without commits
    pub async fn load_commits(
        &self,
        limit: Option<usize>,
        all_branches: bool,
    ) -> anyhow::Result<Vec<Commit>> {
        if !self.has_head().await? {
            debug!(repository = %self.repository.display(), "repository has no commits yet");
            return Ok(Vec::new());
        }

        let mut args = vec![
            "log".to_string(),
            "--topo-order".to_string(),
            format!("--format={LOG_FORMAT}"),
        ];
        if let Some(limit) = limit {
            args.push(format!("-n{limit}"));
        }
        args.push(if all_branches { "--all" } else { "HEAD" }.to_string());
        args.push("--".to_string());

        let args = args.iter().map(String::as_str).collect::<Vec<_>>();
        let stdout = self.git_stdout(&args).await?;
        let mut commits = stdout
            .lines()
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(number, line)| {
                Commit::parse_log_line(line)
                    .with_context(|| format!("invalid git log line {}", number + 1))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        self.apply_statuses(&mut commits, all_branches).await?;
        Ok(commits)
    }

    async fn apply_statuses(&self, commits: &mut [Commit], all_branches: bool) -> anyhow::Result<()> {
        let Some(unpushed) = self.unpushed().await? else {
            return Ok(());
        };
        let unmerged = self.unmerged(all_branches).await?;

        for commit in commits.iter_mut() {
            let status = if unpushed.contains(commit.sha()) {
                CommitStatus::Unpushed
            } else if unmerged
                .as_ref()
                .is_some_and(|unmerged| !unmerged.contains(commit.sha()))
            {
                CommitStatus::Merged
            } else {
                CommitStatus::Pushed
            };
            commit.set_status(status);
        }

        Ok(())
    }

    /// Commits on `HEAD` missing from its upstream; `None` without upstream
    async fn unpushed(&self) -> anyhow::Result<Option<HashSet<Sha>>> {
        let output = self.git(&["rev-list", "@{u}..HEAD"]).await?;
        if !output.status.success() {
            debug!("no upstream configured, skipping push status");
            return Ok(None);
        }

        parse_rev_list(&decode(output.stdout)?).map(Some)
    }

    /// Commits not reachable from the main branch; `None` without one
    async fn unmerged(&self, all_branches: bool) -> anyhow::Result<Option<HashSet<Sha>>> {
        let mut main_branch = None;
        for branch in MAIN_BRANCHES {
            let reference = format!("refs/heads/{branch}");
            if self.ref_exists(&reference).await? {
                main_branch = Some(reference);
                break;
            }
        }
        let Some(main_branch) = main_branch else {
            return Ok(None);
        };

        let tips = if all_branches { "--all" } else { "HEAD" };
        let stdout = self
            .git_stdout(&["rev-list", tips, "--not", main_branch.as_str()])
            .await?;
        parse_rev_list(&stdout).map(Some)
    }

    async fn has_head(&self) -> anyhow::Result<bool> {
        self.ref_exists("HEAD").await
    }

    async fn ref_exists(&self, reference: &str) -> anyhow::Result<bool> {
        let output = self
            .git(&["rev-parse", "--verify", "--quiet", reference])
            .await?;
        Ok(output.status.success())
    }

    async fn git(&self, args: &[&str]) -> anyhow::Result<Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.repository)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .context("failed to run git")
    }

    async fn git_stdout(&self, args: &[&str]) -> anyhow::Result<String> {
        let output = self.git(args).await?;
        if !output.status.success() {
            let command = args.join(" ");
            anyhow::bail!(
                "git {command} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        decode(output.stdout)
    }
}

impl CommitLoader for GitLogLoader {
    async fn load(&self, limit: Option<usize>, all_branches: bool) -> anyhow::Result<Vec<Commit>> {
        self.load_commits(limit, all_branches).await
    }
}

fn decode(bytes: Vec<u8>) -> anyhow::Result<String> {
    String::from_utf8(bytes).context("git output is not valid UTF-8")
}

fn parse_rev_list(stdout: &str) -> anyhow::Result<HashSet<Sha>> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(Sha::try_parse)
        .collect()
}
