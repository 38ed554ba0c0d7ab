//! The commits panel and what it talks to
//!
//! - `config`: Panel settings (case policy, graph mode, paging)
//! - `gui_state`: Snapshot of the host UI state taken before each render
//! - `list_context`: Generic filterable, navigable list controller
//! - `commit_store`: Where commits come from, with lazy paging
//! - `git_log`: Loading commits from a repository with the `git` binary
//! - `local_commits`: The commits panel itself

pub mod commit_store;
pub mod config;
pub mod git_log;
pub mod gui_state;
pub mod list_context;
pub mod local_commits;
