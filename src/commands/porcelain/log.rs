use crate::areas::commit_store::PagedCommitStore;
use crate::areas::config::{GraphMode, ViewConfig};
use crate::areas::git_log::GitLogLoader;
use crate::areas::gui_state::{GuiSnapshot, ScreenMode};
use crate::areas::local_commits::LocalCommitsContext;
use crate::artifacts::core::columns::align_columns;
use crate::artifacts::log::bisect::{BisectInfo, BisectVerdict};
use crate::artifacts::log::filter::CaseSensitivity;
use crate::artifacts::log::presentation::RowFlags;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::sha::Sha;
use anyhow::Context;
use std::path::PathBuf;
use tracing::{debug, warn};

const SELECTED_MARKER: &str = "> ";
const UNSELECTED_MARKER: &str = "  ";

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub path: PathBuf,
    pub start: usize,
    pub length: usize,
    pub filter: Option<String>,
    pub case_sensitivity: CaseSensitivity,
    pub select: Option<String>,
    pub graph: GraphMode,
    pub expanded: bool,
    pub all: bool,
    pub no_limit: bool,
    pub limit: usize,
    pub time_format: Option<String>,
    pub diff: Option<String>,
    pub cherry_picked: Vec<String>,
    pub bisect_good: Vec<String>,
    pub bisect_bad: Option<String>,
    pub bisect_skipped: Vec<String>,
    pub bisect_current: Option<String>,
    pub parse_emoji: bool,
    pub color: bool,
}

/// Load the history of a repository and render one window of the commits
/// panel
///
/// # Returns
///
/// The aligned rows of the window, the selected one marked with `>`
pub fn log(options: &LogOptions) -> anyhow::Result<Vec<String>> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let loader = GitLogLoader::new(options.path.clone());
    runtime.block_on(loader.ensure_repository())?;

    let mut config = ViewConfig::default()
        .with_case_sensitivity(options.case_sensitivity)
        .with_graph_mode(options.graph)
        .with_page_size(options.limit)
        .with_show_whole_graph(options.all)
        .with_parse_emoji(options.parse_emoji)
        .with_color(options.color);
    if let Some(time_format) = &options.time_format {
        config = config.with_time_format(time_format.as_str())?;
    }

    let store = PagedCommitStore::new(runtime.handle().clone(), loader);
    let mut context =
        LocalCommitsContext::new(store, config).with_limit_commits(!options.no_limit);
    context.reload();
    context.store().wait_loaded();
    context.refresh();

    let commits = context.get_commits();
    if let Some(select) = &options.select {
        let sha = resolve_commit(&commits, select)?;
        if !context.select_id(sha.as_str()) {
            warn!(%sha, "commit to select is not loaded");
        }
    }
    if let Some(needle) = &options.filter {
        context.set_needle(needle);
    }

    let snapshot = snapshot(options, &commits)?;
    let rows = loop {
        let rows = context.get_display_rows(options.start, options.length, &snapshot);
        if !context.store().is_loading() {
            break rows;
        }

        debug!(loaded = context.get_commits().len(), "waiting for more commits");
        context.store().wait_loaded();
    };

    let columns = rows.iter().map(|row| row.columns.clone()).collect::<Vec<_>>();
    let lines = align_columns(&columns)
        .into_iter()
        .zip(&rows)
        .map(|(line, row)| {
            let marker = if row.flags.contains(RowFlags::SELECTED) {
                SELECTED_MARKER
            } else {
                UNSELECTED_MARKER
            };
            format!("{marker}{line}").trim_end().to_string()
        })
        .collect();

    Ok(lines)
}

fn snapshot(options: &LogOptions, commits: &[Commit]) -> anyhow::Result<GuiSnapshot> {
    let screen_mode = if options.expanded {
        ScreenMode::Full
    } else {
        ScreenMode::Normal
    };
    let cherry_picked = options
        .cherry_picked
        .iter()
        .map(|reference| resolve_commit(commits, reference))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut snapshot = GuiSnapshot::default()
        .focused(true)
        .with_screen_mode(screen_mode)
        .with_cherry_picked(cherry_picked);
    if let Some(diff) = &options.diff {
        snapshot = snapshot.with_diff_ref(diff.as_str());
    }

    let bisecting = options.bisect_bad.is_some()
        || options.bisect_current.is_some()
        || !options.bisect_good.is_empty()
        || !options.bisect_skipped.is_empty();
    if bisecting {
        let mut bisect = BisectInfo::default();
        if let Some(bad) = &options.bisect_bad {
            bisect = bisect.mark(resolve_commit(commits, bad)?, BisectVerdict::New);
        }
        for good in &options.bisect_good {
            bisect = bisect.mark(resolve_commit(commits, good)?, BisectVerdict::Old);
        }
        for skipped in &options.bisect_skipped {
            bisect = bisect.mark(resolve_commit(commits, skipped)?, BisectVerdict::Skipped);
        }
        if let Some(current) = &options.bisect_current {
            bisect = bisect.with_current(resolve_commit(commits, current)?);
        }
        snapshot = snapshot.with_bisect(bisect);
    }

    Ok(snapshot)
}

/// Resolve a full or abbreviated hash against the loaded commits
///
/// A full hash is accepted even when the commit is not loaded.
fn resolve_commit(commits: &[Commit], reference: &str) -> anyhow::Result<Sha> {
    if let Ok(sha) = Sha::try_parse(reference) {
        return Ok(sha);
    }

    let mut matches = commits
        .iter()
        .map(Commit::sha)
        .filter(|sha| sha.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(sha), None) => Ok(sha.clone()),
        (Some(_), Some(_)) => anyhow::bail!("ambiguous commit reference: {reference}"),
        (None, _) => anyhow::bail!(
            "unknown commit {reference} among the {} loaded commits",
            commits.len()
        ),
    }
}
