//! Row formatting for the visible window of the commit list
//!
//! `render_window` turns the slice `[start, start + length)` of the filtered
//! commits into rows of column strings. Only the window is formatted; the
//! graph is laid out over the prefix ending at the window so that pipes
//! crossing its top edge are drawn.
//!
//! ## Columns
//!
//! ```text
//! <sha> [<bisect>] [<action>] [<date>] <author> <graph><tags><subject>
//! ```
//!
//! - bisect: only while a bisect is running
//! - action: only when a commit in the window carries a rebase todo action
//! - date: only in the expanded screen modes, which also show full author
//!   names instead of initials and the ref decorations before the subject

use crate::areas::gui_state::GuiSnapshot;
use crate::artifacts::core::emoji::replace_shortcodes;
use crate::artifacts::log::bisect::BisectStatus;
use crate::artifacts::log::filter::FilteredView;
use crate::artifacts::log::graph::compute_graph;
use crate::artifacts::objects::commit::{Commit, CommitStatus, TodoAction};
use crate::artifacts::objects::sha::Sha;
use bitflags::bitflags;
use colored::{Color, Colorize};
use std::collections::HashSet;
use std::fmt::Write;
use std::hash::{DefaultHasher, Hash, Hasher};

const AUTHOR_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::BrightBlue,
    Color::BrightRed,
];

bitflags! {
    /// Display modes that applied to a row
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RowFlags: u8 {
        const SELECTED = 0b0000_0001;
        const CHERRY_PICKED = 0b0000_0010;
        const DIFF_TARGET = 0b0000_0100;
        const BISECTING = 0b0000_1000;
        const GRAPH = 0b0001_0000;
    }
}

/// One formatted row of the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub sha: Sha,
    pub flags: RowFlags,
    pub columns: Vec<String>,
}

/// Render settings derived from the panel configuration
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub show_graph: bool,
    pub prune_unknown_parents: bool,
    pub time_format: &'a str,
    pub parse_emoji: bool,
    pub color: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct CellStyle {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl CellStyle {
    fn fg(color: Color) -> Self {
        CellStyle {
            fg: Some(color),
            ..Self::default()
        }
    }

    fn paint(&self, text: &str, enabled: bool) -> String {
        if !enabled || text.is_empty() {
            return text.to_string();
        }

        let mut painted = text.normal();
        if let Some(fg) = self.fg {
            painted = painted.color(fg);
        }
        if let Some(bg) = self.bg {
            painted = painted.on_color(bg);
        }
        if self.bold {
            painted = painted.bold();
        }
        painted.to_string()
    }
}

/// Format the rows `[start, start + length)` of `view`
///
/// # Arguments
///
/// * `view` - The filtered commits
/// * `start` - First row of the window
/// * `length` - Rows in the window
/// * `selected` - Commit to highlight; `None` when the panel is unfocused
/// * `snapshot` - Host state consulted for cherry-pick, diff and bisect modes
/// * `options` - Graph and formatting settings
///
/// # Returns
///
/// `min(length, len - start)` rows, or none when `start` is past the end
pub fn render_window(
    view: &FilteredView<'_, Commit>,
    start: usize,
    length: usize,
    selected: Option<&Sha>,
    snapshot: &GuiSnapshot,
    options: &RenderOptions<'_>,
) -> Vec<DisplayRow> {
    let end = start.saturating_add(length).min(view.len());
    if start >= end {
        return Vec::new();
    }

    let graph = if options.show_graph {
        // Pruning looks at the whole filtered list so rows do not depend on
        // where the window ends
        let known = options
            .prune_unknown_parents
            .then(|| view.iter().map(Commit::sha).collect::<HashSet<_>>());
        compute_graph(view.range(0, end), selected, known.as_ref())
    } else {
        Vec::new()
    };

    let bisect = snapshot.bisect();
    let bisect_bounds = bisect.and_then(|bisect| bisect.bounds(view));
    let show_action = view.range(start, end).any(|commit| commit.action().is_some());
    let expanded = snapshot.is_expanded();

    view.range(start, end)
        .enumerate()
        .map(|(offset, commit)| {
            let index = start + offset;
            let mut flags = RowFlags::empty();
            if selected == Some(commit.sha()) {
                flags |= RowFlags::SELECTED;
            }
            if snapshot.is_cherry_picked(commit.sha()) {
                flags |= RowFlags::CHERRY_PICKED;
            }
            if snapshot
                .diff_ref()
                .is_some_and(|diff_ref| is_diff_target(commit, diff_ref))
            {
                flags |= RowFlags::DIFF_TARGET;
            }

            let bisect_status = bisect.map(|bisect| bisect.status(commit, index, bisect_bounds));
            if bisect_status.is_some() {
                flags |= RowFlags::BISECTING;
            }

            let mut columns = Vec::with_capacity(6);
            columns.push(
                sha_style(commit, flags, bisect_status)
                    .paint(commit.sha().to_short_sha(), options.color),
            );

            if let (Some(bisect), Some(status)) = (bisect, bisect_status) {
                let style = status.color().map(CellStyle::fg).unwrap_or_default();
                columns.push(style.paint(&bisect.marker(status), options.color));
            }

            if show_action {
                let action = commit.action().map(|action| action.as_str()).unwrap_or_default();
                columns.push(action_style(commit.action()).paint(action, options.color));
            }

            let author = commit.author();
            let author_style = CellStyle::fg(author_color(author.name()));
            if expanded {
                columns.push(
                    CellStyle::fg(Color::Blue)
                        .paint(&format_time(commit, options.time_format), options.color),
                );
                columns.push(author_style.paint(author.name(), options.color));
            } else {
                columns.push(author_style.paint(&author.initials(), options.color));
            }

            let mut label = String::new();
            if let Some(row) = graph.get(index) {
                flags |= RowFlags::GRAPH;
                label.push_str(&row.render(options.color));
            }
            for tag in commit.tags() {
                let tag_style = CellStyle {
                    fg: Some(Color::Yellow),
                    bold: true,
                    ..CellStyle::default()
                };
                label.push_str(&tag_style.paint(tag, options.color));
                label.push(' ');
            }
            if expanded && !commit.extra_info().is_empty() {
                let decorations = format!("({})", commit.extra_info());
                label.push_str(&CellStyle::fg(Color::Magenta).paint(&decorations, options.color));
                label.push(' ');
            }
            if options.parse_emoji {
                label.push_str(&replace_shortcodes(commit.name()));
            } else {
                label.push_str(commit.name());
            }
            columns.push(label);

            DisplayRow {
                sha: commit.sha().clone(),
                flags,
                columns,
            }
        })
        .collect()
}

/// Whether `diff_ref` names this commit: its hash (or an abbreviation of at
/// least four characters), one of its tags, or one of its ref decorations
fn is_diff_target(commit: &Commit, diff_ref: &str) -> bool {
    let sha = commit.sha();
    if sha.as_str() == diff_ref || (diff_ref.len() >= 4 && sha.starts_with(diff_ref)) {
        return true;
    }

    commit.tags().iter().any(|tag| tag == diff_ref)
        || commit
            .extra_info()
            .split(", ")
            .map(|decoration| decoration.trim_start_matches("HEAD -> "))
            .any(|decoration| decoration == diff_ref)
}

fn sha_style(commit: &Commit, flags: RowFlags, bisect_status: Option<BisectStatus>) -> CellStyle {
    let mut style = if flags.contains(RowFlags::DIFF_TARGET) {
        CellStyle::fg(Color::Magenta)
    } else if flags.contains(RowFlags::CHERRY_PICKED) {
        CellStyle {
            fg: Some(Color::Cyan),
            bg: Some(Color::Blue),
            bold: false,
        }
    } else if let Some(color) = bisect_status.and_then(|status| status.color()) {
        CellStyle::fg(color)
    } else {
        match commit.status() {
            CommitStatus::None => CellStyle::default(),
            CommitStatus::Unpushed => CellStyle::fg(Color::Red),
            CommitStatus::Pushed => CellStyle::fg(Color::Yellow),
            CommitStatus::Merged => CellStyle::fg(Color::Green),
            CommitStatus::Rebasing => CellStyle::fg(Color::Blue),
        }
    };

    style.bold |= flags.contains(RowFlags::SELECTED);
    style
}

fn action_style(action: Option<TodoAction>) -> CellStyle {
    match action {
        Some(TodoAction::Drop) => CellStyle::fg(Color::Red),
        Some(TodoAction::Squash | TodoAction::Fixup) => CellStyle::fg(Color::Yellow),
        Some(TodoAction::Edit | TodoAction::Reword) => CellStyle::fg(Color::Green),
        Some(TodoAction::Pick) | None => CellStyle::default(),
    }
}

/// Stable per-author color
fn author_color(name: &str) -> Color {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    AUTHOR_COLORS[(hasher.finish() % AUTHOR_COLORS.len() as u64) as usize]
}

fn format_time(commit: &Commit, time_format: &str) -> String {
    let timestamp = commit.author().timestamp();
    let mut formatted = String::new();
    if write!(formatted, "{}", timestamp.format(time_format)).is_err() {
        return timestamp.to_rfc3339();
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::gui_state::ScreenMode;
    use crate::artifacts::log::bisect::{BisectInfo, BisectVerdict};
    use crate::artifacts::log::filter::{CaseSensitivity, FilterEngine};
    use crate::artifacts::objects::commit::Author;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PLAIN: RenderOptions<'static> = RenderOptions {
        show_graph: false,
        prune_unknown_parents: false,
        time_format: "%Y-%m-%d",
        parse_emoji: false,
        color: false,
    };

    fn sha(name: char) -> Sha {
        Sha::try_parse(name.to_string().repeat(40)).unwrap()
    }

    fn commit(name: char, parent: Option<char>) -> Commit {
        let timestamp = DateTime::parse_from_rfc3339("2024-03-05T10:20:30+02:00").unwrap();
        Commit::new(
            sha(name),
            format!("commit {}", name.to_ascii_uppercase()),
            parent.map(sha).into_iter().collect(),
        )
        .with_author(Author::new(
            "Ada Lovelace".into(),
            "ada@example.com".into(),
            timestamp,
        ))
    }

    /// e -> d -> c -> b -> a, newest first
    fn history() -> Vec<Commit> {
        vec![
            commit('e', Some('d')),
            commit('d', Some('c')),
            commit('c', Some('b')),
            commit('b', Some('a')),
            commit('a', None),
        ]
    }

    fn render(
        commits: &[Commit],
        needle: &str,
        start: usize,
        length: usize,
        selected: Option<char>,
        snapshot: &GuiSnapshot,
        options: &RenderOptions<'_>,
    ) -> Vec<DisplayRow> {
        let indices = FilterEngine::new(CaseSensitivity::Sensitive).filter(commits, needle);
        let view = FilteredView::new(commits, &indices);
        let selected = selected.map(sha);
        render_window(&view, start, length, selected.as_ref(), snapshot, options)
    }

    fn labels(rows: &[DisplayRow]) -> Vec<String> {
        rows.iter()
            .map(|row| row.columns.last().cloned().unwrap_or_default())
            .collect()
    }

    #[test]
    fn window_in_the_middle_marks_selection() {
        let rows = render(
            &history(),
            "",
            1,
            2,
            Some('c'),
            &GuiSnapshot::default(),
            &PLAIN,
        );

        assert_eq!(labels(&rows), vec!["commit D", "commit C"]);
        assert!(!rows[0].flags.contains(RowFlags::SELECTED));
        assert!(rows[1].flags.contains(RowFlags::SELECTED));
    }

    #[test]
    fn plain_columns_in_normal_mode() {
        let rows = render(&history(), "", 0, 1, None, &GuiSnapshot::default(), &PLAIN);

        assert_eq!(
            rows[0].columns,
            vec!["eeeeeeee".to_string(), "AL".to_string(), "commit E".to_string()]
        );
    }

    #[test]
    fn expanded_mode_shows_date_and_full_author() {
        let snapshot = GuiSnapshot::default().with_screen_mode(ScreenMode::Full);
        let commits = vec![commit('e', None).with_extra_info("HEAD -> main")];

        let rows = render(&commits, "", 0, 1, None, &snapshot, &PLAIN);

        assert_eq!(
            rows[0].columns,
            vec![
                "eeeeeeee".to_string(),
                "2024-03-05".to_string(),
                "Ada Lovelace".to_string(),
                "(HEAD -> main) commit E".to_string(),
            ]
        );
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let rows = render(&history(), "", 5, 3, None, &GuiSnapshot::default(), &PLAIN);
        assert!(rows.is_empty());

        let rows = render(&history(), "", 99, 3, None, &GuiSnapshot::default(), &PLAIN);
        assert!(rows.is_empty());
    }

    #[test]
    fn tail_window_is_truncated() {
        let rows = render(&history(), "", 3, 10, None, &GuiSnapshot::default(), &PLAIN);

        assert_eq!(labels(&rows), vec!["commit B", "commit A"]);
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let rows = render(
            &history(),
            "",
            2,
            usize::MAX,
            None,
            &GuiSnapshot::default(),
            &PLAIN,
        );

        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn cherry_picked_and_diff_target_rows_are_flagged() {
        let snapshot = GuiSnapshot::default()
            .with_cherry_picked([sha('b')])
            .with_diff_ref("dddd");

        let rows = render(&history(), "", 0, 5, None, &snapshot, &PLAIN);

        assert!(rows[1].flags.contains(RowFlags::DIFF_TARGET));
        assert!(rows[3].flags.contains(RowFlags::CHERRY_PICKED));
        assert!(
            rows.iter()
                .filter(|row| row.flags.intersects(RowFlags::DIFF_TARGET | RowFlags::CHERRY_PICKED))
                .count()
                == 2
        );
    }

    #[test]
    fn diff_target_matches_tags_and_branches() {
        let tagged = commit('e', None).with_tags(vec!["v1.0".into()]);
        let branch = commit('d', None).with_extra_info("HEAD -> main, origin/main");

        assert!(is_diff_target(&tagged, "v1.0"));
        assert!(is_diff_target(&branch, "main"));
        assert!(is_diff_target(&branch, "origin/main"));
        assert!(!is_diff_target(&branch, "dd"));
    }

    #[test]
    fn bisect_adds_marker_column() {
        let bisect = BisectInfo::default()
            .mark(sha('d'), BisectVerdict::New)
            .mark(sha('a'), BisectVerdict::Old);
        let snapshot = GuiSnapshot::default().with_bisect(bisect);

        let rows = render(&history(), "", 0, 5, None, &snapshot, &PLAIN);

        let markers = rows
            .iter()
            .map(|row| row.columns[1].clone())
            .collect::<Vec<_>>();
        assert_eq!(markers, vec!["", "<-- bad", "?", "?", "<-- good"]);
        assert!(rows.iter().all(|row| row.flags.contains(RowFlags::BISECTING)));
    }

    #[test]
    fn action_column_appears_only_when_needed() {
        let mut commits = history();
        commits[1] = commit('d', Some('c')).with_action(TodoAction::Squash);

        let rows = render(&commits, "", 0, 2, None, &GuiSnapshot::default(), &PLAIN);
        assert_eq!(rows[0].columns[1], "");
        assert_eq!(rows[1].columns[1], "squash");

        let rows = render(&commits, "", 2, 2, None, &GuiSnapshot::default(), &PLAIN);
        assert_eq!(rows[0].columns.len(), 3);
    }

    #[test]
    fn graph_is_laid_out_from_the_top_of_the_list() {
        let commits = vec![
            Commit::new(sha('d'), "merge", vec![sha('b'), sha('c')]),
            Commit::new(sha('c'), "side", vec![sha('a')]),
            Commit::new(sha('b'), "main", vec![sha('a')]),
            Commit::new(sha('a'), "root", vec![]),
        ];
        let options = RenderOptions {
            show_graph: true,
            ..PLAIN
        };

        let rows = render(&commits, "", 2, 2, None, &GuiSnapshot::default(), &options);

        assert_eq!(labels(&rows), vec!["◯ │ main", "◯─╯ root"]);
        assert!(rows.iter().all(|row| row.flags.contains(RowFlags::GRAPH)));
    }

    #[test]
    fn pruned_graph_rows_do_not_depend_on_the_window_end() {
        let commits = vec![
            Commit::new(sha('d'), "merge", vec![sha('b'), sha('c')]),
            Commit::new(sha('c'), "side", vec![sha('a')]),
            Commit::new(sha('b'), "main", vec![sha('a')]),
            Commit::new(sha('a'), "root", vec![]),
        ];
        let options = RenderOptions {
            show_graph: true,
            prune_unknown_parents: true,
            ..PLAIN
        };
        let snapshot = GuiSnapshot::default();

        let full = render(&commits, "", 0, 4, None, &snapshot, &options);
        for length in 1..4 {
            let window = render(&commits, "", 0, length, None, &snapshot, &options);
            assert_eq!(&window[..], &full[..length]);
        }
        assert_eq!(labels(&full[..1]), vec!["⏣─╮ merge"]);
    }

    #[test]
    fn emoji_shortcodes_follow_the_option() {
        let commits = vec![Commit::new(sha('a'), ":bug: fix crash", vec![])];
        let snapshot = GuiSnapshot::default();
        let options = RenderOptions {
            parse_emoji: true,
            ..PLAIN
        };

        let plain = render(&commits, "", 0, 1, None, &snapshot, &PLAIN);
        let parsed = render(&commits, "", 0, 1, None, &snapshot, &options);

        assert_eq!(labels(&plain), vec![":bug: fix crash"]);
        assert_eq!(labels(&parsed), vec!["🐛 fix crash"]);
    }

    #[test]
    fn rebase_actions_are_named() {
        let commits = vec![commit('e', Some('d')).with_action(TodoAction::Fixup)];

        let rows = render(&commits, "", 0, 1, None, &GuiSnapshot::default(), &PLAIN);

        assert_eq!(rows[0].columns[1], "fixup");
    }

    #[test]
    fn scenario_filter_moves_selection_to_remaining_commit() {
        let rows = render(&history(), "D", 0, 10, Some('d'), &GuiSnapshot::default(), &PLAIN);

        assert_eq!(labels(&rows), vec!["commit D"]);
        assert!(rows[0].flags.contains(RowFlags::SELECTED));
    }

    proptest! {
        #[test]
        fn prop_window_length_is_clamped(len in 0usize..30, start in 0usize..40, length in 0usize..40) {
            let commits = (0..len)
                .map(|i| Commit::new(
                    Sha::try_parse(format!("{i:040x}")).unwrap(),
                    format!("commit {i}"),
                    Vec::new(),
                ))
                .collect::<Vec<_>>();

            let rows = render(&commits, "", start, length, None, &GuiSnapshot::default(), &PLAIN);

            let expected = if start >= len { 0 } else { length.min(len - start) };
            prop_assert_eq!(rows.len(), expected);
        }

        #[test]
        fn prop_rendering_is_idempotent(start in 0usize..6, length in 0usize..6, graph in any::<bool>()) {
            let options = RenderOptions { show_graph: graph, ..PLAIN };
            let snapshot = GuiSnapshot::default().with_cherry_picked([sha('c')]);

            let first = render(&history(), "", start, length, Some('b'), &snapshot, &options);
            let second = render(&history(), "", start, length, Some('b'), &snapshot, &options);

            prop_assert_eq!(first, second);
        }
    }
}
