//! Commit graph columns
//!
//! Lays out ancestry as box-drawing pipes to the left of each row. The
//! layout walks the commits top-down keeping a set of lanes, each lane
//! heading from a commit towards one of its parents:
//!
//! - A commit lands on the leftmost lane heading for it, or opens a new
//!   lane when nothing above points at it (a branch tip)
//! - Other lanes heading for the same commit join into it from the right
//! - The commit's lane continues towards its first parent; further parents
//!   reuse a lane already heading there or branch off into a free one
//!
//! Lanes never move sideways, so a column keeps its meaning from row to row.
//! Row `i` depends only on rows `0..=i`, which lets the renderer lay out the
//! prefix of the list up to the end of the visible window and show only the
//! window: pipes entering from above the window or leaving below it are
//! drawn exactly as they would be in a full-history layout.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::sha::Sha;
use bitflags::bitflags;
use colored::{Color, Colorize};
use std::collections::HashSet;

const COMMIT_GLYPH: char = '◯';
const MERGE_GLYPH: char = '⏣';

const LANE_COLORS: [Color; 6] = [
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Red,
];

bitflags! {
    /// Connections of one graph cell to its neighbours
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pipes: u8 {
        const UP = 0b0000_0001;
        const DOWN = 0b0000_0010;
        const LEFT = 0b0000_0100;
        const RIGHT = 0b0000_1000;
        const NODE = 0b0001_0000;
        const MERGE = 0b0010_0000;
    }
}

/// One column of one graph row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphCell {
    pub pipes: Pipes,
    /// Part of a pipe leading into or out of the selected commit
    pub highlighted: bool,
}

impl GraphCell {
    fn connect(&mut self, pipes: Pipes, highlighted: bool) {
        self.pipes |= pipes;
        self.highlighted |= highlighted;
    }

    /// Box-drawing character for the cell
    pub fn glyph(&self) -> char {
        if self.pipes.contains(Pipes::NODE) {
            return if self.pipes.contains(Pipes::MERGE) {
                MERGE_GLYPH
            } else {
                COMMIT_GLYPH
            };
        }

        let up = self.pipes.contains(Pipes::UP);
        let down = self.pipes.contains(Pipes::DOWN);
        let left = self.pipes.contains(Pipes::LEFT);
        let right = self.pipes.contains(Pipes::RIGHT);

        match (up, down, left, right) {
            (false, false, false, false) => ' ',
            (true, true, false, false) | (true, false, false, false) | (false, true, false, false) => '│',
            (false, false, true, true) | (false, false, true, false) | (false, false, false, true) => '─',
            (true, false, true, false) => '╯',
            (false, true, true, false) => '╮',
            (true, false, false, true) => '╰',
            (false, true, false, true) => '╭',
            (true, true, true, false) => '┤',
            (true, true, false, true) => '├',
            (true, false, true, true) => '┴',
            (false, true, true, true) => '┬',
            (true, true, true, true) => '┼',
        }
    }
}

/// Graph columns of one commit row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphRow {
    pub cells: Vec<GraphCell>,
}

impl GraphRow {
    /// Render the row, two terminal cells per column
    ///
    /// The second cell of a column carries the horizontal connector to the
    /// next column. Trailing blank columns are not emitted.
    pub fn render(&self, color: bool) -> String {
        let used = self
            .cells
            .iter()
            .rposition(|cell| !cell.pipes.is_empty())
            .map_or(0, |last| last + 1);

        let mut line = String::new();
        for (column, cell) in self.cells[..used].iter().enumerate() {
            let connector = if cell.pipes.contains(Pipes::RIGHT) {
                '─'
            } else {
                ' '
            };
            let text = format!("{}{}", cell.glyph(), connector);

            if !color {
                line.push_str(&text);
                continue;
            }

            let painted = text.color(LANE_COLORS[column % LANE_COLORS.len()]);
            let painted = if cell.highlighted {
                painted.bold()
            } else {
                painted
            };
            line.push_str(&painted.to_string());
        }

        line
    }
}

#[derive(Debug, Clone)]
struct Lane {
    /// Commit the lane leaves from (`None` above the first commit that
    /// claimed it)
    from: Option<Sha>,
    /// Parent the lane is heading to
    target: Sha,
}

impl Lane {
    fn touches(&self, selected: Option<&Sha>) -> bool {
        selected.is_some_and(|selected| {
            &self.target == selected || self.from.as_ref() == Some(selected)
        })
    }
}

/// Lay out graph rows for `commits`, in order
///
/// # Arguments
///
/// * `commits` - The rows to lay out, top-down; may be a prefix of the list
/// * `selected` - Commit whose pipes are highlighted
/// * `known` - Identities of the whole list when edges to parents outside
///   it should be dropped (the list is a filtered subset and those parents
///   will never show up); `None` lets such edges run on to the bottom, as
///   their parents may still arrive with the next page
pub fn compute_graph<'c>(
    commits: impl IntoIterator<Item = &'c Commit>,
    selected: Option<&Sha>,
    known: Option<&HashSet<&Sha>>,
) -> Vec<GraphRow> {
    let mut lanes: Vec<Option<Lane>> = Vec::new();
    let mut rows = Vec::new();

    for commit in commits {
        let sha = commit.sha();
        let is_selected = selected == Some(sha);
        let parents = commit
            .parents()
            .iter()
            .filter(|parent| known.is_none_or(|known| known.contains(*parent)))
            .collect::<Vec<_>>();

        let hits = lanes
            .iter()
            .enumerate()
            .filter_map(|(column, lane)| {
                lane.as_ref()
                    .filter(|lane| &lane.target == sha)
                    .map(|_| column)
            })
            .collect::<Vec<_>>();

        let mut cells = vec![GraphCell::default(); lanes.len()];

        // Lanes passing by this commit untouched
        for (column, lane) in lanes.iter().enumerate() {
            if let Some(lane) = lane
                && &lane.target != sha
            {
                cells[column].connect(Pipes::UP | Pipes::DOWN, lane.touches(selected));
            }
        }

        let node_column = match hits.first() {
            Some(column) => *column,
            None => free_column(&mut lanes, 0),
        };
        if cells.len() < lanes.len() {
            cells.resize(lanes.len(), GraphCell::default());
        }

        let mut node_pipes = Pipes::NODE;
        if commit.is_merge() {
            node_pipes |= Pipes::MERGE;
        }
        cells[node_column].connect(node_pipes, is_selected);

        // Lanes joining into this commit from the right
        for column in hits.iter().skip(1).copied() {
            let highlighted = is_selected
                || lanes[column]
                    .as_ref()
                    .is_some_and(|lane| lane.touches(selected));
            cells[column].connect(Pipes::UP, highlighted);
            connect_horizontally(&mut cells, node_column, column, highlighted);
            lanes[column] = None;
        }

        // First parent continues straight down on the node's lane
        lanes[node_column] = parents.first().map(|parent| Lane {
            from: Some(sha.clone()),
            target: (*parent).clone(),
        });

        // Further parents branch off to the side
        for parent in parents.iter().skip(1) {
            let highlighted = is_selected || selected == Some(*parent);
            let existing = lanes.iter().position(|lane| {
                lane.as_ref()
                    .is_some_and(|lane| &lane.target == *parent && lane.from.as_ref() != Some(sha))
            });

            let column = match existing {
                Some(column) => column,
                None => {
                    let column = free_column(&mut lanes, node_column + 1);
                    lanes[column] = Some(Lane {
                        from: Some(sha.clone()),
                        target: (*parent).clone(),
                    });
                    if cells.len() < lanes.len() {
                        cells.resize(lanes.len(), GraphCell::default());
                    }
                    cells[column].connect(Pipes::DOWN, highlighted);
                    column
                }
            };
            connect_horizontally(&mut cells, node_column, column, highlighted);
        }

        while matches!(lanes.last(), Some(None)) {
            lanes.pop();
        }

        rows.push(GraphRow { cells });
    }

    rows
}

/// First unoccupied lane at or after `from`, opening a new one if needed
///
/// The returned slot is still `None`; callers fill it.
fn free_column(lanes: &mut Vec<Option<Lane>>, from: usize) -> usize {
    if let Some(offset) = lanes.iter().skip(from).position(Option::is_none) {
        return from + offset;
    }
    if lanes.len() < from {
        lanes.resize(from, None);
    }
    lanes.push(None);
    lanes.len() - 1
}

fn connect_horizontally(cells: &mut [GraphCell], from: usize, to: usize, highlighted: bool) {
    if from == to {
        return;
    }
    let (left, right) = if from < to { (from, to) } else { (to, from) };

    cells[left].connect(Pipes::RIGHT, highlighted);
    for cell in &mut cells[left + 1..right] {
        cell.connect(Pipes::LEFT | Pipes::RIGHT, highlighted);
    }
    cells[right].connect(Pipes::LEFT, highlighted);
}
