//! Bisect overlay
//!
//! While a bisect is running every row gets a marker describing its role in
//! the search: the commits already judged, the one currently checked out,
//! and the candidates still in range between the newest "bad" commit and the
//! first "good" commit below it.

use crate::artifacts::log::filter::FilteredView;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::sha::Sha;
use colored::Color;
use std::collections::HashMap;

/// Verdict recorded for a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BisectVerdict {
    /// Has the old behaviour ("good")
    Old,
    /// Has the new behaviour ("bad")
    New,
    Skipped,
}

/// Progress of a running bisect, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BisectInfo {
    old_term: String,
    new_term: String,
    verdicts: HashMap<Sha, BisectVerdict>,
    current: Option<Sha>,
}

impl Default for BisectInfo {
    fn default() -> Self {
        BisectInfo {
            old_term: "good".to_string(),
            new_term: "bad".to_string(),
            verdicts: HashMap::new(),
            current: None,
        }
    }
}

impl BisectInfo {
    /// Bisect using custom terms (`git bisect start --term-old/--term-new`)
    pub fn with_terms(old_term: impl Into<String>, new_term: impl Into<String>) -> Self {
        BisectInfo {
            old_term: old_term.into(),
            new_term: new_term.into(),
            ..Self::default()
        }
    }

    pub fn mark(mut self, sha: Sha, verdict: BisectVerdict) -> Self {
        self.verdicts.insert(sha, verdict);
        self
    }

    pub fn with_current(mut self, sha: Sha) -> Self {
        self.current = Some(sha);
        self
    }

    pub fn verdict(&self, sha: &Sha) -> Option<BisectVerdict> {
        self.verdicts.get(sha).copied()
    }

    pub fn current(&self) -> Option<&Sha> {
        self.current.as_ref()
    }

    pub fn old_term(&self) -> &str {
        &self.old_term
    }

    pub fn new_term(&self) -> &str {
        &self.new_term
    }

    /// Positions of the newest "new" commit and the first "old" commit below
    /// it; commits strictly between them are still candidates
    pub fn bounds(&self, view: &FilteredView<'_, Commit>) -> Option<BisectBounds> {
        let new_index = view
            .iter()
            .position(|commit| self.verdict(commit.sha()) == Some(BisectVerdict::New))?;
        let old_index = view
            .iter()
            .skip(new_index + 1)
            .position(|commit| self.verdict(commit.sha()) == Some(BisectVerdict::Old))
            .map(|offset| new_index + 1 + offset)?;

        Some(BisectBounds {
            new_index,
            old_index,
        })
    }

    /// Role of the commit at `index` in `view`
    pub fn status(
        &self,
        commit: &Commit,
        index: usize,
        bounds: Option<BisectBounds>,
    ) -> BisectStatus {
        if self.current.as_ref() == Some(commit.sha()) {
            return BisectStatus::Current;
        }

        match self.verdict(commit.sha()) {
            Some(BisectVerdict::Old) => BisectStatus::Old,
            Some(BisectVerdict::New) => BisectStatus::New,
            Some(BisectVerdict::Skipped) => BisectStatus::Skipped,
            None => match bounds {
                Some(bounds) if bounds.new_index < index && index < bounds.old_index => {
                    BisectStatus::Candidate
                }
                _ => BisectStatus::None,
            },
        }
    }

    /// Marker shown in the bisect column
    pub fn marker(&self, status: BisectStatus) -> String {
        match status {
            BisectStatus::None => String::new(),
            BisectStatus::Old => format!("<-- {}", self.old_term),
            BisectStatus::New => format!("<-- {}", self.new_term),
            BisectStatus::Skipped => "<-- skipped".to_string(),
            BisectStatus::Current => "<-- current".to_string(),
            BisectStatus::Candidate => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BisectBounds {
    pub new_index: usize,
    pub old_index: usize,
}

/// Role of a row in a running bisect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectStatus {
    None,
    Old,
    New,
    Skipped,
    Current,
    Candidate,
}

impl BisectStatus {
    pub fn color(&self) -> Option<Color> {
        match self {
            BisectStatus::None => None,
            BisectStatus::Old => Some(Color::Green),
            BisectStatus::New => Some(Color::Red),
            BisectStatus::Skipped => Some(Color::Yellow),
            BisectStatus::Current => Some(Color::Magenta),
            BisectStatus::Candidate => Some(Color::Blue),
        }
    }
}
