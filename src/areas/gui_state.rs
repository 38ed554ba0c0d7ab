//! Snapshot of the host UI state a render depends on
//!
//! The host owns focus, screen mode, the diff target, the cherry-pick
//! clipboard and bisect progress, and any of them may change between two
//! key presses. Instead of reaching into that shared state, the host builds
//! a `GuiSnapshot` right before asking for rows and passes it by reference;
//! nothing in the panel keeps it beyond the call.

use crate::artifacts::log::bisect::BisectInfo;
use crate::artifacts::objects::sha::Sha;
use std::collections::HashSet;

/// How much of the terminal the focused panel occupies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScreenMode {
    #[default]
    Normal,
    Half,
    Full,
}

#[derive(Debug, Clone, Default)]
pub struct GuiSnapshot {
    focused: bool,
    screen_mode: ScreenMode,
    diff_ref: Option<String>,
    cherry_picked: HashSet<Sha>,
    bisect: Option<BisectInfo>,
    filtering_by_path: bool,
}

impl GuiSnapshot {
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_screen_mode(mut self, screen_mode: ScreenMode) -> Self {
        self.screen_mode = screen_mode;
        self
    }

    /// Ref (branch, tag or commit hash) the diff mode compares against
    pub fn with_diff_ref(mut self, diff_ref: impl Into<String>) -> Self {
        self.diff_ref = Some(diff_ref.into());
        self
    }

    pub fn with_cherry_picked(mut self, shas: impl IntoIterator<Item = Sha>) -> Self {
        self.cherry_picked = shas.into_iter().collect();
        self
    }

    pub fn with_bisect(mut self, bisect: BisectInfo) -> Self {
        self.bisect = Some(bisect);
        self
    }

    /// The host restricts the log to the history of a path
    pub fn filtering_by_path(mut self, filtering_by_path: bool) -> Self {
        self.filtering_by_path = filtering_by_path;
        self
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn screen_mode(&self) -> ScreenMode {
        self.screen_mode
    }

    /// Anything but the normal layout shows the wide columns
    pub fn is_expanded(&self) -> bool {
        self.screen_mode != ScreenMode::Normal
    }

    pub fn diff_ref(&self) -> Option<&str> {
        self.diff_ref.as_deref()
    }

    pub fn is_cherry_picked(&self, sha: &Sha) -> bool {
        self.cherry_picked.contains(sha)
    }

    pub fn bisect(&self) -> Option<&BisectInfo> {
        self.bisect.as_ref()
    }

    pub fn is_filtering_by_path(&self) -> bool {
        self.filtering_by_path
    }
}
