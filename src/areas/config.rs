//! Panel configuration
//!
//! Settings are fixed for the lifetime of a panel. They are assembled by the
//! host (the binary builds them from command-line flags) and never written
//! back anywhere.

use crate::areas::gui_state::ScreenMode;
use crate::artifacts::log::filter::CaseSensitivity;
use chrono::format::{Item, StrftimeItems};

/// Default `strftime` pattern of the date column ("05 Mar 24")
pub const DEFAULT_TIME_FORMAT: &str = "%d %b %y";

/// Rows of headroom before the tail at which more commits are requested
pub const DEFAULT_LOAD_MORE_THRESHOLD: usize = 20;

/// Commits fetched per lazy-load page
pub const DEFAULT_PAGE_SIZE: usize = 300;

/// When the graph columns are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum GraphMode {
    #[default]
    Always,
    Never,
    /// Only while the panel is expanded (half or full screen)
    WhenMaximised,
}

impl GraphMode {
    pub fn shows_graph(&self, screen_mode: ScreenMode) -> bool {
        match self {
            GraphMode::Always => true,
            GraphMode::Never => false,
            GraphMode::WhenMaximised => screen_mode != ScreenMode::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    case_sensitivity: CaseSensitivity,
    graph_mode: GraphMode,
    time_format: String,
    load_more_threshold: usize,
    page_size: usize,
    show_whole_graph: bool,
    parse_emoji: bool,
    color: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            case_sensitivity: CaseSensitivity::default(),
            graph_mode: GraphMode::default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            load_more_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            show_whole_graph: false,
            parse_emoji: false,
            color: true,
        }
    }
}

impl ViewConfig {
    pub fn with_case_sensitivity(mut self, case_sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = case_sensitivity;
        self
    }

    pub fn with_graph_mode(mut self, graph_mode: GraphMode) -> Self {
        self.graph_mode = graph_mode;
        self
    }

    /// Set the `strftime` pattern of the date column
    ///
    /// # Returns
    ///
    /// Error if the pattern contains an unknown specifier; rendering a bad
    /// pattern would otherwise fail on every row
    pub fn with_time_format(mut self, time_format: impl Into<String>) -> anyhow::Result<Self> {
        let time_format = time_format.into();
        if StrftimeItems::new(&time_format).any(|item| matches!(item, Item::Error)) {
            anyhow::bail!("invalid time format: {time_format:?}");
        }

        self.time_format = time_format;
        Ok(self)
    }

    pub fn with_load_more_threshold(mut self, rows: usize) -> Self {
        self.load_more_threshold = rows;
        self
    }

    /// Commits per lazy-load page; at least one
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Start the panel showing every branch instead of only `HEAD`
    pub fn with_show_whole_graph(mut self, show_whole_graph: bool) -> Self {
        self.show_whole_graph = show_whole_graph;
        self
    }

    /// Show `:shortcode:` sequences in subjects as emoji
    pub fn with_parse_emoji(mut self, parse_emoji: bool) -> Self {
        self.parse_emoji = parse_emoji;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    pub fn graph_mode(&self) -> GraphMode {
        self.graph_mode
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    pub fn load_more_threshold(&self) -> usize {
        self.load_more_threshold
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn show_whole_graph(&self) -> bool {
        self.show_whole_graph
    }

    pub fn parse_emoji(&self) -> bool {
        self.parse_emoji
    }

    pub fn color(&self) -> bool {
        self.color
    }
}
