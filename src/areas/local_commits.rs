//! The commits panel
//!
//! `LocalCommitsContext` ties a [`CommitStore`] to a [`ListController`] of
//! commits and answers the host's render calls. Every render pulls the
//! store's current sequence, so growth from a background load shows up on
//! the next frame without any notification. When the rendered window comes
//! close to the end of what is loaded, the context asks the store for the
//! next page, once per loaded length.

use crate::areas::commit_store::{CommitStore, LoadMoreRequest};
use crate::areas::config::ViewConfig;
use crate::areas::gui_state::GuiSnapshot;
use crate::areas::list_context::ListController;
use crate::artifacts::log::filter::FilterEngine;
use crate::artifacts::log::presentation::{DisplayRow, RenderOptions, render_window};
use crate::artifacts::objects::commit::Commit;
use std::cell::Cell;
use std::sync::Arc;
use tracing::{debug, info};

pub struct LocalCommitsContext<S> {
    store: S,
    config: ViewConfig,
    list: ListController<Commit>,
    limit_commits: bool,
    show_whole_graph: bool,
    /// Loaded length at which the last load-more request went out
    requested_at: Cell<Option<usize>>,
}

impl<S: CommitStore> LocalCommitsContext<S> {
    pub fn new(store: S, config: ViewConfig) -> Self {
        let mut list = ListController::new(FilterEngine::new(config.case_sensitivity()));
        list.set_model(store.model());

        LocalCommitsContext {
            show_whole_graph: config.show_whole_graph(),
            store,
            config,
            list,
            limit_commits: true,
            requested_at: Cell::new(None),
        }
    }

    /// Start with paging on or off, without requesting anything
    pub fn with_limit_commits(mut self, limit_commits: bool) -> Self {
        self.limit_commits = limit_commits;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Column strings of the rows `[start, start + length)`
    pub fn get_display_strings(
        &mut self,
        start: usize,
        length: usize,
        snapshot: &GuiSnapshot,
    ) -> Vec<Vec<String>> {
        self.get_display_rows(start, length, snapshot)
            .into_iter()
            .map(|row| row.columns)
            .collect()
    }

    /// Rows `[start, start + length)` with their display flags
    ///
    /// Pulls the latest sequence from the store first and, when the window
    /// reaches near the end of the loaded history, asks for more.
    pub fn get_display_rows(
        &mut self,
        start: usize,
        length: usize,
        snapshot: &GuiSnapshot,
    ) -> Vec<DisplayRow> {
        self.pull_model();
        self.check_load_more(start, length);

        let view = self.list.view();
        let selected = self
            .list
            .selected()
            .filter(|_| snapshot.is_focused())
            .map(Commit::sha);
        let options = RenderOptions {
            show_graph: self.shows_graph(snapshot),
            prune_unknown_parents: !self.list.needle().is_empty(),
            time_format: self.config.time_format(),
            parse_emoji: self.config.parse_emoji(),
            color: self.config.color(),
        };

        render_window(&view, start, length, selected, snapshot, &options)
    }

    /// Identity of the selected commit; empty when nothing is selected
    pub fn get_selected_item_id(&self) -> String {
        self.list.selected_id().unwrap_or_default().to_string()
    }

    pub fn selected_commit(&self) -> Option<&Commit> {
        self.list.selected()
    }

    /// The loaded sequence, unfiltered
    pub fn get_commits(&self) -> Arc<[Commit]> {
        Arc::clone(self.list.model())
    }

    /// Re-pull the store's sequence, re-filter and re-resolve the selection
    pub fn refresh(&mut self) {
        self.list.set_model(self.store.model());
    }

    pub fn get_limit_commits(&self) -> bool {
        self.limit_commits
    }

    /// Load history in pages (the default) or all at once
    ///
    /// Turning the limit off requests the whole history right away.
    pub fn set_limit_commits(&mut self, limit_commits: bool) {
        if self.limit_commits == limit_commits {
            return;
        }

        self.limit_commits = limit_commits;
        if !limit_commits {
            self.reload();
        }
    }

    pub fn get_show_whole_graph(&self) -> bool {
        self.show_whole_graph
    }

    /// Show the history of every branch instead of only `HEAD`, reloading
    pub fn set_show_whole_graph(&mut self, show_whole_graph: bool) {
        if self.show_whole_graph == show_whole_graph {
            return;
        }

        self.show_whole_graph = show_whole_graph;
        self.reload();
    }

    /// Ask the store to load the history again with the current settings
    ///
    /// A limited reload asks for at least as many commits as are loaded
    /// now, and never fewer than one page.
    pub fn reload(&self) {
        self.requested_at.set(None);
        let limit = self
            .limit_commits
            .then(|| self.list.model().len().max(self.config.page_size()));
        self.request(limit, true);
    }

    pub fn needle(&self) -> &str {
        self.list.needle()
    }

    pub fn set_needle(&mut self, needle: &str) {
        self.list.set_needle(needle);
    }

    /// Number of commits matching the needle
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list.selected_index()
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.list.move_selection(delta);
    }

    pub fn select_first(&mut self) {
        self.list.select_first();
    }

    pub fn select_last(&mut self) {
        self.list.select_last();
    }

    pub fn page_down(&mut self) {
        self.list.page_down();
    }

    pub fn page_up(&mut self) {
        self.list.page_up();
    }

    /// Select the commit with the given full hash
    pub fn select_id(&mut self, id: &str) -> bool {
        self.list.select_id(id)
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.list.set_viewport_height(height);
    }

    pub fn viewport_window(&self) -> (usize, usize) {
        self.list.viewport_window()
    }

    fn shows_graph(&self, snapshot: &GuiSnapshot) -> bool {
        self.config.graph_mode().shows_graph(snapshot.screen_mode())
            && !snapshot.is_filtering_by_path()
    }

    fn pull_model(&mut self) {
        let model = self.store.model();
        if !Arc::ptr_eq(&model, self.list.model()) {
            debug!(
                before = self.list.model().len(),
                after = model.len(),
                "commit sequence changed"
            );
            self.list.set_model(model);
        }
    }

    fn check_load_more(&self, start: usize, length: usize) {
        if !self.limit_commits {
            return;
        }

        let loaded = self.list.model().len();
        let view = self.list.view();
        let end = start.saturating_add(length);
        // Rows past the last match mean every loaded commit was looked at
        let raw_end = if end >= view.len() {
            loaded
        } else {
            view.raw_index(end).unwrap_or(loaded)
        };

        if loaded - raw_end > self.config.load_more_threshold() {
            return;
        }
        if self.requested_at.get() == Some(loaded) {
            return;
        }

        info!(loaded, "viewport reached the end of the loaded commits");
        self.requested_at.set(Some(loaded));
        self.request(Some(loaded + self.config.page_size()), false);
    }

    fn request(&self, limit: Option<usize>, reload: bool) {
        self.store.request_more(LoadMoreRequest {
            loaded: self.list.model().len(),
            limit,
            all_branches: self.show_whole_graph,
            reload,
        });
    }
}
