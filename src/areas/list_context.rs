//! Generic list controller
//!
//! A list panel is assembled from three independent parts:
//!
//! - `FilteredList`: the backing model plus the needle and the indices it
//!   selects
//! - `ListCursor`: the selection, remembered by identity
//! - `Viewport`: the window of rows the terminal shows
//!
//! `ListController` owns one of each and forwards to them, keeping them
//! consistent: every change of model or needle re-resolves the cursor, and
//! every cursor move scrolls the viewport so the selection stays visible.

use crate::artifacts::core::list_item::ListItem;
use crate::artifacts::log::filter::{FilterEngine, FilteredView};
use crate::artifacts::log::selection::{Selection, resolve_selection};
use std::sync::Arc;
use tracing::debug;

/// Elements matching the current needle, as indices into the model
#[derive(Debug, Clone)]
pub struct FilteredList<T> {
    model: Arc<[T]>,
    engine: FilterEngine,
    needle: String,
    indices: Vec<usize>,
}

impl<T: ListItem> FilteredList<T> {
    pub fn new(engine: FilterEngine) -> Self {
        FilteredList {
            model: Arc::from(Vec::new()),
            engine,
            needle: String::new(),
            indices: Vec::new(),
        }
    }

    pub fn model(&self) -> &Arc<[T]> {
        &self.model
    }

    pub fn set_model(&mut self, model: Arc<[T]>) {
        self.model = model;
        self.refilter();
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Replace the needle
    ///
    /// # Returns
    ///
    /// Whether the needle changed
    pub fn set_needle(&mut self, needle: &str) -> bool {
        if self.needle == needle {
            return false;
        }

        self.needle = needle.to_string();
        self.refilter();
        debug!(needle, matches = self.indices.len(), "filter changed");
        true
    }

    pub fn view(&self) -> FilteredView<'_, T> {
        FilteredView::new(&*self.model, &self.indices)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn refilter(&mut self) {
        self.indices = self.engine.filter(&*self.model, &self.needle);
    }
}

/// The selection of a list, by identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCursor {
    selection: Option<Selection>,
}

impl ListCursor {
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Look the selected identity up again after the view changed
    pub fn resolve<T: ListItem>(&mut self, view: &FilteredView<'_, T>) {
        let (prior_id, prior_index) = match &self.selection {
            Some(selection) => (Some(selection.id.as_str()), selection.index),
            None => (None, 0),
        };
        self.selection = resolve_selection(view, prior_id, prior_index);
    }

    /// Select the element at `index`, clamped to the view
    pub fn select_index<T: ListItem>(&mut self, view: &FilteredView<'_, T>, index: usize) {
        let Some(last) = view.len().checked_sub(1) else {
            self.selection = None;
            return;
        };

        let index = index.min(last);
        self.selection = view.get(index).map(|item| Selection {
            id: item.id().to_string(),
            index,
        });
    }

    /// Select the element with the given identity
    ///
    /// # Returns
    ///
    /// `false`, leaving the selection untouched, if no element has that
    /// identity
    pub fn select_id<T: ListItem>(&mut self, view: &FilteredView<'_, T>, id: &str) -> bool {
        match view.position(id) {
            Some(index) => {
                self.selection = Some(Selection {
                    id: id.to_string(),
                    index,
                });
                true
            }
            None => false,
        }
    }

    pub fn move_by<T: ListItem>(&mut self, view: &FilteredView<'_, T>, delta: isize) {
        let current = self.selection.as_ref().map_or(0, |selection| selection.index);
        self.select_index(view, current.saturating_add_signed(delta));
    }
}

/// Window of rows shown by the terminal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    start: usize,
    height: usize,
}

impl Viewport {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Scroll the least amount that brings `selected` into view, then clamp
    /// the window to a list of `len` rows
    pub fn follow(&mut self, len: usize, selected: Option<usize>) {
        if let Some(selected) = selected
            && self.height > 0
        {
            if selected < self.start {
                self.start = selected;
            } else if selected >= self.start + self.height {
                self.start = selected + 1 - self.height;
            }
        }

        self.start = self.start.min(len.saturating_sub(self.height.max(1)));
    }
}

/// Filterable, navigable list of `T`
#[derive(Debug, Clone)]
pub struct ListController<T> {
    list: FilteredList<T>,
    cursor: ListCursor,
    viewport: Viewport,
}

impl<T: ListItem> ListController<T> {
    pub fn new(engine: FilterEngine) -> Self {
        ListController {
            list: FilteredList::new(engine),
            cursor: ListCursor::default(),
            viewport: Viewport::default(),
        }
    }

    pub fn model(&self) -> &Arc<[T]> {
        self.list.model()
    }

    /// Replace the backing model, keeping the selection by identity
    pub fn set_model(&mut self, model: Arc<[T]>) {
        self.list.set_model(model);
        self.sync();
    }

    pub fn needle(&self) -> &str {
        self.list.needle()
    }

    pub fn set_needle(&mut self, needle: &str) {
        if self.list.set_needle(needle) {
            self.sync();
        }
    }

    pub fn view(&self) -> FilteredView<'_, T> {
        self.list.view()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected_index().and_then(|index| self.list.view().get(index))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.cursor.selection().map(|selection| selection.id.as_str())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cursor.selection().map(|selection| selection.index)
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.cursor.move_by(&self.list.view(), delta);
        self.follow();
    }

    pub fn select_first(&mut self) {
        self.cursor.select_index(&self.list.view(), 0);
        self.follow();
    }

    pub fn select_last(&mut self) {
        self.cursor.select_index(&self.list.view(), usize::MAX);
        self.follow();
    }

    pub fn page_down(&mut self) {
        self.move_selection(self.page_rows());
    }

    pub fn page_up(&mut self) {
        self.move_selection(-self.page_rows());
    }

    /// Select the element with identity `id`
    ///
    /// # Returns
    ///
    /// `false` if no visible element has that identity
    pub fn select_id(&mut self, id: &str) -> bool {
        let found = self.cursor.select_id(&self.list.view(), id);
        self.follow();
        found
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.set_height(height);
        self.follow();
    }

    /// Current window as `(start, height)`
    pub fn viewport_window(&self) -> (usize, usize) {
        (self.viewport.start(), self.viewport.height())
    }

    fn page_rows(&self) -> isize {
        isize::try_from(self.viewport.height().max(1)).unwrap_or(isize::MAX)
    }

    fn sync(&mut self) {
        self.cursor.resolve(&self.list.view());
        self.follow();
    }

    fn follow(&mut self) {
        self.viewport.follow(self.list.len(), self.selected_index());
    }
}
