//! Needle filtering of list elements
//!
//! Filtering never copies elements: the engine produces the indices of the
//! matching elements, and a [`FilteredView`] pairs those indices with the
//! backing slice. The indices are strictly increasing, so the view is always
//! an order-preserving subsequence of the backing list.

use crate::artifacts::core::list_item::ListItem;
use derive_new::new;

/// How the needle is compared against labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CaseSensitivity {
    /// Exact substring match
    Sensitive,
    /// Substring match ignoring case
    Insensitive,
    /// Insensitive unless the needle contains an uppercase character
    #[default]
    Smart,
}

/// Substring filter with a fixed case policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct FilterEngine {
    case_sensitivity: CaseSensitivity,
}

impl FilterEngine {
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    /// Indices of the items whose label contains `needle`
    ///
    /// # Arguments
    ///
    /// * `items` - Backing list, in display order
    /// * `needle` - Search text; empty selects every item
    ///
    /// # Returns
    ///
    /// Strictly increasing indices into `items`
    pub fn filter<T: ListItem>(&self, items: &[T], needle: &str) -> Vec<usize> {
        if needle.is_empty() {
            return (0..items.len()).collect();
        }

        let matcher = Matcher::new(needle, self.case_sensitivity);
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| matcher.matches(item.label()))
            .map(|(index, _)| index)
            .collect()
    }
}

/// Needle prepared once per filter pass
struct Matcher {
    needle: String,
    fold_case: bool,
}

impl Matcher {
    fn new(needle: &str, case_sensitivity: CaseSensitivity) -> Self {
        let fold_case = match case_sensitivity {
            CaseSensitivity::Sensitive => false,
            CaseSensitivity::Insensitive => true,
            CaseSensitivity::Smart => !needle.chars().any(char::is_uppercase),
        };
        let needle = if fold_case {
            needle.to_lowercase()
        } else {
            needle.to_string()
        };

        Matcher { needle, fold_case }
    }

    fn matches(&self, label: &str) -> bool {
        if self.fold_case {
            label.to_lowercase().contains(&self.needle)
        } else {
            label.contains(&self.needle)
        }
    }
}

/// The filtered sequence: a backing slice seen through matching indices
#[derive(Debug)]
pub struct FilteredView<'a, T> {
    items: &'a [T],
    indices: &'a [usize],
}

impl<T> Clone for FilteredView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FilteredView<'_, T> {}

impl<'a, T: ListItem> FilteredView<'a, T> {
    /// # Panics
    ///
    /// Debug builds assert that every index is in bounds and that the
    /// indices are strictly increasing.
    pub fn new(items: &'a [T], indices: &'a [usize]) -> Self {
        debug_assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        debug_assert!(indices.last().is_none_or(|last| *last < items.len()));
        FilteredView { items, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.indices.get(index).map(|raw| &self.items[*raw])
    }

    pub fn last(&self) -> Option<&'a T> {
        self.indices.last().map(|raw| &self.items[*raw])
    }

    /// Index into the backing slice of the item at `index`
    pub fn raw_index(&self, index: usize) -> Option<usize> {
        self.indices.get(index).copied()
    }

    /// Position of the item with the given identity
    pub fn position(&self, id: &str) -> Option<usize> {
        self.iter().position(|item| item.id() == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a T> + ExactSizeIterator + use<'a, T> {
        let items = self.items;
        self.indices.iter().map(move |raw| &items[*raw])
    }

    /// Items in `[start, end)`, clamped to the view
    pub fn range(
        &self,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &'a T> + Clone + use<'a, T> {
        let end = end.min(self.len());
        let start = start.min(end);
        let items = self.items;
        self.indices[start..end].iter().map(move |raw| &items[*raw])
    }
}
