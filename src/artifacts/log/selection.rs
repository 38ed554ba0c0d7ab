//! Identity-based selection over a filtered list
//!
//! The selection remembers *which* element is selected, not where it is.
//! After a refresh or a filter change the identity is looked up again; only
//! when it disappeared does the position come into play, so the cursor stays
//! put instead of jumping back to the top on every keystroke.

use crate::artifacts::core::list_item::ListItem;
use crate::artifacts::log::filter::FilteredView;
use tracing::debug;

/// A resolved selection: identity plus its position in the filtered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: String,
    pub index: usize,
}

/// Resolve the selection against the current filtered view
///
/// # Arguments
///
/// * `view` - The filtered sequence
/// * `prior_id` - Identity selected before the change, if any
/// * `prior_index` - Position of that identity before the change
///
/// # Returns
///
/// - The prior identity at its new index, if still present
/// - Otherwise the element now at `prior_index`
/// - Otherwise the last element
/// - `None` when the view is empty
pub fn resolve_selection<T: ListItem>(
    view: &FilteredView<'_, T>,
    prior_id: Option<&str>,
    prior_index: usize,
) -> Option<Selection> {
    if let Some(id) = prior_id
        && let Some(index) = view.position(id)
    {
        return Some(Selection {
            id: id.to_string(),
            index,
        });
    }

    let index = prior_index.min(view.len().checked_sub(1)?);
    let item = view.get(index)?;
    if let Some(id) = prior_id {
        debug!(
            vanished = id,
            fallback = item.id(),
            index,
            "selected item is gone, falling back by position"
        );
    }

    Some(Selection {
        id: item.id().to_string(),
        index,
    })
}
