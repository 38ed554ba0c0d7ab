//! Commit list view-model building blocks
//!
//! The pieces a commit panel is assembled from, each usable on its own:
//!
//! - `filter`: Needle filtering into an index-backed view
//! - `selection`: Identity-based selection that survives filter changes
//! - `graph`: Lane layout of the commit graph
//! - `bisect`: Bisect markers and candidate range
//! - `presentation`: Formatting of the visible window into column strings
//!
//! ## Data flow
//!
//! ```text
//! commits -> filter -> selection -> presentation (graph, bisect) -> rows
//! ```

pub mod bisect;
pub mod filter;
pub mod graph;
pub mod presentation;
pub mod selection;
