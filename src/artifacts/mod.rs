//! Commit panel data structures and algorithms
//!
//! - `core`: Shared utilities (list items, column alignment, pager output)
//! - `log`: Filtering, selection, graph layout and row rendering
//! - `objects`: Commit records and identities

pub mod core;
pub mod log;
pub mod objects;
