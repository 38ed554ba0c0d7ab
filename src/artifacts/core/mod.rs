//! Core utilities and shared types
//!
//! This module contains the pieces every list panel shares:
//!
//! - `list_item`: The identity/label contract a list element fulfils
//! - `columns`: Column alignment of rendered rows (ANSI aware)
//! - `emoji`: `:shortcode:` to emoji replacement in commit subjects
//! - `output`: Writing rendered rows to stdout or the `minus` pager

pub mod columns;
pub mod emoji;
pub mod list_item;
pub mod output;
