//! Porcelain commands
//!
//! ## Commands
//!
//! - `log`: Render a window of the commits panel for a repository

pub mod log;
