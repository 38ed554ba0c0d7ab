//! Command implementations
//!
//! - `porcelain`: User-facing commands built on the commits panel

pub mod porcelain;
