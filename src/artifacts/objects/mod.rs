//! Commit history records
//!
//! The panel works on already-parsed log entries rather than raw objects:
//!
//! - **Sha**: Validated commit identity (SHA-1 or SHA-256, hex)
//! - **Commit**: Identity, subject, parents, author and display metadata

pub mod commit;
pub mod sha;

/// Length of a SHA-1 hash in hexadecimal format
pub const SHA1_HEX_LENGTH: usize = 40;

/// Length of a SHA-256 hash in hexadecimal format
pub const SHA256_HEX_LENGTH: usize = 64;

/// Length of the abbreviated hash shown in the sha column
pub const SHORT_SHA_LENGTH: usize = 8;
