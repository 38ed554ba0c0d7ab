//! Commit identity (content hash)
//!
//! A `Sha` is the hexadecimal object name git prints for a commit. Both
//! SHA-1 (40 hex characters) and SHA-256 (64 hex characters) repositories
//! are supported.
//!
//! ## Format
//!
//! - Full: 40 or 64 hex characters (e.g., "abc123...def")
//! - Short: First 8 characters (e.g., "abc12345")

use crate::artifacts::objects::{SHA1_HEX_LENGTH, SHA256_HEX_LENGTH, SHORT_SHA_LENGTH};
use std::borrow::Borrow;

/// Commit identity
///
/// Two commits are the same commit iff their `Sha`s are equal. The value is
/// kept in lowercase so that lookups in cherry-pick sets and bisect maps do
/// not depend on how the host spelled the hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Sha(String);

impl Sha {
    /// Parse and validate a full commit hash
    ///
    /// # Arguments
    ///
    /// * `id` - 40 or 64 character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated Sha or error if invalid length/characters
    pub fn try_parse(id: impl Into<String>) -> anyhow::Result<Self> {
        let id = id.into();
        let id = id.trim();

        if id.len() != SHA1_HEX_LENGTH && id.len() != SHA256_HEX_LENGTH {
            anyhow::bail!("Invalid commit hash length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid commit hash characters: {}", id);
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in the sha column
    pub fn to_short_sha(&self) -> &str {
        &self.0[..SHORT_SHA_LENGTH.min(self.0.len())]
    }

    /// Whether `prefix` abbreviates this hash (used to match refs given by
    /// the user, such as a diff target typed as a short hash)
    pub fn starts_with(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.starts_with(&prefix.to_ascii_lowercase())
    }
}

impl AsRef<str> for Sha {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Sha {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn parses_sha1_hashes() {
        let sha = Sha::try_parse(FULL).unwrap();
        assert_eq!(sha.as_str(), FULL);
        assert_eq!(sha.to_short_sha(), "01234567");
    }

    #[test]
    fn normalizes_uppercase_and_whitespace() {
        let sha = Sha::try_parse(format!("  {}\n", FULL.to_uppercase())).unwrap();
        assert_eq!(sha.as_str(), FULL);
    }

    #[test]
    fn parses_sha256_hashes() {
        let long = "a".repeat(SHA256_HEX_LENGTH);
        assert!(Sha::try_parse(long).is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Sha::try_parse("abc123").is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        let bad = "z".repeat(SHA1_HEX_LENGTH);
        assert!(Sha::try_parse(bad).is_err());
    }

    #[test]
    fn prefix_matching_ignores_case() {
        let sha = Sha::try_parse(FULL).unwrap();
        assert!(sha.starts_with("0123456789ABCDEF"));
        assert!(sha.starts_with("01234567"));
        assert!(!sha.starts_with(""));
        assert!(!sha.starts_with("fff"));
    }
}
