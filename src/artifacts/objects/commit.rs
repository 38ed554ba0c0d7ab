//! Commit record
//!
//! The commit panel never reads objects itself; commits arrive already
//! parsed from a log listing. A record holds:
//! - The commit identity (`Sha`)
//! - Parent identities (for the graph)
//! - Author information
//! - The subject line, used both as display label and as filter haystack
//! - Push status, an optional rebase todo action, tags and ref decorations
//!
//! ## Log line format
//!
//! Records are parsed from `git log` output produced with
//! [`LOG_FORMAT`], one commit per line, fields separated by NUL:
//! ```text
//! <sha>\0<author date, strict ISO 8601>\0<author name>\0<author email>\0<decorations>\0<parents>\0<subject>
//! ```

use crate::artifacts::objects::sha::Sha;
use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};

/// `--format` argument producing lines understood by [`Commit::parse_log_line`]
pub const LOG_FORMAT: &str = "%H%x00%aI%x00%aN%x00%aE%x00%D%x00%P%x00%s";

const TAG_DECORATION_PREFIX: &str = "tag: ";

/// Author information
///
/// Contains name, email, and timestamp with the author's timezone.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author
    ///
    /// # Arguments
    ///
    /// * `name` - Author's name
    /// * `email` - Author's email address
    /// * `timestamp` - Authoring time with timezone
    pub fn new(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Format author name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Two-letter abbreviation shown in the narrow author column
    ///
    /// Multi-word names use the first letter of the first two words
    /// ("Ada Lovelace" -> "AL"); single-word names use their first two
    /// characters ("linus" -> "li").
    pub fn initials(&self) -> String {
        let mut words = self.name.split_whitespace();

        match (words.next(), words.next()) {
            (Some(first), Some(second)) => first
                .chars()
                .take(1)
                .chain(second.chars().take(1))
                .collect(),
            (Some(only), None) => only.chars().take(2).collect(),
            _ => String::new(),
        }
    }
}

impl Default for Author {
    fn default() -> Self {
        Author {
            name: String::new(),
            email: String::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
        }
    }
}

/// Where a commit stands relative to its upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommitStatus {
    /// No upstream is configured, or the status is unknown
    #[default]
    None,
    /// Only reachable locally
    Unpushed,
    /// Reachable from the upstream branch
    Pushed,
    /// Reachable from the main branch
    Merged,
    /// Pending in an interactive rebase todo list
    Rebasing,
}

/// Rebase todo action attached to a pending commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoAction {
    Pick,
    Reword,
    Edit,
    Squash,
    Fixup,
    Drop,
}

impl TodoAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoAction::Pick => "pick",
            TodoAction::Reword => "reword",
            TodoAction::Edit => "edit",
            TodoAction::Squash => "squash",
            TodoAction::Fixup => "fixup",
            TodoAction::Drop => "drop",
        }
    }
}

/// A single entry of the commit history
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    sha: Sha,
    name: String,
    parents: Vec<Sha>,
    author: Author,
    status: CommitStatus,
    action: Option<TodoAction>,
    tags: Vec<String>,
    extra_info: String,
}

impl Commit {
    /// Create a commit with the given identity, subject and parents
    ///
    /// Remaining metadata starts empty and is filled in with the `with_*`
    /// methods.
    pub fn new(sha: Sha, name: impl Into<String>, parents: Vec<Sha>) -> Self {
        Commit {
            sha,
            name: name.into(),
            parents,
            author: Author::default(),
            status: CommitStatus::None,
            action: None,
            tags: Vec::new(),
            extra_info: String::new(),
        }
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }

    pub fn with_status(mut self, status: CommitStatus) -> Self {
        self.set_status(status);
        self
    }

    pub fn set_status(&mut self, status: CommitStatus) {
        self.status = status;
    }

    pub fn with_action(mut self, action: TodoAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_extra_info(mut self, extra_info: impl Into<String>) -> Self {
        self.extra_info = extra_info.into();
        self
    }

    /// Parse one line of `git log --format=LOG_FORMAT` output
    pub fn parse_log_line(line: &str) -> anyhow::Result<Self> {
        let mut fields = line.splitn(7, '\0');
        let mut next_field = |name: &str| {
            fields
                .next()
                .with_context(|| format!("log line is missing the {name} field: {line:?}"))
        };

        let sha = Sha::try_parse(next_field("sha")?)?;
        let date = next_field("date")?;
        let author_name = next_field("author name")?;
        let author_email = next_field("author email")?;
        let decorations = next_field("decorations")?;
        let parents = next_field("parents")?;
        let subject = next_field("subject")?;

        let timestamp = DateTime::parse_from_rfc3339(date)
            .with_context(|| format!("invalid author date {date:?} for commit {sha}"))?;
        let parents = parents
            .split_whitespace()
            .map(Sha::try_parse)
            .collect::<anyhow::Result<Vec<_>>>()?;

        let (tags, refs): (Vec<_>, Vec<_>) = decorations
            .split(", ")
            .filter(|decoration| !decoration.is_empty())
            .partition(|decoration| decoration.starts_with(TAG_DECORATION_PREFIX));
        let tags = tags
            .into_iter()
            .map(|tag| tag.trim_start_matches(TAG_DECORATION_PREFIX).to_string())
            .collect();

        Ok(Commit::new(sha, subject, parents)
            .with_author(Author::new(
                author_name.to_string(),
                author_email.to_string(),
                timestamp,
            ))
            .with_tags(tags)
            .with_extra_info(refs.join(", ")))
    }

    pub fn sha(&self) -> &Sha {
        &self.sha
    }

    /// Subject line; the label the filter matches against
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[Sha] {
        &self.parents
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn status(&self) -> CommitStatus {
        self.status
    }

    pub fn action(&self) -> Option<TodoAction> {
        self.action
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Non-tag ref decorations, e.g. "HEAD -> main, origin/main"
    pub fn extra_info(&self) -> &str {
        &self.extra_info
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sha(c: char) -> String {
        c.to_string().repeat(40)
    }

    fn log_line(decorations: &str, parents: &str, subject: &str) -> String {
        format!(
            "{}\0{}\0{}\0{}\0{}\0{}\0{}",
            sha('a'),
            "2024-03-05T10:20:30+02:00",
            "Ada Lovelace",
            "ada@example.com",
            decorations,
            parents,
            subject
        )
    }

    #[test]
    fn parses_full_log_line() {
        let parents = format!("{} {}", sha('b'), sha('c'));
        let line = log_line("HEAD -> main, tag: v1.0, origin/main", &parents, "Merge it");

        let commit = Commit::parse_log_line(&line).unwrap();

        assert_eq!(commit.sha().as_str(), sha('a'));
        assert_eq!(commit.name(), "Merge it");
        assert_eq!(commit.parents().len(), 2);
        assert!(commit.is_merge());
        assert_eq!(commit.tags(), &["v1.0".to_string()]);
        assert_eq!(commit.extra_info(), "HEAD -> main, origin/main");
        assert_eq!(commit.author().name(), "Ada Lovelace");
        assert_eq!(commit.author().email(), "ada@example.com");
        assert_eq!(
            commit.author().timestamp().to_rfc3339(),
            "2024-03-05T10:20:30+02:00"
        );
    }

    #[test]
    fn subject_may_contain_separator_like_text() {
        let line = log_line("", "", "fix: handle a, b and c");

        let commit = Commit::parse_log_line(&line).unwrap();

        assert_eq!(commit.name(), "fix: handle a, b and c");
        assert!(commit.is_root());
        assert!(commit.tags().is_empty());
        assert_eq!(commit.extra_info(), "");
    }

    #[test]
    fn rejects_truncated_lines() {
        let line = format!("{}\0{}", sha('a'), "2024-03-05T10:20:30+02:00");
        assert!(Commit::parse_log_line(&line).is_err());
    }

    #[test]
    fn rejects_invalid_dates() {
        let line = log_line("", "", "subject").replace("2024-03-05T10:20:30+02:00", "yesterday");
        assert!(Commit::parse_log_line(&line).is_err());
    }

    #[test]
    fn initials_for_multi_and_single_word_names() {
        let timestamp = DateTime::<Utc>::UNIX_EPOCH.fixed_offset();
        let ada = Author::new("Ada Lovelace".into(), "a@b.c".into(), timestamp);
        let linus = Author::new("linus".into(), "l@b.c".into(), timestamp);
        let nobody = Author::default();

        assert_eq!(ada.initials(), "AL");
        assert_eq!(linus.initials(), "li");
        assert_eq!(nobody.initials(), "");
        assert_eq!(ada.display_name(), "Ada Lovelace <a@b.c>");
    }
}
