//! Contributor identities and the wrappers the API nests them in.

use serde::Deserialize;

use super::epoch;

/// A contributor. The same user may recur as author across many items,
/// tasks, responses and log entries; entities hold their own decoded copy
/// rather than sharing ownership.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The `annotator { user { … } }` wrapper on authored entities. The inner
/// user can be absent when an account was removed.
#[derive(Debug, Clone, Deserialize)]
pub struct Annotator {
    #[serde(default)]
    pub user: Option<User>,
}

/// Minimal author reference on item audit-log entries, which only carry
/// the user id.
#[derive(Debug, Clone, Deserialize)]
pub struct LogUser {
    pub id: String,
}

/// Nested annotation payload on task audit-log entries. For
/// `create_comment` events the content is a JSON-encoded string holding
/// the comment text.
#[derive(Debug, Clone, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub annotator: Option<Annotator>,
    #[serde(default, deserialize_with = "epoch::deserialize_opt")]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
}
