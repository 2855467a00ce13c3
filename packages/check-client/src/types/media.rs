//! The media item: one fact-checked case unit under a project.

use serde::Deserialize;

use super::envelope::Connection;
use super::epoch;
use super::task::Task;
use super::user::{Annotation, Annotator, LogUser, User};

/// One item under a project, with every nested collection the export
/// query requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMedia {
    /// User who created the item.
    #[serde(default)]
    pub user: Option<User>,
    pub id: String,
    pub dbid: i64,
    #[serde(deserialize_with = "epoch::deserialize")]
    pub created_at: i64,
    /// Report type tag: "claim", "link", "uploadedimage", … Open set.
    #[serde(default)]
    pub report_type: String,
    /// JSON-encoded title/description blob. Absent or malformed values
    /// fall back to defaults at flatten time.
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub last_status: Option<String>,
    #[serde(default)]
    pub media: MediaContent,
    #[serde(default)]
    pub tags: Connection<Tag>,
    #[serde(default)]
    pub tasks: Connection<Task>,
    #[serde(default)]
    pub comments: Connection<Comment>,
    #[serde(default)]
    pub log: Connection<LogEntry>,
}

/// The embedded media sub-object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaContent {
    pub quote: Option<String>,
    pub picture: Option<String>,
    pub url: Option<String>,
    pub embed: Option<Embed>,
}

/// Embed metadata, populated for link-type items.
#[derive(Debug, Clone, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// A text label. Returned oldest-first; consumed in reverse so the most
/// recently applied tag is presented first.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub tag_text: String,
}

/// An item-level comment. The content is a JSON-encoded string carrying a
/// `text` field.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub annotator: Option<Annotator>,
    #[serde(deserialize_with = "epoch::deserialize")]
    pub created_at: i64,
    pub content: String,
}

/// One audit-log event. Item logs carry `created_at`/`user`; task logs
/// carry a nested `annotation`. Both shapes decode into this struct with
/// the other side's fields absent.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "epoch::deserialize_opt")]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub user: Option<LogUser>,
    #[serde(default)]
    pub annotation: Option<Annotation>,
}
