//! Review tasks and their responses.

use serde::Deserialize;

use super::envelope::Connection;
use super::epoch;
use super::media::LogEntry;
use super::user::Annotator;

/// A structured review question attached to an item. The task's own audit
/// log is where task-level comments live, as `create_comment` events.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub annotator: Option<Annotator>,
    #[serde(default, deserialize_with = "epoch::deserialize_opt")]
    pub created_at: Option<i64>,
    pub label: String,
    /// "resolved" once answered to completion; other labels vary.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub responses: Connection<TaskResponse>,
    #[serde(default)]
    pub log: Connection<LogEntry>,
}

/// An annotator's answer to a task. The content is a JSON-encoded list of
/// named fields; the answer is the first field whose name starts with
/// `response_`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResponse {
    #[serde(default)]
    pub annotator: Option<Annotator>,
    #[serde(deserialize_with = "epoch::deserialize")]
    pub created_at: i64,
    pub content: String,
}
