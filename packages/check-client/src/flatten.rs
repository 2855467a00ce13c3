//! Unnest the fetched project tree into flat rows.
//!
//! One row per item, or per (item, task) when tasks exist, or per
//! (item, task, response) when responses exist. Tasks are walked in
//! reverse of their returned order, responses in returned order, and
//! ordinals are 1-based in that walking order. Pure and synchronous: the
//! same tree always flattens to the same table.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::error::{CheckError, Result};
use crate::table::{RowBuilder, Table};
use crate::types::{Annotator, Project, ProjectMedia, Task, TaskResponse, User};

/// Placeholder shown in the `_anon` twin of every authorship column.
pub const ANONYMOUS: &str = "Anonymous";

/// Default for absent metadata fields and absent annotators.
pub const MISSING: &str = "missing";

/// Audit-log event type marking a status change on an item.
const STATUS_EVENT: &str = "update_dynamicannotationfield";

/// Audit-log event type carrying a task-level comment.
const COMMENT_EVENT: &str = "create_comment";

/// Fixed format of the embed `published_at` field.
const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// Decoded item metadata blob. Fields missing from the blob default the
/// same way as a missing or malformed blob.
#[derive(Debug, Deserialize)]
struct ItemMetadata {
    #[serde(default = "missing_string")]
    title: String,
    #[serde(default = "missing_string")]
    description: String,
}

fn missing_string() -> String {
    MISSING.to_string()
}

impl Default for ItemMetadata {
    fn default() -> Self {
        Self {
            title: missing_string(),
            description: missing_string(),
        }
    }
}

/// Comment payloads are JSON-encoded strings with a `text` field.
#[derive(Debug, Deserialize)]
struct CommentContent {
    text: String,
}

/// One named field of a decoded response payload.
#[derive(Debug, Deserialize)]
struct ResponseField {
    field_name: String,
    #[serde(default)]
    formatted_value: Value,
}

/// Flatten the completed project tree into an ordered table.
///
/// Malformed comment or response content JSON is fatal; absent metadata
/// and absent annotators fall back to documented defaults instead.
pub fn flatten(project: &Project) -> Result<Table> {
    let mut table = Table::new();
    for item in project.project_medias.nodes() {
        let base = base_row(&project.title, item)?;
        if item.tasks.is_empty() {
            table.push(base.build());
            continue;
        }
        for (index, task) in item.tasks.nodes().rev().enumerate() {
            let task_id = format!("{}/{}", item.dbid, index + 1);
            let row = task_row(&base, &task_id, task)?;
            if task.responses.is_empty() {
                table.push(row.build());
                continue;
            }
            for (index, response) in task.responses.nodes().enumerate() {
                let response_id = format!("{}/{}", task_id, index + 1);
                table.push(response_row(&row, &response_id, response)?.build());
            }
        }
    }
    Ok(table)
}

/// Build the per-item base row every task and response row extends.
fn base_row(project_title: &str, item: &ProjectMedia) -> Result<RowBuilder> {
    let metadata = parse_metadata(item.metadata.as_deref());
    let content = if item.report_type == "claim" {
        item.media.quote.clone()
    } else {
        Some(metadata.description.clone())
    };
    let url = match item.report_type.as_str() {
        "uploadedimage" => item.media.picture.clone(),
        "link" => item.media.url.clone(),
        _ => None,
    };
    let item_type = if item.report_type == "link" {
        item.media
            .embed
            .as_ref()
            .and_then(|embed| embed.provider.clone())
            .unwrap_or_else(|| item.report_type.clone())
    } else {
        item.report_type.clone()
    };
    let published_at = item
        .media
        .embed
        .as_ref()
        .and_then(|embed| embed.published_at.as_deref())
        .and_then(parse_published_at);
    let resolved_tasks = item
        .tasks
        .nodes()
        .filter(|task| task.status.as_deref() == Some("resolved"))
        .count();

    Ok(RowBuilder::new()
        .with("project", project_title)
        .with("item", item.dbid.to_string())
        .with("title", metadata.title)
        .with("added_by", real_name(item.user.as_ref()))
        .with("added_by_anon", ANONYMOUS)
        .with("date_added", timestamp_from_epoch(item.created_at)?)
        .with_opt("status", item.last_status.clone())
        .with_opt("content", content)
        .with_opt("url", url)
        .with("type", item_type)
        .with_opt("date_published", published_at)
        .with_opt("tags", tag_line(item))
        .with_opt("comments", join_comments(&item_comment_texts(item)?))
        .with("count_contributors", contributor_count(item))
        .with("count_notes", item.comments.len())
        .with("count_tasks", item.tasks.len())
        .with("count_tasks_completed", resolved_tasks)
        .with_opt("time_to_first_status", time_to_status(item, true)?)
        .with_opt("time_to_last_status", time_to_status(item, false)?))
}

/// Extend the base row with one task's fields.
fn task_row(base: &RowBuilder, task_id: &str, task: &Task) -> Result<RowBuilder> {
    Ok(base
        .clone()
        .with("task", task_id)
        .with("task_question", task.label.clone())
        .with_opt("task_comments", join_comments(&task_comment_texts(task)?))
        .with("task_added_by", annotator_name(task.annotator.as_ref()))
        .with("task_added_by_anon", ANONYMOUS))
}

/// Extend a task row with one response's fields.
fn response_row(
    task: &RowBuilder,
    response_id: &str,
    response: &TaskResponse,
) -> Result<RowBuilder> {
    Ok(task
        .clone()
        .with("task_response", response_id)
        .with_opt("task_response_content", response_answer(&response.content)?)
        .with("task_response_date", timestamp_from_epoch(response.created_at)?)
        .with("task_response_by", annotator_name(response.annotator.as_ref()))
        .with("task_response_by_anon", ANONYMOUS))
}

fn parse_metadata(raw: Option<&str>) -> ItemMetadata {
    raw.and_then(|blob| serde_json::from_str(blob).ok())
        .unwrap_or_default()
}

/// Elapsed time from item creation to its first or last status update.
///
/// Status updates are log entries tagged `update_dynamicannotationfield`;
/// the log is scanned in reverse of its returned order, and "first" and
/// "last" are the first and last match in that scan.
fn time_to_status(item: &ProjectMedia, first: bool) -> Result<Option<Duration>> {
    let mut times = Vec::new();
    for entry in item.log.nodes().rev() {
        if entry.event_type.as_deref() != Some(STATUS_EVENT) {
            continue;
        }
        let at = entry.created_at.ok_or_else(|| {
            CheckError::Shape("status log entry has no created_at".to_string())
        })?;
        times.push(at);
    }
    let picked = if first { times.first() } else { times.last() };
    Ok(picked.map(|&at| Duration::seconds(at - item.created_at)))
}

/// Join comment texts: a single comment stays bare, several become a
/// dashed list.
fn join_comments(texts: &[String]) -> Option<String> {
    match texts {
        [] => None,
        [only] => Some(only.clone()),
        many => Some(
            many.iter()
                .map(|text| format!("- {text}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}

fn item_comment_texts(item: &ProjectMedia) -> Result<Vec<String>> {
    item.comments
        .nodes()
        .map(|comment| {
            let decoded: CommentContent = serde_json::from_str(&comment.content)?;
            Ok(decoded.text)
        })
        .collect()
}

/// Task-level comments live in the task's own audit log.
fn task_comment_texts(task: &Task) -> Result<Vec<String>> {
    let mut texts = Vec::new();
    for entry in task.log.nodes() {
        if entry.event_type.as_deref() != Some(COMMENT_EVENT) {
            continue;
        }
        let annotation = entry.annotation.as_ref().ok_or_else(|| {
            CheckError::Shape("comment log entry has no annotation".to_string())
        })?;
        let content = annotation.content.as_deref().ok_or_else(|| {
            CheckError::Shape("comment annotation has no content".to_string())
        })?;
        let decoded: CommentContent = serde_json::from_str(content)?;
        texts.push(decoded.text);
    }
    Ok(texts)
}

/// The answer is the first decoded content field named `response_*`.
fn response_answer(content: &str) -> Result<Option<String>> {
    let fields: Vec<ResponseField> = serde_json::from_str(content)?;
    Ok(fields
        .into_iter()
        .find(|field| field.field_name.starts_with("response_"))
        .and_then(|field| match field.formatted_value {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }))
}

/// Comma-joined tags, most recently applied first.
fn tag_line(item: &ProjectMedia) -> Option<String> {
    if item.tags.is_empty() {
        return None;
    }
    Some(
        item.tags
            .nodes()
            .rev()
            .map(|tag| tag.tag_text.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Distinct contributors: unique user ids across the item's audit log,
/// ignoring entries that carry no user.
fn contributor_count(item: &ProjectMedia) -> usize {
    item.log
        .nodes()
        .filter_map(|entry| entry.user.as_ref().map(|user| user.id.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

fn real_name(user: Option<&User>) -> String {
    user.map(|user| user.name.clone())
        .unwrap_or_else(missing_string)
}

fn annotator_name(annotator: Option<&Annotator>) -> String {
    real_name(annotator.and_then(|annotator| annotator.user.as_ref()))
}

fn timestamp_from_epoch(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| CheckError::Shape(format!("timestamp out of range: {seconds}")))
}

fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, PUBLISHED_AT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_from(value: Value) -> ProjectMedia {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn metadata_defaults_when_absent_or_malformed() {
        let parsed = parse_metadata(None);
        assert_eq!(parsed.title, "missing");
        assert_eq!(parsed.description, "missing");

        let parsed = parse_metadata(Some("{not json"));
        assert_eq!(parsed.title, "missing");

        let parsed = parse_metadata(Some("{\"title\":\"A claim\"}"));
        assert_eq!(parsed.title, "A claim");
        assert_eq!(parsed.description, "missing");
    }

    #[test]
    fn single_comment_joins_bare_and_several_join_dashed() {
        assert_eq!(join_comments(&[]), None);
        assert_eq!(join_comments(&["one".into()]), Some("one".into()));
        assert_eq!(
            join_comments(&["one".into(), "two".into(), "three".into()]),
            Some("- one\n- two\n- three".into())
        );
    }

    #[test]
    fn tags_join_in_reverse_returned_order() {
        let item = item_from(json!({
            "id": "x", "dbid": 1, "created_at": 0, "report_type": "claim",
            "media": {},
            "tags": { "edges": [
                { "node": { "tag_text": "old" } },
                { "node": { "tag_text": "new" } }
            ]}
        }));
        assert_eq!(tag_line(&item), Some("new, old".to_string()));
    }

    #[test]
    fn response_answer_takes_first_response_field() {
        let content = r#"[
            {"field_name": "suggestion", "formatted_value": "skip me"},
            {"field_name": "response_single_choice", "formatted_value": "True"},
            {"field_name": "response_note", "formatted_value": "later"}
        ]"#;
        assert_eq!(response_answer(content).unwrap(), Some("True".to_string()));
        assert_eq!(response_answer("[]").unwrap(), None);
    }

    #[test]
    fn malformed_response_content_is_fatal() {
        assert!(matches!(
            response_answer("{not json"),
            Err(CheckError::Decode(_))
        ));
    }

    #[test]
    fn status_times_scan_log_in_reverse() {
        let item = item_from(json!({
            "id": "x", "dbid": 1, "created_at": 100, "report_type": "claim",
            "media": {},
            "log": { "edges": [
                { "node": { "event_type": "update_dynamicannotationfield", "created_at": 500 } },
                { "node": { "event_type": "create_comment", "created_at": 400 } },
                { "node": { "event_type": "update_dynamicannotationfield", "created_at": 200 } }
            ]}
        }));
        // Reversed scan meets the 200 entry first, the 500 entry last.
        assert_eq!(
            time_to_status(&item, true).unwrap(),
            Some(Duration::seconds(100))
        );
        assert_eq!(
            time_to_status(&item, false).unwrap(),
            Some(Duration::seconds(400))
        );
    }

    #[test]
    fn no_status_events_means_no_elapsed_metric() {
        let item = item_from(json!({
            "id": "x", "dbid": 1, "created_at": 100, "report_type": "claim",
            "media": {}
        }));
        assert_eq!(time_to_status(&item, true).unwrap(), None);
    }

    #[test]
    fn contributors_deduplicate_by_user_id() {
        let item = item_from(json!({
            "id": "x", "dbid": 1, "created_at": 0, "report_type": "claim",
            "media": {},
            "log": { "edges": [
                { "node": { "event_type": "create_comment", "user": { "id": "a" } } },
                { "node": { "event_type": "update_status", "user": { "id": "a" } } },
                { "node": { "event_type": "update_status", "user": { "id": "b" } } },
                { "node": { "event_type": "create_tag" } }
            ]}
        }));
        assert_eq!(contributor_count(&item), 2);
    }

    #[test]
    fn published_at_uses_fixed_format() {
        assert_eq!(
            parse_published_at("2019-03-07T12:30:00.000Z"),
            Some(DateTime::from_timestamp(1_551_961_800, 0).unwrap())
        );
        assert_eq!(parse_published_at("2019-03-07"), None);
        assert_eq!(parse_published_at(""), None);
    }

    #[test]
    fn missing_annotator_defaults_to_missing_name() {
        assert_eq!(annotator_name(None), "missing");
        let annotator: Annotator = serde_json::from_value(json!({ "user": null })).unwrap();
        assert_eq!(annotator_name(Some(&annotator)), "missing");
    }
}
