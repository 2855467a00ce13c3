//! GraphQL response envelope and Relay connection plumbing.

use serde::Deserialize;
use serde_json::Value;

use super::media::ProjectMedia;

/// Top-level response body of one export query page.
///
/// Failure can be reported two ways: a single top-level `error` value, or
/// the standard GraphQL `errors` list. The paginator checks both before
/// touching `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// The `data` member of a successful response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub node: Option<Project>,
}

/// One entry of the GraphQL `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// A project with its (partially accumulated) media connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub dbid: i64,
    pub title: String,
    pub project_medias: MediaConnection,
}

/// Relay pagination bookkeeping for a page of items.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "hasPreviousPage", default)]
    pub has_previous_page: bool,
    #[serde(rename = "startCursor", default)]
    pub start_cursor: Option<String>,
    #[serde(rename = "endCursor", default)]
    pub end_cursor: Option<String>,
}

/// The paginated media connection under a project. Unlike the nested
/// connections this one carries `pageInfo`, which drives the fetch loop.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConnection {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<Edge<ProjectMedia>>,
}

impl MediaConnection {
    /// Iterate the accumulated items in returned order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &ProjectMedia> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Generic Relay connection for the nested one-to-many collections
/// (tags, tasks, responses, comments, logs).
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<T> Connection<T> {
    /// Iterate the contained nodes in returned order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// An edge wrapping one node. Edge-level cursors are not used.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}
