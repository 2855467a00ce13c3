//! The paginated fetch and the fetch → flatten → redact composition.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CheckError, Result};
use crate::flatten::flatten;
use crate::query::{media_page_query, project_node_id, PAGE_SIZE};
use crate::redact::redact;
use crate::table::Table;
use crate::transport::{HttpTransport, Transport};
use crate::types::{GraphqlResponse, Project};

/// Connection parameters as supplied by the hosting tool.
#[derive(Debug, Clone)]
pub struct FetchParams {
    /// Path-like project reference; only the final segment names the
    /// project.
    pub project: String,
    /// API access credential.
    pub key: String,
    /// API base address.
    pub host: String,
    /// Keep the anonymized authorship columns instead of real names.
    pub anonymize: bool,
}

/// Client for one API host, generic over the transport seam.
pub struct CheckClient<T: Transport> {
    transport: T,
}

impl CheckClient<HttpTransport> {
    pub fn new(host: &str, key: &str) -> Self {
        Self {
            transport: HttpTransport::new(host, key),
        }
    }
}

impl<T: Transport> CheckClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the complete project tree, merging items across pages.
    ///
    /// The first page's envelope becomes the working result; every later
    /// page only appends its item edges, so project id and title are
    /// never overwritten. The loop follows the *current* page's
    /// `hasNextPage`/`endCursor`. Pages are fetched strictly one at a
    /// time; any failure aborts the whole fetch with no partial result.
    pub async fn fetch_project(&self, project_path: &str) -> Result<Project> {
        let node_id = project_node_id(project_path);
        let mut project = self.fetch_page(&node_id, "").await?;
        let mut page_info = project.project_medias.page_info.clone();
        let mut pages = 1usize;
        while page_info.has_next_page {
            let cursor = page_info.end_cursor.clone().unwrap_or_default();
            let page = self.fetch_page(&node_id, &cursor).await?;
            pages += 1;
            page_info = page.project_medias.page_info.clone();
            project
                .project_medias
                .edges
                .extend(page.project_medias.edges);
        }
        info!(
            pages,
            items = project.project_medias.len(),
            title = %project.title,
            "project fetched"
        );
        Ok(project)
    }

    /// Fetch, flatten and redact in one step.
    pub async fn fetch_table(&self, project_path: &str, anonymize: bool) -> Result<Table> {
        let project = self.fetch_project(project_path).await?;
        let mut table = flatten(&project)?;
        redact(&mut table, anonymize);
        Ok(table)
    }

    async fn fetch_page(&self, node_id: &str, cursor: &str) -> Result<Project> {
        let query = media_page_query(node_id, PAGE_SIZE, cursor);
        let body = self.transport.execute(&query).await?;
        let project = decode_page(body)?;
        debug!(
            items = project.project_medias.len(),
            has_next = project.project_medias.page_info.has_next_page,
            "page decoded"
        );
        Ok(project)
    }
}

/// Fetch and tabulate a project with the default HTTP transport.
pub async fn fetch(params: &FetchParams) -> Result<Table> {
    CheckClient::new(&params.host, &params.key)
        .fetch_table(&params.project, params.anonymize)
        .await
}

/// Interpret one page envelope: API-reported errors abort the fetch
/// before `data` is touched.
fn decode_page(body: Value) -> Result<Project> {
    let envelope: GraphqlResponse = serde_json::from_value(body)?;
    if let Some(error) = envelope.error.filter(|value| !value.is_null()) {
        return Err(CheckError::Api(error_text(&error)));
    }
    if let Some(first) = envelope.errors.first() {
        return Err(CheckError::Api(first.message.clone()));
    }
    envelope
        .data
        .and_then(|data| data.node)
        .ok_or_else(|| CheckError::Shape("response has no project node".to_string()))
}

fn error_text(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}
