//! Check fact-checking API client and project export tabulator.
//!
//! Fetches a project's full tree of media items — tasks, responses, tags,
//! comments and audit logs — from the Check GraphQL API via cursor
//! pagination, then unnests it into a flat table with an optional
//! redaction step that hides contributor identities.
//!
//! # Example
//!
//! ```rust,ignore
//! use check_client::{fetch, FetchParams};
//!
//! let table = fetch(&FetchParams {
//!     project: "team/workspace/7".into(),
//!     key: std::env::var("CHECK_KEY")?,
//!     host: "https://check-api.example.org".into(),
//!     anonymize: true,
//! })
//! .await?;
//! println!("{}", table.to_csv());
//! ```
//!
//! # Pipeline
//!
//! Paginator → Flattener → Redactor, strictly in that order: pages are
//! fetched one at a time, flattening starts only once pagination has
//! completed, and both transform stages are pure functions of their
//! inputs. Any failure during the fetch aborts the whole operation; the
//! `Display` form of [`CheckError`] is the `<error-kind>: <message>`
//! sentinel the hosting tool shows in place of a table.
//!
//! # Modules
//!
//! - [`client`] - paginated fetch and the fetch → flatten → redact composition
//! - [`query`] - the fixed export query and project node-id encoding
//! - [`types`] - typed model of the response tree
//! - [`transport`] - network seam (`Transport` trait + HTTP implementation)
//! - [`flatten`] - tree-to-rows unnesting
//! - [`table`] - ordered row/table model with CSV rendering
//! - [`redact`] - authorship twin-column selection
//! - [`testing`] - mock transport for tests

pub mod client;
pub mod error;
pub mod flatten;
pub mod query;
pub mod redact;
pub mod table;
pub mod testing;
pub mod transport;
pub mod types;

pub use client::{fetch, CheckClient, FetchParams};
pub use error::{CheckError, Result};
pub use flatten::{flatten, ANONYMOUS, MISSING};
pub use query::{media_page_query, project_node_id, PAGE_SIZE};
pub use redact::{redact, ANON_SUFFIX};
pub use table::{Cell, Row, RowBuilder, Table};
pub use transport::{HttpTransport, Transport};
pub use types::{
    Annotation, Annotator, Comment, Connection, Edge, Embed, GraphqlError, GraphqlResponse,
    LogEntry, LogUser, MediaConnection, MediaContent, PageInfo, Project, ProjectMedia,
    ResponseData, Tag, Task, TaskResponse, User,
};
