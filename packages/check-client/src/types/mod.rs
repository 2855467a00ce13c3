//! Typed model of the export query's response tree.
//!
//! Everything here is read-only once fetched: the paginator assembles the
//! tree page by page, the flattener consumes it exactly once, and no
//! entity is mutated in place after construction.

pub mod envelope;
pub mod media;
pub mod task;
pub mod user;

pub(crate) mod epoch;

pub use envelope::{
    Connection, Edge, GraphqlError, GraphqlResponse, MediaConnection, PageInfo, Project,
    ResponseData,
};
pub use media::{Comment, Embed, LogEntry, MediaContent, ProjectMedia, Tag};
pub use task::{Task, TaskResponse};
pub use user::{Annotation, Annotator, LogUser, User};
