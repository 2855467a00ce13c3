//! Typed errors for the Check client.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The `Display` form of every variant is `<error-kind>: <message>` —
//! exactly the sentinel string the hosting tool expects in place of a
//! table when a fetch fails, so the outermost boundary only needs
//! `err.to_string()`.

use thiserror::Error;

/// Errors that can occur while fetching or tabulating a project.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The API response itself reported a failure. The message is taken
    /// verbatim from the first reported error.
    #[error("CheckError: {0}")]
    Api(String),

    /// The HTTP request failed at the transport level.
    #[error("TransportError: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("TransportError: HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A body or embedded content string was not valid JSON.
    #[error("DecodeError: {0}")]
    Decode(#[from] serde_json::Error),

    /// Required nested fields were absent where the algorithm assumes
    /// presence.
    #[error("ShapeError: {0}")]
    Shape(String),
}

/// Result type alias for Check operations.
pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_as_sentinel() {
        let err = CheckError::Api("Not Found".to_string());
        assert_eq!(err.to_string(), "CheckError: Not Found");
    }

    #[test]
    fn shape_error_carries_kind_prefix() {
        let err = CheckError::Shape("project node missing".to_string());
        assert_eq!(err.to_string(), "ShapeError: project node missing");
    }
}
