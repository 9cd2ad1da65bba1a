//! Feed error types.

/// Errors that can occur while fetching or decoding the station feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP transport failed (connection, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed endpoint returned a non-success status
    #[error("feed returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body is not a valid feed document
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Fixture file could not be read (mock feed only)
    #[error("fixture error: {message}")]
    Io { message: String },
}

impl FeedError {
    /// The HTTP status code behind this error, when one was observed.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Api { status, .. } => Some(*status),
            FeedError::Http(e) => e.status().map(|s| s.as_u16()),
            FeedError::Json { .. } | FeedError::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeedError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "feed returned status 500: Internal Server Error"
        );

        let err = FeedError::Json {
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn status_code_extraction() {
        let api = FeedError::Api {
            status: 503,
            message: String::new(),
        };
        assert_eq!(api.status(), Some(503));

        let json = FeedError::Json {
            message: "bad".into(),
        };
        assert_eq!(json.status(), None);
    }
}
