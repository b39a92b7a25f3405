use thiserror::Error;

/// Errors from a backend lookup.
///
/// Add and status operations never return these; they fold failures into
/// their result types instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{backend} authentication failed - verify your API key is correct")]
    Auth { backend: &'static str },

    #[error("{backend} lookup endpoint not found")]
    NotFound { backend: &'static str },

    #[error("{backend} API error: {message}")]
    Backend {
        backend: &'static str,
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    pub(crate) fn status(backend: &'static str, status: u16, body: &str) -> Self {
        ApiError::Backend {
            backend,
            status: Some(status),
            message: format!("status {status}: {body}"),
        }
    }

    pub(crate) fn transport(backend: &'static str, err: TransportError) -> Self {
        ApiError::Backend {
            backend,
            status: None,
            message: err.to_string(),
        }
    }
}

/// Network-level failures below the HTTP status line.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
