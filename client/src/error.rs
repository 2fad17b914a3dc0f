use thiserror::Error;

/// Shown for any transport-level failure; the underlying error goes to the log.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout, TLS.
    #[error("{NETWORK_ERROR_MESSAGE}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with `success: false`. `message` is shown verbatim.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Unknown skill, step, course, or notification.
    #[error("{message}")]
    NotFound { message: String },

    /// The body did not match the expected response schema.
    #[error("Unexpected response from {endpoint}: {detail}")]
    Malformed { endpoint: String, detail: String },

    /// Bad base URL or an HTTP client that could not be built.
    #[error("{0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn malformed(endpoint: &str, detail: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint: endpoint.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status when the backend produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Malformed { .. } | Self::Config(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Backend request failed: {err}");
        Self::Transport(err)
    }
}
