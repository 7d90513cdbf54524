// Client-side error taxonomy
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Every failure a client operation can surface to its caller.
///
/// Operations return these as values; nothing here is retried. Callers are
/// expected to turn them into a user-visible notice and move on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Detected before any request was issued
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Client-side admin gate. The server enforces authorization on its own;
    /// this variant only means the request was never sent.
    #[error("Not authorized to perform this action")]
    NotAuthorized,

    /// Name-to-identifier resolution came back empty
    #[error("{resource} '{name}' not found")]
    NotFound { resource: &'static str, name: String },

    /// More than one match while unique resolution is required
    #[error("{resource} name '{name}' is ambiguous ({count} matches)")]
    Ambiguous {
        resource: &'static str,
        name: String,
        count: usize,
    },

    /// 4xx from the backend
    #[error("Request rejected by server with status {0}")]
    ClientRejected(u16),

    /// 5xx from the backend
    #[error("Server error with status {0}")]
    ServerRejected(u16),

    /// A success status other than the one the endpoint documents
    #[error("Unexpected response status {0}")]
    UnexpectedStatus(u16),

    /// DNS, refused connection, timeout and other transport failures
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// A successful response whose body could not be interpreted
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The change was stored, but reloading the collection afterwards failed.
    /// The mirror still shows the state from before the change.
    #[error("Change saved, but reloading the list failed: {0}")]
    RefreshFailed(Box<ClientError>),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status carried by server rejections, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ClientRejected(status)
            | ClientError::ServerRejected(status)
            | ClientError::UnexpectedStatus(status) => Some(*status),
            _ => None,
        }
    }

    /// Classify a non-success status into the matching rejection variant
    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            ClientError::ServerRejected(status)
        } else {
            ClientError::ClientRejected(status)
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::ValidationFailed(_) => "VALIDATION_FAILED",
            ClientError::NotAuthorized => "NOT_AUTHORIZED",
            ClientError::NotFound { .. } => "NOT_FOUND",
            ClientError::Ambiguous { .. } => "AMBIGUOUS",
            ClientError::ClientRejected(_) => "CLIENT_REJECTED",
            ClientError::ServerRejected(_) => "SERVER_REJECTED",
            ClientError::UnexpectedStatus(_) => "UNEXPECTED_STATUS",
            ClientError::NetworkFailure(_) => "NETWORK_FAILURE",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::RefreshFailed(_) => "REFRESH_FAILED",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Config(_) => "CONFIG_ERROR",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::ValidationFailed(message.into())
    }

    /// Wrap the error of a reload that followed a successful mutation
    pub fn refresh_failed(err: ClientError) -> Self {
        ClientError::RefreshFailed(Box::new(err))
    }

    pub fn not_found(resource: &'static str, name: impl Into<String>) -> Self {
        ClientError::NotFound {
            resource,
            name: name.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16())
        } else {
            ClientError::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
