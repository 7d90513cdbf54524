//! Page controllers: wire user actions to the synchronizers and turn every
//! outcome into a [`Notice`] for the user.

pub mod ingredient;
pub mod recipe;

pub use ingredient::IngredientPage;
pub use recipe::RecipePage;

use serde::Serialize;

use crate::error::ClientError;
use crate::models::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    /// The action took effect but something after it failed
    Warning,
    Error,
}

/// Message shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    #[serde(skip)]
    pub error: Option<ClientError>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, error: ClientError) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            error: Some(error),
        }
    }

    pub fn warning(message: impl Into<String>, error: ClientError) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Per-action wording for the failure classes every page shares
pub(crate) struct FailureText<'a> {
    pub invalid: &'a str,
    pub rejected: &'a str,
    pub transport: &'a str,
}

pub(crate) fn failure<R: Resource>(err: ClientError, text: FailureText<'_>) -> Notice {
    let message = match &err {
        ClientError::ValidationFailed(_) => text.invalid.to_string(),
        ClientError::NotFound { .. } => format!("{} not found", R::LABEL),
        ClientError::NotAuthorized => format!("Only admins can delete {}", R::COLLECTION),
        ClientError::Ambiguous { name, count, .. } => {
            format!("{} {} are named '{}'", count, R::COLLECTION, name)
        }
        ClientError::ClientRejected(_)
        | ClientError::ServerRejected(_)
        | ClientError::UnexpectedStatus(_)
        | ClientError::Decode(_) => text.rejected.to_string(),
        ClientError::NetworkFailure(_) => text.transport.to_string(),
        ClientError::RefreshFailed(_) | ClientError::Storage(_) | ClientError::Config(_) => err.to_string(),
    };
    tracing::debug!(error = %err, "{}", message);
    Notice::error(message, err)
}

/// A mutation the server accepted but whose follow-up reload failed. Reports
/// the change as done, followed by the page's own retrieve-failure wording,
/// so a retry does not repeat the change.
pub(crate) fn stale(done: &str, retrieve: &str, err: ClientError) -> Notice {
    tracing::warn!(error = %err, "{}, list not reloaded", done);
    Notice::warning(format!("{}. {}", done, retrieve), err)
}
