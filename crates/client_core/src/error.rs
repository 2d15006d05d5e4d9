//! Failure taxonomy for dashboard mutations.

use std::time::Duration;

use shared::domain::DeleteTarget;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("request could not be built: {0}")]
    Request(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("unexpected success status {0}")]
    UnexpectedStatus(u16),
}

impl MutationError {
    pub fn status(&self) -> Option<u16> {
        match self {
            MutationError::Rejected { status, .. } => Some(*status),
            MutationError::UnexpectedStatus(status) => Some(*status),
            _ => None,
        }
    }

    /// Text shown to the user in the error notification.
    ///
    /// The server-provided message wins when present; otherwise a generic
    /// per-target text is used.
    pub fn user_message(&self, target: &DeleteTarget) -> String {
        let generic = target.generic_failure_message();
        match self {
            MutationError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            MutationError::Rejected {
                status,
                message: None,
            } => format!("{generic} (status {status})"),
            MutationError::UnexpectedStatus(status) => {
                format!("{generic} (unexpected status {status})")
            }
            MutationError::Timeout(after) => format!(
                "{generic}: the server did not respond within {}s",
                after.as_secs().max(1)
            ),
            MutationError::Transport(_) => format!("{generic}: the server could not be reached"),
            MutationError::Request(reason) => format!("{generic}: {reason}"),
        }
    }
}
