//! UI/backend events and error modeling for the dashboard controller.

use shared::protocol::{DietChartSummary, PatientSummary};

pub enum UiEvent {
    Info(String),
    Toast(Toast),
    Navigate(String),
    PatientsLoaded(Vec<PatientSummary>),
    DietChartsLoaded(Vec<DietChartSummary>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadPatients,
    LoadDietCharts,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("session expired")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("malformed")
            || message_lower.contains("invalid")
            || message_lower.contains("missing")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("failed to fetch")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status bar.
    pub fn summary(&self) -> String {
        let what = match self.context {
            UiErrorContext::BackendStartup => "Backend worker failed to start",
            UiErrorContext::LoadPatients => "Could not load patients",
            UiErrorContext::LoadDietCharts => "Could not load diet charts",
            UiErrorContext::General => "Something went wrong",
        };
        match self.category {
            UiErrorCategory::Auth => format!("{what}: your session is not authorized; sign in again"),
            UiErrorCategory::Transport => format!("{what}: server unreachable; check the API URL and retry"),
            _ => format!("{what}: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_rejected_listing_as_auth() {
        let err = UiError::from_message(
            UiErrorContext::LoadPatients,
            "server rejected listing of patients: HTTP status client error (401 Unauthorized)",
        );
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert!(err.requires_reauth());
        assert!(err.summary().starts_with("Could not load patients"));
    }

    #[test]
    fn classifies_fetch_failures_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::LoadDietCharts,
            "failed to fetch http://127.0.0.1:5000/api/diet-charts: error sending request",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(!err.requires_reauth());
        assert_eq!(err.context(), UiErrorContext::LoadDietCharts);
    }

    #[test]
    fn unknown_errors_keep_their_message() {
        let err = UiError::from_message(UiErrorContext::General, "kaboom");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.summary(), "Something went wrong: kaboom");
        assert_eq!(err.message(), "kaboom");
    }
}
