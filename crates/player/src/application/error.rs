//! Service layer error types
//!
//! Two tiers: the transport tier (`ApiError`, nothing usable came back) and
//! the application tier (the backend answered with a non-success status).

use crate::ports::outbound::ApiError;

/// Shown when a rejection carries no message of its own
const UNSPECIFIED_REJECTION: &str = "request was not successful";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Transport(#[from] ApiError),
    /// `status != "success"`; `message` is the backend's own text
    #[error("{message}")]
    Rejected { message: String },
}

impl ServiceError {
    pub fn rejected(message: Option<String>) -> Self {
        ServiceError::Rejected {
            message: message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UNSPECIFIED_REJECTION.to_string()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ServiceError::Rejected { .. })
    }

    /// User-facing text.
    ///
    /// Rejections quote the backend verbatim; transport failures get the
    /// generic `hint` instead of internal detail.
    pub fn user_message(&self, action: &str, hint: &str) -> String {
        match self {
            ServiceError::Rejected { message } => format!("Error {action}: {message}"),
            ServiceError::Transport(_) => format!("Error {action}. {hint}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_quotes_backend_message() {
        let err = ServiceError::rejected(Some("No simulation initialized".to_string()));
        assert_eq!(
            err.user_message("running simulation", "Check the log for details."),
            "Error running simulation: No simulation initialized"
        );
    }

    #[test]
    fn transport_failure_uses_hint() {
        let err = ServiceError::from(ApiError::Network("connection refused".to_string()));
        assert_eq!(
            err.user_message("seeding scenario", "Check the log for details."),
            "Error seeding scenario. Check the log for details."
        );
        assert!(!err.is_rejected());
    }

    #[test]
    fn empty_rejection_message_gets_fallback() {
        assert_eq!(
            ServiceError::rejected(Some(String::new())).to_string(),
            UNSPECIFIED_REJECTION
        );
    }
}
