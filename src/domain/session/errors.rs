//! Session-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, UserId, ValidationError};
use crate::domain::roster::BookingRefusal;

/// Errors surfaced by roster and lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session was not found.
    NotFound(SessionId),
    /// The uid has no entry in the session's roster.
    ParticipantNotFound {
        session_id: SessionId,
        user_id: UserId,
    },
    /// Supplied fields failed validation.
    InvalidInput { field: String, message: String },
    /// A concurrent write won; the operation may be retried.
    ConflictRetryable(SessionId),
    /// A collaborator failed or retries were exhausted.
    UpstreamUnavailable(String),
    /// Caller lacks the admin role.
    Forbidden,
    /// No signed-in user.
    Unauthenticated,
    /// Booking refused by policy.
    PolicyViolation(BookingRefusal),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }
    pub fn participant_not_found(session_id: SessionId, user_id: UserId) -> Self {
        SessionError::ParticipantNotFound {
            session_id,
            user_id,
        }
    }
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn upstream(message: impl Into<String>) -> Self {
        SessionError::UpstreamUnavailable(message.into())
    }
    pub fn forbidden() -> Self {
        SessionError::Forbidden
    }
    pub fn policy(reason: BookingRefusal) -> Self {
        SessionError::PolicyViolation(reason)
    }

    /// Returns true for either flavour of not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SessionError::NotFound(_) | SessionError::ParticipantNotFound { .. }
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::ParticipantNotFound { .. } => ErrorCode::ParticipantNotFound,
            SessionError::InvalidInput { .. } => ErrorCode::ValidationFailed,
            SessionError::ConflictRetryable(_) => ErrorCode::RevisionConflict,
            SessionError::UpstreamUnavailable(_) => ErrorCode::DatabaseError,
            SessionError::Forbidden => ErrorCode::Forbidden,
            SessionError::Unauthenticated => ErrorCode::Unauthorized,
            SessionError::PolicyViolation(_) => ErrorCode::PolicyViolation,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SessionError::NotFound(id) => format!("Session not found: {}", id),
            SessionError::ParticipantNotFound {
                session_id,
                user_id,
            } => format!("Participant {} not found in session {}", user_id, session_id),
            SessionError::InvalidInput { field, message } => {
                format!("Invalid input for '{}': {}", field, message)
            }
            SessionError::ConflictRetryable(id) => {
                format!("Session {} was modified concurrently", id)
            }
            SessionError::UpstreamUnavailable(msg) => format!("Upstream unavailable: {}", msg),
            SessionError::Forbidden => "Permission denied".to_string(),
            SessionError::Unauthenticated => "Not signed in".to_string(),
            SessionError::PolicyViolation(reason) => format!("Booking refused: {}", reason),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => SessionError::InvalidInput {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Forbidden => SessionError::Forbidden,
            ErrorCode::Unauthorized => SessionError::Unauthenticated,
            _ => SessionError::UpstreamUnavailable(err.to_string()),
        }
    }
}
