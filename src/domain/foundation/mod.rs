//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, caller identity, command metadata and
//! the error types that form the vocabulary of the roster domain.

mod auth;
mod command;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{SessionId, SubscriptionId, UserId};
pub use timestamp::Timestamp;
