//! Application layer - command handlers, the change hub and the service
//! facade.
//!
//! Handlers orchestrate domain logic against the ports. The hub turns the
//! store's change feed into filtered snapshots for local observers.

pub mod handlers;
pub mod propagation;
mod service;

pub use handlers::roster::{
    AdminAssignCommand, AdminAssignHandler, AdminAssignResult, BookSlotCommand, BookSlotHandler,
    RequestSlotCommand, RequestSlotHandler, RequestSlotResult, SetParticipantStatusCommand,
    SetParticipantStatusHandler, ToggleCheckInCommand, ToggleCheckInHandler,
};
pub use handlers::session::{
    CreateSessionCommand, CreateSessionHandler, CreateSessionResult, DeleteSessionCommand,
    DeleteSessionHandler, GetSessionHandler, ListSessionsHandler, UpdateSessionCommand,
    UpdateSessionHandler,
};
pub use handlers::user::{ListProfilesHandler, ListProfilesQuery, ProfileListing};
pub use handlers::SessionRecords;
pub use propagation::{ChangeHub, FeedListener, SessionSubscription};
pub use service::RosterService;
