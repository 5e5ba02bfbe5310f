//! Roster command handlers.
//!
//! All roster writes go through [`RosterMutator`], which re-applies the
//! mutation on a fresh read whenever a concurrent write wins.

mod admin_assign;
mod book_slot;
mod mutation;
mod names;
mod request_slot;
mod set_participant_status;
mod toggle_check_in;

pub use admin_assign::{AdminAssignCommand, AdminAssignHandler, AdminAssignResult};
pub use book_slot::{BookSlotCommand, BookSlotHandler};
pub use mutation::{Mutated, RetryPolicy, RosterMutator};
pub use names::DisplayNames;
pub use request_slot::{RequestSlotCommand, RequestSlotHandler, RequestSlotResult};
pub use set_participant_status::{SetParticipantStatusCommand, SetParticipantStatusHandler};
pub use toggle_check_in::{ToggleCheckInCommand, ToggleCheckInHandler};
