//! Roster module - participants, their statuses and the keyed roster.
//!
//! Pure domain logic: no I/O. The application layer loads a roster from a
//! stored session, mutates a private copy and writes it back.

mod admission;
mod display_name;
mod participant;
#[allow(clippy::module_inception)]
mod roster;

pub use admission::{Admission, AdmissionOutcome, BookingRefusal, CapacityPolicy};
pub use display_name::{
    resolve_display_name, resolve_with, NameResolver, NameSources, FALLBACK_NAME, RESOLVERS,
};
pub use participant::{Participant, ParticipantStatus};
pub use roster::{Roster, RosterChange};
