//! Session domain module.
//!
//! Handles mentorship session records: descriptive fields, the embedded
//! roster, the stored document layout and the ordered list observers see.

mod aggregate;
pub mod document;
mod errors;
mod fields;
mod view;

pub use aggregate::{Availability, Session};
pub use errors::SessionError;
pub use fields::{SessionDetails, SessionFields, DEFAULT_EXPERTISE};
pub use view::{
    FilterScope, SessionList, SessionParticipant, Timetable, TimetableCell, TimetableRow,
};
