//! Participant entity and its status vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{UserId, ValidationError};

/// Membership status of a participant within one session.
///
/// Any status may be set from any other by an admin; the vocabulary is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl ParticipantStatus {
    pub const ALL: [ParticipantStatus; 4] = [
        ParticipantStatus::Pending,
        ParticipantStatus::Approved,
        ParticipantStatus::Rejected,
        ParticipantStatus::Completed,
    ];

    /// Pending or approved entries count as an active booking.
    pub fn is_active(&self) -> bool {
        matches!(self, ParticipantStatus::Pending | ParticipantStatus::Approved)
    }

    /// Every entry except a rejected one takes a seat.
    pub fn occupies_seat(&self) -> bool {
        !matches!(self, ParticipantStatus::Rejected)
    }

    /// Check-in value forced by an admin status change.
    pub fn forced_check_in(&self) -> bool {
        matches!(self, ParticipantStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Pending => "pending",
            ParticipantStatus::Approved => "approved",
            ParticipantStatus::Rejected => "rejected",
            ParticipantStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParticipantStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ParticipantStatus::Pending),
            "approved" => Ok(ParticipantStatus::Approved),
            "rejected" => Ok(ParticipantStatus::Rejected),
            "completed" => Ok(ParticipantStatus::Completed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown participant status '{}'", other),
            )),
        }
    }
}

/// One user's membership record within a session's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub uid: UserId,
    pub name: String,
    #[serde(default)]
    pub status: ParticipantStatus,
    #[serde(default)]
    pub checked_in: bool,
}

impl Participant {
    /// A fresh request awaiting approval.
    pub fn pending(uid: UserId, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            status: ParticipantStatus::Pending,
            checked_in: false,
        }
    }

    /// An entry seated directly by an admin.
    pub fn approved(uid: UserId, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            status: ParticipantStatus::Approved,
            checked_in: false,
        }
    }

    /// Sets the status and the check-in flag it implies in one step.
    pub fn set_status(&mut self, status: ParticipantStatus) {
        self.status = status;
        self.checked_in = status.forced_check_in();
    }

    /// Back to pending with a refreshed name; check-in is left as it was.
    pub fn reactivate(&mut self, name: impl Into<String>) {
        self.status = ParticipantStatus::Pending;
        self.name = name.into();
    }

    /// Flips the check-in flag and returns the new value.
    pub fn toggle_check_in(&mut self) -> bool {
        self.checked_in = !self.checked_in;
        self.checked_in
    }

    /// Approved and physically present.
    pub fn is_mentoring(&self) -> bool {
        self.status == ParticipantStatus::Approved && self.checked_in
    }
}
