//! Session aggregate.
//!
//! A session is a bookable mentorship slot: descriptive fields, a capacity
//! and the roster of participants.
//!
//! # Invariants
//!
//! - `id` is assigned by the store and never reused
//! - `max_participants` is positive
//! - the roster holds at most one entry per uid
//! - `status` is advisory; [`Session::live_status`] is computed from the roster

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::domain::roster::{Participant, ParticipantStatus, Roster};

use super::fields::SessionDetails;

/// Denormalized availability flag stored with each session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Availability {
    #[default]
    Free,
    Busy,
}

impl Availability {
    /// BUSY while an approved participant is checked in.
    pub fn of(roster: &Roster) -> Self {
        if roster.is_live() {
            Availability::Busy
        } else {
            Availability::Free
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Free => write!(f, "FREE"),
            Availability::Busy => write!(f, "BUSY"),
        }
    }
}

/// A decoded session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: SessionId,
    revision: u64,
    #[serde(flatten)]
    details: SessionDetails,
    status: Availability,
    created_at: Option<Timestamp>,
    participants: Roster,
}

impl Session {
    /// Reconstitute a session from storage (no validation).
    pub fn reconstitute(
        id: SessionId,
        revision: u64,
        details: SessionDetails,
        status: Availability,
        created_at: Option<Timestamp>,
        participants: Roster,
    ) -> Self {
        Self {
            id,
            revision,
            details,
            status,
            created_at,
            participants,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Store revision this value was read at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn details(&self) -> &SessionDetails {
        &self.details
    }

    pub fn mentor_name(&self) -> &str {
        &self.details.mentor_name
    }

    pub fn room(&self) -> &str {
        &self.details.room
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.details.photo_url.as_deref()
    }

    pub fn expertise(&self) -> &str {
        &self.details.expertise
    }

    pub fn datetime(&self) -> &Timestamp {
        &self.details.datetime
    }

    pub fn max_participants(&self) -> u32 {
        self.details.max_participants
    }

    /// Stored advisory flag.
    pub fn status(&self) -> Availability {
        self.status
    }

    pub fn created_at(&self) -> Option<&Timestamp> {
        self.created_at.as_ref()
    }

    pub fn roster(&self) -> &Roster {
        &self.participants
    }

    pub fn participants(&self) -> &[Participant] {
        self.participants.participants()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read model
    // ─────────────────────────────────────────────────────────────────────────

    /// Availability derived from the roster rather than the stored flag.
    pub fn live_status(&self) -> Availability {
        Availability::of(&self.participants)
    }

    pub fn approved_queue(&self) -> Vec<&Participant> {
        self.participants.approved_queue()
    }

    /// Status of `uid` within this session, if it has an entry.
    pub fn user_status(&self, uid: &UserId) -> Option<ParticipantStatus> {
        self.participants.get(uid).map(|p| p.status)
    }

    pub fn occupancy(&self) -> usize {
        self.participants.occupancy()
    }

    pub fn is_full(&self) -> bool {
        self.occupancy() >= self.details.max_participants as usize
    }

    /// True when `uid` holds a pending or approved entry here.
    pub fn has_active_booking(&self, uid: &UserId) -> bool {
        self.participants.has_active_entry(uid)
    }
}
