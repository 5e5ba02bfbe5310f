//! Keyed participant collection of one session.
//!
//! # Invariants
//!
//! - No two entries share a `uid` (the index makes this structural)
//! - Insertion order is preserved for display only
//! - Mutations never touch entries other than the addressed one

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::domain::foundation::UserId;

use super::participant::{Participant, ParticipantStatus};

/// What a roster mutation did to the addressed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    /// A new entry was appended.
    Added,
    /// An existing entry was updated in place.
    Updated,
}

/// Participant collection keyed by `uid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<Participant>,
    index: HashMap<UserId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from a stored list.
    ///
    /// Repeated uids collapse into one entry: the first occurrence keeps its
    /// position and the last occurrence's values win. Returns the number of
    /// entries that were merged away.
    pub fn from_entries(entries: impl IntoIterator<Item = Participant>) -> (Self, usize) {
        let mut roster = Self::new();
        let mut merged = 0;
        for participant in entries {
            match roster.index.get(&participant.uid) {
                Some(&position) => {
                    roster.entries[position] = participant;
                    merged += 1;
                }
                None => roster.push(participant),
            }
        }
        (roster, merged)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, uid: &UserId) -> Option<&Participant> {
        self.index.get(uid).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, uid: &UserId) -> bool {
        self.index.contains_key(uid)
    }

    /// Entries in insertion order.
    pub fn participants(&self) -> &[Participant] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.entries.iter()
    }

    /// Number of entries holding a seat (everything but rejected).
    pub fn occupancy(&self) -> usize {
        self.entries
            .iter()
            .filter(|p| p.status.occupies_seat())
            .count()
    }

    /// True when an approved participant is checked in.
    pub fn is_live(&self) -> bool {
        self.entries.iter().any(Participant::is_mentoring)
    }

    /// Approved participants in queue order.
    pub fn approved_queue(&self) -> Vec<&Participant> {
        self.with_status(ParticipantStatus::Approved)
    }

    pub fn with_status(&self, status: ParticipantStatus) -> Vec<&Participant> {
        self.entries.iter().filter(|p| p.status == status).collect()
    }

    /// True when `uid` holds a pending or approved entry here.
    pub fn has_active_entry(&self, uid: &UserId) -> bool {
        self.get(uid).is_some_and(|p| p.status.is_active())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a pending entry, or re-activates an existing one in place.
    pub fn request(&mut self, uid: UserId, name: String) -> RosterChange {
        match self.get_mut(&uid) {
            Some(existing) => {
                existing.reactivate(name);
                RosterChange::Updated
            }
            None => {
                self.push(Participant::pending(uid, name));
                RosterChange::Added
            }
        }
    }

    /// Seats a user as approved, bypassing the pending stage.
    pub fn assign(&mut self, uid: UserId, name: String) -> RosterChange {
        match self.get_mut(&uid) {
            Some(existing) => {
                existing.name = name;
                existing.set_status(ParticipantStatus::Approved);
                RosterChange::Updated
            }
            None => {
                self.push(Participant::approved(uid, name));
                RosterChange::Added
            }
        }
    }

    /// Changes status (and the coupled check-in flag) of one entry.
    ///
    /// Returns `None` when `uid` is not on the roster.
    pub fn set_status(&mut self, uid: &UserId, status: ParticipantStatus) -> Option<&Participant> {
        let participant = self.get_mut(uid)?;
        participant.set_status(status);
        Some(participant)
    }

    /// Flips check-in of one entry, returning the new value.
    pub fn toggle_check_in(&mut self, uid: &UserId) -> Option<bool> {
        self.get_mut(uid).map(Participant::toggle_check_in)
    }

    fn get_mut(&mut self, uid: &UserId) -> Option<&mut Participant> {
        let position = *self.index.get(uid)?;
        self.entries.get_mut(position)
    }

    fn push(&mut self, participant: Participant) {
        self.index
            .insert(participant.uid.clone(), self.entries.len());
        self.entries.push(participant);
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
