//! Capacity admission and booking refusals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SessionId, UserId};

use super::roster::Roster;

/// How a full session treats a new occupying request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPolicy {
    /// Admit and warn.
    #[default]
    Soft,
    /// Refuse.
    Hard,
}

/// Admission check applied to a slot request inside the roster write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Admission {
    /// No capacity check.
    #[default]
    Unchecked,
    /// Check occupancy against the session capacity.
    Capacity(CapacityPolicy),
}

/// Result of an admission check that did not refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    Admitted,
    /// Admitted past capacity under the soft policy.
    Overbooked { occupancy: usize, capacity: u32 },
}

/// Reason a booking was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingRefusal {
    SessionFull { capacity: u32 },
    ActiveBookingElsewhere { session_id: SessionId },
}

impl fmt::Display for BookingRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingRefusal::SessionFull { capacity } => {
                write!(f, "session is full ({} seats)", capacity)
            }
            BookingRefusal::ActiveBookingElsewhere { session_id } => {
                write!(f, "already holds an active booking in session {}", session_id)
            }
        }
    }
}

impl Admission {
    /// Decides whether `uid` may request a slot on `roster`.
    ///
    /// Only a request that would add a new seat is checked; a user already
    /// occupying a seat re-requests freely.
    pub fn evaluate(
        &self,
        roster: &Roster,
        uid: &UserId,
        capacity: u32,
    ) -> Result<AdmissionOutcome, BookingRefusal> {
        let policy = match self {
            Admission::Unchecked => return Ok(AdmissionOutcome::Admitted),
            Admission::Capacity(policy) => *policy,
        };

        let already_seated = roster.get(uid).is_some_and(|p| p.status.occupies_seat());
        let occupancy = roster.occupancy();
        if already_seated || occupancy < capacity as usize {
            return Ok(AdmissionOutcome::Admitted);
        }

        match policy {
            CapacityPolicy::Hard => Err(BookingRefusal::SessionFull { capacity }),
            CapacityPolicy::Soft => Ok(AdmissionOutcome::Overbooked {
                occupancy: occupancy + 1,
                capacity,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster::ParticipantStatus;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn full_roster() -> Roster {
        let mut roster = Roster::new();
        roster.request(uid("a"), "A".into());
        roster
    }

    #[test]
    fn unchecked_always_admits() {
        let outcome = Admission::Unchecked.evaluate(&full_roster(), &uid("b"), 1);
        assert_eq!(outcome, Ok(AdmissionOutcome::Admitted));
    }

    #[test]
    fn hard_policy_refuses_full_session() {
        let outcome =
            Admission::Capacity(CapacityPolicy::Hard).evaluate(&full_roster(), &uid("b"), 1);
        assert_eq!(outcome, Err(BookingRefusal::SessionFull { capacity: 1 }));
    }

    #[test]
    fn soft_policy_overbooks() {
        let outcome =
            Admission::Capacity(CapacityPolicy::Soft).evaluate(&full_roster(), &uid("b"), 1);
        assert_eq!(
            outcome,
            Ok(AdmissionOutcome::Overbooked {
                occupancy: 2,
                capacity: 1
            })
        );
    }

    #[test]
    fn seated_user_may_re_request() {
        let outcome =
            Admission::Capacity(CapacityPolicy::Hard).evaluate(&full_roster(), &uid("a"), 1);
        assert_eq!(outcome, Ok(AdmissionOutcome::Admitted));
    }

    #[test]
    fn rejected_entries_free_their_seat() {
        let mut roster = full_roster();
        roster.set_status(&uid("a"), ParticipantStatus::Rejected);

        let outcome = Admission::Capacity(CapacityPolicy::Hard).evaluate(&roster, &uid("b"), 1);
        assert_eq!(outcome, Ok(AdmissionOutcome::Admitted));

        // the rejected user coming back needs a seat again
        roster.request(uid("b"), "B".into());
        let outcome = Admission::Capacity(CapacityPolicy::Hard).evaluate(&roster, &uid("a"), 1);
        assert_eq!(outcome, Err(BookingRefusal::SessionFull { capacity: 1 }));
    }

    #[test]
    fn capacity_policy_deserializes_lowercase() {
        let policy: CapacityPolicy = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(policy, CapacityPolicy::Hard);
    }
}
