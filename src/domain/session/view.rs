//! Materialized session lists and the read models built on them.

use serde::Serialize;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::roster::{Participant, ParticipantStatus};

use super::aggregate::Session;

/// Which sessions an observer wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterScope {
    #[default]
    All,
    /// Case-insensitive substring match on the mentor name.
    MentorName(String),
    /// Sessions where the user has an entry of any status.
    Participant(UserId),
}

impl FilterScope {
    pub fn matches(&self, session: &Session) -> bool {
        match self {
            FilterScope::All => true,
            FilterScope::MentorName(query) => session
                .mentor_name()
                .to_lowercase()
                .contains(&query.to_lowercase()),
            FilterScope::Participant(uid) => session.roster().contains(uid),
        }
    }
}

/// Ordered snapshot of sessions, always a complete replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionList {
    sessions: Vec<Session>,
}

/// A participant entry tagged with the session that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionParticipant {
    pub session_id: SessionId,
    pub mentor_name: String,
    pub participant: Participant,
}

/// Mentor-by-time grid of sessions as seen by one user.
///
/// Columns are mentor names and rows are `HH:MM` slots (UTC), both in order
/// of first appearance. The date is not part of the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub mentors: Vec<String>,
    pub rows: Vec<TimetableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRow {
    pub slot: String,
    /// One cell per mentor column; `None` where the mentor has no session.
    pub cells: Vec<Option<TimetableCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableCell {
    pub session_id: SessionId,
    pub room: String,
    pub expertise: String,
    /// The viewing user is approved in this session.
    pub mine: bool,
}

impl Timetable {
    /// The user's approved cells, as `(slot, mentor)` pairs.
    pub fn my_slots(&self) -> Vec<(&str, &str)> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.cells
                    .iter()
                    .zip(&self.mentors)
                    .filter(|(cell, _)| cell.as_ref().is_some_and(|c| c.mine))
                    .map(move |(_, mentor)| (row.slot.as_str(), mentor.as_str()))
            })
            .collect()
    }
}

impl SessionList {
    /// Builds a list ordered by datetime, ties broken by id.
    pub fn new(mut sessions: Vec<Session>) -> Self {
        sessions.sort_by(|a, b| {
            a.datetime()
                .cmp(b.datetime())
                .then_with(|| a.id().cmp(b.id()))
        });
        Self { sessions }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    /// Subset visible under `scope`, order preserved.
    pub fn filtered(&self, scope: &FilterScope) -> SessionList {
        Self {
            sessions: self
                .sessions
                .iter()
                .filter(|s| scope.matches(s))
                .cloned()
                .collect(),
        }
    }

    /// First session where `uid` holds a pending or approved entry.
    pub fn active_booking(&self, uid: &UserId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.has_active_booking(uid))
    }

    /// Every pending entry across all sessions.
    pub fn pending_requests(&self) -> Vec<SessionParticipant> {
        self.entries_with_status(ParticipantStatus::Pending)
    }

    /// Every approved entry across all sessions.
    pub fn approved_participants(&self) -> Vec<SessionParticipant> {
        self.entries_with_status(ParticipantStatus::Approved)
    }

    /// Timetable for `uid`. When two sessions share a mentor and slot, the
    /// earlier one fills the cell.
    pub fn timetable(&self, uid: &UserId) -> Timetable {
        let mut mentors: Vec<String> = Vec::new();
        let mut slots: Vec<String> = Vec::new();
        for session in &self.sessions {
            if !mentors.iter().any(|m| m == session.mentor_name()) {
                mentors.push(session.mentor_name().to_string());
            }
            let slot = slot_of(session);
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }

        let rows = slots
            .into_iter()
            .map(|slot| {
                let cells = mentors
                    .iter()
                    .map(|mentor| {
                        self.sessions
                            .iter()
                            .find(|s| s.mentor_name() == mentor && slot_of(s) == slot)
                            .map(|s| TimetableCell {
                                session_id: s.id().clone(),
                                room: s.room().to_string(),
                                expertise: s.expertise().to_string(),
                                mine: s.user_status(uid) == Some(ParticipantStatus::Approved),
                            })
                    })
                    .collect();
                TimetableRow { slot, cells }
            })
            .collect();

        Timetable { mentors, rows }
    }

    fn entries_with_status(&self, status: ParticipantStatus) -> Vec<SessionParticipant> {
        self.sessions
            .iter()
            .flat_map(|session| {
                session
                    .roster()
                    .with_status(status)
                    .into_iter()
                    .map(move |p| SessionParticipant {
                        session_id: session.id().clone(),
                        mentor_name: session.mentor_name().to_string(),
                        participant: p.clone(),
                    })
            })
            .collect()
    }
}

fn slot_of(session: &Session) -> String {
    session.datetime().as_datetime().format("%H:%M").to_string()
}

impl IntoIterator for SessionList {
    type Item = Session;
    type IntoIter = std::vec::IntoIter<Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::roster::Roster;
    use crate::domain::session::{Availability, SessionDetails};

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn session(id: &str, mentor: &str, at: &str, roster: Roster) -> Session {
        Session::reconstitute(
            SessionId::new(id).unwrap(),
            1,
            SessionDetails {
                mentor_name: mentor.into(),
                room: "R".into(),
                photo_url: None,
                expertise: "General".into(),
                datetime: Timestamp::parse_rfc3339(at).unwrap(),
                max_participants: 2,
            },
            Availability::Free,
            None,
            roster,
        )
    }

    fn sample() -> SessionList {
        let mut first = Roster::new();
        first.request(uid("alice"), "Alice".into());
        let mut second = Roster::new();
        second.assign(uid("bob"), "Bob".into());
        second.request(uid("carol"), "Carol".into());

        SessionList::new(vec![
            session("s2", "Grace Hopper", "2026-02-01T10:00:00Z", second),
            session("s1", "Ada Lovelace", "2026-01-01T10:00:00Z", first),
            session("s0", "Alan Turing", "2026-02-01T10:00:00Z", Roster::new()),
        ])
    }

    #[test]
    fn ordered_by_datetime_then_id() {
        let ids: Vec<_> = sample().iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, ["s1", "s0", "s2"]);
    }

    #[test]
    fn mentor_filter_is_case_insensitive_substring() {
        let list = sample().filtered(&FilterScope::MentorName("HOP".into()));
        assert_eq!(list.len(), 1);
        assert_eq!(list.sessions()[0].mentor_name(), "Grace Hopper");
    }

    #[test]
    fn participant_filter_keeps_sessions_with_entry() {
        let list = sample().filtered(&FilterScope::Participant(uid("carol")));
        assert_eq!(list.len(), 1);
        assert_eq!(list.sessions()[0].id().as_str(), "s2");
        assert_eq!(sample().filtered(&FilterScope::All).len(), 3);
    }

    #[test]
    fn cross_session_listings_are_tagged() {
        let list = sample();
        let pending = list.pending_requests();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].session_id.as_str(), "s1");
        assert_eq!(pending[1].participant.uid, uid("carol"));

        let approved = list.approved_participants();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].mentor_name, "Grace Hopper");
    }

    #[test]
    fn active_booking_across_list() {
        let list = sample();
        assert_eq!(
            list.active_booking(&uid("bob")).map(|s| s.id().as_str()),
            Some("s2")
        );
        assert!(list.active_booking(&uid("nobody")).is_none());
    }

    #[test]
    fn timetable_groups_by_mentor_and_slot() {
        let mut mine = Roster::new();
        mine.assign(uid("alice"), "Alice".into());
        let mut pending = Roster::new();
        pending.request(uid("alice"), "Alice".into());

        let list = SessionList::new(vec![
            session("a1", "Ada Lovelace", "2026-01-01T10:00:00Z", mine),
            session("g1", "Grace Hopper", "2026-01-01T10:00:00Z", pending),
            session("a2", "Ada Lovelace", "2026-01-01T11:30:00Z", Roster::new()),
            session("a3", "Ada Lovelace", "2026-01-02T10:00:00Z", Roster::new()),
        ]);
        let table = list.timetable(&uid("alice"));

        assert_eq!(table.mentors, ["Ada Lovelace", "Grace Hopper"]);
        let slots: Vec<_> = table.rows.iter().map(|r| r.slot.as_str()).collect();
        assert_eq!(slots, ["10:00", "11:30"]);

        let ten = &table.rows[0].cells;
        assert_eq!(ten[0].as_ref().map(|c| c.session_id.as_str()), Some("a1"));
        assert!(ten[0].as_ref().is_some_and(|c| c.mine));
        assert!(ten[1].as_ref().is_some_and(|c| !c.mine));
        assert!(table.rows[1].cells[1].is_none());

        assert_eq!(table.my_slots(), [("10:00", "Ada Lovelace")]);
        assert!(list.timetable(&uid("bob")).my_slots().is_empty());
    }
}
