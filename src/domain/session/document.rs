//! Storage document codec for session records.
//!
//! A session is stored as a flat JSON object with camelCase keys. Decoding is
//! tolerant of legacy participant entries (missing `status` or `checkedIn`)
//! and of repeated uids left behind by unkeyed array appends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use crate::domain::roster::{Participant, Roster};

use super::aggregate::{Availability, Session};
use super::fields::{SessionDetails, SessionFields, DEFAULT_EXPERTISE};

/// Stored field names.
pub mod keys {
    pub const MENTOR_NAME: &str = "mentorName";
    pub const ROOM: &str = "room";
    pub const PHOTO_URL: &str = "photoUrl";
    pub const EXPERTISE: &str = "expertise";
    pub const DATETIME: &str = "datetime";
    pub const MAX_PARTICIPANTS: &str = "maxParticipants";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "createdAt";
    pub const PARTICIPANTS: &str = "participants";
    pub const UID: &str = "uid";
}

pub type Fields = Map<String, Value>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    mentor_name: String,
    room: String,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default = "default_expertise")]
    expertise: String,
    datetime: Timestamp,
    max_participants: u32,
    #[serde(default)]
    status: Availability,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default)]
    participants: Vec<Participant>,
}

fn default_expertise() -> String {
    DEFAULT_EXPERTISE.to_string()
}

/// A decoded session plus how many duplicate roster entries were merged.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub session: Session,
    pub merged_duplicates: usize,
}

/// Decodes a stored field map into a [`Session`].
///
/// # Errors
///
/// - `DecodeFailed` if a required field is missing or mistyped
pub fn decode(id: &SessionId, revision: u64, fields: &Fields) -> Result<Decoded, DomainError> {
    let stored: StoredSession = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| {
            DomainError::new(ErrorCode::DecodeFailed, format!("Malformed session: {}", e))
                .with_detail("session_id", id.as_str())
        })?;

    let (participants, merged_duplicates) = Roster::from_entries(stored.participants);
    let details = SessionDetails {
        mentor_name: stored.mentor_name,
        room: stored.room,
        photo_url: stored.photo_url,
        expertise: stored.expertise,
        datetime: stored.datetime,
        max_participants: stored.max_participants,
    };

    Ok(Decoded {
        session: Session::reconstitute(
            id.clone(),
            revision,
            details,
            stored.status,
            stored.created_at,
            participants,
        ),
        merged_duplicates,
    })
}

/// Full document for a freshly created session.
pub fn encode_new(details: &SessionDetails, created_at: Timestamp) -> Fields {
    let mut fields = Fields::new();
    fields.insert(keys::MENTOR_NAME.into(), json(&details.mentor_name));
    fields.insert(keys::ROOM.into(), json(&details.room));
    fields.insert(keys::PHOTO_URL.into(), json(&details.photo_url));
    fields.insert(keys::EXPERTISE.into(), json(&details.expertise));
    fields.insert(keys::DATETIME.into(), json(&details.datetime));
    fields.insert(keys::MAX_PARTICIPANTS.into(), json(&details.max_participants));
    fields.insert(keys::STATUS.into(), json(&Availability::Free));
    fields.insert(keys::CREATED_AT.into(), json(&created_at));
    fields.insert(keys::PARTICIPANTS.into(), Value::Array(Vec::new()));
    fields
}

/// Partial document holding only the supplied descriptive fields.
///
/// Callers validate `patch` first; an out-of-range capacity is skipped here.
pub fn encode_patch(patch: &SessionFields) -> Fields {
    let mut fields = Fields::new();
    if let Some(v) = &patch.mentor_name {
        fields.insert(keys::MENTOR_NAME.into(), json(v.trim()));
    }
    if let Some(v) = &patch.room {
        fields.insert(keys::ROOM.into(), json(v.trim()));
    }
    if let Some(v) = &patch.photo_url {
        let url = Some(v.trim()).filter(|url| !url.is_empty());
        fields.insert(keys::PHOTO_URL.into(), json(&url));
    }
    if let Some(v) = &patch.expertise {
        fields.insert(keys::EXPERTISE.into(), json(v.trim()));
    }
    if let Some(v) = &patch.datetime {
        fields.insert(keys::DATETIME.into(), json(v));
    }
    if let Some(v) = patch.max_participants.and_then(|v| u32::try_from(v).ok()) {
        fields.insert(keys::MAX_PARTICIPANTS.into(), json(&v));
    }
    fields
}

/// Roster write: the whole participant list plus the refreshed status flag.
pub fn encode_roster(roster: &Roster) -> Fields {
    let mut fields = Fields::new();
    fields.insert(keys::PARTICIPANTS.into(), json(roster));
    fields.insert(keys::STATUS.into(), json(&Availability::of(roster)));
    fields
}

/// Single roster element, as appended by a keyed array union.
pub fn encode_participant(participant: &Participant) -> Value {
    json(participant)
}

fn json<T: Serialize + ?Sized>(value: &T) -> Value {
    // Every type passed here serializes to plain JSON without fallible maps.
    serde_json::to_value(value).unwrap_or(Value::Null)
}
