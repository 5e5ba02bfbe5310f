//! Descriptive and scheduling fields of a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Expertise recorded when none is given at creation.
pub const DEFAULT_EXPERTISE: &str = "General";

/// Validated descriptive fields of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub mentor_name: String,
    pub room: String,
    pub photo_url: Option<String>,
    pub expertise: String,
    pub datetime: Timestamp,
    pub max_participants: u32,
}

/// Caller-supplied field set for creating or editing a session.
///
/// Every field is optional so the same type serves as a create request and
/// as a partial update. The roster is never part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFields {
    pub mentor_name: Option<String>,
    pub room: Option<String>,
    pub photo_url: Option<String>,
    pub expertise: Option<String>,
    pub datetime: Option<Timestamp>,
    pub max_participants: Option<i64>,
}

impl SessionFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mentor_name(mut self, value: impl Into<String>) -> Self {
        self.mentor_name = Some(value.into());
        self
    }

    pub fn room(mut self, value: impl Into<String>) -> Self {
        self.room = Some(value.into());
        self
    }

    pub fn photo_url(mut self, value: impl Into<String>) -> Self {
        self.photo_url = Some(value.into());
        self
    }

    pub fn expertise(mut self, value: impl Into<String>) -> Self {
        self.expertise = Some(value.into());
        self
    }

    pub fn datetime(mut self, value: Timestamp) -> Self {
        self.datetime = Some(value);
        self
    }

    pub fn max_participants(mut self, value: i64) -> Self {
        self.max_participants = Some(value);
        self
    }

    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validates a create request.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if a required field is missing or blank
    /// - `OutOfRange` if `max_participants` is not positive
    pub fn into_details(self) -> Result<SessionDetails, ValidationError> {
        self.validate()?;
        let mentor_name = required_text(self.mentor_name, "mentorName")?;
        let room = required_text(self.room, "room")?;
        let datetime = self
            .datetime
            .ok_or_else(|| ValidationError::empty_field("datetime"))?;
        let max_participants = self
            .max_participants
            .ok_or_else(|| ValidationError::empty_field("maxParticipants"))?;

        Ok(SessionDetails {
            mentor_name,
            room,
            photo_url: self.photo_url.filter(|url| !url.trim().is_empty()),
            expertise: self
                .expertise
                .unwrap_or_else(|| DEFAULT_EXPERTISE.to_string()),
            datetime,
            max_participants: capacity(max_participants)?,
        })
    }

    /// Validates whatever fields are supplied, without requiring any.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("mentorName", &self.mentor_name),
            ("room", &self.room),
            ("expertise", &self.expertise),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ValidationError::empty_field(field));
            }
        }
        if let Some(max) = self.max_participants {
            capacity(max)?;
        }
        Ok(())
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::empty_field(field))
}

fn capacity(value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ValidationError::out_of_range("maxParticipants", 1, u32::MAX as i64, value))
}
