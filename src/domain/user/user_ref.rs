//! Reference to a user being placed on a roster.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthenticatedUser, UserId};

/// Who is being added to a roster, with whatever identity hints the caller
/// has. Name resolution falls back through these hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub uid: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserRef {
    pub fn new(uid: UserId) -> Self {
        Self {
            uid,
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

impl From<&AuthenticatedUser> for UserRef {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            uid: user.id.clone(),
            email: Some(user.email.clone()).filter(|e| !e.is_empty()),
            display_name: user.non_empty_display_name().map(str::to_string),
        }
    }
}
