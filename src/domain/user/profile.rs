//! User profile as held by the profile directory.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, UserId};

/// Directory entry for one user.
///
/// Every descriptive field is optional; the directory is maintained outside
/// the roster system and may be sparse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    pub fn new(uid: UserId) -> Self {
        Self {
            uid,
            name: None,
            team_name: None,
            email: None,
            role: Role::User,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Label shown in the admin's user picker.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.team_name.as_deref())
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.uid.as_str())
    }

    /// Case-insensitive substring match on email or team name.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [self.email.as_deref(), self.team_name.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}
