//! ListProfilesHandler - Query handler for the admin user picker.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::CommandMetadata;
use crate::domain::session::SessionError;
use crate::domain::user::UserProfile;
use crate::ports::ProfileDirectory;

use crate::application::handlers::require_admin;

/// Query for profiles, optionally narrowed by email or team name.
#[derive(Debug, Clone, Default)]
pub struct ListProfilesQuery {
    pub query: Option<String>,
}

impl ListProfilesQuery {
    pub fn matching(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
        }
    }
}

/// Profiles split by role, each ordered by uid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileListing {
    pub admins: Vec<UserProfile>,
    pub users: Vec<UserProfile>,
}

impl ProfileListing {
    pub fn len(&self) -> usize {
        self.admins.len() + self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty() && self.users.is_empty()
    }
}

pub struct ListProfilesHandler {
    profiles: Arc<dyn ProfileDirectory>,
}

impl ListProfilesHandler {
    pub fn new(profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { profiles }
    }

    pub async fn handle(
        &self,
        query: ListProfilesQuery,
        metadata: CommandMetadata,
    ) -> Result<ProfileListing, SessionError> {
        require_admin(&metadata)?;

        let needle = query
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        let mut profiles = self.profiles.list_profiles().await?;
        profiles.sort_by(|a, b| a.uid.cmp(&b.uid));

        let (admins, users): (Vec<_>, Vec<_>) = profiles
            .into_iter()
            .filter(|p| needle.map_or(true, |q| p.matches_query(q)))
            .partition(|p| p.role.is_admin());

        Ok(ProfileListing { admins, users })
    }
}
