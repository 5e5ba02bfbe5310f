//! Display-name lookup for users joining a roster.

use std::sync::Arc;

use tracing::warn;

use crate::domain::roster::{resolve_display_name, NameSources};
use crate::domain::session::SessionError;
use crate::domain::user::UserRef;
use crate::ports::ProfileDirectory;

/// Resolves the label stored on a roster entry.
///
/// The profile lookup happens once, before any roster write. A directory
/// failure surfaces as `UpstreamUnavailable` rather than a fallback name.
#[derive(Clone)]
pub struct DisplayNames {
    profiles: Arc<dyn ProfileDirectory>,
}

impl DisplayNames {
    pub fn new(profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { profiles }
    }

    pub async fn resolve(&self, user: &UserRef) -> Result<String, SessionError> {
        let profile = self.profiles.get_profile(&user.uid).await.map_err(|e| {
            warn!(uid = %user.uid, error = %e, "Profile lookup failed");
            SessionError::upstream(format!("profile lookup for {} failed: {}", user.uid, e))
        })?;

        let sources = NameSources {
            profile: profile.as_ref(),
            display_name: user.display_name.as_deref(),
            email: user
                .email
                .as_deref()
                .or_else(|| profile.as_ref().and_then(|p| p.email.as_deref())),
        };
        Ok(resolve_display_name(&sources))
    }
}
