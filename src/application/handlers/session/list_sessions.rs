//! ListSessionsHandler - Query handler for the ordered session list.

use crate::domain::session::{FilterScope, SessionError, SessionList};

use crate::application::handlers::records::SessionRecords;

/// Handler for one-shot list reads, ordered by datetime.
pub struct ListSessionsHandler {
    records: SessionRecords,
}

impl ListSessionsHandler {
    pub fn new(records: SessionRecords) -> Self {
        Self { records }
    }

    pub async fn handle(&self, scope: &FilterScope) -> Result<SessionList, SessionError> {
        Ok(self.records.list().await?.filtered(scope))
    }
}
