//! GetSessionHandler - Query handler for a single session.

use crate::domain::foundation::SessionId;
use crate::domain::session::{Session, SessionError};

use crate::application::handlers::records::SessionRecords;

/// Handler for point reads.
pub struct GetSessionHandler {
    records: SessionRecords,
}

impl GetSessionHandler {
    pub fn new(records: SessionRecords) -> Self {
        Self { records }
    }

    pub async fn handle(&self, session_id: &SessionId) -> Result<Session, SessionError> {
        self.records.load(session_id).await
    }
}
