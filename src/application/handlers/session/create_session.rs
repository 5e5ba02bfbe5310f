//! CreateSessionHandler - Command handler for creating new sessions.

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SessionId, Timestamp};
use crate::domain::session::{document, SessionDetails, SessionError, SessionFields};

use crate::application::handlers::records::SessionRecords;
use crate::application::handlers::require_admin;

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub fields: SessionFields,
}

/// Result of successful session creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionResult {
    pub session_id: SessionId,
    pub details: SessionDetails,
}

/// Handler for creating sessions.
///
/// New sessions start with an empty roster and the `FREE` flag.
pub struct CreateSessionHandler {
    records: SessionRecords,
}

impl CreateSessionHandler {
    pub fn new(records: SessionRecords) -> Self {
        Self { records }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateSessionResult, SessionError> {
        require_admin(&metadata)?;
        let details = cmd.fields.into_details()?;

        let id = self
            .records
            .store()
            .create(
                self.records.collection(),
                document::encode_new(&details, Timestamp::now()),
            )
            .await?;
        let session_id = SessionId::new(id)?;

        info!(
            session_id = %session_id,
            mentor = %details.mentor_name,
            max_participants = details.max_participants,
            correlation_id = metadata.correlation_id_opt(),
            "Session created"
        );
        Ok(CreateSessionResult {
            session_id,
            details,
        })
    }
}
