//! UpdateSessionHandler - Command handler for editing session fields.

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::session::{document, SessionError, SessionFields};

use crate::application::handlers::records::{store_error, SessionRecords};
use crate::application::handlers::require_admin;

/// Command to edit descriptive and scheduling fields.
#[derive(Debug, Clone)]
pub struct UpdateSessionCommand {
    pub session_id: SessionId,
    pub fields: SessionFields,
}

/// Handler for session edits.
///
/// The write is an unconditional partial update that never carries the
/// roster. It still bumps the revision, so an in-flight roster write
/// re-applies on top of it.
pub struct UpdateSessionHandler {
    records: SessionRecords,
}

impl UpdateSessionHandler {
    pub fn new(records: SessionRecords) -> Self {
        Self { records }
    }

    /// Returns the session revision after the edit.
    pub async fn handle(
        &self,
        cmd: UpdateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<u64, SessionError> {
        require_admin(&metadata)?;
        cmd.fields.validate()?;

        if cmd.fields.is_empty() {
            return Ok(self.records.load(&cmd.session_id).await?.revision());
        }

        let patch = document::encode_patch(&cmd.fields);
        let revision = self
            .records
            .store()
            .update_fields(self.records.collection(), cmd.session_id.as_str(), patch)
            .await
            .map_err(|e| store_error(&cmd.session_id, e))?;

        info!(
            session_id = %cmd.session_id,
            revision,
            correlation_id = metadata.correlation_id_opt(),
            "Session updated"
        );
        Ok(revision)
    }
}
