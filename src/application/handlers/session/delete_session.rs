//! DeleteSessionHandler - Command handler for removing a session.

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::session::SessionError;

use crate::application::handlers::records::{store_error, SessionRecords};
use crate::application::handlers::require_admin;

/// Command to delete a session and its roster.
#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

/// Handler for deletions. Irreversible; active participants do not block it.
pub struct DeleteSessionHandler {
    records: SessionRecords,
}

impl DeleteSessionHandler {
    pub fn new(records: SessionRecords) -> Self {
        Self { records }
    }

    pub async fn handle(
        &self,
        cmd: DeleteSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<(), SessionError> {
        require_admin(&metadata)?;

        self.records
            .store()
            .delete(self.records.collection(), cmd.session_id.as_str())
            .await
            .map_err(|e| store_error(&cmd.session_id, e))?;

        info!(
            session_id = %cmd.session_id,
            correlation_id = metadata.correlation_id_opt(),
            "Session deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{admin, user, Fixture};
    use serde_json::json;

    #[tokio::test]
    async fn deletes_session_with_active_participants() {
        let fx = Fixture::new();
        let sid = fx
            .seed("s1", 2, json!([{"uid": "alice", "name": "Alice", "status": "approved"}]))
            .await;

        DeleteSessionHandler::new(fx.records.clone())
            .handle(DeleteSessionCommand { session_id: sid.clone() }, admin())
            .await
            .unwrap();

        assert!(fx.records.load(&sid).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let fx = Fixture::new();
        let sid = fx.seed("s1", 2, json!([])).await;
        let h = DeleteSessionHandler::new(fx.records.clone());

        h.handle(DeleteSessionCommand { session_id: sid.clone() }, admin())
            .await
            .unwrap();
        let err = h
            .handle(DeleteSessionCommand { session_id: sid }, admin())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let fx = Fixture::new();
        let sid = fx.seed("s1", 2, json!([])).await;

        let err = DeleteSessionHandler::new(fx.records.clone())
            .handle(DeleteSessionCommand { session_id: sid }, user("alice"))
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::Forbidden);
    }
}
