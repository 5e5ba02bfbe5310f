//! Service facade wiring the handlers to their collaborators.
//!
//! Store, profile directory and auth provider are injected once; every
//! operation is exposed as a method taking its command arguments and the
//! caller's `CommandMetadata`.

use std::sync::Arc;

use tracing::debug;

use crate::config::AppConfig;
use crate::domain::foundation::{AuthError, CommandMetadata, SessionId, UserId};
use crate::domain::roster::{Participant, ParticipantStatus};
use crate::domain::session::{FilterScope, Session, SessionError, SessionFields, SessionList};
use crate::domain::user::UserRef;
use crate::ports::{AuthProvider, ProfileDirectory, RecordStore};

use super::handlers::roster::{
    AdminAssignCommand, AdminAssignHandler, AdminAssignResult, BookSlotCommand, BookSlotHandler,
    DisplayNames, RequestSlotCommand, RequestSlotHandler, RequestSlotResult, RetryPolicy,
    RosterMutator, SetParticipantStatusCommand, SetParticipantStatusHandler, ToggleCheckInCommand,
    ToggleCheckInHandler,
};
use super::handlers::session::{
    CreateSessionCommand, CreateSessionHandler, CreateSessionResult, DeleteSessionCommand,
    DeleteSessionHandler, GetSessionHandler, ListSessionsHandler, UpdateSessionCommand,
    UpdateSessionHandler,
};
use super::handlers::user::{ListProfilesHandler, ListProfilesQuery, ProfileListing};
use super::handlers::SessionRecords;
use super::propagation::ChangeHub;

/// Entry point for every roster and lifecycle operation.
pub struct RosterService {
    records: SessionRecords,
    auth: Arc<dyn AuthProvider>,

    request_slot: Arc<RequestSlotHandler>,
    book_slot: BookSlotHandler,
    set_participant_status: SetParticipantStatusHandler,
    toggle_check_in: ToggleCheckInHandler,
    admin_assign: AdminAssignHandler,

    create_session: CreateSessionHandler,
    update_session: UpdateSessionHandler,
    delete_session: DeleteSessionHandler,
    get_session: GetSessionHandler,
    list_sessions: ListSessionsHandler,
    list_profiles: ListProfilesHandler,
}

impl RosterService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        profiles: Arc<dyn ProfileDirectory>,
        auth: Arc<dyn AuthProvider>,
        config: &AppConfig,
    ) -> Self {
        let records = SessionRecords::new(store, &config.store);
        let mutator = RosterMutator::new(
            records.clone(),
            RetryPolicy::from(&config.coordination),
        );
        let names = DisplayNames::new(profiles.clone());
        let request_slot = Arc::new(RequestSlotHandler::new(mutator.clone(), names.clone()));

        Self {
            book_slot: BookSlotHandler::new(
                records.clone(),
                request_slot.clone(),
                config.booking.clone(),
            ),
            set_participant_status: SetParticipantStatusHandler::new(mutator.clone()),
            toggle_check_in: ToggleCheckInHandler::new(mutator.clone()),
            admin_assign: AdminAssignHandler::new(mutator, names),
            create_session: CreateSessionHandler::new(records.clone()),
            update_session: UpdateSessionHandler::new(records.clone()),
            delete_session: DeleteSessionHandler::new(records.clone()),
            get_session: GetSessionHandler::new(records.clone()),
            list_sessions: ListSessionsHandler::new(records.clone()),
            list_profiles: ListProfilesHandler::new(profiles),
            request_slot,
            records,
            auth,
        }
    }

    pub fn records(&self) -> &SessionRecords {
        &self.records
    }

    /// Starts a live feed over the session collection.
    pub async fn start_hub(&self) -> Result<ChangeHub, SessionError> {
        ChangeHub::start(&self.records).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_session(
        &self,
        fields: SessionFields,
        metadata: CommandMetadata,
    ) -> Result<CreateSessionResult, SessionError> {
        self.create_session
            .handle(CreateSessionCommand { fields }, metadata)
            .await
    }

    pub async fn update_session(
        &self,
        session_id: SessionId,
        fields: SessionFields,
        metadata: CommandMetadata,
    ) -> Result<u64, SessionError> {
        self.update_session
            .handle(UpdateSessionCommand { session_id, fields }, metadata)
            .await
    }

    pub async fn delete_session(
        &self,
        session_id: SessionId,
        metadata: CommandMetadata,
    ) -> Result<(), SessionError> {
        self.delete_session
            .handle(DeleteSessionCommand { session_id }, metadata)
            .await
    }

    pub async fn get_session(&self, session_id: &SessionId) -> Result<Session, SessionError> {
        self.get_session.handle(session_id).await
    }

    pub async fn list_sessions(&self, scope: &FilterScope) -> Result<SessionList, SessionError> {
        self.list_sessions.handle(scope).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roster
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn request_slot(
        &self,
        session_id: SessionId,
        user: UserRef,
        metadata: CommandMetadata,
    ) -> Result<RequestSlotResult, SessionError> {
        self.request_slot
            .handle(RequestSlotCommand::new(session_id, user), metadata)
            .await
    }

    /// Slot request on behalf of whoever the auth provider reports.
    pub async fn request_slot_as_current_user(
        &self,
        session_id: SessionId,
    ) -> Result<RequestSlotResult, SessionError> {
        let (user, metadata) = self.current_caller().await?;
        self.request_slot(session_id, user, metadata).await
    }

    pub async fn book_slot(
        &self,
        session_id: SessionId,
        user: UserRef,
        metadata: CommandMetadata,
    ) -> Result<RequestSlotResult, SessionError> {
        self.book_slot
            .handle(BookSlotCommand { session_id, user }, metadata)
            .await
    }

    pub async fn book_slot_as_current_user(
        &self,
        session_id: SessionId,
    ) -> Result<RequestSlotResult, SessionError> {
        let (user, metadata) = self.current_caller().await?;
        self.book_slot(session_id, user, metadata).await
    }

    pub async fn set_participant_status(
        &self,
        session_id: SessionId,
        user_id: UserId,
        status: ParticipantStatus,
        metadata: CommandMetadata,
    ) -> Result<Participant, SessionError> {
        self.set_participant_status
            .handle(
                SetParticipantStatusCommand {
                    session_id,
                    user_id,
                    status,
                },
                metadata,
            )
            .await
    }

    pub async fn toggle_check_in(
        &self,
        session_id: SessionId,
        user_id: UserId,
        metadata: CommandMetadata,
    ) -> Result<Participant, SessionError> {
        self.toggle_check_in
            .handle(
                ToggleCheckInCommand {
                    session_id,
                    user_id,
                },
                metadata,
            )
            .await
    }

    pub async fn admin_assign(
        &self,
        session_id: SessionId,
        user: UserRef,
        metadata: CommandMetadata,
    ) -> Result<AdminAssignResult, SessionError> {
        self.admin_assign
            .handle(AdminAssignCommand { session_id, user }, metadata)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_profiles(
        &self,
        query: ListProfilesQuery,
        metadata: CommandMetadata,
    ) -> Result<ProfileListing, SessionError> {
        self.list_profiles.handle(query, metadata).await
    }

    /// The signed-in user as a roster reference plus matching metadata.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if nobody is signed in
    /// - `UpstreamUnavailable` if the auth provider fails
    pub async fn current_caller(&self) -> Result<(UserRef, CommandMetadata), SessionError> {
        let user = match self.auth.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) | Err(AuthError::NotSignedIn) => return Err(SessionError::Unauthenticated),
            Err(err) => return Err(SessionError::upstream(err.to_string())),
        };
        debug!(uid = %user.id, role = %user.role, "Resolved current caller");
        Ok((UserRef::from(&user), CommandMetadata::for_user(&user)))
    }
}
