//! BookSlotHandler - Guarded slot request for end users.
//!
//! Adds two checks on top of a plain slot request:
//!
//! - one active booking per user across all sessions (optional)
//! - capacity admission evaluated inside the roster write
//!
//! The single-booking check reads the session list before writing, so it
//! only holds among `BookSlot` calls for the same user in this process; they
//! are serialized by a per-user lock. Admin operations and direct slot
//! requests bypass it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::BookingConfig;
use crate::domain::foundation::{CommandMetadata, SessionId, UserId};
use crate::domain::roster::{Admission, BookingRefusal};
use crate::domain::session::SessionError;
use crate::domain::user::UserRef;

use super::request_slot::{RequestSlotCommand, RequestSlotHandler, RequestSlotResult};
use crate::application::handlers::records::SessionRecords;
use crate::application::handlers::require_self_or_admin;

/// Command to book a slot in a session.
#[derive(Debug, Clone)]
pub struct BookSlotCommand {
    pub session_id: SessionId,
    pub user: UserRef,
}

/// Handler for guarded bookings.
pub struct BookSlotHandler {
    records: SessionRecords,
    request_slot: Arc<RequestSlotHandler>,
    policy: BookingConfig,
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl BookSlotHandler {
    pub fn new(
        records: SessionRecords,
        request_slot: Arc<RequestSlotHandler>,
        policy: BookingConfig,
    ) -> Self {
        Self {
            records,
            request_slot,
            policy,
            user_locks: DashMap::new(),
        }
    }

    pub async fn handle(
        &self,
        cmd: BookSlotCommand,
        metadata: CommandMetadata,
    ) -> Result<RequestSlotResult, SessionError> {
        require_self_or_admin(&metadata, &cmd.user.uid)?;

        let uid = cmd.user.uid.clone();
        let lock = self.user_locks.entry(uid.clone()).or_default().clone();

        let result = {
            let _guard = lock.lock().await;
            self.book(cmd, metadata).await
        };

        drop(lock);
        self.user_locks
            .remove_if(&uid, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Number of users with a booking in flight.
    pub fn in_flight(&self) -> usize {
        self.user_locks.len()
    }

    async fn book(
        &self,
        cmd: BookSlotCommand,
        metadata: CommandMetadata,
    ) -> Result<RequestSlotResult, SessionError> {
        if self.policy.enforce_single_active_booking {
            let sessions = self.records.list().await?;
            let active_elsewhere = sessions
                .iter()
                .find(|s| s.id() != &cmd.session_id && s.has_active_booking(&cmd.user.uid))
                .map(|s| s.id().clone());
            if let Some(other) = active_elsewhere {
                info!(
                    session_id = %cmd.session_id,
                    uid = %cmd.user.uid,
                    active_in = %other,
                    "Booking refused, user already booked elsewhere"
                );
                return Err(SessionError::policy(
                    BookingRefusal::ActiveBookingElsewhere { session_id: other },
                ));
            }
        }

        let request = RequestSlotCommand::new(cmd.session_id, cmd.user)
            .with_admission(Admission::Capacity(self.policy.capacity_policy));
        self.request_slot.handle(request, metadata).await
    }
}
