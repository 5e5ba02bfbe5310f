//! Optimistic read-modify-write loop for roster changes.
//!
//! Every roster write reads the session, applies a mutation to a private copy
//! of the roster and writes the whole participant list back conditioned on
//! the revision it read. A concurrent write of any kind bumps the revision,
//! so the conditional write fails and the mutation is re-applied on fresh
//! data. Nothing observed by one attempt leaks into the next.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::CoordinationConfig;
use crate::domain::foundation::SessionId;
use crate::domain::roster::Roster;
use crate::domain::session::{document, Availability, Session, SessionError};

use crate::application::handlers::records::{store_error, SessionRecords};

/// How often and how patiently conflicting writes are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Attempt `n` waits `n * backoff` before re-reading.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&CoordinationConfig::default())
    }
}

impl From<&CoordinationConfig> for RetryPolicy {
    fn from(config: &CoordinationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: config.retry_backoff(),
        }
    }
}

/// Outcome of a committed roster mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutated<T> {
    pub value: T,
    /// Revision the session is at after this mutation.
    pub revision: u64,
    /// 1 when the first write went through.
    pub attempts: u32,
}

/// Applies roster mutations with optimistic concurrency.
#[derive(Clone)]
pub struct RosterMutator {
    records: SessionRecords,
    retry: RetryPolicy,
}

impl RosterMutator {
    pub fn new(records: SessionRecords, retry: RetryPolicy) -> Self {
        Self { records, retry }
    }

    pub fn records(&self) -> &SessionRecords {
        &self.records
    }

    /// Runs `mutate` against a fresh copy of the roster until the write
    /// commits, the mutation refuses, or attempts run out.
    ///
    /// `mutate` may run more than once and must derive everything from its
    /// arguments. A mutation that leaves the roster and status untouched
    /// commits without writing.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist (or vanished mid-way)
    /// - whatever `mutate` returns
    /// - `UpstreamUnavailable` on store failure or after `max_attempts`
    ///   conflicting writes
    pub async fn apply<T, F>(
        &self,
        session_id: &SessionId,
        mut mutate: F,
    ) -> Result<Mutated<T>, SessionError>
    where
        F: FnMut(&Session, &mut Roster) -> Result<T, SessionError> + Send,
        T: Send,
    {
        for attempt in 1..=self.retry.max_attempts {
            let session = self.records.load(session_id).await?;
            let mut roster = session.roster().clone();
            let value = mutate(&session, &mut roster)?;

            if roster == *session.roster() && Availability::of(&roster) == session.status() {
                return Ok(Mutated {
                    value,
                    revision: session.revision(),
                    attempts: attempt,
                });
            }

            let written = self
                .records
                .store()
                .update_fields_if(
                    self.records.collection(),
                    session_id.as_str(),
                    session.revision(),
                    document::encode_roster(&roster),
                )
                .await;

            match written {
                Ok(revision) => {
                    return Ok(Mutated {
                        value,
                        revision,
                        attempts: attempt,
                    })
                }
                Err(err) if err.is_conflict() => {
                    debug!(
                        session_id = %session_id,
                        attempt,
                        read_revision = session.revision(),
                        "Roster write conflicted, re-reading"
                    );
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.backoff * attempt).await;
                    }
                }
                Err(err) => return Err(store_error(session_id, err)),
            }
        }

        warn!(
            session_id = %session_id,
            attempts = self.retry.max_attempts,
            "Giving up on contended roster write"
        );
        Err(SessionError::upstream(format!(
            "session {} stayed contended for {} attempts",
            session_id, self.retry.max_attempts
        )))
    }
}
