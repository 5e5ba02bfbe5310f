//! Roster coordination against the in-memory adapters.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Barrier, Notify};
use tokio::time::timeout;

use mentor_roster::adapters::auth::MockAuthProvider;
use mentor_roster::adapters::profile::InMemoryProfileDirectory;
use mentor_roster::adapters::store::InMemoryRecordStore;
use mentor_roster::application::{ListProfilesQuery, RosterService};
use mentor_roster::config::AppConfig;
use mentor_roster::domain::foundation::{
    CommandMetadata, DomainError, Role, SessionId, Timestamp, UserId,
};
use mentor_roster::domain::roster::{BookingRefusal, CapacityPolicy, ParticipantStatus};
use mentor_roster::domain::session::{Availability, SessionError, SessionFields};
use mentor_roster::domain::user::{UserProfile, UserRef};
use mentor_roster::ports::{ChangeFeed, Fields, Record, RecordStore};

struct TestContext {
    store: Arc<InMemoryRecordStore>,
    profiles: Arc<InMemoryProfileDirectory>,
    service: RosterService,
}

impl TestContext {
    fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryRecordStore::new());
        let profiles = Arc::new(InMemoryProfileDirectory::new());
        let service = RosterService::new(
            store.clone(),
            profiles.clone(),
            Arc::new(MockAuthProvider::new()),
            &config,
        );
        Self {
            store,
            profiles,
            service,
        }
    }

    async fn create_session(&self, max: i64) -> SessionId {
        self.service
            .create_session(
                SessionFields::new()
                    .mentor_name("Ada Lovelace")
                    .room("A1")
                    .datetime(Timestamp::parse_rfc3339("2026-01-05T09:00:00Z").unwrap())
                    .max_participants(max),
                admin(),
            )
            .await
            .unwrap()
            .session_id
    }

    async fn request(&self, sid: &SessionId, who: &str) {
        self.service
            .request_slot(sid.clone(), named(who), CommandMetadata::user(uid(who)))
            .await
            .unwrap();
    }

    async fn set_status(&self, sid: &SessionId, who: &str, status: ParticipantStatus) {
        self.service
            .set_participant_status(sid.clone(), uid(who), status, admin())
            .await
            .unwrap();
    }

    async fn roster(&self, sid: &SessionId) -> Vec<(String, ParticipantStatus, bool)> {
        self.service
            .get_session(sid)
            .await
            .unwrap()
            .participants()
            .iter()
            .map(|p| (p.uid.to_string(), p.status, p.checked_in))
            .collect()
    }
}

fn uid(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

fn named(s: &str) -> UserRef {
    UserRef::new(uid(s)).with_display_name(s)
}

fn admin() -> CommandMetadata {
    CommandMetadata::admin(uid("admin"))
}

fn entry(who: &str, status: ParticipantStatus, checked_in: bool) -> (String, ParticipantStatus, bool) {
    (who.to_string(), status, checked_in)
}

/// Holds conditional writes between read and commit so read-modify-write
/// sequences overlap.
struct RendezvousStore {
    inner: Arc<InMemoryRecordStore>,
    barrier: Barrier,
    armed: AtomicUsize,
    held: AtomicBool,
    parked: Notify,
    release: Notify,
    conflicts: AtomicUsize,
}

impl RendezvousStore {
    fn new(inner: Arc<InMemoryRecordStore>) -> Self {
        Self {
            inner,
            barrier: Barrier::new(2),
            armed: AtomicUsize::new(0),
            held: AtomicBool::new(false),
            parked: Notify::new(),
            release: Notify::new(),
            conflicts: AtomicUsize::new(0),
        }
    }

    /// The next two conditional writes wait for each other.
    fn arm(&self) {
        self.armed.store(2, Ordering::SeqCst);
    }

    /// The next conditional write parks until `release`.
    fn hold_next(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    fn conflicts(&self) -> usize {
        self.conflicts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for RendezvousStore {
    async fn create(&self, c: &str, f: Fields) -> Result<String, DomainError> {
        self.inner.create(c, f).await
    }
    async fn get(&self, c: &str, id: &str) -> Result<Option<Record>, DomainError> {
        self.inner.get(c, id).await
    }
    async fn list(&self, c: &str, o: &str) -> Result<Vec<Record>, DomainError> {
        self.inner.list(c, o).await
    }
    async fn update_fields(&self, c: &str, id: &str, f: Fields) -> Result<u64, DomainError> {
        self.inner.update_fields(c, id, f).await
    }
    async fn update_fields_if(
        &self,
        c: &str,
        id: &str,
        rev: u64,
        f: Fields,
    ) -> Result<u64, DomainError> {
        if self
            .armed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            self.barrier.wait().await;
        }
        if self.held.swap(false, Ordering::SeqCst) {
            self.parked.notify_one();
            self.release.notified().await;
        }
        let result = self.inner.update_fields_if(c, id, rev, f).await;
        if matches!(&result, Err(e) if e.is_conflict()) {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
    async fn delete(&self, c: &str, id: &str) -> Result<(), DomainError> {
        self.inner.delete(c, id).await
    }
    async fn subscribe(&self, c: &str, o: &str) -> Result<ChangeFeed, DomainError> {
        self.inner.subscribe(c, o).await
    }
    async fn array_union(
        &self,
        c: &str,
        id: &str,
        field: &str,
        element: Value,
        key_field: &str,
    ) -> Result<bool, DomainError> {
        self.inner.array_union(c, id, field, element, key_field).await
    }
}

/// Service over a `RendezvousStore` with `u1` and `u2` already pending.
async fn rendezvous_service() -> (Arc<RendezvousStore>, Arc<RosterService>, SessionId) {
    let store = Arc::new(RendezvousStore::new(Arc::new(InMemoryRecordStore::new())));
    let service = Arc::new(RosterService::new(
        store.clone(),
        Arc::new(InMemoryProfileDirectory::new()),
        Arc::new(MockAuthProvider::new()),
        &AppConfig::default(),
    ));
    let sid = service
        .create_session(
            SessionFields::new()
                .mentor_name("Ada Lovelace")
                .room("A1")
                .datetime(Timestamp::parse_rfc3339("2026-01-05T09:00:00Z").unwrap())
                .max_participants(5),
            admin(),
        )
        .await
        .unwrap()
        .session_id;
    for who in ["u1", "u2"] {
        service
            .request_slot(sid.clone(), named(who), CommandMetadata::user(uid(who)))
            .await
            .unwrap();
    }
    (store, service, sid)
}

async fn roster_of(service: &RosterService, sid: &SessionId) -> Vec<(String, ParticipantStatus, bool)> {
    service
        .get_session(sid)
        .await
        .unwrap()
        .participants()
        .iter()
        .map(|p| (p.uid.to_string(), p.status, p.checked_in))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn status_change_between_read_and_write_forces_request_retry() {
    let (store, service, sid) = rendezvous_service().await;
    service
        .set_participant_status(sid.clone(), uid("u1"), ParticipantStatus::Rejected, admin())
        .await
        .unwrap();

    store.hold_next();
    let request = {
        let service = service.clone();
        let sid = sid.clone();
        tokio::spawn(async move {
            service
                .request_slot(sid, named("u1"), CommandMetadata::user(uid("u1")))
                .await
        })
    };
    timeout(Duration::from_secs(5), store.parked.notified())
        .await
        .expect("request reaches its write");

    service
        .set_participant_status(sid.clone(), uid("u2"), ParticipantStatus::Approved, admin())
        .await
        .unwrap();
    store.release.notify_one();

    let requested = request.await.unwrap().unwrap();
    assert_eq!(requested.attempts, 2);
    assert_eq!(store.conflicts(), 1);
    assert_eq!(
        roster_of(&service, &sid).await,
        [
            entry("u1", ParticipantStatus::Pending, false),
            entry("u2", ParticipantStatus::Approved, false),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_request_and_status_change_keep_both_writes() {
    let (store, service, sid) = rendezvous_service().await;

    let rounds = 10;
    for round in 1..=rounds {
        service
            .set_participant_status(sid.clone(), uid("u1"), ParticipantStatus::Rejected, admin())
            .await
            .unwrap();
        service
            .set_participant_status(sid.clone(), uid("u2"), ParticipantStatus::Pending, admin())
            .await
            .unwrap();
        store.arm();

        let request = {
            let service = service.clone();
            let sid = sid.clone();
            tokio::spawn(async move {
                service
                    .request_slot(sid, named("u1"), CommandMetadata::user(uid("u1")))
                    .await
            })
        };
        let approve = {
            let service = service.clone();
            let sid = sid.clone();
            tokio::spawn(async move {
                service
                    .set_participant_status(sid, uid("u2"), ParticipantStatus::Approved, admin())
                    .await
            })
        };
        let (requested, approved) = timeout(Duration::from_secs(5), async {
            (request.await.unwrap(), approve.await.unwrap())
        })
        .await
        .expect("both writers reach the rendezvous");
        let requested = requested.unwrap();
        approved.unwrap();

        // Both writers read the same revision, so exactly one had to retry.
        assert_eq!(store.conflicts(), round);
        assert!(requested.attempts <= 2);

        assert_eq!(
            roster_of(&service, &sid).await,
            [
                entry("u1", ParticipantStatus::Pending, false),
                entry("u2", ParticipantStatus::Approved, false),
            ]
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_joins_all_land() {
    let ctx = Arc::new(TestContext::new());
    let sid = ctx.create_session(50).await;

    let mut joins = Vec::new();
    for i in 0..16 {
        let ctx = ctx.clone();
        let sid = sid.clone();
        joins.push(tokio::spawn(async move {
            let who = format!("user-{}", i);
            ctx.request(&sid, &who).await;
        }));
    }
    for join in joins {
        join.await.unwrap();
    }

    let roster = ctx.roster(&sid).await;
    assert_eq!(roster.len(), 16);
    let mut uids: Vec<_> = roster.iter().map(|(u, _, _)| u.clone()).collect();
    uids.sort();
    uids.dedup();
    assert_eq!(uids.len(), 16);
}

#[tokio::test]
async fn lifecycle_scenario_with_capacity_one() {
    let ctx = TestContext::new();
    let sid = ctx.create_session(1).await;

    ctx.request(&sid, "alice").await;
    assert_eq!(
        ctx.roster(&sid).await,
        [entry("alice", ParticipantStatus::Pending, false)]
    );

    ctx.set_status(&sid, "alice", ParticipantStatus::Approved).await;
    assert_eq!(
        ctx.roster(&sid).await,
        [entry("alice", ParticipantStatus::Approved, false)]
    );

    ctx.service
        .toggle_check_in(sid.clone(), uid("alice"), admin())
        .await
        .unwrap();
    assert_eq!(
        ctx.roster(&sid).await,
        [entry("alice", ParticipantStatus::Approved, true)]
    );
    assert_eq!(
        ctx.service.get_session(&sid).await.unwrap().status(),
        Availability::Busy
    );

    ctx.set_status(&sid, "alice", ParticipantStatus::Completed).await;
    assert_eq!(
        ctx.roster(&sid).await,
        [entry("alice", ParticipantStatus::Completed, true)]
    );
    assert_eq!(
        ctx.service.get_session(&sid).await.unwrap().status(),
        Availability::Free
    );
}

#[tokio::test]
async fn repeated_request_leaves_single_pending_entry() {
    let ctx = TestContext::new();
    let sid = ctx.create_session(3).await;

    ctx.request(&sid, "alice").await;
    ctx.set_status(&sid, "alice", ParticipantStatus::Completed).await;
    ctx.request(&sid, "alice").await;

    // Check-in survives a re-request.
    assert_eq!(
        ctx.roster(&sid).await,
        [entry("alice", ParticipantStatus::Pending, true)]
    );
}

#[tokio::test]
async fn name_falls_back_to_title_cased_email() {
    let ctx = TestContext::new();
    let sid = ctx.create_session(3).await;

    let result = ctx
        .service
        .request_slot(
            sid,
            UserRef::new(uid("john")).with_email("john.doe@x.com"),
            CommandMetadata::user(uid("john")),
        )
        .await
        .unwrap();

    assert_eq!(result.participant.name, "John Doe");
}

#[tokio::test]
async fn profile_team_name_wins_over_email() {
    let ctx = TestContext::new();
    let sid = ctx.create_session(3).await;
    ctx.profiles
        .upsert(UserProfile::new(uid("john")).with_team_name("Rocket"))
        .await;

    let result = ctx
        .service
        .request_slot(
            sid,
            UserRef::new(uid("john")).with_email("john.doe@x.com"),
            CommandMetadata::user(uid("john")),
        )
        .await
        .unwrap();

    assert_eq!(result.participant.name, "Rocket");
}

#[tokio::test]
async fn every_operation_on_deleted_session_is_not_found() {
    let ctx = TestContext::new();
    let sid = ctx.create_session(2).await;
    ctx.request(&sid, "alice").await;
    ctx.service
        .delete_session(sid.clone(), admin())
        .await
        .unwrap();

    let results = vec![
        ctx.service
            .request_slot(sid.clone(), named("alice"), CommandMetadata::user(uid("alice")))
            .await
            .map(drop),
        ctx.service
            .book_slot(sid.clone(), named("bob"), CommandMetadata::user(uid("bob")))
            .await
            .map(drop),
        ctx.service
            .set_participant_status(sid.clone(), uid("alice"), ParticipantStatus::Approved, admin())
            .await
            .map(drop),
        ctx.service
            .toggle_check_in(sid.clone(), uid("alice"), admin())
            .await
            .map(drop),
        ctx.service
            .admin_assign(sid.clone(), named("carol"), admin())
            .await
            .map(drop),
        ctx.service
            .update_session(sid.clone(), SessionFields::new().room("B"), admin())
            .await
            .map(drop),
        ctx.service.delete_session(sid.clone(), admin()).await,
        ctx.service.get_session(&sid).await.map(drop),
    ];

    for result in results {
        assert!(
            matches!(result, Err(SessionError::NotFound(_))),
            "{:?}",
            result
        );
    }
}

#[tokio::test]
async fn unknown_participant_is_not_found() {
    let ctx = TestContext::new();
    let sid = ctx.create_session(2).await;

    let err = ctx
        .service
        .toggle_check_in(sid, uid("ghost"), admin())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::ParticipantNotFound { .. }));
}

#[tokio::test]
async fn booking_refuses_second_active_booking() {
    let ctx = TestContext::new();
    let first = ctx.create_session(2).await;
    let second = ctx.create_session(2).await;

    ctx.service
        .book_slot(first.clone(), named("alice"), CommandMetadata::user(uid("alice")))
        .await
        .unwrap();
    let err = ctx
        .service
        .book_slot(second, named("alice"), CommandMetadata::user(uid("alice")))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SessionError::PolicyViolation(BookingRefusal::ActiveBookingElsewhere { session_id: first })
    );
}

#[tokio::test]
async fn hard_capacity_refuses_full_session() {
    let mut config = AppConfig::default();
    config.booking.capacity_policy = CapacityPolicy::Hard;
    let ctx = TestContext::with_config(config);
    let sid = ctx.create_session(1).await;

    ctx.service
        .book_slot(sid.clone(), named("alice"), CommandMetadata::user(uid("alice")))
        .await
        .unwrap();
    let err = ctx
        .service
        .book_slot(sid.clone(), named("bob"), CommandMetadata::user(uid("bob")))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SessionError::PolicyViolation(BookingRefusal::SessionFull { capacity: 1 })
    );
    assert_eq!(ctx.roster(&sid).await.len(), 1);
}

#[tokio::test]
async fn store_outage_surfaces_as_upstream_unavailable() {
    let ctx = TestContext::new();
    let sid = ctx.create_session(2).await;
    ctx.store.set_offline(true);

    let err = ctx
        .service
        .request_slot(sid, named("alice"), CommandMetadata::user(uid("alice")))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn admin_lists_profiles_by_role() {
    let ctx = TestContext::new();
    ctx.profiles
        .upsert(UserProfile::new(uid("root")).with_role(Role::Admin))
        .await;
    ctx.profiles
        .upsert(UserProfile::new(uid("alice")).with_email("alice@example.com"))
        .await;

    let listing = ctx
        .service
        .list_profiles(ListProfilesQuery::default(), admin())
        .await
        .unwrap();
    assert_eq!(listing.admins.len(), 1);
    assert_eq!(listing.users.len(), 1);
}
