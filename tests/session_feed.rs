//! Live session feed behaviour through the service facade.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;

use mentor_roster::adapters::auth::MockAuthProvider;
use mentor_roster::adapters::profile::InMemoryProfileDirectory;
use mentor_roster::adapters::store::InMemoryRecordStore;
use mentor_roster::application::{RosterService, SessionSubscription};
use mentor_roster::config::AppConfig;
use mentor_roster::domain::foundation::{CommandMetadata, SessionId, Timestamp, UserId};
use mentor_roster::domain::session::{FilterScope, SessionError, SessionFields, SessionList};
use mentor_roster::domain::user::UserRef;

fn service(store: Arc<InMemoryRecordStore>) -> RosterService {
    RosterService::new(
        store,
        Arc::new(InMemoryProfileDirectory::new()),
        Arc::new(MockAuthProvider::new()),
        &AppConfig::default(),
    )
}

fn admin() -> CommandMetadata {
    CommandMetadata::admin(UserId::new("admin").unwrap())
}

async fn create(service: &RosterService, mentor: &str, at: &str) -> SessionId {
    service
        .create_session(
            SessionFields::new()
                .mentor_name(mentor)
                .room("A1")
                .datetime(Timestamp::parse_rfc3339(at).unwrap())
                .max_participants(2),
            admin(),
        )
        .await
        .unwrap()
        .session_id
}

async fn next(sub: &mut SessionSubscription) -> SessionList {
    timeout(Duration::from_secs(1), sub.next())
        .await
        .expect("snapshot in time")
        .expect("feed open")
}

fn mentors(list: &SessionList) -> Vec<String> {
    list.iter().map(|s| s.mentor_name().to_string()).collect()
}

#[tokio::test]
async fn new_subscriber_gets_current_snapshot_then_one_per_change() {
    let service = service(Arc::new(InMemoryRecordStore::new()));
    create(&service, "Grace Hopper", "2026-03-01T10:00:00Z").await;
    let hub = service.start_hub().await.unwrap();

    let mut sub = hub.subscribe(FilterScope::All);
    assert_eq!(mentors(&next(&mut sub).await), ["Grace Hopper"]);

    create(&service, "Ada Lovelace", "2026-01-01T10:00:00Z").await;
    assert_eq!(
        mentors(&next(&mut sub).await),
        ["Ada Lovelace", "Grace Hopper"]
    );

    let sid = create(&service, "Alan Turing", "2026-02-01T10:00:00Z").await;
    assert_eq!(
        mentors(&next(&mut sub).await),
        ["Ada Lovelace", "Alan Turing", "Grace Hopper"]
    );

    service.delete_session(sid, admin()).await.unwrap();
    assert_eq!(
        mentors(&next(&mut sub).await),
        ["Ada Lovelace", "Grace Hopper"]
    );
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn roster_writes_reach_participant_scoped_subscribers() {
    let service = service(Arc::new(InMemoryRecordStore::new()));
    let sid = create(&service, "Ada Lovelace", "2026-01-01T10:00:00Z").await;
    create(&service, "Grace Hopper", "2026-02-01T10:00:00Z").await;
    let hub = service.start_hub().await.unwrap();

    let alice = UserId::new("alice").unwrap();
    let mut mine = hub.subscribe(FilterScope::Participant(alice.clone()));
    assert!(next(&mut mine).await.is_empty());

    service
        .request_slot(
            sid.clone(),
            UserRef::new(alice.clone()).with_display_name("Alice"),
            CommandMetadata::user(alice),
        )
        .await
        .unwrap();

    let list = next(&mut mine).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list.sessions()[0].id(), &sid);
}

#[tokio::test]
async fn mentor_filter_narrows_each_snapshot() {
    let service = service(Arc::new(InMemoryRecordStore::new()));
    create(&service, "Ada Lovelace", "2026-01-01T10:00:00Z").await;
    let hub = service.start_hub().await.unwrap();

    let mut sub = hub.subscribe(FilterScope::MentorName("grace".into()));
    assert!(next(&mut sub).await.is_empty());

    create(&service, "Grace Hopper", "2026-02-01T10:00:00Z").await;
    assert_eq!(mentors(&next(&mut sub).await), ["Grace Hopper"]);
}

#[tokio::test]
async fn listener_stops_after_unsubscribe() {
    let service = service(Arc::new(InMemoryRecordStore::new()));
    let hub = service.start_hub().await.unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let listener = hub.listen(FilterScope::All, move |list| {
        sink.lock().unwrap().push(list.len());
    });

    create(&service, "Ada Lovelace", "2026-01-01T10:00:00Z").await;
    timeout(Duration::from_secs(1), async {
        while seen.lock().unwrap().len() < 2 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("listener caught up");

    listener.unsubscribe().await;
    assert_eq!(hub.subscriber_count(), 0);

    create(&service, "Grace Hopper", "2026-02-01T10:00:00Z").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(*seen.lock().unwrap(), [0, 1]);
}

#[tokio::test]
async fn independent_subscribers_each_get_every_snapshot() {
    let service = service(Arc::new(InMemoryRecordStore::new()));
    let hub = service.start_hub().await.unwrap();
    let mut first = hub.subscribe(FilterScope::All);
    let mut second = hub.subscribe(FilterScope::All);

    create(&service, "Ada Lovelace", "2026-01-01T10:00:00Z").await;

    for sub in [&mut first, &mut second] {
        assert!(next(sub).await.is_empty());
        assert_eq!(next(sub).await.len(), 1);
    }
}

#[tokio::test]
async fn hub_start_fails_while_store_is_offline() {
    let store = Arc::new(InMemoryRecordStore::new());
    let service = service(store.clone());
    store.set_offline(true);

    let err = service.start_hub().await.err().unwrap();
    assert!(matches!(err, SessionError::UpstreamUnavailable(_)));
}
