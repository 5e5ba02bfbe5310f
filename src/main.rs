//! Demo: wires the in-memory adapters, walks one participant through a
//! session and logs every snapshot the feed delivers.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mentor_roster::adapters::auth::MockAuthProvider;
use mentor_roster::adapters::profile::InMemoryProfileDirectory;
use mentor_roster::adapters::store::InMemoryRecordStore;
use mentor_roster::application::RosterService;
use mentor_roster::config::{AppConfig, LogFormat, LoggingConfig};
use mentor_roster::domain::foundation::{CommandMetadata, Timestamp, UserId};
use mentor_roster::domain::roster::ParticipantStatus;
use mentor_roster::domain::session::{FilterScope, SessionFields};
use mentor_roster::domain::user::{UserProfile, UserRef};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_validated()?;
    init_tracing(&config.logging);

    let profiles = Arc::new(InMemoryProfileDirectory::new());
    let alice = UserId::new("alice")?;
    let john = UserId::new("john")?;
    profiles
        .upsert(UserProfile::new(alice.clone()).with_team_name("Rocket"))
        .await;

    let auth = Arc::new(MockAuthProvider::new().signed_in_as_test_user(john.clone()));
    let service = RosterService::new(
        Arc::new(InMemoryRecordStore::new()),
        profiles,
        auth,
        &config,
    );

    let hub = service.start_hub().await?;
    let listener = hub.listen(FilterScope::All, |list| {
        for session in list.iter() {
            info!(
                session_id = %session.id(),
                status = %session.status(),
                participants = session.participants().len(),
                "Feed snapshot"
            );
        }
    });

    let admin = CommandMetadata::admin(UserId::new("admin")?).with_source("demo");
    let created = service
        .create_session(
            SessionFields::new()
                .mentor_name("Ada Lovelace")
                .room("A1")
                .datetime(Timestamp::now())
                .max_participants(1),
            admin.clone(),
        )
        .await?;
    let sid = created.session_id;

    service
        .request_slot(
            sid.clone(),
            UserRef::new(alice.clone()),
            CommandMetadata::user(alice.clone()),
        )
        .await?;
    service
        .set_participant_status(sid.clone(), alice.clone(), ParticipantStatus::Approved, admin.clone())
        .await?;
    service
        .toggle_check_in(sid.clone(), alice.clone(), admin.clone())
        .await?;
    let done = service
        .set_participant_status(sid.clone(), alice, ParticipantStatus::Completed, admin.clone())
        .await?;
    info!(name = %done.name, status = %done.status, checked_in = done.checked_in, "Scenario complete");

    match service.book_slot_as_current_user(sid.clone()).await {
        Ok(result) => info!(uid = %john, name = %result.participant.name, "Booked"),
        Err(err) => warn!(uid = %john, error = %err, "Booking refused"),
    }

    listener.unsubscribe().await;
    hub.shutdown().await;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
