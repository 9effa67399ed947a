//! Shared helpers for service integration tests.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use corpstats::{
    cache::{Clock, SummaryCache},
    model::{app::AppState, registry::ServiceRegistry},
    notify::DbNotifier,
    source::EsiRosterSource,
    util::lock::UnitLocks,
};
use corpstats_test_utils::TestContext;
use sea_orm::EntityTrait;

/// Cache TTL used by integration tests.
pub const TEST_CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// [`Clock`] that only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()))
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Services registered in every test application.
pub fn test_services() -> ServiceRegistry {
    ServiceRegistry::new()
        .with_service("discord", "Discord")
        .with_service("mumble", "Mumble")
}

/// Builds application state against the test database and mock ESI server.
pub fn test_state(test: &TestContext, clock: Arc<ManualClock>) -> AppState {
    let source = EsiRosterSource::new(
        test.esi_client.clone(),
        reqwest::Client::new(),
        &test.esi_url,
    );

    AppState {
        db: test.db.clone(),
        esi_client: test.esi_client.clone(),
        source: Arc::new(source),
        notifier: Arc::new(DbNotifier::new(test.db.clone())),
        cache: Arc::new(SummaryCache::new(TEST_CACHE_TTL, clock)),
        services: Arc::new(test_services()),
        locks: UnitLocks::new(),
    }
}

/// The first account in the database, tests creating exactly one account use it as owner.
pub async fn only_user(test: &TestContext) -> entity::auth_user::Model {
    entity::prelude::AuthUser::find()
        .one(&test.db)
        .await
        .unwrap()
        .expect("an account fixture should exist")
}
