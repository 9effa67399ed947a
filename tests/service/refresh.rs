//! Tests for RefreshService.

use std::sync::Arc;

use corpstats::{
    data::unit::UnitRepository,
    model::roster::{SyncFailure, SyncOutcome},
    service::refresh::{RefreshService, RefreshSummary},
};
use corpstats_test_utils::prelude::*;

use crate::util::{test_state, ManualClock};

/// Expect a refreshed unit to have its summary re-cached
#[tokio::test]
async fn refresh_unit_recaches_summary() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(98_000_001, None), 1)
        .with_member_tracking_endpoint(
            98_000_001,
            vec![factory::mock_bare_tracked_member(1)],
            1,
        )
        .with_names_endpoint(&[(1, "Alpha")], 1)
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(98_000_001, 1, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let outcome = RefreshService::new(&state).refresh_unit(unit.id).await.unwrap();

    assert!(matches!(outcome, SyncOutcome::Updated(_)));

    let cached = state
        .cache
        .get(98_000_001)
        .await
        .unwrap()
        .expect("summary should be cached after refresh");
    assert_eq!(cached.total_members, 1);
    assert_eq!(cached.total_unregistered, 1);

    test.assert_mocks();

    Ok(())
}

/// Expect every unit to be refreshed and failures to be counted without stopping the run
#[tokio::test]
async fn refresh_all_counts_outcomes() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(98_000_001, None), 1)
        .with_character_endpoint(2, factory::mock_character(98_000_002, None), 1)
        .with_character_endpoint(3, factory::mock_character(98_000_003, None), 1)
        .with_member_tracking_endpoint(98_000_001, Vec::new(), 1)
        .with_member_tracking_error(98_000_002, 401, "token is expired", 1)
        .with_member_tracking_error(98_000_003, 503, "Service unavailable", 1)
        .build()
        .await?;
    test.corpstats().insert_mock_unit(98_000_001, 1, None).await?;
    let removed = test.corpstats().insert_mock_unit(98_000_002, 2, None).await?;
    let failed = test.corpstats().insert_mock_unit(98_000_003, 3, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let summary = RefreshService::new(&state).refresh_all().await.unwrap();

    assert_eq!(
        summary,
        RefreshSummary {
            updated: 1,
            removed: 1,
            failed: 1,
        }
    );

    let unit_repo = UnitRepository::new(&test.db);
    assert!(unit_repo.get(removed.id).await?.is_none());
    assert!(unit_repo.get(failed.id).await?.is_some());

    test.assert_mocks();

    Ok(())
}

/// Expect a unit removed during refresh to report why
#[tokio::test]
async fn refresh_unit_reports_removal() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(98_000_001, None), 1)
        .with_member_tracking_error(98_000_001, 401, "token is expired", 1)
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(98_000_001, 1, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let outcome = RefreshService::new(&state).refresh_unit(unit.id).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Removed(SyncFailure::CredentialInvalid));
    assert!(!state.cache.contains(98_000_001).await);

    Ok(())
}
