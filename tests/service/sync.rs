//! Tests for SyncService::sync.
//!
//! These tests run a sync against the mock ESI server and verify the stored roster, the fate of
//! the unit on credential failures, notifications to the credential owner and cache
//! invalidation.

use std::sync::Arc;

use corpstats::{
    data::{member::MemberRepository, notification::NotificationRepository, unit::UnitRepository},
    error::{source::SourceError, stats::StatsError, Error},
    identity::DbIdentityGraph,
    model::{
        app::AppState,
        roster::{EnrichmentKind, SyncFailure, SyncOutcome},
    },
    service::{stats::StatsService, sync::SyncService},
    source::ESI_NAMES_BATCH_SIZE,
};
use corpstats_test_utils::prelude::*;
use sea_orm::EntityTrait;

use crate::util::{only_user, test_state, ManualClock};

const CORPORATION_ID: i64 = 98_000_001;

async fn sync(state: &AppState, unit_id: i32) -> Result<SyncOutcome, Error> {
    SyncService::new(
        &state.db,
        state.source.as_ref(),
        state.notifier.as_ref(),
        &state.cache,
    )
    .sync(unit_id)
    .await
}

async fn warm_cache(state: &AppState, unit_id: i32) {
    let identity = DbIdentityGraph::new(&state.db);
    StatsService::new(&state.db, &identity, &state.cache, &state.services)
        .recache(unit_id)
        .await
        .unwrap();

    assert!(state.cache.contains(CORPORATION_ID).await);
}

/// Expect the stored roster to match the member tracking response exactly
#[tokio::test]
async fn replaces_roster_with_tracked_members() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_endpoint(
            CORPORATION_ID,
            vec![factory::mock_tracked_member(1), factory::mock_tracked_member(2)],
            1,
        )
        .with_names_endpoint(&[(1, "Alpha"), (2, "Bravo")], 1)
        .with_type_endpoint(factory::MOCK_SHIP_TYPE_ID, "Rifter", 1)
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    test.corpstats()
        .insert_mock_members(unit.id, &[(2, "Bravo"), (3, "Charlie")])
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let outcome = sync(&state, unit.id).await.unwrap();

    match outcome {
        SyncOutcome::Updated(report) => {
            assert_eq!(report.members, 2);
            assert!(report.enrichment_failures.is_empty());
        }
        other => panic!("expected updated outcome, got {:?}", other),
    }

    let roster = MemberRepository::new(&test.db).get_by_unit(unit.id).await?;
    let ids: Vec<i64> = roster.iter().map(|m| m.character_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(roster[0].character_name, "Alpha");
    assert_eq!(roster[0].ship_type_name.as_deref(), Some("Rifter"));
    assert_eq!(roster[0].location_id, Some(60003760));
    assert!(roster[0].location_name.is_none());
    assert!(roster[0].logoff_date.is_some());

    let unit = UnitRepository::new(&test.db).get(unit.id).await?.unwrap();
    assert!(unit.last_update_at.is_some());

    test.assert_mocks();

    Ok(())
}

/// Expect members whose names or ship types cannot be resolved to be stored anyway
#[tokio::test]
async fn keeps_members_when_enrichment_fails() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("GET", "/universe/types/587")
                .with_status(404)
                .with_header("content-type", "application/json")
                .with_body(r#"{"error":"Type not found!"}"#)
                .expect(1)
                .create()
        })
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_endpoint(
            CORPORATION_ID,
            vec![
                factory::mock_tracked_member(1),
                factory::mock_tracked_member(2),
                factory::mock_bare_tracked_member(3),
            ],
            1,
        )
        .with_names_endpoint(&[(1, "Alpha"), (3, "Charlie")], 1)
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let outcome = sync(&state, unit.id).await.unwrap();

    let SyncOutcome::Updated(report) = outcome else {
        panic!("expected updated outcome");
    };
    assert_eq!(report.members, 3);

    let name_failures: Vec<i64> = report
        .enrichment_failures
        .iter()
        .filter(|f| f.kind == EnrichmentKind::CharacterName)
        .map(|f| f.character_id)
        .collect();
    assert_eq!(name_failures, vec![2]);

    let type_failures = report
        .enrichment_failures
        .iter()
        .filter(|f| f.kind == EnrichmentKind::ShipType { type_id: 587 })
        .count();
    assert_eq!(type_failures, 2);

    let roster = MemberRepository::new(&test.db).get_by_unit(unit.id).await?;
    assert_eq!(roster.len(), 3);

    let unnamed = roster.iter().find(|m| m.character_id == 2).unwrap();
    assert_eq!(unnamed.character_name, "");
    assert!(unnamed.ship_type_name.is_none());
    assert_eq!(unnamed.ship_type_id, Some(587));

    test.assert_mocks();

    Ok(())
}

/// Expect names of a large roster to be resolved in batches of at most 255 ids
#[tokio::test]
async fn resolves_names_in_batches() -> Result<(), TestError> {
    let member_count: i64 = 1100;
    let names: Vec<(i64, String)> = (1..=member_count)
        .map(|id| (id, format!("Character {}", id)))
        .collect();
    let body: Vec<serde_json::Value> = names
        .iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name, "category": "character" }))
        .collect();
    let expected_batches = (member_count as usize).div_ceil(ESI_NAMES_BATCH_SIZE);

    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_endpoint(move |server| {
            server
                .mock("POST", "/universe/names")
                .match_request(|request| {
                    request
                        .body()
                        .ok()
                        .and_then(|body| serde_json::from_slice::<Vec<i64>>(body).ok())
                        .is_some_and(|ids| !ids.is_empty() && ids.len() <= ESI_NAMES_BATCH_SIZE)
                })
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(serde_json::Value::Array(body).to_string())
                .expect(expected_batches)
                .create()
        })
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_endpoint(
            CORPORATION_ID,
            (1..=member_count)
                .map(factory::mock_bare_tracked_member)
                .collect(),
            1,
        )
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let SyncOutcome::Updated(report) = sync(&state, unit.id).await.unwrap() else {
        panic!("expected updated outcome");
    };

    assert_eq!(report.members, member_count as usize);
    assert!(report.enrichment_failures.is_empty());

    let roster = MemberRepository::new(&test.db).get_by_unit(unit.id).await?;
    assert_eq!(roster.len(), member_count as usize);
    assert!(roster
        .iter()
        .all(|m| m.character_name == format!("Character {}", m.character_id)));

    // Names endpoint expects ceil(1100 / 255) = 5 requests
    test.assert_mocks();

    Ok(())
}

/// Expect a failed name batch to leave every member of the batch unnamed but stored
#[tokio::test]
async fn keeps_members_when_name_batch_fails() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/universe/names")
                .with_status(500)
                .with_body(r#"{"error":"Internal server error"}"#)
                .expect(1)
                .create()
        })
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_endpoint(
            CORPORATION_ID,
            vec![
                factory::mock_bare_tracked_member(1),
                factory::mock_bare_tracked_member(2),
            ],
            1,
        )
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let SyncOutcome::Updated(report) = sync(&state, unit.id).await.unwrap() else {
        panic!("expected updated outcome");
    };

    assert_eq!(report.members, 2);
    assert_eq!(report.enrichment_failures.len(), 2);
    assert_eq!(
        MemberRepository::new(&test.db).get_by_unit(unit.id).await?.len(),
        2
    );

    Ok(())
}

/// Expect an expired credential to remove the unit and notify its owner once
#[tokio::test]
async fn removes_unit_on_invalid_credential() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_character(1, CORPORATION_ID, None)
        .with_user(1, &[])
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_error(CORPORATION_ID, 401, "token is expired", 1)
        .build()
        .await?;
    let owner = only_user(&test).await;
    let unit = test
        .corpstats()
        .insert_mock_unit(CORPORATION_ID, 1, Some(owner.id))
        .await?;
    test.corpstats()
        .insert_mock_members(unit.id, &[(1, "Alpha")])
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    warm_cache(&state, unit.id).await;

    let outcome = sync(&state, unit.id).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Removed(SyncFailure::CredentialInvalid));
    assert!(UnitRepository::new(&test.db).get(unit.id).await?.is_none());
    assert!(!state.cache.contains(CORPORATION_ID).await);

    let notifications = NotificationRepository::new(&test.db)
        .get_by_user(owner.id)
        .await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, "error");
    assert_eq!(
        notifications[0].title,
        "Corp stats for Corporation 98000001 failed to update with your ESI token."
    );

    test.assert_mocks();

    Ok(())
}

/// Expect a refused member tracking request to remove the unit with the upstream message
#[tokio::test]
async fn removes_unit_on_forbidden_tracking() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_character(1, CORPORATION_ID, None)
        .with_user(1, &[])
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_error(
            CORPORATION_ID,
            403,
            "Character does not have required role(s)",
            1,
        )
        .build()
        .await?;
    let owner = only_user(&test).await;
    let unit = test
        .corpstats()
        .insert_mock_unit(CORPORATION_ID, 1, Some(owner.id))
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let outcome = sync(&state, unit.id).await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Removed(SyncFailure::UpstreamForbidden {
            status: 403,
            message: "Character does not have required role(s)".to_string(),
        })
    );
    assert!(UnitRepository::new(&test.db).get(unit.id).await?.is_none());

    let notifications = NotificationRepository::new(&test.db)
        .get_by_user(owner.id)
        .await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].message,
        "403: Character does not have required role(s)"
    );

    test.assert_mocks();

    Ok(())
}

/// Expect a credential character that left the corporation to remove the unit without
/// requesting member tracking
#[tokio::test]
async fn removes_unit_when_credential_left_corporation() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_character(1, CORPORATION_ID, None)
        .with_user(1, &[])
        .with_character_endpoint(1, factory::mock_character(98_000_002, None), 1)
        .with_member_tracking_endpoint(CORPORATION_ID, Vec::new(), 0)
        .build()
        .await?;
    let owner = only_user(&test).await;
    let unit = test
        .corpstats()
        .insert_mock_unit(CORPORATION_ID, 1, Some(owner.id))
        .await?;
    test.corpstats()
        .insert_mock_members(unit.id, &[(1, "Alpha")])
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    warm_cache(&state, unit.id).await;

    let outcome = sync(&state, unit.id).await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Removed(SyncFailure::OwnershipMismatch {
            expected: CORPORATION_ID,
            actual: 98_000_002,
        })
    );
    assert!(UnitRepository::new(&test.db).get(unit.id).await?.is_none());
    assert!(!state.cache.contains(CORPORATION_ID).await);

    let notifications = entity::prelude::Notification::find().all(&test.db).await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, owner.id);
    assert_eq!(
        notifications[0].message,
        "Corp stats for Corporation 98000001 cannot update with your ESI token as you have left corp."
    );

    // Member tracking endpoint expects 0 requests
    test.assert_mocks();

    Ok(())
}

/// Expect a unit without an owner to be removed without notifying anyone
#[tokio::test]
async fn removes_ownerless_unit_silently() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_error(CORPORATION_ID, 401, "token is expired", 1)
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let outcome = sync(&state, unit.id).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Removed(SyncFailure::CredentialInvalid));
    assert!(entity::prelude::Notification::find()
        .all(&test.db)
        .await?
        .is_empty());

    Ok(())
}

/// Expect a transient upstream failure to leave the unit and its roster untouched
#[tokio::test]
async fn keeps_unit_on_transient_failure() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .with_member_tracking_error(CORPORATION_ID, 500, "Internal server error", 1)
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    test.corpstats()
        .insert_mock_members(unit.id, &[(2, "Bravo"), (3, "Charlie")])
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let result = sync(&state, unit.id).await;

    assert!(matches!(
        result,
        Err(Error::SourceError(SourceError::UnexpectedStatus { status: 500, .. }))
    ));

    let stored = UnitRepository::new(&test.db).get(unit.id).await?.unwrap();
    assert!(stored.last_update_at.is_none());

    let roster = MemberRepository::new(&test.db).get_by_unit(unit.id).await?;
    assert_eq!(roster.len(), 2);

    test.assert_mocks();

    Ok(())
}

/// Expect an error for a unit that does not exist
#[tokio::test]
async fn fails_for_unknown_unit() -> Result<(), TestError> {
    let test = TestBuilder::new().with_corpstats_tables().build().await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let result = sync(&state, 42).await;

    assert!(matches!(
        result,
        Err(Error::StatsError(StatsError::UnitNotFound(42)))
    ));

    Ok(())
}
