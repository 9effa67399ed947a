//! Tests for StatsService.
//!
//! These tests compute statistics from roster rows and account fixtures in the database and
//! verify the summary cache, roster export, visibility filtering, member search and the
//! alliance breakdown.

use std::sync::Arc;

use chrono::TimeDelta;
use corpstats::{
    error::{stats::StatsError, Error},
    identity::DbIdentityGraph,
    model::{
        app::AppState,
        identity::MainCharacter,
        visibility::{ViewPermissions, Viewer},
    },
    service::stats::StatsService,
};
use corpstats_test_utils::prelude::*;

use crate::util::{test_state, ManualClock};

const CORPORATION_ID: i64 = 98_000_001;
const OTHER_CORPORATION_ID: i64 = 98_000_002;
const ALLIANCE_ID: i64 = 99_000_001;

fn viewer(user_id: i32, corporation_id: i64, alliance_id: Option<i64>) -> Viewer {
    Viewer {
        user_id,
        main: Some(MainCharacter {
            character_id: 1,
            name: "Character 1".to_string(),
            corporation_id,
            alliance_id,
        }),
        ..Default::default()
    }
}

fn view_all() -> Viewer {
    Viewer {
        user_id: 1000,
        permissions: ViewPermissions {
            view_all: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Builds the corporation used by classification tests.
///
/// - Account A: main 1 and alt 2 in the corporation, alt 3 in another corporation, enrolled
///   in discord
/// - Account B: main 5 in another corporation, alt 4 in the corporation
/// - Roster: 1, 2, 4 and the unlinked character 6
async fn classified_corporation() -> Result<(TestContext, i32), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_character(1, CORPORATION_ID, None)
        .with_mock_character(2, CORPORATION_ID, None)
        .with_mock_character(3, OTHER_CORPORATION_ID, None)
        .with_mock_character(4, CORPORATION_ID, None)
        .with_mock_character(5, OTHER_CORPORATION_ID, None)
        .with_user(1, &[2, 3])
        .with_user(5, &[4])
        .with_user_services(1, &["discord"])
        .build()
        .await?;

    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    test.corpstats()
        .insert_mock_members(
            unit.id,
            &[
                (1, "Character 1"),
                (2, "Character 2"),
                (4, "Character 4"),
                (6, "Character 6"),
            ],
        )
        .await?;

    Ok((test, unit.id))
}

async fn summary(state: &AppState, unit_id: i32) -> corpstats::model::stats::Summary {
    let identity = DbIdentityGraph::new(&state.db);
    StatsService::new(&state.db, &identity, &state.cache, &state.services)
        .summary(unit_id)
        .await
        .unwrap()
}

/// Expect mains, alts, orphans and unregistered members to be classified from the roster
#[tokio::test]
async fn classifies_roster_against_accounts() -> Result<(), TestError> {
    let (test, unit_id) = classified_corporation().await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    let identity = DbIdentityGraph::new(&state.db);

    let stats = StatsService::new(&state.db, &identity, &state.cache, &state.services)
        .compute(unit_id)
        .await
        .unwrap();

    let summary = &stats.summary;
    assert_eq!(summary.corporation_id, CORPORATION_ID);
    assert_eq!(summary.total_mains, 1);
    assert_eq!(summary.known_members, 3);
    assert_eq!(summary.total_unregistered, 1);
    assert_eq!(summary.total_members, 4);
    assert_eq!(summary.total_orphans, 1);
    assert_eq!(summary.alt_count, 2);
    assert_eq!(summary.auth_percent, 75.0);
    assert_eq!(summary.alt_ratio, 0.5);
    assert_eq!(summary.services["discord"].enrolled_mains, 1);
    assert_eq!(summary.services["discord"].percent, 100.0);
    assert_eq!(summary.services["mumble"].percent, 0.0);

    let bucket = &stats.mains[&1];
    let alt_ids: Vec<i64> = bucket.alts.iter().map(|c| c.character_id).collect();
    assert_eq!(alt_ids, vec![1, 2, 3]);
    assert_eq!(bucket.services.get("discord"), Some(&true));

    let orphan_ids: Vec<i64> = stats.orphans.iter().map(|c| c.character_id).collect();
    assert_eq!(orphan_ids, vec![4]);

    let unregistered: Vec<i64> = stats.unregistered.iter().map(|r| r.character_id).collect();
    assert_eq!(unregistered, vec![6]);

    Ok(())
}

/// Expect the cached summary to be served until it is invalidated
#[tokio::test]
async fn serves_cached_summary_until_invalidated() -> Result<(), TestError> {
    let (mut test, unit_id) = classified_corporation().await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let first = summary(&state, unit_id).await;
    assert_eq!(first.total_members, 4);

    test.corpstats()
        .insert_mock_members(unit_id, &[(7, "Character 7")])
        .await?;

    let cached = summary(&state, unit_id).await;
    assert_eq!(cached.total_members, 4);
    assert_eq!(cached.generated_at, first.generated_at);

    state.cache.invalidate(CORPORATION_ID).await;

    let fresh = summary(&state, unit_id).await;
    assert_eq!(fresh.total_members, 5);

    Ok(())
}

/// Expect the summary to be recomputed once the TTL has elapsed
#[tokio::test]
async fn recomputes_summary_after_ttl() -> Result<(), TestError> {
    let (mut test, unit_id) = classified_corporation().await?;
    let clock = Arc::new(ManualClock::new());
    let state = test_state(&test, clock.clone());

    summary(&state, unit_id).await;
    test.corpstats()
        .insert_mock_members(unit_id, &[(7, "Character 7")])
        .await?;

    clock.advance(TimeDelta::hours(11));
    assert_eq!(summary(&state, unit_id).await.total_members, 4);

    clock.advance(TimeDelta::hours(2));
    assert_eq!(summary(&state, unit_id).await.total_members, 5);

    Ok(())
}

/// Expect a missing unit to be reported as not found
#[tokio::test]
async fn summary_fails_for_unknown_unit() -> Result<(), TestError> {
    let test = TestBuilder::new().with_corpstats_tables().build().await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    let identity = DbIdentityGraph::new(&state.db);

    let result = StatsService::new(&state.db, &identity, &state.cache, &state.services)
        .summary(7)
        .await;

    assert!(matches!(
        result,
        Err(Error::StatsError(StatsError::UnitNotFound(7)))
    ));

    Ok(())
}

/// Expect the export to list every roster row ordered by name with empty absent fields
#[tokio::test]
async fn exports_roster_rows() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_corpstats_tables().build().await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    test.corpstats()
        .insert_mock_members(unit.id, &[(2, "Bravo"), (1, "Alpha")])
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    let identity = DbIdentityGraph::new(&state.db);

    let table = StatsService::new(&state.db, &identity, &state.cache, &state.services)
        .export(unit.id)
        .await
        .unwrap()
        .expect("roster is not empty");

    assert_eq!(table.filename, "Corporation98000001");
    assert_eq!(table.header.len(), 10);
    assert_eq!(table.header[0], "character_id");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], "1");
    assert_eq!(table.rows[0][1], "Alpha");
    assert!(table.rows[0][2..].iter().all(String::is_empty));

    Ok(())
}

/// Expect no export for an empty roster
#[tokio::test]
async fn exports_nothing_for_empty_roster() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_corpstats_tables().build().await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    let identity = DbIdentityGraph::new(&state.db);

    let table = StatsService::new(&state.db, &identity, &state.cache, &state.services)
        .export(unit.id)
        .await
        .unwrap();

    assert!(table.is_none());

    Ok(())
}

/// Expect units to be filtered by the viewer's permissions and main
#[tokio::test]
async fn filters_visible_units() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_corporation(CORPORATION_ID, Some(ALLIANCE_ID))
        .with_mock_corporation(OTHER_CORPORATION_ID, None)
        .build()
        .await?;
    let first = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    let second = test
        .corpstats()
        .insert_mock_unit(OTHER_CORPORATION_ID, 2, None)
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    let identity = DbIdentityGraph::new(&state.db);
    let stats_service = StatsService::new(&state.db, &identity, &state.cache, &state.services);

    let ids = |units: Vec<(entity::corpstats_unit::Model, entity::eve_corporation::Model)>| {
        units.into_iter().map(|(unit, _)| unit.id).collect::<Vec<i32>>()
    };

    let all = stats_service.visible_units(&view_all()).await.unwrap();
    assert_eq!(ids(all), vec![first.id, second.id]);

    let mut corp_viewer = viewer(1, CORPORATION_ID, Some(ALLIANCE_ID));
    corp_viewer.permissions.view_corp = true;
    let visible = stats_service.visible_units(&corp_viewer).await.unwrap();
    assert_eq!(ids(visible), vec![first.id]);

    let mut alliance_viewer = viewer(1, 98_000_003, Some(ALLIANCE_ID));
    alliance_viewer.permissions.view_alliance = true;
    let visible = stats_service.visible_units(&alliance_viewer).await.unwrap();
    assert_eq!(ids(visible), vec![first.id]);

    let mut state_viewer = viewer(1, 98_000_003, None);
    state_viewer.permissions.view_state = true;
    state_viewer.state_corporations = vec![OTHER_CORPORATION_ID];
    let visible = stats_service.visible_units(&state_viewer).await.unwrap();
    assert_eq!(ids(visible), vec![second.id]);

    let no_main = Viewer {
        main: None,
        ..corp_viewer.clone()
    };
    assert!(stats_service.visible_units(&no_main).await.unwrap().is_empty());

    assert!(stats_service.can_update(&corp_viewer, first.id).await.unwrap());
    assert!(!stats_service.can_update(&corp_viewer, second.id).await.unwrap());

    Ok(())
}

/// Expect search to cover only visible units and match names case-insensitively
#[tokio::test]
async fn searches_visible_rosters() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_corpstats_tables().build().await?;
    let first = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    let second = test
        .corpstats()
        .insert_mock_unit(OTHER_CORPORATION_ID, 2, None)
        .await?;
    test.corpstats()
        .insert_mock_members(first.id, &[(1, "Hyziri"), (2, "Bravo")])
        .await?;
    test.corpstats()
        .insert_mock_members(second.id, &[(3, "hyzirian")])
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    let identity = DbIdentityGraph::new(&state.db);
    let stats_service = StatsService::new(&state.db, &identity, &state.cache, &state.services);

    let results = stats_service
        .search_members(&view_all(), "HYZ")
        .await
        .unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.character_name.as_str()).collect();
    assert_eq!(names, vec!["Hyziri", "hyzirian"]);
    assert_eq!(results[1].corporation_id, OTHER_CORPORATION_ID);

    let mut corp_viewer = viewer(1, CORPORATION_ID, None);
    corp_viewer.permissions.view_corp = true;
    let results = stats_service
        .search_members(&corp_viewer, "hyz")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].character_id, 1);

    assert!(stats_service
        .search_members(&view_all(), "  ")
        .await
        .unwrap()
        .is_empty());

    Ok(())
}

/// Expect alliance characters to be counted per corporation with tracked roster totals
#[tokio::test]
async fn breaks_down_alliance_by_corporation() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_character(1, CORPORATION_ID, Some(ALLIANCE_ID))
        .with_mock_character(2, CORPORATION_ID, Some(ALLIANCE_ID))
        .with_mock_character(3, 98_000_003, Some(ALLIANCE_ID))
        .with_mock_character(4, OTHER_CORPORATION_ID, None)
        .with_user(1, &[2, 4])
        .with_user(3, &[])
        .build()
        .await?;
    let unit = test.corpstats().insert_mock_unit(CORPORATION_ID, 1, None).await?;
    test.corpstats()
        .insert_mock_members(unit.id, &[(1, "Character 1"), (2, "Character 2")])
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));
    let identity = DbIdentityGraph::new(&state.db);

    let breakdown = StatsService::new(&state.db, &identity, &state.cache, &state.services)
        .alliance_breakdown(ALLIANCE_ID)
        .await
        .unwrap();

    assert_eq!(breakdown.len(), 2);

    assert_eq!(breakdown[0].corporation_id, CORPORATION_ID);
    assert_eq!(breakdown[0].mains, 1);
    assert_eq!(breakdown[0].alts, 1);
    assert_eq!(breakdown[0].members, 2);
    assert_eq!(breakdown[0].tracked_total, Some(2));

    assert_eq!(breakdown[1].corporation_id, 98_000_003);
    assert_eq!(breakdown[1].mains, 1);
    assert_eq!(breakdown[1].tracked_total, None);

    Ok(())
}
