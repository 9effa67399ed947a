//! Tests for UnitService::register.

use std::sync::Arc;

use corpstats::{
    data::{eve::CorporationRepository, member::MemberRepository, unit::UnitRepository},
    error::{stats::StatsError, Error},
    model::{
        app::AppState,
        roster::{Credential, SyncOutcome},
    },
    service::unit::UnitService,
};
use corpstats_test_utils::prelude::*;

use crate::util::{test_state, ManualClock};

const CORPORATION_ID: i64 = 98_000_001;
const ALLIANCE_ID: i64 = 99_000_001;

fn credential() -> Credential {
    Credential {
        character_id: 1,
        owner_id: None,
        access_token: "access_token".to_string(),
    }
}

fn unit_service(state: &AppState) -> UnitService<'_> {
    UnitService::new(
        &state.db,
        &state.esi_client,
        state.source.as_ref(),
        state.notifier.as_ref(),
        &state.cache,
    )
}

/// Expect registration to create the corporation from ESI and store the first roster
#[tokio::test]
async fn registers_unit_and_syncs_roster() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, Some(ALLIANCE_ID)), 2)
        .with_corporation_endpoint(CORPORATION_ID, factory::mock_corporation(Some(ALLIANCE_ID)), 1)
        .with_alliance_endpoint(ALLIANCE_ID, factory::mock_alliance(), 1)
        .with_member_tracking_endpoint(CORPORATION_ID, vec![factory::mock_tracked_member(1)], 1)
        .with_names_endpoint(&[(1, "Alpha")], 1)
        .with_type_endpoint(factory::MOCK_SHIP_TYPE_ID, "Rifter", 1)
        .build()
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let (unit, outcome) = unit_service(&state).register(credential()).await.unwrap();

    assert!(matches!(outcome, SyncOutcome::Updated(ref report) if report.members == 1));

    let corporation = CorporationRepository::new(&test.db)
        .get_by_corporation_id(CORPORATION_ID)
        .await?
        .expect("corporation should be created");
    assert_eq!(corporation.id, unit.corporation_id);
    assert_eq!(corporation.name, "The Order of Autumn");
    assert!(corporation.alliance_id.is_some());

    let roster = MemberRepository::new(&test.db).get_by_unit(unit.id).await?;
    assert_eq!(roster.len(), 1);

    test.assert_mocks();

    Ok(())
}

/// Expect an already stored corporation to be reused without an ESI lookup
#[tokio::test]
async fn reuses_stored_corporation() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_corpstats_tables()
        .with_mock_corporation(CORPORATION_ID, None)
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 2)
        .with_corporation_endpoint(CORPORATION_ID, factory::mock_corporation(None), 0)
        .with_member_tracking_endpoint(CORPORATION_ID, Vec::new(), 1)
        .build()
        .await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let (unit, outcome) = unit_service(&state).register(credential()).await.unwrap();

    assert!(matches!(outcome, SyncOutcome::Updated(ref report) if report.members == 0));
    assert!(UnitRepository::new(&test.db).get(unit.id).await?.is_some());

    test.assert_mocks();

    Ok(())
}

/// Expect a second registration for the same corporation to be rejected
#[tokio::test]
async fn rejects_duplicate_registration() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_corpstats_tables()
        .with_character_endpoint(1, factory::mock_character(CORPORATION_ID, None), 1)
        .build()
        .await?;
    test.corpstats().insert_mock_unit(CORPORATION_ID, 2, None).await?;
    let state = test_state(&test, Arc::new(ManualClock::new()));

    let result = unit_service(&state).register(credential()).await;

    assert!(matches!(
        result,
        Err(Error::StatsError(StatsError::UnitAlreadyExists(CORPORATION_ID)))
    ));
    assert_eq!(UnitRepository::new(&test.db).get_all_ids().await?.len(), 1);

    test.assert_mocks();

    Ok(())
}
