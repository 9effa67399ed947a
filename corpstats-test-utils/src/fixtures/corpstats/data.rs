use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    constant::TEST_ACCESS_TOKEN,
    error::TestError,
    fixtures::{corpstats::CorpStatsFixtures, eve::EveFixtures},
    model::{CorpMemberModel, CorpStatsUnitModel},
};

impl<'a> CorpStatsFixtures<'a> {
    /// Insert a stats unit for a corporation, creating the corporation when missing.
    ///
    /// # Arguments
    /// - `corporation_id` - EVE corporation ID the unit tracks
    /// - `token_character_id` - EVE character ID the credential belongs to
    /// - `owner_id` - Account owning the credential, if any
    ///
    /// # Returns
    /// - `Ok(CorpStatsUnitModel)` - The created unit, never synced
    /// - `Err(TestError::DbErr)` - The corporation already has a unit or an insert failed
    pub async fn insert_mock_unit(
        &mut self,
        corporation_id: i64,
        token_character_id: i64,
        owner_id: Option<i32>,
    ) -> Result<CorpStatsUnitModel, TestError> {
        let corporation = EveFixtures {
            setup: &mut *self.setup,
        }
        .insert_mock_corporation(corporation_id, None)
        .await?;

        Ok(
            entity::prelude::CorpstatsUnit::insert(entity::corpstats_unit::ActiveModel {
                corporation_id: ActiveValue::Set(corporation.id),
                token_character_id: ActiveValue::Set(token_character_id),
                token_owner_id: ActiveValue::Set(owner_id),
                access_token: ActiveValue::Set(TEST_ACCESS_TOKEN.to_string()),
                last_update_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert roster rows for a unit with only the character ID and name set.
    pub async fn insert_mock_members(
        &self,
        unit_id: i32,
        members: &[(i64, &str)],
    ) -> Result<Vec<CorpMemberModel>, TestError> {
        let mut rows = Vec::with_capacity(members.len());

        for (character_id, name) in members {
            rows.push(
                entity::prelude::CorpstatsMember::insert(entity::corpstats_member::ActiveModel {
                    unit_id: ActiveValue::Set(unit_id),
                    character_id: ActiveValue::Set(*character_id),
                    character_name: ActiveValue::Set(name.to_string()),
                    location_id: ActiveValue::Set(None),
                    location_name: ActiveValue::Set(None),
                    ship_type_id: ActiveValue::Set(None),
                    ship_type_name: ActiveValue::Set(None),
                    start_date: ActiveValue::Set(None),
                    logon_date: ActiveValue::Set(None),
                    logoff_date: ActiveValue::Set(None),
                    base_id: ActiveValue::Set(None),
                    ..Default::default()
                })
                .exec_with_returning(&self.setup.db)
                .await?,
            );
        }

        Ok(rows)
    }
}
