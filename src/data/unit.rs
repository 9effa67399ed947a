use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::model::{
    db::{CorpStatsUnitModel, EveCorporationModel},
    roster::Credential,
};

pub struct UnitRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UnitRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a stats unit for a corporation
    ///
    /// # Arguments
    /// - `corporation_record_id` - Record ID of the corporation in `eve_corporation`
    /// - `credential` - Credential the unit syncs with
    ///
    /// # Returns
    /// - `Err(DbErr)` - Includes the unique constraint violation when the corporation already has a unit
    pub async fn create(
        &self,
        corporation_record_id: i32,
        credential: &Credential,
    ) -> Result<CorpStatsUnitModel, DbErr> {
        let unit = entity::corpstats_unit::ActiveModel {
            corporation_id: ActiveValue::Set(corporation_record_id),
            token_character_id: ActiveValue::Set(credential.character_id),
            token_owner_id: ActiveValue::Set(credential.owner_id),
            access_token: ActiveValue::Set(credential.access_token.clone()),
            last_update_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        unit.insert(self.db).await
    }

    pub async fn get(&self, unit_id: i32) -> Result<Option<CorpStatsUnitModel>, DbErr> {
        entity::prelude::CorpstatsUnit::find_by_id(unit_id)
            .one(self.db)
            .await
    }

    /// Get a unit together with the corporation it tracks
    pub async fn get_with_corporation(
        &self,
        unit_id: i32,
    ) -> Result<Option<(CorpStatsUnitModel, EveCorporationModel)>, DbErr> {
        let result = entity::prelude::CorpstatsUnit::find_by_id(unit_id)
            .find_also_related(entity::prelude::EveCorporation)
            .one(self.db)
            .await?;

        Ok(result.and_then(|(unit, corporation)| corporation.map(|c| (unit, c))))
    }

    /// Get the unit tracking a corporation record, if any
    pub async fn get_by_corporation(
        &self,
        corporation_record_id: i32,
    ) -> Result<Option<CorpStatsUnitModel>, DbErr> {
        entity::prelude::CorpstatsUnit::find()
            .filter(entity::corpstats_unit::Column::CorporationId.eq(corporation_record_id))
            .one(self.db)
            .await
    }

    /// Get every unit with its corporation, ordered by unit ID
    pub async fn get_all_with_corporation(
        &self,
    ) -> Result<Vec<(CorpStatsUnitModel, EveCorporationModel)>, DbErr> {
        let units = entity::prelude::CorpstatsUnit::find()
            .find_also_related(entity::prelude::EveCorporation)
            .order_by_asc(entity::corpstats_unit::Column::Id)
            .all(self.db)
            .await?;

        Ok(units
            .into_iter()
            .filter_map(|(unit, corporation)| corporation.map(|c| (unit, c)))
            .collect())
    }

    pub async fn get_all_ids(&self) -> Result<Vec<i32>, DbErr> {
        let units = entity::prelude::CorpstatsUnit::find()
            .order_by_asc(entity::corpstats_unit::Column::Id)
            .all(self.db)
            .await?;

        Ok(units.into_iter().map(|unit| unit.id).collect())
    }

    /// Stamps the time of the unit's last successful sync
    pub async fn set_last_update(&self, unit_id: i32, now: NaiveDateTime) -> Result<(), DbErr> {
        entity::prelude::CorpstatsUnit::update_many()
            .col_expr(
                entity::corpstats_unit::Column::LastUpdateAt,
                Expr::value(Some(now)),
            )
            .filter(entity::corpstats_unit::Column::Id.eq(unit_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Deletes a unit, its roster rows are removed by cascade
    ///
    /// # Returns
    /// - `Ok(true)` - The unit existed and was deleted
    /// - `Ok(false)` - No unit with the ID exists
    pub async fn delete(&self, unit_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::CorpstatsUnit::delete_by_id(unit_id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use corpstats_test_utils::{TestBuilder, TestError};

    use super::*;

    fn credential(character_id: i64) -> Credential {
        Credential {
            character_id,
            owner_id: None,
            access_token: "token".to_string(),
        }
    }

    /// Expect a second unit for the same corporation to violate the unique constraint
    #[tokio::test]
    async fn rejects_second_unit_for_corporation() -> Result<(), TestError> {
        let mut test = TestBuilder::new()
            .with_corpstats_tables()
            .with_mock_corporation(98_000_001, None)
            .build()
            .await?;
        let corporation = test.eve().insert_mock_corporation(98_000_001, None).await?;

        let unit_repo = UnitRepository::new(&test.db);
        let created = unit_repo.create(corporation.id, &credential(1)).await?;
        assert_eq!(created.last_update_at, None);

        let duplicate = unit_repo.create(corporation.id, &credential(2)).await;
        assert!(duplicate.is_err());

        Ok(())
    }

    /// Expect deleting a unit to remove its roster rows
    #[tokio::test]
    async fn delete_cascades_roster_rows() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_corpstats_tables().build().await?;
        let unit = test.corpstats().insert_mock_unit(98_000_001, 1, None).await?;
        test.corpstats()
            .insert_mock_members(unit.id, &[(1, "Alpha"), (2, "Bravo")])
            .await?;

        let unit_repo = UnitRepository::new(&test.db);
        assert!(unit_repo.delete(unit.id).await?);
        assert!(!unit_repo.delete(unit.id).await?);

        let remaining = entity::prelude::CorpstatsMember::find().all(&test.db).await?;
        assert!(remaining.is_empty());

        Ok(())
    }

    /// Expect unit to be returned with the corporation it tracks
    #[tokio::test]
    async fn gets_unit_with_corporation() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_corpstats_tables().build().await?;
        let unit = test.corpstats().insert_mock_unit(98_000_001, 1, None).await?;

        let found = UnitRepository::new(&test.db)
            .get_with_corporation(unit.id)
            .await?;

        let (found_unit, corporation) = found.expect("unit should exist");
        assert_eq!(found_unit.id, unit.id);
        assert_eq!(corporation.corporation_id, 98_000_001);

        Ok(())
    }
}
