use chrono::Utc;
use eve_esi::model::{alliance::Alliance, corporation::Corporation};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

pub struct AllianceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AllianceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        alliance_id: i64,
        alliance: Alliance,
    ) -> Result<entity::eve_alliance::Model, DbErr> {
        let alliance = entity::eve_alliance::ActiveModel {
            alliance_id: ActiveValue::Set(alliance_id),
            name: ActiveValue::Set(alliance.name),
            ticker: ActiveValue::Set(alliance.ticker),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        alliance.insert(self.db).await
    }

    /// Get an alliance using its EVE Online alliance ID
    pub async fn get_by_alliance_id(
        &self,
        alliance_id: i64,
    ) -> Result<Option<entity::eve_alliance::Model>, DbErr> {
        entity::prelude::EveAlliance::find()
            .filter(entity::eve_alliance::Column::AllianceId.eq(alliance_id))
            .one(self.db)
            .await
    }

    pub async fn get_many_by_ids(
        &self,
        ids: &[i32],
    ) -> Result<Vec<entity::eve_alliance::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::EveAlliance::find()
            .filter(entity::eve_alliance::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
    }
}

pub struct CorporationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CorporationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a corporation from its ESI information
    ///
    /// # Arguments
    /// - `corporation_id` - EVE Online corporation ID
    /// - `corporation` - Corporation information returned by ESI
    /// - `alliance_id` - Record ID of the corporation's alliance in `eve_alliance`, if any
    pub async fn create(
        &self,
        corporation_id: i64,
        corporation: Corporation,
        alliance_id: Option<i32>,
    ) -> Result<entity::eve_corporation::Model, DbErr> {
        let corporation = entity::eve_corporation::ActiveModel {
            corporation_id: ActiveValue::Set(corporation_id),
            alliance_id: ActiveValue::Set(alliance_id),
            name: ActiveValue::Set(corporation.name),
            ticker: ActiveValue::Set(corporation.ticker),
            member_count: ActiveValue::Set(corporation.member_count),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        corporation.insert(self.db).await
    }

    /// Get a corporation using its EVE Online corporation ID
    pub async fn get_by_corporation_id(
        &self,
        corporation_id: i64,
    ) -> Result<Option<entity::eve_corporation::Model>, DbErr> {
        entity::prelude::EveCorporation::find()
            .filter(entity::eve_corporation::Column::CorporationId.eq(corporation_id))
            .one(self.db)
            .await
    }

    pub async fn get_many_by_ids(
        &self,
        ids: &[i32],
    ) -> Result<Vec<entity::eve_corporation::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::EveCorporation::find()
            .filter(entity::eve_corporation::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Get all corporations belonging to an alliance record
    pub async fn get_by_alliance(
        &self,
        alliance_record_id: i32,
    ) -> Result<Vec<entity::eve_corporation::Model>, DbErr> {
        entity::prelude::EveCorporation::find()
            .filter(entity::eve_corporation::Column::AllianceId.eq(alliance_record_id))
            .all(self.db)
            .await
    }
}

pub struct CharacterRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CharacterRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_many_by_ids(
        &self,
        ids: &[i32],
    ) -> Result<Vec<entity::eve_character::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::EveCharacter::find()
            .filter(entity::eve_character::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Get all characters belonging to the given corporation records
    pub async fn get_by_corporations(
        &self,
        corporation_record_ids: &[i32],
    ) -> Result<Vec<entity::eve_character::Model>, DbErr> {
        if corporation_record_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::EveCharacter::find()
            .filter(
                entity::eve_character::Column::CorporationId
                    .is_in(corporation_record_ids.iter().copied()),
            )
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use corpstats_test_utils::{factory, TestBuilder, TestError};

    use super::*;

    /// Expect corporation to be created with its alliance record
    #[tokio::test]
    async fn creates_corporation_with_alliance() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::EveAlliance)
            .with_table(entity::prelude::EveCorporation)
            .with_mock_alliance(99_000_001)
            .build()
            .await?;

        let alliance = AllianceRepository::new(&test.db)
            .get_by_alliance_id(99_000_001)
            .await?
            .expect("alliance fixture should exist");

        let corporation_repo = CorporationRepository::new(&test.db);
        let created = corporation_repo
            .create(
                98_000_001,
                factory::mock_corporation(Some(99_000_001)),
                Some(alliance.id),
            )
            .await?;

        assert_eq!(created.corporation_id, 98_000_001);
        assert_eq!(created.alliance_id, Some(alliance.id));

        let found = corporation_repo.get_by_corporation_id(98_000_001).await?;
        assert_eq!(found, Some(created));

        Ok(())
    }

    /// Expect None for a corporation that was never stored
    #[tokio::test]
    async fn returns_none_for_unknown_corporation() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::EveAlliance)
            .with_table(entity::prelude::EveCorporation)
            .build()
            .await?;

        let found = CorporationRepository::new(&test.db)
            .get_by_corporation_id(98_000_001)
            .await?;

        assert!(found.is_none());

        Ok(())
    }

    /// Expect only characters of the requested corporations
    #[tokio::test]
    async fn filters_characters_by_corporation() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_identity_tables()
            .with_mock_character(1, 98_000_001, None)
            .with_mock_character(2, 98_000_001, None)
            .with_mock_character(3, 98_000_002, None)
            .build()
            .await?;

        let corporation = CorporationRepository::new(&test.db)
            .get_by_corporation_id(98_000_001)
            .await?
            .expect("corporation fixture should exist");

        let mut character_ids: Vec<i64> = CharacterRepository::new(&test.db)
            .get_by_corporations(&[corporation.id])
            .await?
            .into_iter()
            .map(|c| c.character_id)
            .collect();
        character_ids.sort();

        assert_eq!(character_ids, vec![1, 2]);

        Ok(())
    }
}
