//! EVE entity database insertion utilities.
//!
//! Parent entities are created automatically when a child references one that does not exist
//! yet. Inserting an entity that already exists returns the existing record.

use chrono::Utc;
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    error::TestError,
    fixtures::eve::{factory, EveFixtures},
    model::{EveAllianceModel, EveCharacterModel, EveCorporationModel},
};

impl<'a> EveFixtures<'a> {
    /// Insert a mock alliance named `Alliance {alliance_id}`.
    ///
    /// # Returns
    /// - `Ok(EveAllianceModel)` - The created or existing alliance record
    /// - `Err(TestError::DbErr)` - Database query or insert operation failed
    pub async fn insert_mock_alliance(
        &self,
        alliance_id: i64,
    ) -> Result<EveAllianceModel, TestError> {
        if let Some(existing) = entity::prelude::EveAlliance::find()
            .filter(entity::eve_alliance::Column::AllianceId.eq(alliance_id))
            .one(&self.setup.db)
            .await?
        {
            return Ok(existing);
        }

        let alliance = factory::mock_alliance();

        Ok(
            entity::prelude::EveAlliance::insert(entity::eve_alliance::ActiveModel {
                alliance_id: ActiveValue::Set(alliance_id),
                name: ActiveValue::Set(format!("Alliance {}", alliance_id)),
                ticker: ActiveValue::Set(alliance.ticker),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a mock corporation named `Corporation {corporation_id}`.
    ///
    /// # Arguments
    /// - `corporation_id` - The EVE Online corporation ID to insert
    /// - `alliance_id` - Optional alliance ID, created when missing
    ///
    /// # Returns
    /// - `Ok(EveCorporationModel)` - The created or existing corporation record
    /// - `Err(TestError::DbErr)` - Database query or insert operation failed
    pub async fn insert_mock_corporation(
        &self,
        corporation_id: i64,
        alliance_id: Option<i64>,
    ) -> Result<EveCorporationModel, TestError> {
        if let Some(existing) = entity::prelude::EveCorporation::find()
            .filter(entity::eve_corporation::Column::CorporationId.eq(corporation_id))
            .one(&self.setup.db)
            .await?
        {
            return Ok(existing);
        }

        let alliance_model_id = match alliance_id {
            Some(alliance_id) => Some(self.insert_mock_alliance(alliance_id).await?.id),
            None => None,
        };

        let corporation = factory::mock_corporation(alliance_id);

        Ok(
            entity::prelude::EveCorporation::insert(entity::eve_corporation::ActiveModel {
                corporation_id: ActiveValue::Set(corporation_id),
                alliance_id: ActiveValue::Set(alliance_model_id),
                name: ActiveValue::Set(format!("Corporation {}", corporation_id)),
                ticker: ActiveValue::Set(corporation.ticker),
                member_count: ActiveValue::Set(corporation.member_count),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a mock character named `Character {character_id}`.
    ///
    /// # Arguments
    /// - `character_id` - The EVE Online character ID to insert
    /// - `corporation_id` - The character's corporation, created when missing
    /// - `alliance_id` - Alliance of the corporation when it has to be created
    ///
    /// # Returns
    /// - `Ok(EveCharacterModel)` - The created or existing character record
    /// - `Err(TestError::DbErr)` - Database query or insert operation failed
    pub async fn insert_mock_character(
        &self,
        character_id: i64,
        corporation_id: i64,
        alliance_id: Option<i64>,
    ) -> Result<EveCharacterModel, TestError> {
        if let Some(existing) = entity::prelude::EveCharacter::find()
            .filter(entity::eve_character::Column::CharacterId.eq(character_id))
            .one(&self.setup.db)
            .await?
        {
            return Ok(existing);
        }

        let corporation = self
            .insert_mock_corporation(corporation_id, alliance_id)
            .await?;

        Ok(
            entity::prelude::EveCharacter::insert(entity::eve_character::ActiveModel {
                character_id: ActiveValue::Set(character_id),
                corporation_id: ActiveValue::Set(corporation.id),
                name: ActiveValue::Set(format!("Character {}", character_id)),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
