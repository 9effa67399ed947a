use chrono::Utc;
use sea_orm::{ActiveValue, ColumnTrait, DbErr, EntityTrait, QueryFilter};

use crate::{
    error::TestError,
    fixtures::identity::IdentityFixtures,
    model::{AuthUserModel, AuthUserServiceModel, EveCharacterModel},
};

impl<'a> IdentityFixtures<'a> {
    async fn character(&self, character_id: i64) -> Result<EveCharacterModel, TestError> {
        entity::prelude::EveCharacter::find()
            .filter(entity::eve_character::Column::CharacterId.eq(character_id))
            .one(&self.setup.db)
            .await?
            .ok_or_else(|| {
                TestError::DbErr(DbErr::RecordNotFound(format!(
                    "character {} must be inserted before linking it",
                    character_id
                )))
            })
    }

    /// Insert an account with a main and the characters it owns.
    ///
    /// # Arguments
    /// - `main_character_id` - EVE character ID of the account's main, also recorded as owned
    /// - `alt_character_ids` - EVE character IDs of the account's other characters
    ///
    /// # Returns
    /// - `Ok(AuthUserModel)` - The created account
    /// - `Err(TestError::DbErr)` - A character was not inserted beforehand or an insert failed
    pub async fn insert_user(
        &self,
        main_character_id: i64,
        alt_character_ids: &[i64],
    ) -> Result<AuthUserModel, TestError> {
        let main = self.character(main_character_id).await?;

        let user = entity::prelude::AuthUser::insert(entity::auth_user::ActiveModel {
            main_character_id: ActiveValue::Set(Some(main.id)),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        self.insert_ownership(user.id, main.id).await?;
        for &alt_character_id in alt_character_ids {
            let alt = self.character(alt_character_id).await?;
            self.insert_ownership(user.id, alt.id).await?;
        }

        Ok(user)
    }

    /// Insert an account owning characters without a main set.
    pub async fn insert_user_without_main(
        &self,
        character_ids: &[i64],
    ) -> Result<AuthUserModel, TestError> {
        let user = entity::prelude::AuthUser::insert(entity::auth_user::ActiveModel {
            main_character_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        for &character_id in character_ids {
            let character = self.character(character_id).await?;
            self.insert_ownership(user.id, character.id).await?;
        }

        Ok(user)
    }

    async fn insert_ownership(&self, user_id: i32, character_record_id: i32) -> Result<(), TestError> {
        entity::prelude::AuthUserCharacter::insert(entity::auth_user_character::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            character_id: ActiveValue::Set(character_record_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec(&self.setup.db)
        .await?;

        Ok(())
    }

    /// Enroll the account whose main is the given character in external services.
    ///
    /// # Returns
    /// - `Ok(Vec<AuthUserServiceModel>)` - One row per service key
    /// - `Err(TestError::DbErr)` - No account has the character as main or an insert failed
    pub async fn insert_user_services(
        &self,
        main_character_id: i64,
        services: &[&str],
    ) -> Result<Vec<AuthUserServiceModel>, TestError> {
        let main = self.character(main_character_id).await?;

        let user = entity::prelude::AuthUser::find()
            .filter(entity::auth_user::Column::MainCharacterId.eq(main.id))
            .one(&self.setup.db)
            .await?
            .ok_or_else(|| {
                TestError::DbErr(DbErr::RecordNotFound(format!(
                    "no account has character {} as main",
                    main_character_id
                )))
            })?;

        let mut rows = Vec::with_capacity(services.len());
        for service in services {
            rows.push(
                entity::prelude::AuthUserService::insert(entity::auth_user_service::ActiveModel {
                    user_id: ActiveValue::Set(user.id),
                    service: ActiveValue::Set(service.to_string()),
                    created_at: ActiveValue::Set(Utc::now().naive_utc()),
                    ..Default::default()
                })
                .exec_with_returning(&self.setup.db)
                .await?,
            );
        }

        Ok(rows)
    }
}
