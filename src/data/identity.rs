//! Read-only queries over the account linkage tables.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

pub struct IdentityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> IdentityRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Get users whose main character belongs to one of the given corporation records
    pub async fn users_with_main_in_corporations(
        &self,
        corporation_record_ids: &[i32],
    ) -> Result<Vec<entity::auth_user::Model>, DbErr> {
        if corporation_record_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::AuthUser::find()
            .inner_join(entity::prelude::EveCharacter)
            .filter(
                entity::eve_character::Column::CorporationId
                    .is_in(corporation_record_ids.iter().copied()),
            )
            .all(self.db)
            .await
    }

    pub async fn users_by_ids(
        &self,
        user_ids: &[i32],
    ) -> Result<Vec<entity::auth_user::Model>, DbErr> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::AuthUser::find()
            .filter(entity::auth_user::Column::Id.is_in(user_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Get ownership records of the given users
    pub async fn ownerships_by_users(
        &self,
        user_ids: &[i32],
    ) -> Result<Vec<entity::auth_user_character::Model>, DbErr> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::AuthUserCharacter::find()
            .filter(entity::auth_user_character::Column::UserId.is_in(user_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Get ownership records of the given character records
    pub async fn ownerships_by_characters(
        &self,
        character_record_ids: &[i32],
    ) -> Result<Vec<entity::auth_user_character::Model>, DbErr> {
        if character_record_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::AuthUserCharacter::find()
            .filter(
                entity::auth_user_character::Column::CharacterId
                    .is_in(character_record_ids.iter().copied()),
            )
            .all(self.db)
            .await
    }

    /// Get service enrollments of the given users ordered by service key
    pub async fn services_by_users(
        &self,
        user_ids: &[i32],
    ) -> Result<Vec<entity::auth_user_service::Model>, DbErr> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::AuthUserService::find()
            .filter(entity::auth_user_service::Column::UserId.is_in(user_ids.iter().copied()))
            .order_by_asc(entity::auth_user_service::Column::Service)
            .all(self.db)
            .await
    }
}
