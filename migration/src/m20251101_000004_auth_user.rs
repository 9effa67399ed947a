use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000003_eve_character::EveCharacter;

static FK_AUTH_USER_MAIN_CHARACTER_ID: &str = "fk-auth_user-main_character_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AuthUser::Id))
                    .col(integer_null(AuthUser::MainCharacterId))
                    .col(timestamp(AuthUser::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_AUTH_USER_MAIN_CHARACTER_ID)
                            .from(AuthUser::Table, AuthUser::MainCharacterId)
                            .to(EveCharacter::Table, EveCharacter::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AuthUser {
    Table,
    Id,
    MainCharacterId,
    CreatedAt,
}
