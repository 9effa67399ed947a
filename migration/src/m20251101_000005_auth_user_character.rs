use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251101_000003_eve_character::EveCharacter, m20251101_000004_auth_user::AuthUser,
};

static IDX_AUTH_USER_CHARACTER_USER_ID: &str = "idx-auth_user_character-user_id";
static FK_AUTH_USER_CHARACTER_USER_ID: &str = "fk-auth_user_character-user_id";
static FK_AUTH_USER_CHARACTER_CHARACTER_ID: &str = "fk-auth_user_character-character_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthUserCharacter::Table)
                    .if_not_exists()
                    .col(pk_auto(AuthUserCharacter::Id))
                    .col(integer(AuthUserCharacter::UserId))
                    .col(integer_uniq(AuthUserCharacter::CharacterId))
                    .col(timestamp(AuthUserCharacter::CreatedAt))
                    .col(timestamp(AuthUserCharacter::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_AUTH_USER_CHARACTER_USER_ID)
                            .from(AuthUserCharacter::Table, AuthUserCharacter::UserId)
                            .to(AuthUser::Table, AuthUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_AUTH_USER_CHARACTER_CHARACTER_ID)
                            .from(AuthUserCharacter::Table, AuthUserCharacter::CharacterId)
                            .to(EveCharacter::Table, EveCharacter::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_AUTH_USER_CHARACTER_USER_ID)
                    .table(AuthUserCharacter::Table)
                    .col(AuthUserCharacter::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_AUTH_USER_CHARACTER_USER_ID)
                    .table(AuthUserCharacter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AuthUserCharacter::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuthUserCharacter {
    Table,
    Id,
    UserId,
    CharacterId,
    CreatedAt,
    UpdatedAt,
}
