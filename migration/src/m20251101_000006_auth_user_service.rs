use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000004_auth_user::AuthUser;

static IDX_AUTH_USER_SERVICE_USER_ID_SERVICE: &str = "idx-auth_user_service-user_id-service";
static FK_AUTH_USER_SERVICE_USER_ID: &str = "fk-auth_user_service-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthUserService::Table)
                    .if_not_exists()
                    .col(pk_auto(AuthUserService::Id))
                    .col(integer(AuthUserService::UserId))
                    .col(string(AuthUserService::Service))
                    .col(timestamp(AuthUserService::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_AUTH_USER_SERVICE_USER_ID)
                            .from(AuthUserService::Table, AuthUserService::UserId)
                            .to(AuthUser::Table, AuthUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_AUTH_USER_SERVICE_USER_ID_SERVICE)
                    .table(AuthUserService::Table)
                    .col(AuthUserService::UserId)
                    .col(AuthUserService::Service)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_AUTH_USER_SERVICE_USER_ID_SERVICE)
                    .table(AuthUserService::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AuthUserService::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuthUserService {
    Table,
    Id,
    UserId,
    Service,
    CreatedAt,
}
