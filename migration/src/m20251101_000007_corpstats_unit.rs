use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251101_000002_eve_corporation::EveCorporation, m20251101_000004_auth_user::AuthUser,
};

static FK_CORPSTATS_UNIT_CORPORATION_ID: &str = "fk-corpstats_unit-corporation_id";
static FK_CORPSTATS_UNIT_TOKEN_OWNER_ID: &str = "fk-corpstats_unit-token_owner_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CorpstatsUnit::Table)
                    .if_not_exists()
                    .col(pk_auto(CorpstatsUnit::Id))
                    .col(integer_uniq(CorpstatsUnit::CorporationId))
                    .col(big_integer(CorpstatsUnit::TokenCharacterId))
                    .col(integer_null(CorpstatsUnit::TokenOwnerId))
                    .col(text(CorpstatsUnit::AccessToken))
                    .col(timestamp_null(CorpstatsUnit::LastUpdateAt))
                    .col(timestamp(CorpstatsUnit::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CORPSTATS_UNIT_CORPORATION_ID)
                            .from(CorpstatsUnit::Table, CorpstatsUnit::CorporationId)
                            .to(EveCorporation::Table, EveCorporation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CORPSTATS_UNIT_TOKEN_OWNER_ID)
                            .from(CorpstatsUnit::Table, CorpstatsUnit::TokenOwnerId)
                            .to(AuthUser::Table, AuthUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CorpstatsUnit::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CorpstatsUnit {
    Table,
    Id,
    CorporationId,
    TokenCharacterId,
    TokenOwnerId,
    AccessToken,
    LastUpdateAt,
    CreatedAt,
}
