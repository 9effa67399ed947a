use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000007_corpstats_unit::CorpstatsUnit;

// A character may briefly appear in two units while only one of them has refreshed,
// so uniqueness is scoped to the unit rather than the character.
static IDX_CORPSTATS_MEMBER_UNIT_ID_CHARACTER_ID: &str =
    "idx-corpstats_member-unit_id-character_id";
static IDX_CORPSTATS_MEMBER_CHARACTER_NAME: &str = "idx-corpstats_member-character_name";
static FK_CORPSTATS_MEMBER_UNIT_ID: &str = "fk-corpstats_member-unit_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CorpstatsMember::Table)
                    .if_not_exists()
                    .col(pk_auto(CorpstatsMember::Id))
                    .col(integer(CorpstatsMember::UnitId))
                    .col(big_integer(CorpstatsMember::CharacterId))
                    .col(string(CorpstatsMember::CharacterName))
                    .col(big_integer_null(CorpstatsMember::LocationId))
                    .col(string_null(CorpstatsMember::LocationName))
                    .col(big_integer_null(CorpstatsMember::ShipTypeId))
                    .col(string_null(CorpstatsMember::ShipTypeName))
                    .col(timestamp_null(CorpstatsMember::StartDate))
                    .col(timestamp_null(CorpstatsMember::LogonDate))
                    .col(timestamp_null(CorpstatsMember::LogoffDate))
                    .col(big_integer_null(CorpstatsMember::BaseId))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CORPSTATS_MEMBER_UNIT_ID)
                            .from(CorpstatsMember::Table, CorpstatsMember::UnitId)
                            .to(CorpstatsUnit::Table, CorpstatsUnit::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CORPSTATS_MEMBER_UNIT_ID_CHARACTER_ID)
                    .table(CorpstatsMember::Table)
                    .col(CorpstatsMember::UnitId)
                    .col(CorpstatsMember::CharacterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CORPSTATS_MEMBER_CHARACTER_NAME)
                    .table(CorpstatsMember::Table)
                    .col(CorpstatsMember::CharacterName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CORPSTATS_MEMBER_CHARACTER_NAME)
                    .table(CorpstatsMember::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CORPSTATS_MEMBER_UNIT_ID_CHARACTER_ID)
                    .table(CorpstatsMember::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CorpstatsMember::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CorpstatsMember {
    Table,
    Id,
    UnitId,
    CharacterId,
    CharacterName,
    LocationId,
    LocationName,
    ShipTypeId,
    ShipTypeName,
    StartDate,
    LogonDate,
    LogoffDate,
    BaseId,
}
