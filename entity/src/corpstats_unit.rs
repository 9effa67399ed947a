use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "corpstats_unit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub corporation_id: i32,
    pub token_character_id: i64,
    pub token_owner_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub access_token: String,
    pub last_update_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::eve_corporation::Entity",
        from = "Column::CorporationId",
        to = "super::eve_corporation::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    EveCorporation,
    #[sea_orm(
        belongs_to = "super::auth_user::Entity",
        from = "Column::TokenOwnerId",
        to = "super::auth_user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    AuthUser,
    #[sea_orm(has_many = "super::corpstats_member::Entity")]
    CorpstatsMember,
}

impl Related<super::eve_corporation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveCorporation.def()
    }
}

impl Related<super::auth_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthUser.def()
    }
}

impl Related<super::corpstats_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CorpstatsMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
