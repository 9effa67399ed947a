use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "auth_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub main_character_id: Option<i32>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::eve_character::Entity",
        from = "Column::MainCharacterId",
        to = "super::eve_character::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    EveCharacter,
    #[sea_orm(has_many = "super::auth_user_character::Entity")]
    AuthUserCharacter,
    #[sea_orm(has_many = "super::auth_user_service::Entity")]
    AuthUserService,
}

impl Related<super::eve_character::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveCharacter.def()
    }
}

impl Related<super::auth_user_character::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthUserCharacter.def()
    }
}

impl Related<super::auth_user_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthUserService.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
