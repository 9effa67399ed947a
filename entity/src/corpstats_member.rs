use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "corpstats_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub unit_id: i32,
    pub character_id: i64,
    pub character_name: String,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    pub ship_type_id: Option<i64>,
    pub ship_type_name: Option<String>,
    pub start_date: Option<DateTime>,
    pub logon_date: Option<DateTime>,
    pub logoff_date: Option<DateTime>,
    pub base_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::corpstats_unit::Entity",
        from = "Column::UnitId",
        to = "super::corpstats_unit::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CorpstatsUnit,
}

impl Related<super::corpstats_unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CorpstatsUnit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
