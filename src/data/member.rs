use std::collections::HashMap;

use sea_orm::{
    sea_query::{Expr, ExprTrait, Func, LikeExpr},
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::model::{db::CorpMemberModel, roster::EnrichedMember};

/// Rows per insert statement when storing a roster.
const INSERT_BATCH_SIZE: usize = 100;

pub struct MemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Replaces a unit's roster with the provided members
    ///
    /// # Arguments
    /// - `unit_id` - ID of the unit whose roster is replaced
    /// - `members` - Complete new roster
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of rows stored
    ///
    /// # Notes
    /// - Deletes before inserting, pass a transaction as the connection so readers never observe
    ///   a partial roster
    pub async fn replace_for_unit(
        &self,
        unit_id: i32,
        members: &[EnrichedMember],
    ) -> Result<usize, DbErr> {
        entity::prelude::CorpstatsMember::delete_many()
            .filter(entity::corpstats_member::Column::UnitId.eq(unit_id))
            .exec(self.db)
            .await?;

        for batch in members.chunks(INSERT_BATCH_SIZE) {
            let rows = batch
                .iter()
                .map(|member| entity::corpstats_member::ActiveModel {
                    unit_id: ActiveValue::Set(unit_id),
                    character_id: ActiveValue::Set(member.tracked.character_id),
                    character_name: ActiveValue::Set(member.character_name.clone()),
                    location_id: ActiveValue::Set(member.tracked.location_id),
                    location_name: ActiveValue::Set(None),
                    ship_type_id: ActiveValue::Set(member.tracked.ship_type_id),
                    ship_type_name: ActiveValue::Set(member.ship_type_name.clone()),
                    start_date: ActiveValue::Set(member.tracked.start_date.map(|d| d.naive_utc())),
                    logon_date: ActiveValue::Set(member.tracked.logon_date.map(|d| d.naive_utc())),
                    logoff_date: ActiveValue::Set(
                        member.tracked.logoff_date.map(|d| d.naive_utc()),
                    ),
                    base_id: ActiveValue::Set(member.tracked.base_id),
                    ..Default::default()
                });

            entity::prelude::CorpstatsMember::insert_many(rows)
                .exec(self.db)
                .await?;
        }

        Ok(members.len())
    }

    /// Get a unit's roster ordered by character name
    pub async fn get_by_unit(&self, unit_id: i32) -> Result<Vec<CorpMemberModel>, DbErr> {
        entity::prelude::CorpstatsMember::find()
            .filter(entity::corpstats_member::Column::UnitId.eq(unit_id))
            .order_by_asc(entity::corpstats_member::Column::CharacterName)
            .order_by_asc(entity::corpstats_member::Column::CharacterId)
            .all(self.db)
            .await
    }

    /// Case-insensitive character name search across the rosters of the given units
    ///
    /// `query` is matched as a literal substring, `%` and `_` carry no wildcard meaning.
    pub async fn search_by_name(
        &self,
        unit_ids: &[i32],
        query: &str,
    ) -> Result<Vec<CorpMemberModel>, DbErr> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }

        let escaped = query
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = LikeExpr::new(format!("%{}%", escaped)).escape('\\');

        entity::prelude::CorpstatsMember::find()
            .filter(entity::corpstats_member::Column::UnitId.is_in(unit_ids.iter().copied()))
            .filter(
                Expr::expr(Func::lower(Expr::col(
                    entity::corpstats_member::Column::CharacterName,
                )))
                .like(pattern),
            )
            .order_by_asc(entity::corpstats_member::Column::CharacterName)
            .all(self.db)
            .await
    }

    /// Roster size per unit ID
    pub async fn count_by_unit(&self) -> Result<HashMap<i32, usize>, DbErr> {
        let counts = entity::prelude::CorpstatsMember::find()
            .select_only()
            .column(entity::corpstats_member::Column::UnitId)
            .column_as(
                Expr::col(entity::corpstats_member::Column::Id).count(),
                "count",
            )
            .group_by(entity::corpstats_member::Column::UnitId)
            .into_tuple::<(i32, i64)>()
            .all(self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(unit_id, count)| (unit_id, count as usize))
            .collect())
    }
}
