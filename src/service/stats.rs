use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    aggregate,
    cache::SummaryCache,
    data::{eve::AllianceRepository, member::MemberRepository, unit::UnitRepository},
    error::{stats::StatsError, Error},
    identity::IdentityGraph,
    model::{
        db::{CorpStatsUnitModel, EveCorporationModel},
        registry::ServiceRegistry,
        stats::{
            CorpStats, CorporationBreakdown, CorporationInfo, ExportTable, MemberSearchResult,
            RosterEntry, StatsSnapshot, Summary,
        },
        visibility::{UnitScope, Viewer},
    },
};

/// Columns of a roster export, in order.
pub const EXPORT_HEADER: [&str; 10] = [
    "character_id",
    "character_name",
    "location_id",
    "location_name",
    "ship_type_id",
    "ship_type_name",
    "start_date",
    "logon_date",
    "logoff_date",
    "base_id",
];

/// Computes, caches and exposes corp statistics.
pub struct StatsService<'a> {
    db: &'a DatabaseConnection,
    identity: &'a dyn IdentityGraph,
    cache: &'a SummaryCache,
    services: &'a ServiceRegistry,
}

impl<'a> StatsService<'a> {
    /// Creates a new instance of [`StatsService`]
    pub fn new(
        db: &'a DatabaseConnection,
        identity: &'a dyn IdentityGraph,
        cache: &'a SummaryCache,
        services: &'a ServiceRegistry,
    ) -> Self {
        Self {
            db,
            identity,
            cache,
            services,
        }
    }

    async fn unit_with_corporation(
        &self,
        unit_id: i32,
    ) -> Result<(CorpStatsUnitModel, EveCorporationModel), Error> {
        Ok(UnitRepository::new(self.db)
            .get_with_corporation(unit_id)
            .await?
            .ok_or(StatsError::UnitNotFound(unit_id))?)
    }

    /// EVE alliance IDs keyed by alliance record ID for the given corporations
    async fn alliance_ids(
        &self,
        corporations: &[&EveCorporationModel],
    ) -> Result<HashMap<i32, i64>, Error> {
        let record_ids: Vec<i32> = corporations
            .iter()
            .filter_map(|corporation| corporation.alliance_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        Ok(AllianceRepository::new(self.db)
            .get_many_by_ids(&record_ids)
            .await?
            .into_iter()
            .map(|alliance| (alliance.id, alliance.alliance_id))
            .collect())
    }

    /// Gathers the roster, candidates and enrollments the aggregator reads for a unit
    pub async fn snapshot(&self, unit_id: i32) -> Result<StatsSnapshot, Error> {
        let (unit, corporation) = self.unit_with_corporation(unit_id).await?;
        let alliance_ids = self.alliance_ids(&[&corporation]).await?;

        let roster = MemberRepository::new(self.db)
            .get_by_unit(unit.id)
            .await?
            .iter()
            .map(RosterEntry::from)
            .collect();

        let mut candidates = self
            .identity
            .characters_in_corporation(corporation.corporation_id)
            .await?;
        candidates.extend(
            self.identity
                .characters_with_main_in_corporation(corporation.corporation_id)
                .await?,
        );

        let user_ids: Vec<i32> = candidates
            .iter()
            .filter_map(|candidate| candidate.account.as_ref().map(|a| a.user_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let enrollments = self.identity.service_enrollments(&user_ids).await?;

        Ok(StatsSnapshot {
            corporation: CorporationInfo {
                corporation_id: corporation.corporation_id,
                name: corporation.name.clone(),
                ticker: corporation.ticker.clone(),
                alliance_id: corporation
                    .alliance_id
                    .and_then(|id| alliance_ids.get(&id).copied()),
            },
            roster,
            candidates,
            enrollments,
        })
    }

    /// Computes a unit's full statistics from current state, bypassing the cache
    pub async fn compute(&self, unit_id: i32) -> Result<CorpStats, Error> {
        let snapshot = self.snapshot(unit_id).await?;

        Ok(aggregate::compute(&snapshot, self.services, Utc::now()))
    }

    /// Returns a unit's summary, served from the cache while fresh
    ///
    /// # Returns
    /// - `Ok(Summary)` - Cached or freshly computed summary
    /// - `Err(Error::StatsError(StatsError::UnitNotFound))` - No unit with the ID exists
    pub async fn summary(&self, unit_id: i32) -> Result<Summary, Error> {
        let (_, corporation) = self.unit_with_corporation(unit_id).await?;

        self.cache
            .get_or_compute(corporation.corporation_id, || async {
                Ok(self.compute(unit_id).await?.summary)
            })
            .await
    }

    /// Recomputes a unit's summary and replaces the cached entry
    pub async fn recache(&self, unit_id: i32) -> Result<Summary, Error> {
        let (_, corporation) = self.unit_with_corporation(unit_id).await?;
        let summary = self.compute(unit_id).await?.summary;

        self.cache.put(corporation.corporation_id, &summary).await?;

        Ok(summary)
    }

    /// Dumps a unit's roster as string rows ordered by character name
    ///
    /// # Returns
    /// - `Ok(Some(ExportTable))` - Header and one row per roster member, absent fields are empty
    /// - `Ok(None)` - The roster is empty
    pub async fn export(&self, unit_id: i32) -> Result<Option<ExportTable>, Error> {
        let (unit, corporation) = self.unit_with_corporation(unit_id).await?;
        let members = MemberRepository::new(self.db).get_by_unit(unit.id).await?;

        if members.is_empty() {
            return Ok(None);
        }

        fn field<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(|v| v.to_string()).unwrap_or_default()
        }

        let rows = members
            .iter()
            .map(|member| {
                vec![
                    member.character_id.to_string(),
                    member.character_name.clone(),
                    field(&member.location_id),
                    field(&member.location_name),
                    field(&member.ship_type_id),
                    field(&member.ship_type_name),
                    field(&member.start_date),
                    field(&member.logon_date),
                    field(&member.logoff_date),
                    field(&member.base_id),
                ]
            })
            .collect();

        Ok(Some(ExportTable {
            filename: corporation
                .name
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect(),
            header: EXPORT_HEADER.iter().map(|h| h.to_string()).collect(),
            rows,
        }))
    }

    /// Visibility scopes of every unit with its corporation
    async fn scopes(
        &self,
    ) -> Result<Vec<(UnitScope, CorpStatsUnitModel, EveCorporationModel)>, Error> {
        let units = UnitRepository::new(self.db).get_all_with_corporation().await?;
        let corporations: Vec<&EveCorporationModel> = units.iter().map(|(_, c)| c).collect();
        let alliance_ids = self.alliance_ids(&corporations).await?;

        Ok(units
            .into_iter()
            .map(|(unit, corporation)| {
                let scope = UnitScope {
                    unit_id: unit.id,
                    owner_id: unit.token_owner_id,
                    corporation_id: corporation.corporation_id,
                    alliance_id: corporation
                        .alliance_id
                        .and_then(|id| alliance_ids.get(&id).copied()),
                };

                (scope, unit, corporation)
            })
            .collect())
    }

    /// Units the viewer may see, ordered by corporation name
    pub async fn visible_units(
        &self,
        viewer: &Viewer,
    ) -> Result<Vec<(CorpStatsUnitModel, EveCorporationModel)>, Error> {
        let mut visible: Vec<(CorpStatsUnitModel, EveCorporationModel)> = self
            .scopes()
            .await?
            .into_iter()
            .filter(|(scope, _, _)| viewer.can_view(scope))
            .map(|(_, unit, corporation)| (unit, corporation))
            .collect();

        visible.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));

        Ok(visible)
    }

    /// Returns true when the viewer may trigger an update of the unit
    pub async fn can_update(&self, viewer: &Viewer, unit_id: i32) -> Result<bool, Error> {
        let scope = self
            .scopes()
            .await?
            .into_iter()
            .map(|(scope, _, _)| scope)
            .find(|scope| scope.unit_id == unit_id)
            .ok_or(StatsError::UnitNotFound(unit_id))?;

        Ok(viewer.can_update(&scope))
    }

    /// Searches the rosters of every unit visible to the viewer by character name
    ///
    /// # Arguments
    /// - `viewer` - User performing the search
    /// - `query` - Case-insensitive substring of the character name
    ///
    /// # Returns
    /// - `Ok(Vec<MemberSearchResult>)` - Matching roster rows sorted by character name, empty
    ///   for a blank query
    pub async fn search_members(
        &self,
        viewer: &Viewer,
        query: &str,
    ) -> Result<Vec<MemberSearchResult>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let corporations: HashMap<i32, EveCorporationModel> = self
            .visible_units(viewer)
            .await?
            .into_iter()
            .map(|(unit, corporation)| (unit.id, corporation))
            .collect();
        let unit_ids: Vec<i32> = corporations.keys().copied().collect();

        let mut results: Vec<MemberSearchResult> = MemberRepository::new(self.db)
            .search_by_name(&unit_ids, query)
            .await?
            .into_iter()
            .filter_map(|member| {
                corporations
                    .get(&member.unit_id)
                    .map(|corporation| MemberSearchResult {
                        corporation_id: corporation.corporation_id,
                        corporation_name: corporation.name.clone(),
                        character_id: member.character_id,
                        character_name: member.character_name,
                    })
            })
            .collect();

        results.sort_by(|a, b| {
            a.character_name
                .cmp(&b.character_name)
                .then(a.character_id.cmp(&b.character_id))
        });

        Ok(results)
    }

    /// Per corporation counts of an alliance's linked characters
    pub async fn alliance_breakdown(
        &self,
        alliance_id: i64,
    ) -> Result<Vec<CorporationBreakdown>, Error> {
        let characters = self
            .identity
            .characters_with_main_in_alliance(alliance_id)
            .await?;

        let unit_corporations: HashMap<i32, i64> = UnitRepository::new(self.db)
            .get_all_with_corporation()
            .await?
            .into_iter()
            .map(|(unit, corporation)| (unit.id, corporation.corporation_id))
            .collect();

        let tracked_totals: HashMap<i64, usize> = MemberRepository::new(self.db)
            .count_by_unit()
            .await?
            .into_iter()
            .filter_map(|(unit_id, count)| {
                unit_corporations
                    .get(&unit_id)
                    .map(|corporation_id| (*corporation_id, count))
            })
            .collect();

        Ok(aggregate::alliance_breakdown(
            alliance_id,
            &characters,
            &tracked_totals,
        ))
    }
}
