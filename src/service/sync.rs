use std::collections::{HashMap, HashSet};

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    cache::SummaryCache,
    data::{member::MemberRepository, unit::UnitRepository},
    error::{source::SourceError, stats::StatsError, Error},
    model::{
        db::{CorpStatsUnitModel, EveCorporationModel},
        notification::NotificationLevel,
        roster::{
            Credential, EnrichedMember, EnrichmentFailure, EnrichmentKind, SyncFailure,
            SyncOutcome, SyncReport, TrackedMember,
        },
    },
    notify::Notifier,
    service::{MAX_CONCURRENT_NAME_BATCHES, MAX_CONCURRENT_TYPE_LOOKUPS},
    source::{RosterSource, ESI_NAMES_BATCH_SIZE},
};

/// Refreshes a unit's roster from the roster source.
pub struct SyncService<'a> {
    db: &'a DatabaseConnection,
    source: &'a dyn RosterSource,
    notifier: &'a dyn Notifier,
    cache: &'a SummaryCache,
}

impl<'a> SyncService<'a> {
    /// Creates a new instance of [`SyncService`]
    pub fn new(
        db: &'a DatabaseConnection,
        source: &'a dyn RosterSource,
        notifier: &'a dyn Notifier,
        cache: &'a SummaryCache,
    ) -> Self {
        Self {
            db,
            source,
            notifier,
            cache,
        }
    }

    /// Replaces a unit's roster with the corporation's current member tracking data
    ///
    /// # Behavior
    /// - Verifies the credential's character is still in the unit's corporation, a mismatch
    ///   removes the unit without requesting member tracking
    /// - Resolves character names in batches of [`ESI_NAMES_BATCH_SIZE`] and ship type names per
    ///   distinct type; enrichment failures are recorded per member and never drop a member
    /// - Replaces the roster and stamps the unit inside one transaction, then invalidates the
    ///   corporation's cached summary
    ///
    /// # Arguments
    /// - `unit_id` - ID of the unit to sync
    ///
    /// # Returns
    /// - `Ok(SyncOutcome::Updated(_))` - The roster was replaced
    /// - `Ok(SyncOutcome::Removed(_))` - The credential is invalid, forbidden, or its character
    ///   left the corporation; the unit was deleted and its owner notified
    /// - `Err(Error::StatsError(StatsError::UnitNotFound))` - No unit with the ID exists
    /// - `Err(Error::SourceError(_))` - Transient roster source failure, the unit is untouched
    /// - `Err(Error::DbErr(_))` - Database failure, the previous roster is kept
    pub async fn sync(&self, unit_id: i32) -> Result<SyncOutcome, Error> {
        let (unit, corporation) = UnitRepository::new(self.db)
            .get_with_corporation(unit_id)
            .await?
            .ok_or(StatsError::UnitNotFound(unit_id))?;
        let credential = Credential::from(&unit);

        let actual_corporation_id = match self
            .source
            .character_corporation(credential.character_id)
            .await
        {
            Ok(corporation_id) => corporation_id,
            Err(e) => return self.handle_source_error(&unit, &corporation, e).await,
        };

        if actual_corporation_id != corporation.corporation_id {
            let failure = SyncFailure::OwnershipMismatch {
                expected: corporation.corporation_id,
                actual: actual_corporation_id,
            };

            return self.remove_unit(&unit, &corporation, failure).await;
        }

        let tracking = match self
            .source
            .member_tracking(corporation.corporation_id, &credential)
            .await
        {
            Ok(tracking) => tracking,
            Err(e) => return self.handle_source_error(&unit, &corporation, e).await,
        };

        let (members, enrichment_failures) = self.enrich(tracking).await;

        let txn = self.db.begin().await?;
        let stored = MemberRepository::new(&txn)
            .replace_for_unit(unit.id, &members)
            .await?;
        UnitRepository::new(&txn)
            .set_last_update(unit.id, Utc::now().naive_utc())
            .await?;
        txn.commit().await?;

        self.cache.invalidate(corporation.corporation_id).await;

        tracing::info!(
            "Synced {} members for {} ({} enrichment failures)",
            stored,
            corporation.name,
            enrichment_failures.len()
        );

        Ok(SyncOutcome::Updated(SyncReport {
            members: stored,
            enrichment_failures,
        }))
    }

    /// Removes the unit on terminal errors, propagates all others
    async fn handle_source_error(
        &self,
        unit: &CorpStatsUnitModel,
        corporation: &EveCorporationModel,
        error: SourceError,
    ) -> Result<SyncOutcome, Error> {
        let failure = match error {
            SourceError::Unauthorized => SyncFailure::CredentialInvalid,
            SourceError::Forbidden { status, message } => {
                SyncFailure::UpstreamForbidden { status, message }
            }
            error => {
                tracing::warn!(
                    "Transient error syncing corp stats for {}: {}",
                    corporation.name,
                    error
                );

                return Err(error.into());
            }
        };

        self.remove_unit(unit, corporation, failure).await
    }

    async fn remove_unit(
        &self,
        unit: &CorpStatsUnitModel,
        corporation: &EveCorporationModel,
        failure: SyncFailure,
    ) -> Result<SyncOutcome, Error> {
        tracing::warn!(
            "Removing corp stats for {}: {}",
            corporation.name,
            failure
        );

        UnitRepository::new(self.db).delete(unit.id).await?;
        self.cache.invalidate(corporation.corporation_id).await;

        if let Some(owner_id) = unit.token_owner_id {
            let (title, message) = failure.notification(&corporation.name);
            self.notifier
                .notify(owner_id, &title, &message, NotificationLevel::Error)
                .await;
        }

        Ok(SyncOutcome::Removed(failure))
    }

    /// Attaches character and ship type names to tracked members
    async fn enrich(
        &self,
        mut tracking: Vec<TrackedMember>,
    ) -> (Vec<EnrichedMember>, Vec<EnrichmentFailure>) {
        let mut seen = HashSet::with_capacity(tracking.len());
        tracking.retain(|t| seen.insert(t.character_id));

        let character_ids: Vec<i64> = tracking.iter().map(|t| t.character_id).collect();
        let type_ids: Vec<i64> = tracking
            .iter()
            .filter_map(|t| t.ship_type_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let names = self.resolve_names(&character_ids).await;
        let type_names = self.resolve_type_names(&type_ids).await;

        let mut failures = Vec::new();
        let mut members = Vec::with_capacity(tracking.len());

        for tracked in tracking {
            let character_name = match names.get(&tracked.character_id) {
                Some(name) => name.clone(),
                None => {
                    tracing::warn!("Storing character {} without a name", tracked.character_id);
                    failures.push(EnrichmentFailure {
                        character_id: tracked.character_id,
                        kind: EnrichmentKind::CharacterName,
                    });
                    String::new()
                }
            };

            let ship_type_name = match tracked.ship_type_id {
                Some(type_id) => match type_names.get(&type_id) {
                    Some(name) => Some(name.clone()),
                    None => {
                        tracing::warn!(
                            "Storing character {} without ship type name for type {}",
                            tracked.character_id,
                            type_id
                        );
                        failures.push(EnrichmentFailure {
                            character_id: tracked.character_id,
                            kind: EnrichmentKind::ShipType { type_id },
                        });
                        None
                    }
                },
                None => None,
            };

            members.push(EnrichedMember {
                tracked,
                character_name,
                ship_type_name,
            });
        }

        (members, failures)
    }

    /// Resolves names in concurrent batches, ids of failed batches are absent from the result
    async fn resolve_names(&self, character_ids: &[i64]) -> HashMap<i64, String> {
        let mut names = HashMap::with_capacity(character_ids.len());

        for group in character_ids.chunks(ESI_NAMES_BATCH_SIZE * MAX_CONCURRENT_NAME_BATCHES) {
            let mut futures = FuturesUnordered::new();

            for batch in group.chunks(ESI_NAMES_BATCH_SIZE) {
                futures.push(async move { (batch.len(), self.source.resolve_names(batch).await) });
            }

            while let Some((batch_len, result)) = futures.next().await {
                match result {
                    Ok(resolved) => {
                        for name in resolved {
                            names.insert(name.id, name.name);
                        }
                    }
                    Err(e) => tracing::warn!(
                        "Failed to resolve names for a batch of {} characters: {}",
                        batch_len,
                        e
                    ),
                }
            }
        }

        names
    }

    /// Resolves ship type names concurrently, failed lookups are absent from the result
    async fn resolve_type_names(&self, type_ids: &[i64]) -> HashMap<i64, String> {
        let mut type_names = HashMap::with_capacity(type_ids.len());

        for chunk in type_ids.chunks(MAX_CONCURRENT_TYPE_LOOKUPS) {
            let mut futures = FuturesUnordered::new();

            for &type_id in chunk {
                futures.push(async move { (type_id, self.source.resolve_type_name(type_id).await) });
            }

            while let Some((type_id, result)) = futures.next().await {
                match result {
                    Ok(name) => {
                        type_names.insert(type_id, name);
                    }
                    Err(e) => tracing::warn!("Failed to resolve ship type {}: {}", type_id, e),
                }
            }
        }

        type_names
    }
}
