use futures::stream::{FuturesUnordered, StreamExt};

use crate::{
    data::unit::UnitRepository,
    error::Error,
    identity::DbIdentityGraph,
    model::{app::AppState, roster::SyncOutcome},
    service::{stats::StatsService, sync::SyncService, MAX_CONCURRENT_UNIT_REFRESHES},
};

/// Counts of a full refresh run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Syncs units and re-caches their summaries, one sync per unit at a time.
pub struct RefreshService<'a> {
    state: &'a AppState,
}

impl<'a> RefreshService<'a> {
    /// Creates a new instance of [`RefreshService`]
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Syncs a unit then recomputes its cached summary
    ///
    /// # Notes
    /// - Waits for any sync of the same unit already in progress
    /// - A removed unit's lock entry is dropped
    pub async fn refresh_unit(&self, unit_id: i32) -> Result<SyncOutcome, Error> {
        let state = self.state;
        let _guard = state.locks.lock(unit_id).await;

        let outcome = SyncService::new(
            &state.db,
            state.source.as_ref(),
            state.notifier.as_ref(),
            &state.cache,
        )
        .sync(unit_id)
        .await?;

        match &outcome {
            SyncOutcome::Updated(_) => {
                let identity = DbIdentityGraph::new(&state.db);
                StatsService::new(&state.db, &identity, &state.cache, &state.services)
                    .recache(unit_id)
                    .await?;
            }
            SyncOutcome::Removed(_) => state.locks.forget(unit_id).await,
        }

        Ok(outcome)
    }

    /// Refreshes every registered unit
    ///
    /// Units are refreshed concurrently in groups of [`MAX_CONCURRENT_UNIT_REFRESHES`]; a
    /// failing unit is logged and counted without affecting the others.
    pub async fn refresh_all(&self) -> Result<RefreshSummary, Error> {
        let unit_ids = UnitRepository::new(&self.state.db).get_all_ids().await?;
        let mut summary = RefreshSummary::default();

        for chunk in unit_ids.chunks(MAX_CONCURRENT_UNIT_REFRESHES) {
            let mut futures = FuturesUnordered::new();

            for &unit_id in chunk {
                futures.push(async move { (unit_id, self.refresh_unit(unit_id).await) });
            }

            while let Some((unit_id, result)) = futures.next().await {
                match result {
                    Ok(SyncOutcome::Updated(_)) => summary.updated += 1,
                    Ok(SyncOutcome::Removed(_)) => summary.removed += 1,
                    Err(e) => {
                        tracing::error!("Failed to refresh corp stats unit {}: {}", unit_id, e);
                        summary.failed += 1;
                    }
                }
            }
        }

        tracing::info!(
            "Refreshed {} corp stats units: {} updated, {} removed, {} failed",
            unit_ids.len(),
            summary.updated,
            summary.removed,
            summary.failed
        );

        Ok(summary)
    }
}
