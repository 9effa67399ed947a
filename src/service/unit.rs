use sea_orm::DatabaseConnection;

use crate::{
    cache::SummaryCache,
    data::{
        eve::{AllianceRepository, CorporationRepository},
        unit::UnitRepository,
    },
    error::{stats::StatsError, Error},
    model::{
        db::{CorpStatsUnitModel, EveAllianceModel, EveCorporationModel},
        roster::{Credential, SyncOutcome},
    },
    notify::Notifier,
    service::sync::SyncService,
    source::RosterSource,
};

/// Registers corporations for stats tracking.
pub struct UnitService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a eve_esi::Client,
    source: &'a dyn RosterSource,
    notifier: &'a dyn Notifier,
    cache: &'a SummaryCache,
}

impl<'a> UnitService<'a> {
    /// Creates a new instance of [`UnitService`]
    pub fn new(
        db: &'a DatabaseConnection,
        esi_client: &'a eve_esi::Client,
        source: &'a dyn RosterSource,
        notifier: &'a dyn Notifier,
        cache: &'a SummaryCache,
    ) -> Self {
        Self {
            db,
            esi_client,
            source,
            notifier,
            cache,
        }
    }

    /// Creates a stats unit for the credential character's corporation and runs its first sync
    ///
    /// # Arguments
    /// - `credential` - Credential of a character holding the director role in its corporation
    ///
    /// # Returns
    /// - `Ok((unit, SyncOutcome::Updated(_)))` - The unit was created and its roster stored
    /// - `Ok((unit, SyncOutcome::Removed(_)))` - The unit was created but the first sync rejected
    ///   the credential, the returned model no longer exists
    /// - `Err(Error::StatsError(StatsError::UnitAlreadyExists))` - The corporation already has a unit
    /// - `Err(Error::SourceError(_))` - The character's corporation could not be looked up
    /// - `Err(Error::EsiError(_))` - The corporation or its alliance could not be fetched from ESI
    pub async fn register(
        &self,
        credential: Credential,
    ) -> Result<(CorpStatsUnitModel, SyncOutcome), Error> {
        let corporation_id = self
            .source
            .character_corporation(credential.character_id)
            .await?;

        let corporation = self.get_or_create_corporation(corporation_id).await?;

        let unit_repo = UnitRepository::new(self.db);
        if unit_repo.get_by_corporation(corporation.id).await?.is_some() {
            return Err(StatsError::UnitAlreadyExists(corporation_id).into());
        }

        let unit = unit_repo.create(corporation.id, &credential).await?;

        tracing::info!(
            "Registered corp stats for {} with character {}",
            corporation.name,
            credential.character_id
        );

        let outcome = SyncService::new(self.db, self.source, self.notifier, self.cache)
            .sync(unit.id)
            .await?;

        Ok((unit, outcome))
    }

    /// Gets a corporation's record, fetching it and its alliance from ESI when missing
    async fn get_or_create_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<EveCorporationModel, Error> {
        let corporation_repo = CorporationRepository::new(self.db);

        if let Some(corporation) = corporation_repo
            .get_by_corporation_id(corporation_id)
            .await?
        {
            return Ok(corporation);
        }

        let corporation = self
            .esi_client
            .corporation()
            .get_corporation_information(corporation_id)
            .await?;

        let alliance_id = match corporation.alliance_id {
            Some(id) => Some(self.get_or_create_alliance(id).await?.id),
            None => None,
        };

        Ok(corporation_repo
            .create(corporation_id, corporation, alliance_id)
            .await?)
    }

    async fn get_or_create_alliance(&self, alliance_id: i64) -> Result<EveAllianceModel, Error> {
        let alliance_repo = AllianceRepository::new(self.db);

        if let Some(alliance) = alliance_repo.get_by_alliance_id(alliance_id).await? {
            return Ok(alliance);
        }

        let alliance = self
            .esi_client
            .alliance()
            .get_alliance_information(alliance_id)
            .await?;

        Ok(alliance_repo.create(alliance_id, alliance).await?)
    }
}
