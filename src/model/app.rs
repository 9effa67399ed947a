use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    cache::SummaryCache, model::registry::ServiceRegistry, notify::Notifier,
    source::RosterSource, util::lock::UnitLocks,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub esi_client: eve_esi::Client,
    pub source: Arc<dyn RosterSource>,
    pub notifier: Arc<dyn Notifier>,
    pub cache: Arc<SummaryCache>,
    pub services: Arc<ServiceRegistry>,
    pub locks: UnitLocks,
}
