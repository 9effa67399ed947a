use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    cache::{SummaryCache, SystemClock},
    config::Config,
    error::Error,
    model::app::AppState,
    notify::DbNotifier,
    source::EsiRosterSource,
    util::lock::UnitLocks,
};

/// Build and configure the ESI client with the provided credentials
pub fn build_esi_client(config: &Config) -> Result<eve_esi::Client, Error> {
    let esi_config = eve_esi::Config::builder()
        .esi_url(&config.esi_url)
        .build()?;

    let esi_client = eve_esi::Client::builder()
        .config(esi_config)
        .user_agent(&config.user_agent)
        .client_id(&config.esi_client_id)
        .client_secret(&config.esi_client_secret)
        .callback_url(&config.esi_callback_url)
        .build()?;

    Ok(esi_client)
}

/// Build the HTTP client used for ESI routes the ESI client does not cover
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, Error> {
    let http_client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?;

    Ok(http_client)
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Wire the application state from configuration and an open database connection
pub fn build_state(config: &Config, db: DatabaseConnection) -> Result<AppState, Error> {
    let esi_client = build_esi_client(config)?;
    let http_client = build_http_client(config)?;

    let source = EsiRosterSource::new(esi_client.clone(), http_client, &config.esi_url);

    Ok(AppState {
        esi_client,
        source: Arc::new(source),
        notifier: Arc::new(DbNotifier::new(db.clone())),
        cache: Arc::new(SummaryCache::new(config.cache_ttl, Arc::new(SystemClock))),
        services: Arc::new(config.services.clone()),
        locks: UnitLocks::new(),
        db,
    })
}
