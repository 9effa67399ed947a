//! Error types for the corpstats application.
//!
//! Domain-specific errors live in submodules and are aggregated into [`Error`] through
//! `thiserror`'s `#[from]` conversions so services can propagate them with `?`.

pub mod config;
pub mod source;
pub mod stats;

use thiserror::Error;

use crate::error::{config::ConfigError, source::SourceError, stats::StatsError};

/// Main error type for the corpstats application.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Roster source errors (ESI requests, credential and authorization failures)
/// - Corp stats errors (missing units, duplicate registrations)
/// - External library errors (database, ESI client, scheduler, serialization)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Error returned by the external roster source.
    #[error(transparent)]
    SourceError(#[from] SourceError),
    /// Corp stats domain error.
    #[error(transparent)]
    StatsError(#[from] StatsError),
    /// Internal error indicating a bug in corpstats' code.
    #[error("Internal error with corpstats' code, please open a GitHub issue as this indicates a bug: {0:?}")]
    InternalError(String),
    /// ESI client error outside of roster source calls (client construction, corporation lookup).
    #[error(transparent)]
    EsiError(#[from] eve_esi::Error),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cached summary payload could not be serialized or deserialized.
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    /// HTTP client construction error.
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}
