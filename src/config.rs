use std::time::Duration;

use crate::{error::config::ConfigError, model::registry::ServiceRegistry};

static DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
static DEFAULT_REFRESH_CRON: &str = "0 0 */6 * * *";
const DEFAULT_CACHE_TTL_HOURS: u64 = 12;

pub struct Config {
    pub contact_email: String,
    pub user_agent: String,
    pub esi_client_id: String,
    pub esi_client_secret: String,
    pub esi_callback_url: String,
    pub esi_url: String,
    pub database_url: String,
    pub cache_ttl: Duration,
    pub refresh_cron: String,
    pub services: ServiceRegistry,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let contact_email = require("CONTACT_EMAIL")?;
        let user_agent = format!(
            "{}/{} ({}; +{})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            contact_email,
            env!("CARGO_PKG_REPOSITORY")
        );

        let cache_ttl_hours = match optional("CORPSTATS_CACHE_TTL_HOURS") {
            Some(value) => value.parse::<u64>().map_err(|e| ConfigError::InvalidEnvValue {
                var: "CORPSTATS_CACHE_TTL_HOURS".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_CACHE_TTL_HOURS,
        };

        let services = match optional("CORPSTATS_SERVICES") {
            Some(value) => {
                ServiceRegistry::parse(&value).map_err(|reason| ConfigError::InvalidEnvValue {
                    var: "CORPSTATS_SERVICES".to_string(),
                    reason,
                })?
            }
            None => ServiceRegistry::default(),
        };

        Ok(Self {
            contact_email,
            user_agent,
            esi_client_id: require("ESI_CLIENT_ID")?,
            esi_client_secret: require("ESI_CLIENT_SECRET")?,
            esi_callback_url: require("ESI_CALLBACK_URL")?,
            esi_url: optional("ESI_URL").unwrap_or_else(|| DEFAULT_ESI_URL.to_string()),
            database_url: require("DATABASE_URL")?,
            cache_ttl: Duration::from_secs(cache_ttl_hours * 60 * 60),
            refresh_cron: optional("CORPSTATS_REFRESH_CRON")
                .unwrap_or_else(|| DEFAULT_REFRESH_CRON.to_string()),
            services,
        })
    }
}

fn require(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}
