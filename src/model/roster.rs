//! Roster records exchanged with the external roster source and produced by a sync.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked-member record as returned by the corporation member tracking endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedMember {
    pub character_id: i64,
    pub base_id: Option<i64>,
    pub location_id: Option<i64>,
    pub logoff_date: Option<DateTime<Utc>>,
    pub logon_date: Option<DateTime<Utc>>,
    pub ship_type_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
}

/// An entry of a bulk id to name resolution response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedName {
    pub id: i64,
    pub name: String,
    pub category: String,
}

/// The access credential a unit syncs with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    /// EVE character the token was issued for
    pub character_id: i64,
    /// Auth user that registered the credential, notified on terminal failures
    pub owner_id: Option<i32>,
    pub access_token: String,
}

impl From<&entity::corpstats_unit::Model> for Credential {
    fn from(unit: &entity::corpstats_unit::Model) -> Self {
        Self {
            character_id: unit.token_character_id,
            owner_id: unit.token_owner_id,
            access_token: unit.access_token.clone(),
        }
    }
}

/// A tracked member merged with its resolved names, ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedMember {
    pub tracked: TrackedMember,
    /// Empty when the name could not be resolved
    pub character_name: String,
    pub ship_type_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnrichmentKind {
    /// The name batch containing the character failed to resolve
    CharacterName,
    /// The ship type lookup failed
    ShipType { type_id: i64 },
}

/// A per-record enrichment failure. The record is still stored, with the field left empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub character_id: i64,
    pub kind: EnrichmentKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of roster rows stored for the unit
    pub members: usize,
    pub enrichment_failures: Vec<EnrichmentFailure>,
}

/// An unrecoverable sync failure. The unit is deleted when one occurs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncFailure {
    /// The credential was rejected by the upstream API
    CredentialInvalid,
    /// The upstream API refused access with the given status and message
    UpstreamForbidden { status: u16, message: String },
    /// The credential's character no longer belongs to the unit's corporation
    OwnershipMismatch { expected: i64, actual: i64 },
}

impl SyncFailure {
    /// Notification title and message sent to the credential owner for this failure.
    ///
    /// # Arguments
    /// - `corporation_name` - Name of the corporation the failed unit tracked
    ///
    /// # Returns
    /// - `(String, String)` - Title and message of the notification
    pub fn notification(&self, corporation_name: &str) -> (String, String) {
        match self {
            Self::CredentialInvalid => (
                format!(
                    "Corp stats for {} failed to update with your ESI token.",
                    corporation_name
                ),
                "Your token has expired or is no longer valid. Please add a new one to create new corp stats."
                    .to_string(),
            ),
            Self::UpstreamForbidden { status, message } => (
                format!(
                    "Corp stats for {} failed to update with your ESI token.",
                    corporation_name
                ),
                format!("{}: {}", status, message),
            ),
            Self::OwnershipMismatch { .. } => (
                format!(
                    "Corp stats for {} cannot update with your ESI token.",
                    corporation_name
                ),
                format!(
                    "Corp stats for {} cannot update with your ESI token as you have left corp.",
                    corporation_name
                ),
            ),
        }
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CredentialInvalid => write!(f, "credential is invalid or expired"),
            Self::UpstreamForbidden { status, message } => {
                write!(f, "upstream refused access ({}): {}", status, message)
            }
            Self::OwnershipMismatch { expected, actual } => write!(
                f,
                "credential character moved from corporation {} to {}",
                expected, actual
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The roster was replaced
    Updated(SyncReport),
    /// The unit was deleted after an unrecoverable failure
    Removed(SyncFailure),
}
