//! Aggregated corp statistics.
//!
//! [`StatsSnapshot`] is the input of [`aggregate::compute`](crate::aggregate::compute) and
//! [`CorpStats`] its output. Only the [`Summary`] is cached; the full breakdown is always
//! recomputed.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::{LinkedCharacter, MainCharacter};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporationInfo {
    pub corporation_id: i64,
    pub name: String,
    pub ticker: String,
    pub alliance_id: Option<i64>,
}

/// A roster row as seen by the aggregator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub character_id: i64,
    pub character_name: String,
}

impl From<&entity::corpstats_member::Model> for RosterEntry {
    fn from(member: &entity::corpstats_member::Model) -> Self {
        Self {
            character_id: member.character_id,
            character_name: member.character_name.clone(),
        }
    }
}

/// Everything the aggregator reads, gathered up front so that computation stays pure.
#[derive(Clone, Debug)]
pub struct StatsSnapshot {
    pub corporation: CorporationInfo,
    pub roster: Vec<RosterEntry>,
    /// Characters in the corporation united with characters whose main is in the corporation.
    /// May contain duplicates.
    pub candidates: Vec<LinkedCharacter>,
    /// Enrolled service keys per auth user id
    pub enrollments: HashMap<i32, Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub display_name: String,
    pub enrolled_mains: usize,
    pub percent: f64,
}

/// Cached, serializable overview of a corporation's statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub corporation_id: i64,
    pub corporation_name: String,
    pub corporation_ticker: String,
    pub alliance_id: Option<i64>,
    /// Known members plus unregistered roster rows
    pub total_members: usize,
    pub known_members: usize,
    pub total_unregistered: usize,
    pub total_orphans: usize,
    pub total_mains: usize,
    pub alt_count: usize,
    pub auth_percent: f64,
    pub alt_ratio: f64,
    pub services: BTreeMap<String, ServiceStats>,
    pub generated_at: DateTime<Utc>,
}

/// A main whose corporation is the unit's corporation, with every linked character of its
/// account that was considered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MainBucket {
    pub main: MainCharacter,
    pub alts: Vec<LinkedCharacter>,
    /// Enrollment flag per registered service key
    pub services: BTreeMap<String, bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorpStats {
    pub summary: Summary,
    pub mains: BTreeMap<i64, MainBucket>,
    /// Linked characters in the corporation, sorted by name
    pub members: Vec<LinkedCharacter>,
    /// Members whose main is in another corporation
    pub orphans: Vec<LinkedCharacter>,
    /// Roster rows with no linked account and main
    pub unregistered: Vec<RosterEntry>,
    /// Roster rows that are linked
    pub tracking: Vec<RosterEntry>,
}

/// Per corporation counts of an alliance's linked characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporationBreakdown {
    pub corporation_id: i64,
    pub corporation_name: String,
    pub mains: usize,
    pub alts: usize,
    pub members: usize,
    /// Roster size when the corporation has a stats unit
    pub tracked_total: Option<usize>,
}

/// Roster export as a header row and one string row per member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTable {
    /// Corporation name with non-word characters removed
    pub filename: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A roster row matching a member search, with the corporation of the unit it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchResult {
    pub corporation_id: i64,
    pub corporation_name: String,
    pub character_id: i64,
    pub character_name: String,
}
