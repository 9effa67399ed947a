//! Classification of a corporation's roster against the identity graph.
//!
//! Everything in this module is a pure function of its inputs. Callers gather a
//! [`StatsSnapshot`] first and hand it in together with the service registry and the
//! generation time, which keeps the output reproducible and easy to test.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::{
    identity::LinkedCharacter,
    registry::ServiceRegistry,
    stats::{CorpStats, MainBucket, RosterEntry, ServiceStats, StatsSnapshot, Summary},
};

mod alliance;

pub use alliance::alliance_breakdown;

/// Divides two counts as a percentage, 0.0 when the denominator is zero.
pub(crate) fn percent(numerator: usize, denominator: usize) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Divides two counts, 0.0 when the denominator is zero.
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Classifies the snapshot's candidates and roster into corp statistics.
///
/// # Arguments
/// - `snapshot` - Roster rows, candidate characters and service enrollments of the corporation
/// - `services` - Registered services reported in the statistics
/// - `now` - Generation timestamp stamped on the summary
///
/// # Returns
/// - `CorpStats` - Main buckets, known members, orphans, unregistered and tracked roster rows, and
///   the derived summary
///
/// # Notes
/// - Candidates without a linked account or without a main are skipped entirely; their roster
///   rows, if any, count as unregistered
/// - Every ratio with a zero denominator is reported as 0.0
/// - Enrollments in services missing from `services` are logged and ignored
pub fn compute(
    snapshot: &StatsSnapshot,
    services: &ServiceRegistry,
    now: DateTime<Utc>,
) -> CorpStats {
    let corporation_id = snapshot.corporation.corporation_id;

    // Dedupe by character ID, iteration order is by ID
    let candidates: BTreeMap<i64, &LinkedCharacter> = snapshot
        .candidates
        .iter()
        .map(|candidate| (candidate.character_id, candidate))
        .collect();

    let mut mains: BTreeMap<i64, MainBucket> = BTreeMap::new();
    let mut members: Vec<LinkedCharacter> = Vec::new();
    let mut orphans: Vec<LinkedCharacter> = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut alt_count = 0;

    for candidate in candidates.values() {
        let Some(account) = &candidate.account else {
            continue;
        };
        let Some(main) = &account.main else {
            continue;
        };

        seen.insert(candidate.character_id);
        let is_main = candidate.character_id == main.character_id;

        if main.corporation_id == corporation_id {
            let bucket = mains
                .entry(main.character_id)
                .or_insert_with(|| MainBucket {
                    main: main.clone(),
                    alts: Vec::new(),
                    services: services.keys().map(|key| (key.to_string(), false)).collect(),
                });

            bucket.alts.push((*candidate).clone());

            if is_main {
                let enrolled = snapshot
                    .enrollments
                    .get(&account.user_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                for service in enrolled {
                    match bucket.services.get_mut(service) {
                        Some(flag) => *flag = true,
                        None => tracing::warn!(
                            "Ignoring unknown service '{}' enrolled by user {}",
                            service,
                            account.user_id
                        ),
                    }
                }
            }
        }

        if candidate.corporation_id == corporation_id {
            members.push((*candidate).clone());

            if !is_main {
                alt_count += 1;
            }

            if main.corporation_id != corporation_id {
                orphans.push((*candidate).clone());
            }
        }
    }

    for bucket in mains.values_mut() {
        bucket
            .alts
            .sort_by(|a, b| a.name.cmp(&b.name).then(a.character_id.cmp(&b.character_id)));
    }
    members.sort_by(|a, b| a.name.cmp(&b.name).then(a.character_id.cmp(&b.character_id)));
    orphans.sort_by(|a, b| a.name.cmp(&b.name).then(a.character_id.cmp(&b.character_id)));

    let (mut tracking, mut unregistered): (Vec<RosterEntry>, Vec<RosterEntry>) = snapshot
        .roster
        .iter()
        .cloned()
        .partition(|entry| seen.contains(&entry.character_id));

    let by_name = |a: &RosterEntry, b: &RosterEntry| {
        a.character_name
            .cmp(&b.character_name)
            .then(a.character_id.cmp(&b.character_id))
    };
    tracking.sort_by(by_name);
    unregistered.sort_by(by_name);

    let total_mains = mains.len();
    let known_members = members.len();
    let total_unregistered = unregistered.len();
    let total_members = known_members + total_unregistered;

    let service_stats = services
        .keys()
        .map(|key| {
            let enrolled_mains = mains
                .values()
                .filter(|bucket| bucket.services.get(key).copied().unwrap_or(false))
                .count();

            (
                key.to_string(),
                ServiceStats {
                    display_name: services.display_name(key).unwrap_or(key).to_string(),
                    enrolled_mains,
                    percent: percent(enrolled_mains, total_mains),
                },
            )
        })
        .collect();

    let summary = Summary {
        corporation_id,
        corporation_name: snapshot.corporation.name.clone(),
        corporation_ticker: snapshot.corporation.ticker.clone(),
        alliance_id: snapshot.corporation.alliance_id,
        total_members,
        known_members,
        total_unregistered,
        total_orphans: orphans.len(),
        total_mains,
        alt_count,
        auth_percent: percent(known_members, total_members),
        alt_ratio: ratio(total_mains, alt_count),
        services: service_stats,
        generated_at: now,
    };

    CorpStats {
        summary,
        mains,
        members,
        orphans,
        unregistered,
        tracking,
    }
}
