use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{identity::LinkedCharacter, stats::CorporationBreakdown};

/// Counts an alliance's linked characters per corporation.
///
/// Only characters that are in the alliance themselves and whose main is also in the alliance
/// are counted.
///
/// # Arguments
/// - `alliance_id` - EVE alliance ID
/// - `characters` - Characters whose account's main is in the alliance
/// - `tracked_totals` - Roster size per EVE corporation ID for corporations with a stats unit
///
/// # Returns
/// - `Vec<CorporationBreakdown>` - One entry per corporation, sorted by corporation name
pub fn alliance_breakdown(
    alliance_id: i64,
    characters: &[LinkedCharacter],
    tracked_totals: &HashMap<i64, usize>,
) -> Vec<CorporationBreakdown> {
    let mut breakdown: BTreeMap<i64, CorporationBreakdown> = BTreeMap::new();
    let mut counted: HashSet<i64> = HashSet::new();

    for character in characters {
        if character.alliance_id != Some(alliance_id) {
            continue;
        }

        let Some(main) = character.main() else {
            continue;
        };

        if main.alliance_id != Some(alliance_id) || !counted.insert(character.character_id) {
            continue;
        }

        let entry = breakdown
            .entry(character.corporation_id)
            .or_insert_with(|| CorporationBreakdown {
                corporation_id: character.corporation_id,
                corporation_name: character.corporation_name.clone(),
                mains: 0,
                alts: 0,
                members: 0,
                tracked_total: tracked_totals.get(&character.corporation_id).copied(),
            });

        if character.is_main() {
            entry.mains += 1;
        } else {
            entry.alts += 1;
        }
        entry.members += 1;
    }

    let mut breakdown: Vec<CorporationBreakdown> = breakdown.into_values().collect();
    breakdown.sort_by(|a, b| {
        a.corporation_name
            .cmp(&b.corporation_name)
            .then(a.corporation_id.cmp(&b.corporation_id))
    });

    breakdown
}
