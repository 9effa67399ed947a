//! Database model type aliases.
//!
//! Short names for the SeaORM entity models used throughout the crate.

/// Type alias for a corp stats unit database model.
///
/// # Fields (from `entity::corpstats_unit::Model`)
/// - `id` - Primary key
/// - `corporation_id` - Foreign key to `eve_corporation.id` (unique)
/// - `token_character_id` - EVE character ID the credential belongs to
/// - `token_owner_id` - Auth user owning the credential, if any
/// - `access_token` - ESI access token used for member tracking requests
/// - `last_update_at` - Timestamp of the last successful sync
/// - `created_at` - Timestamp when the unit was registered
pub type CorpStatsUnitModel = entity::corpstats_unit::Model;

/// Type alias for a tracked roster row database model.
///
/// # Fields (from `entity::corpstats_member::Model`)
/// - `unit_id` - Foreign key to `corpstats_unit.id`
/// - `character_id` - EVE character ID
/// - `character_name` - Resolved name, empty when ESI could not resolve it
/// - ship, location, session and base fields, all nullable
pub type CorpMemberModel = entity::corpstats_member::Model;

/// Type alias for an EVE Online character database model.
pub type EveCharacterModel = entity::eve_character::Model;

/// Type alias for an EVE Online corporation database model.
pub type EveCorporationModel = entity::eve_corporation::Model;

/// Type alias for an EVE Online alliance database model.
pub type EveAllianceModel = entity::eve_alliance::Model;

/// Type alias for a user notification database model.
pub type NotificationModel = entity::notification::Model;
