//! Database model type aliases used by fixtures.

pub type EveAllianceModel = entity::eve_alliance::Model;
pub type EveCorporationModel = entity::eve_corporation::Model;
pub type EveCharacterModel = entity::eve_character::Model;
pub type AuthUserModel = entity::auth_user::Model;
pub type AuthUserServiceModel = entity::auth_user_service::Model;
pub type CorpStatsUnitModel = entity::corpstats_unit::Model;
pub type CorpMemberModel = entity::corpstats_member::Model;
