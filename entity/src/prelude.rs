pub use super::auth_user::Entity as AuthUser;
pub use super::auth_user_character::Entity as AuthUserCharacter;
pub use super::auth_user_service::Entity as AuthUserService;
pub use super::corpstats_member::Entity as CorpstatsMember;
pub use super::corpstats_unit::Entity as CorpstatsUnit;
pub use super::eve_alliance::Entity as EveAlliance;
pub use super::eve_character::Entity as EveCharacter;
pub use super::eve_corporation::Entity as EveCorporation;
pub use super::notification::Entity as Notification;
