pub mod prelude;

pub mod auth_user;
pub mod auth_user_character;
pub mod auth_user_service;
pub mod corpstats_member;
pub mod corpstats_unit;
pub mod eve_alliance;
pub mod eve_character;
pub mod eve_corporation;
pub mod notification;
