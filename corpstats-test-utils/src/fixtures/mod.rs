//! Test fixture modules for database and HTTP mock creation.
//!
//! - `eve` - EVE Online entity data (alliances, corporations, characters) and their endpoints
//! - `identity` - Accounts, character ownerships and service enrollments
//! - `corpstats` - Stats units, roster rows and the member tracking, names and types endpoints

pub mod corpstats;
pub mod eve;
pub mod identity;
