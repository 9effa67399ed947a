pub use sea_orm_migration::prelude::*;

mod m20251101_000001_eve_alliance;
mod m20251101_000002_eve_corporation;
mod m20251101_000003_eve_character;
mod m20251101_000004_auth_user;
mod m20251101_000005_auth_user_character;
mod m20251101_000006_auth_user_service;
mod m20251101_000007_corpstats_unit;
mod m20251101_000008_corpstats_member;
mod m20251101_000009_notification;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_eve_alliance::Migration),
            Box::new(m20251101_000002_eve_corporation::Migration),
            Box::new(m20251101_000003_eve_character::Migration),
            Box::new(m20251101_000004_auth_user::Migration),
            Box::new(m20251101_000005_auth_user_character::Migration),
            Box::new(m20251101_000006_auth_user_service::Migration),
            Box::new(m20251101_000007_corpstats_unit::Migration),
            Box::new(m20251101_000008_corpstats_member::Migration),
            Box::new(m20251101_000009_notification::Migration),
        ]
    }
}
