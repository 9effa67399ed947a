//! Domain models shared across the corpstats services.
//!
//! Database entity aliases, roster and identity records, aggregated statistics, and the
//! configuration-driven service registry all live here so that repositories, services and the
//! pure aggregation code can exchange plain data.

pub mod app;
pub mod db;
pub mod identity;
pub mod notification;
pub mod registry;
pub mod roster;
pub mod stats;
pub mod visibility;
