pub mod aggregate;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod identity;
pub mod model;
pub mod notify;
pub mod scheduler;
pub mod service;
pub mod source;
pub mod startup;
pub mod util;
