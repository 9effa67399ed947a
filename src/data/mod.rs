//! Repositories over the SeaORM entities.
//!
//! Each repository borrows any `ConnectionTrait` so the same code runs against a plain
//! connection or inside a transaction.

pub mod eve;
pub mod identity;
pub mod member;
pub mod notification;
pub mod unit;
