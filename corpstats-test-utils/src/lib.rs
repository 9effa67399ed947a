//! Test utilities shared by corpstats unit and integration tests.
//!
//! Tests are set up in two phases. [`TestBuilder`] declares tables, database fixtures and mock
//! ESI endpoints, then `build()` produces a [`TestContext`] holding an in-memory SQLite database,
//! a mockito server and an ESI client pointed at it. Fixture helpers on the context
//! (`test.eve()`, `test.identity()`, `test.corpstats()`) insert further records during the test.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod model;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

/// Factories for ESI payloads used by fixtures and mock endpoints.
pub mod factory {
    pub use crate::fixtures::{corpstats::factory::*, eve::factory::*};
}

pub mod prelude {
    pub use crate::{factory, TestBuilder, TestContext, TestError};
}
