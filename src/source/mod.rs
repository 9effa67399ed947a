//! External roster source.
//!
//! The synchronizer only talks to ESI through the [`RosterSource`] trait so that the rest of the
//! crate never depends on transport details. [`EsiRosterSource`] is the production
//! implementation.

use async_trait::async_trait;

use crate::{
    error::source::SourceError,
    model::roster::{Credential, ResolvedName, TrackedMember},
};

mod esi;

pub use esi::EsiRosterSource;

/// Maximum number of ids accepted by a single bulk name resolution request.
///
/// ESI does not document a maximum, larger requests have been observed to fail with 400.
pub const ESI_NAMES_BATCH_SIZE: usize = 255;

#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Returns the corporation id the character currently belongs to.
    async fn character_corporation(&self, character_id: i64) -> Result<i64, SourceError>;

    /// Fetches the tracked-member list of a corporation with the given credential.
    ///
    /// # Returns
    /// - `Ok(Vec<TrackedMember>)` - Every member currently tracked by the corporation
    /// - `Err(SourceError::Unauthorized)` - The credential is expired or revoked
    /// - `Err(SourceError::Forbidden)` - The credential lacks access to member tracking
    /// - `Err(SourceError)` - Any other, transient, failure
    async fn member_tracking(
        &self,
        corporation_id: i64,
        credential: &Credential,
    ) -> Result<Vec<TrackedMember>, SourceError>;

    /// Resolves up to [`ESI_NAMES_BATCH_SIZE`] ids to names.
    ///
    /// Ids that cannot be resolved are absent from the result.
    async fn resolve_names(&self, ids: &[i64]) -> Result<Vec<ResolvedName>, SourceError>;

    /// Resolves an inventory type id to its name.
    ///
    /// # Returns
    /// - `Err(SourceError::InvalidId)` - The type id does not exist
    async fn resolve_type_name(&self, type_id: i64) -> Result<String, SourceError>;
}
