pub mod error;
pub mod query;
pub mod rest;

pub use error::StoreError;
pub use rest::RestStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{Goal, GoalDraft};

/// The four operations the application performs against the hosted `goals`
/// relation. Every call is a single network round-trip; reads are filtered
/// and writes are scoped by the owning user's id, mirroring the row-level
/// security the backend enforces on its side.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// All goals owned by `owner`, newest first (server-side ordering).
    async fn select_owned(&self, owner: Uuid) -> Result<Vec<Goal>, StoreError>;

    /// Insert a new goal and return the stored record with its assigned
    /// `id` and `created_at`.
    async fn insert(&self, draft: GoalDraft) -> Result<Goal, StoreError>;

    /// Set the completion flag on the goal matching both `id` and `owner`.
    /// Returns the updated record as the store confirms it.
    async fn set_completed(
        &self,
        id: Uuid,
        owner: Uuid,
        completed: bool,
    ) -> Result<Goal, StoreError>;

    /// Delete the goal matching both `id` and `owner`.
    async fn remove(&self, id: Uuid, owner: Uuid) -> Result<(), StoreError>;
}
