/// Shared types used across the codebase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A goal record as the remote store returns it.
///
/// `id` and `created_at` are assigned by the store at insert time and never
/// change afterwards. `user_id` ties the row to its owner; the hosted
/// row-level security rejects any read or write where it does not match the
/// acting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub description: String,
    pub completed: bool,
}

/// Insert payload for a new goal. The store fills in `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct GoalDraft {
    pub description: String,
    pub user_id: Uuid,
    pub completed: bool,
}

impl GoalDraft {
    pub fn new(description: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            description: description.into(),
            user_id,
            completed: false,
        }
    }
}
