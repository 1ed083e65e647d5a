use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::list::GoalList;
use crate::session::Identity;
use crate::store::GoalStore;
use crate::types::{Goal, GoalDraft};

/// State machine behind the goal screen: one identity's goals, mirrored
/// from the remote store.
///
/// The local collection is a cache of server truth, never the authority: a
/// mutation patches it only after the store confirms. Failures land in a
/// single error slot as the backend's own message; the controller itself
/// never gives up - every operation leaves it interactive.
///
/// Operations take `&self` and may overlap (the controller is meant to be
/// shared behind an `Arc`). Each one applies its patch to whatever the
/// collection looks like when its remote call resolves; overlapping
/// mutations of the same record are last-resolved-wins, with no version
/// check. State lives behind a mutex that is never held across an await.
pub struct GoalListController {
    store: Arc<dyn GoalStore>,
    identity: Identity,
    state: Mutex<ControllerState>,
}

#[derive(Debug, Default)]
struct ControllerState {
    goals: GoalList,
    loading: bool,
    submitting: bool,
    error: Option<String>,
    loaded_once: bool,
    disposed: bool,
}

impl GoalListController {
    /// The acting identity is passed in explicitly; there is no ambient
    /// session lookup, and a controller cannot exist without a resolved
    /// identity.
    pub fn new(store: Arc<dyn GoalStore>, identity: Identity) -> Self {
        Self {
            store,
            identity,
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current collection, in display order (newest first).
    pub fn goals(&self) -> Vec<Goal> {
        self.lock().goals.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    /// Discard local state and refuse any patch from operations still in
    /// flight. Called when the session ends.
    pub fn dispose(&self) {
        let mut state = self.lock();
        state.goals.clear();
        state.error = None;
        state.disposed = true;
    }

    /// Fetch all goals owned by the acting identity, newest first, and
    /// replace the whole local collection with the result. On failure the
    /// collection stays as it was (empty if nothing ever loaded) and the
    /// store's message is surfaced; there is no automatic retry.
    pub async fn load(&self) {
        {
            let mut state = self.lock();
            if state.disposed {
                return;
            }
            state.loading = true;
        }

        let result = self.store.select_owned(self.identity.id).await;

        let mut state = self.lock();
        if state.disposed {
            return;
        }
        state.loading = false;

        match result {
            Ok(goals) => {
                state.goals.replace_all(goals);
                state.loaded_once = true;
            }
            Err(e) => {
                tracing::warn!(owner = %self.identity.id, "load failed: {}", e);
                if !state.loaded_once {
                    state.goals.clear();
                }
                state.error = Some(e.to_string());
            }
        }
    }

    /// Insert a new, incomplete goal and prepend the stored record to the
    /// collection. Whitespace-only text is a silent no-op with no remote
    /// call. While one create is in flight, further creates are suppressed;
    /// that guard is released whether the call succeeds or fails.
    pub async fn create(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        {
            let mut state = self.lock();
            if state.disposed || state.submitting {
                return;
            }
            state.submitting = true;
        }

        let draft = GoalDraft::new(trimmed, self.identity.id);
        let result = self.store.insert(draft).await;

        let mut state = self.lock();
        state.submitting = false;
        if state.disposed {
            return;
        }

        match result {
            Ok(goal) => {
                if !state.goals.prepend(goal) {
                    tracing::warn!("store returned an id already in the collection");
                }
            }
            Err(e) => {
                tracing::warn!(owner = %self.identity.id, "create failed: {}", e);
                state.error = Some(e.to_string());
            }
        }
    }

    /// Flip the completion flag of the matching goal, scoped remotely by
    /// both id and owner. The local record changes only after the store
    /// confirms (optimistic-after-confirm); a failed toggle leaves local
    /// state exactly as the server still sees it.
    pub async fn toggle(&self, id: Uuid) {
        let desired = {
            let mut state = self.lock();
            if state.disposed {
                return;
            }
            let current = state.goals.get(id).map(|goal| goal.completed);
            match current {
                Some(completed) => !completed,
                None => {
                    state.error = Some(format!("goal {} is not in the current list", id));
                    return;
                }
            }
        };

        let result = self
            .store
            .set_completed(id, self.identity.id, desired)
            .await;

        let mut state = self.lock();
        if state.disposed {
            return;
        }

        match result {
            Ok(confirmed) => {
                // Patch from the confirmed record; the row may have been
                // removed locally while the call was in flight, in which
                // case there is nothing left to patch.
                state.goals.set_completed(id, confirmed.completed);
            }
            Err(e) => {
                tracing::warn!(%id, "toggle failed: {}", e);
                state.error = Some(e.to_string());
            }
        }
    }

    /// Delete the matching goal, scoped remotely by both id and owner, and
    /// drop it from the collection once the store confirms. A delete the
    /// store refuses (missing id, foreign row) surfaces as an error and
    /// changes nothing locally.
    pub async fn delete(&self, id: Uuid) {
        {
            let state = self.lock();
            if state.disposed {
                return;
            }
        }

        let result = self.store.remove(id, self.identity.id).await;

        let mut state = self.lock();
        if state.disposed {
            return;
        }

        match result {
            Ok(()) => {
                state.goals.remove(id);
            }
            Err(e) => {
                tracing::warn!(%id, "delete failed: {}", e);
                state.error = Some(e.to_string());
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
