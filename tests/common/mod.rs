use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use goaltrack::session::Identity;
use goaltrack::store::{GoalStore, StoreError};
use goaltrack::types::{Goal, GoalDraft};

/// How many times each store operation has been invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CallCounts {
    pub selects: usize,
    pub inserts: usize,
    pub updates: usize,
    pub deletes: usize,
}

/// In-memory `GoalStore` double.
///
/// Rows live behind a mutex and can be seeded for any owner. Tests can
/// script the next call to fail (`fail_next`) or to stall (`delay_next`) to
/// force overlapping operations. Timestamps come from a counter so insert
/// order and creation order always agree.
pub struct MemoryStore {
    rows: Mutex<Vec<Goal>>,
    calls: Mutex<CallCounts>,
    fail_next: Mutex<Option<StoreError>>,
    delay_next: Mutex<Option<Duration>>,
    clock: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            calls: Mutex::new(CallCounts::default()),
            fail_next: Mutex::new(None),
            delay_next: Mutex::new(None),
            clock: AtomicI64::new(0),
        })
    }

    /// Put a row into the store directly, bypassing the insert path.
    pub fn seed(&self, owner: Uuid, description: &str, completed: bool) -> Goal {
        let goal = Goal {
            id: Uuid::new_v4(),
            created_at: self.next_created_at(),
            user_id: owner,
            description: description.to_string(),
            completed,
        };
        self.rows.lock().unwrap().push(goal.clone());
        goal
    }

    /// Make the next store call fail with `error` instead of running.
    pub fn fail_next(&self, error: StoreError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    /// Make the next store call stall for `delay` before running.
    pub fn delay_next(&self, delay: Duration) {
        *self.delay_next.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn row(&self, id: Uuid) -> Option<Goal> {
        self.rows.lock().unwrap().iter().find(|g| g.id == id).cloned()
    }

    fn next_created_at(&self) -> DateTime<Utc> {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        DateTime::from_timestamp(1_700_000_000 + tick, 0).expect("valid timestamp")
    }

    fn take_failure(&self) -> Option<StoreError> {
        self.fail_next.lock().unwrap().take()
    }

    async fn pause(&self) {
        let delay = self.delay_next.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn select_owned(&self, owner: Uuid) -> Result<Vec<Goal>, StoreError> {
        self.calls.lock().unwrap().selects += 1;
        self.pause().await;
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let mut rows: Vec<Goal> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, draft: GoalDraft) -> Result<Goal, StoreError> {
        self.calls.lock().unwrap().inserts += 1;
        self.pause().await;
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let goal = Goal {
            id: Uuid::new_v4(),
            created_at: self.next_created_at(),
            user_id: draft.user_id,
            description: draft.description,
            completed: draft.completed,
        };
        self.rows.lock().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn set_completed(
        &self,
        id: Uuid,
        owner: Uuid,
        completed: bool,
    ) -> Result<Goal, StoreError> {
        self.calls.lock().unwrap().updates += 1;
        self.pause().await;
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|g| g.id == id && g.user_id == owner) {
            Some(goal) => {
                goal.completed = completed;
                Ok(goal.clone())
            }
            None => Err(StoreError::NotFound(format!(
                "goal {} not found for this account",
                id
            ))),
        }
    }

    async fn remove(&self, id: Uuid, owner: Uuid) -> Result<(), StoreError> {
        self.calls.lock().unwrap().deletes += 1;
        self.pause().await;
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|g| !(g.id == id && g.user_id == owner));
        if rows.len() == before {
            return Err(StoreError::NotFound(format!(
                "goal {} not found for this account",
                id
            )));
        }
        Ok(())
    }
}

pub fn identity() -> Identity {
    Identity {
        id: Uuid::new_v4(),
        email: format!("user-{}@example.com", Uuid::new_v4().simple()),
    }
}

pub fn rejected(message: &str) -> StoreError {
    StoreError::Rejected {
        status: 500,
        message: message.to_string(),
    }
}
