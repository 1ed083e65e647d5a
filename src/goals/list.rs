use std::collections::HashSet;

use uuid::Uuid;

use crate::types::Goal;

/// Ordered collection of goals keyed by id.
///
/// Display order is insertion order: `replace_all` seeds it with the
/// server-sorted result (newest first) and `prepend` keeps new goals at the
/// front, so the list never re-sorts. Ids are unique; a duplicate insert is
/// refused rather than shadowed.
#[derive(Debug, Clone, Default)]
pub struct GoalList {
    entries: Vec<Goal>,
    ids: HashSet<Uuid>,
}

impl GoalList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Goal> {
        self.entries.iter().find(|g| g.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.entries.iter()
    }

    /// Clone of the current entries, in display order.
    pub fn snapshot(&self) -> Vec<Goal> {
        self.entries.clone()
    }

    /// Replace the whole collection, keeping the incoming order. If the
    /// server ever hands back duplicate ids, the first occurrence wins.
    pub fn replace_all(&mut self, goals: Vec<Goal>) {
        self.entries.clear();
        self.ids.clear();
        for goal in goals {
            if self.ids.insert(goal.id) {
                self.entries.push(goal);
            }
        }
    }

    /// Insert at the front. Returns false (and leaves the list untouched)
    /// when the id is already present.
    pub fn prepend(&mut self, goal: Goal) -> bool {
        if !self.ids.insert(goal.id) {
            return false;
        }
        self.entries.insert(0, goal);
        true
    }

    /// Patch the completion flag in place. Returns false when the id is not
    /// in the collection.
    pub fn set_completed(&mut self, id: Uuid, completed: bool) -> bool {
        match self.entries.iter_mut().find(|g| g.id == id) {
            Some(goal) => {
                goal.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Remove by id. Returns false when the id is not in the collection.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        self.entries.retain(|g| g.id != id);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn goal(description: &str) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            user_id: Uuid::new_v4(),
            description: description.to_string(),
            completed: false,
        }
    }

    #[test]
    fn prepend_keeps_newest_first() {
        let mut list = GoalList::new();
        list.prepend(goal("first"));
        list.prepend(goal("second"));

        let order: Vec<_> = list.iter().map(|g| g.description.as_str()).collect();
        assert_eq!(order, ["second", "first"]);
    }

    #[test]
    fn duplicate_prepend_is_refused() {
        let mut list = GoalList::new();
        let g = goal("once");
        assert!(list.prepend(g.clone()));
        assert!(!list.prepend(g));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn replace_all_drops_duplicate_ids() {
        let mut list = GoalList::new();
        let g = goal("dup");
        let mut copy = g.clone();
        copy.description = "shadow".to_string();

        list.replace_all(vec![g.clone(), copy]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(g.id).map(|g| g.description.as_str()), Some("dup"));
    }

    #[test]
    fn set_completed_patches_only_the_match() {
        let mut list = GoalList::new();
        let a = goal("a");
        let b = goal("b");
        list.prepend(a.clone());
        list.prepend(b.clone());

        assert!(list.set_completed(a.id, true));
        assert!(list.get(a.id).map(|g| g.completed).unwrap_or(false));
        assert!(!list.get(b.id).map(|g| g.completed).unwrap_or(true));

        assert!(!list.set_completed(Uuid::new_v4(), true));
    }

    #[test]
    fn remove_by_id() {
        let mut list = GoalList::new();
        let a = goal("a");
        list.prepend(a.clone());

        assert!(!list.remove(Uuid::new_v4()));
        assert_eq!(list.len(), 1);

        assert!(list.remove(a.id));
        assert!(list.is_empty());
        assert!(!list.contains(a.id));
    }
}
