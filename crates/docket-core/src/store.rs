use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::ValidationError;
use crate::task::{Priority, Task, TaskDraft, TaskId};

/// Owns every live task. The collection is only reachable read-only from
/// outside; `add`, `toggle_completion` and `remove` are the sole mutations.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add(&mut self, draft: TaskDraft) -> Result<&Task, ValidationError> {
        self.add_at(draft, Utc::now())
    }

    #[tracing::instrument(skip(self, draft, now))]
    pub fn add_at(
        &mut self,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<&Task, ValidationError> {
        let Some(raw) = draft.text else {
            debug!("rejecting task without string text");
            return Err(ValidationError::MissingText);
        };

        let text = raw.trim();
        if text.is_empty() {
            debug!(raw_len = raw.len(), "rejecting blank task text");
            return Err(ValidationError::EmptyText);
        }

        let priority = Priority::normalize(draft.priority.as_deref());
        if let Some(requested) = draft.priority.as_deref()
            && Priority::from_key(requested).is_none()
        {
            debug!(requested, "unknown priority, using medium");
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let idx = self.tasks.len();
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            priority,
            completed: draft.completed,
            created_at: now,
        });

        info!(%id, %priority, completed = draft.completed, "added task");
        Ok(&self.tasks[idx])
    }

    /// Flips completion and returns the new state, or `None` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub fn toggle_completion(&mut self, id: TaskId) -> Option<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("toggle ignored, no such task");
            return None;
        };

        task.completed = !task.completed;
        info!(completed = task.completed, "toggled task");
        Some(task.completed)
    }

    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let Some(idx) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("remove ignored, no such task");
            return None;
        };

        let removed = self.tasks.remove(idx);
        info!(remaining = self.tasks.len(), "removed task");
        Some(removed)
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn add_trims_text_and_appends() {
        let mut store = TaskStore::new();
        let task = store
            .add(TaskDraft::new("  Buy milk  "))
            .expect("valid task");
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);

        store
            .add(TaskDraft::new("Walk dog").completed(true))
            .expect("valid task");
        let texts: Vec<&str> = store.all().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Buy milk", "Walk dog"]);
        assert!(store.all()[1].completed);
    }

    #[test]
    fn add_rejects_missing_and_blank_text() {
        let mut store = TaskStore::new();

        assert_eq!(
            store.add(TaskDraft::default()).err(),
            Some(ValidationError::MissingText)
        );
        assert_eq!(
            store.add(TaskDraft::new("")).err(),
            Some(ValidationError::EmptyText)
        );
        assert_eq!(
            store.add(TaskDraft::new("   \t")).err(),
            Some(ValidationError::EmptyText)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn add_normalizes_priority() {
        let mut store = TaskStore::new();
        let urgent = store
            .add(TaskDraft::new("x").with_priority("urgent"))
            .expect("valid")
            .priority;
        let high = store
            .add(TaskDraft::new("x").with_priority("high"))
            .expect("valid")
            .priority;
        assert_eq!(urgent, Priority::Medium);
        assert_eq!(high, Priority::High);
    }

    #[test]
    fn ids_are_unique_even_within_one_clock_tick() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let mut store = TaskStore::new();
        let a = store.add_at(TaskDraft::new("a"), now).expect("valid").id;
        let b = store.add_at(TaskDraft::new("b"), now).expect("valid").id;
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut store = TaskStore::new();
        let a = store.add(TaskDraft::new("a")).expect("valid").id;
        store.remove(a);
        let b = store.add(TaskDraft::new("b")).expect("valid").id;
        assert!(b > a);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut store = TaskStore::new();
        let id = store.add(TaskDraft::new("a")).expect("valid").id;

        assert_eq!(store.toggle_completion(id), Some(true));
        assert_eq!(store.toggle_completion(id), Some(false));
        assert_eq!(store.get(id).map(|t| t.completed), Some(false));
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut store = TaskStore::new();
        store.add(TaskDraft::new("a")).expect("valid");

        assert_eq!(store.toggle_completion(TaskId(99)), None);
        assert_eq!(store.remove(TaskId(99)), None);
        assert_eq!(store.len(), 1);
        assert!(!store.all()[0].completed);
    }

    #[test]
    fn remove_is_permanent_and_keeps_order() {
        let mut store = TaskStore::new();
        let a = store.add(TaskDraft::new("a")).expect("valid").id;
        let b = store.add(TaskDraft::new("b")).expect("valid").id;
        let c = store.add(TaskDraft::new("c")).expect("valid").id;

        let removed = store.remove(b).expect("present");
        assert_eq!(removed.text, "b");
        assert_eq!(store.toggle_completion(b), None);
        assert!(store.get(b).is_none());

        let ids: Vec<TaskId> = store.all().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, c]);
    }
}
