//! List state and its transitions.
//!
//! # Design
//! Every user action that talks to the table is split in two: a `begin_*`
//! step applied when the user acts, and a `finish_*` step applied when the
//! network result arrives. Nothing here performs I/O, so the optimistic
//! behaviour can be tested with plain values.
//!
//! Create and delete are optimistic. A failed create keeps its placeholder;
//! a failed delete restores the whole list as it was before the delete.
//! Edits are applied only once the server confirms them.

use todo_core::{ApiError, Todo};
use tracing::error;

/// An insert whose placeholder is on screen but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAdd {
    pub temp_id: i64,
    pub task: String,
}

/// A delete already applied locally, with the list as it was before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: i64,
    pub snapshot: Vec<Todo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoState {
    task: String,
    todos: Vec<Todo>,
    loading: bool,
    saving: bool,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    /// Initial state: nothing listed yet and the first fetch outstanding.
    pub fn new() -> Self {
        Self {
            task: String::new(),
            todos: Vec::new(),
            loading: true,
            saving: false,
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    /// Row as displayed, counting from 1.
    pub fn todo_at(&self, row: usize) -> Option<&Todo> {
        row.checked_sub(1).and_then(|index| self.todos.get(index))
    }

    pub fn set_task(&mut self, text: impl Into<String>) {
        self.task = text.into();
    }

    /// Apply the result of the initial fetch. `loading` clears either way.
    pub fn finish_load(&mut self, result: Result<Vec<Todo>, ApiError>) {
        match result {
            Ok(todos) => self.todos = todos,
            Err(err) => error!(error = %err, "Error fetching todos"),
        }
        self.loading = false;
    }

    /// Start an insert of the current input text.
    ///
    /// Returns `None` when the input is blank or another insert is still
    /// saving. Otherwise a placeholder identified by `now_ms` is put at the
    /// top of the list and the input is cleared.
    pub fn begin_add(&mut self, now_ms: i64) -> Option<PendingAdd> {
        if self.saving || self.task.trim().is_empty() {
            return None;
        }

        // Two placeholders must never share an id, or the first confirmation
        // would replace both.
        let mut temp_id = now_ms;
        while self.todos.iter().any(|todo| todo.id == temp_id) {
            temp_id += 1;
        }

        let task = std::mem::take(&mut self.task);
        self.saving = true;
        self.todos.insert(0, Todo::placeholder(temp_id, task.clone()));
        Some(PendingAdd { temp_id, task })
    }

    pub fn finish_add(&mut self, pending: PendingAdd, result: Result<Todo, ApiError>) {
        match result {
            Ok(confirmed) => {
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == pending.temp_id) {
                    *slot = confirmed;
                }
            }
            // The placeholder stays; there is no rollback for inserts.
            Err(err) => error!(error = %err, task = %pending.task, "Error adding todo"),
        }
        self.saving = false;
    }

    /// Replace the edited row with the server's version, or leave the list
    /// untouched on failure.
    pub fn finish_edit(&mut self, id: i64, result: Result<Todo, ApiError>) {
        match result {
            Ok(updated) => {
                for todo in self.todos.iter_mut().filter(|t| t.id == id) {
                    *todo = updated.clone();
                }
            }
            Err(err) => error!(error = %err, id, "Error editing todo"),
        }
    }

    /// Remove the row immediately, remembering the list for rollback.
    pub fn begin_delete(&mut self, id: i64) -> PendingDelete {
        let snapshot = self.todos.clone();
        self.todos.retain(|todo| todo.id != id);
        PendingDelete { id, snapshot }
    }

    pub fn finish_delete(&mut self, pending: PendingDelete, result: Result<(), ApiError>) {
        if let Err(err) = result {
            error!(error = %err, id = pending.id, "Error deleting todo");
            self.todos = pending.snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(secs, 0)
    }

    fn row(id: i64, task: &str) -> Todo {
        Todo {
            id,
            task: task.to_string(),
            is_complete: false,
            created_at: at(1_700_000_000 + id),
        }
    }

    /// State after a successful initial load of `rows`.
    fn loaded(rows: Vec<Todo>) -> TodoState {
        let mut state = TodoState::new();
        state.finish_load(Ok(rows));
        state
    }

    fn remote_error() -> ApiError {
        ApiError::new("connection reset")
    }

    #[test]
    fn starts_loading_with_empty_list() {
        let state = TodoState::new();
        assert!(state.loading());
        assert!(!state.saving());
        assert!(state.todos().is_empty());
    }

    #[test]
    fn load_success_replaces_list() {
        let state = loaded(vec![row(2, "B"), row(1, "A")]);
        assert!(!state.loading());
        assert_eq!(state.todos(), &[row(2, "B"), row(1, "A")]);
    }

    #[test]
    fn load_failure_leaves_list_empty_and_stops_loading() {
        let mut state = TodoState::new();
        state.finish_load(Err(remote_error()));
        assert!(!state.loading());
        assert!(state.todos().is_empty());
    }

    #[test]
    fn add_buy_milk_shows_placeholder_then_confirmed_row() {
        let mut state = loaded(Vec::new());
        state.set_task("Buy milk");

        let pending = state.begin_add(1_717_171_717_000).unwrap();
        assert_eq!(state.task(), "");
        assert!(state.saving());
        assert_eq!(state.todos(), &[Todo::placeholder(1_717_171_717_000, "Buy milk")]);

        let confirmed = Todo {
            id: 1,
            task: "Buy milk".to_string(),
            is_complete: false,
            created_at: at(1_717_171_717),
        };
        state.finish_add(pending, Ok(confirmed.clone()));
        assert!(!state.saving());
        assert_eq!(state.todos(), &[confirmed]);
        assert_ne!(state.todos()[0].id, 1_717_171_717_000);
    }

    #[test]
    fn add_prepends_exactly_one_row() {
        let mut state = loaded(vec![row(1, "A")]);
        state.set_task("B");
        let pending = state.begin_add(99).unwrap();
        assert_eq!(state.todos().len(), 2);
        assert_eq!(state.todos()[0].task, "B");

        state.finish_add(pending, Ok(row(2, "B")));
        assert_eq!(state.todos(), &[row(2, "B"), row(1, "A")]);
    }

    #[test]
    fn blank_input_is_ignored() {
        for input in ["", "   ", "\t\n"] {
            let mut state = loaded(vec![row(1, "A")]);
            state.set_task(input);
            let before = state.clone();
            assert!(state.begin_add(5).is_none(), "{input:?}");
            assert_eq!(state, before);
        }
    }

    #[test]
    fn add_is_disabled_while_saving() {
        let mut state = loaded(Vec::new());
        state.set_task("first");
        state.begin_add(10).unwrap();

        state.set_task("second");
        assert!(state.begin_add(11).is_none());
        assert_eq!(state.task(), "second");
        assert_eq!(state.todos().len(), 1);
    }

    #[test]
    fn failed_add_keeps_placeholder() {
        let mut state = loaded(Vec::new());
        state.set_task("Offline");
        let pending = state.begin_add(42).unwrap();

        state.finish_add(pending, Err(remote_error()));
        assert!(!state.saving());
        assert_eq!(state.todos(), &[Todo::placeholder(42, "Offline")]);
    }

    #[test]
    fn placeholder_ids_never_collide() {
        let mut state = loaded(Vec::new());
        state.set_task("one");
        let first = state.begin_add(7).unwrap();
        state.finish_add(first, Err(remote_error()));

        state.set_task("two");
        let second = state.begin_add(7).unwrap();
        assert_eq!(second.temp_id, 8);
    }

    #[test]
    fn add_confirmation_after_placeholder_deleted_is_dropped() {
        let mut state = loaded(Vec::new());
        state.set_task("gone");
        let pending = state.begin_add(50).unwrap();
        let delete = state.begin_delete(50);
        state.finish_delete(delete, Ok(()));

        state.finish_add(pending, Ok(row(1, "gone")));
        assert!(state.todos().is_empty());
    }

    #[test]
    fn edit_success_replaces_matching_row() {
        let mut state = loaded(vec![row(1, "A"), row(2, "B")]);
        let mut renamed = row(2, "B2");
        renamed.is_complete = true;
        state.finish_edit(2, Ok(renamed.clone()));
        assert_eq!(state.todos(), &[row(1, "A"), renamed]);
    }

    #[test]
    fn edit_failure_changes_nothing() {
        let mut state = loaded(vec![row(1, "A"), row(2, "B")]);
        let before = state.clone();
        state.finish_edit(2, Err(remote_error()));
        assert_eq!(state, before);
    }

    #[test]
    fn delete_success_removes_only_that_row() {
        let mut state = loaded(vec![row(1, "A"), row(2, "B")]);
        let pending = state.begin_delete(2);
        assert_eq!(state.todos(), &[row(1, "A")]);

        state.finish_delete(pending, Ok(()));
        assert_eq!(state.todos(), &[row(1, "A")]);
    }

    #[test]
    fn delete_failure_restores_original_order() {
        let mut state = loaded(vec![row(1, "A"), row(2, "B")]);
        let pending = state.begin_delete(2);
        state.finish_delete(pending, Err(remote_error()));
        assert_eq!(state.todos(), &[row(1, "A"), row(2, "B")]);
    }

    #[test]
    fn delete_rollback_is_a_full_snapshot_restore() {
        let mut state = loaded(vec![row(1, "A"), row(2, "B"), row(3, "C")]);
        let first = state.begin_delete(1);
        let second = state.begin_delete(3);
        state.finish_delete(second, Ok(()));

        // Rolling back the first delete brings back row 3 too.
        state.finish_delete(first, Err(remote_error()));
        assert_eq!(state.todos(), &[row(1, "A"), row(2, "B"), row(3, "C")]);
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let state = loaded(vec![row(5, "A"), row(6, "B")]);
        assert!(state.todo_at(0).is_none());
        assert_eq!(state.todo_at(1).map(|t| t.id), Some(5));
        assert_eq!(state.todo_at(2).map(|t| t.id), Some(6));
        assert!(state.todo_at(3).is_none());
    }
}
