//! Domain types for the todo widget.
//!
//! A todo list is an ordered sequence of short text items. Items are appended
//! at the end, edited or toggled in place and removed individually or all at
//! once. Insertion order is display order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_widget_macros::Action;

/// Identifier of a todo item
///
/// Derived from the creation time in milliseconds since the Unix epoch.
/// Two items created in the same millisecond share an id; nothing reconciles
/// that, lookups simply act on the first match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Creates a `TodoId` from a raw value
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Creates the id for an item created at `at`
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier (best effort)
    pub id: TodoId,
    /// Text shown in the list
    pub title: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl Todo {
    /// Creates a new, not yet completed todo item
    #[must_use]
    pub const fn new(id: TodoId, title: String) -> Self {
        Self {
            id,
            title,
            completed: false,
        }
    }
}

/// State of the todo list
///
/// Owned by a single store for the lifetime of the page session; nothing else
/// holds references into it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    todos: Vec<Todo>,
}

impl TodoState {
    /// Creates a new empty todo list
    #[must_use]
    pub const fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// Appends a todo with the trimmed `title`
    ///
    /// Returns `None` and leaves the list untouched if the trimmed title is empty.
    pub fn add(&mut self, id: TodoId, title: &str) -> Option<TodoId> {
        self.add_with(title, || id)
    }

    /// Appends a todo with the trimmed `title` and an id from `next_id`
    ///
    /// `next_id` is only called once the title has been accepted.
    pub fn add_with<F>(&mut self, title: &str, next_id: F) -> Option<TodoId>
    where
        F: FnOnce() -> TodoId,
    {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let id = next_id();
        self.todos.push(Todo::new(id, title.to_string()));
        Some(id)
    }

    /// Removes the todo with `id`
    ///
    /// Returns the number of removed items: 0 when the id is unknown, more
    /// than 1 only if several items collided on the same id.
    pub fn remove_by_id(&mut self, id: TodoId) -> usize {
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        before - self.todos.len()
    }

    /// Removes every todo
    pub fn remove_all(&mut self) {
        self.todos.clear();
    }

    /// Returns the first todo with `id`
    #[must_use]
    pub fn find_by_id(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Returns the first todo with `id` for mutation
    pub fn find_by_id_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    /// Replaces the title of the todo with `id`
    ///
    /// Empty or whitespace-only text is rejected. Accepted text is stored as
    /// given. Returns true if a title changed.
    pub fn set_title(&mut self, id: TodoId, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }

        match self.find_by_id_mut(id) {
            Some(todo) => {
                title.clone_into(&mut todo.title);
                true
            }
            None => false,
        }
    }

    /// Flips the completed flag of the todo with `id`
    ///
    /// Returns the new value, or `None` if the id is unknown.
    pub fn toggle_completed(&mut self, id: TodoId) -> Option<bool> {
        let todo = self.find_by_id_mut(id)?;
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    /// Returns the number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Returns true if the list has no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    /// Iterates over the todos in display order
    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.todos.iter()
    }

    /// Returns the todos in display order
    #[must_use]
    pub fn as_slice(&self) -> &[Todo] {
        &self.todos
    }
}

impl<'a> IntoIterator for &'a TodoState {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Actions that change the todo list
///
/// Each corresponds to one user interaction. Variants tagged `#[resizes]` can
/// change the number of items, so the remove-all control's visibility has to
/// be re-evaluated after them.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Append a new todo (rejected if the trimmed title is empty)
    #[resizes]
    AddTodo {
        /// Title as typed by the user
        title: String,
    },

    /// Remove one todo
    #[resizes]
    RemoveTodo {
        /// Todo to remove
        id: TodoId,
    },

    /// Remove every todo
    #[resizes]
    RemoveAll,

    /// Replace a todo's title (rejected if empty)
    EditTitle {
        /// Todo to edit
        id: TodoId,
        /// Replacement text
        title: String,
    },

    /// Flip a todo's completed flag
    ToggleCompleted {
        /// Todo to toggle
        id: TodoId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn state_with(titles: &[&str]) -> TodoState {
        let mut state = TodoState::new();
        for (raw, title) in (1..).zip(titles) {
            state.add(TodoId::new(raw), title);
        }
        state
    }

    #[test]
    fn todo_id_from_timestamp_uses_millis() {
        let at = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(1_700_000_000_123);
        assert_eq!(TodoId::from_timestamp(at).get(), 1_700_000_000_123);
        assert_eq!(format!("{}", TodoId::new(42)), "42");
    }

    #[test]
    fn add_trims_and_appends() {
        let mut state = state_with(&["first"]);
        assert_eq!(state.add(TodoId::new(9), "  second  "), Some(TodoId::new(9)));

        let titles: Vec<_> = state.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert!(!state.as_slice()[1].completed);
    }

    #[test]
    fn add_with_only_draws_an_id_for_accepted_titles() {
        let mut state = TodoState::new();
        let mut drawn = 0;

        assert_eq!(
            state.add_with("   ", || {
                drawn += 1;
                TodoId::new(1)
            }),
            None
        );
        assert_eq!(drawn, 0);

        assert_eq!(
            state.add_with(" milk ", || {
                drawn += 1;
                TodoId::new(2)
            }),
            Some(TodoId::new(2))
        );
        assert_eq!(drawn, 1);
        assert_eq!(state.as_slice()[0].title, "milk");
    }

    #[test]
    fn add_rejects_blank_titles() {
        let mut state = TodoState::new();
        assert_eq!(state.add(TodoId::new(1), ""), None);
        assert_eq!(state.add(TodoId::new(2), " \t\n "), None);
        assert!(state.is_empty());
    }

    #[test]
    fn remove_by_id_is_noop_for_unknown_id() {
        let mut state = state_with(&["a", "b"]);
        assert_eq!(state.remove_by_id(TodoId::new(99)), 0);
        assert_eq!(state.len(), 2);

        assert_eq!(state.remove_by_id(TodoId::new(1)), 1);
        assert_eq!(state.as_slice()[0].title, "b");
    }

    #[test]
    fn colliding_ids_are_removed_together() {
        let mut state = TodoState::new();
        state.add(TodoId::new(5), "one");
        state.add(TodoId::new(5), "two");
        state.add(TodoId::new(6), "three");

        assert_eq!(state.find_by_id(TodoId::new(5)).map(|t| t.title.as_str()), Some("one"));
        assert_eq!(state.remove_by_id(TodoId::new(5)), 2);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn set_title_rejects_blank_text() {
        let mut state = state_with(&["a", "b"]);
        assert!(!state.set_title(TodoId::new(1), ""));
        assert!(!state.set_title(TodoId::new(1), "   "));
        assert!(!state.set_title(TodoId::new(99), "new"));
        assert_eq!(state.as_slice()[0].title, "a");

        assert!(state.set_title(TodoId::new(1), "renamed"));
        assert_eq!(state.as_slice()[0].title, "renamed");
        assert_eq!(state.as_slice()[1].title, "b");
    }

    #[test]
    fn toggle_completed_is_an_involution() {
        let mut state = state_with(&["a"]);
        assert_eq!(state.toggle_completed(TodoId::new(1)), Some(true));
        assert_eq!(state.completed_count(), 1);
        assert_eq!(state.toggle_completed(TodoId::new(1)), Some(false));
        assert_eq!(state.completed_count(), 0);
        assert_eq!(state.toggle_completed(TodoId::new(2)), None);
    }

    #[test]
    fn remove_all_empties_the_list() {
        let mut state = state_with(&["a", "b", "c"]);
        state.remove_all();
        assert!(state.is_empty());
        state.remove_all();
        assert!(state.is_empty());
    }

    #[test]
    fn todo_action_resizes() {
        assert!(TodoAction::AddTodo { title: "a".to_string() }.resizes_store());
        assert!(TodoAction::RemoveTodo { id: TodoId::new(1) }.resizes_store());
        assert!(TodoAction::RemoveAll.resizes_store());
        assert!(!TodoAction::ToggleCompleted { id: TodoId::new(1) }.resizes_store());
        assert!(
            !TodoAction::EditTitle {
                id: TodoId::new(1),
                title: "b".to_string()
            }
            .resizes_store()
        );
        assert_eq!(TodoAction::RemoveAll.action_name(), "RemoveAll");
    }

    #[test]
    fn state_serializes_as_list() {
        let state = state_with(&["milk"]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"todos":[{"id":1,"title":"milk","completed":false}]}"#);
    }
}
