//! Reducer logic for the todo list.
//!
//! Every change to the list goes through [`TodoReducer`]. Invalid requests
//! (blank titles, unknown ids) are dropped silently: they are logged at
//! `debug` and leave the state untouched.

use crate::types::{TodoAction, TodoId, TodoState};
use std::sync::Arc;
use todo_widget_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock used to derive the ids of new todos
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Id for a todo created right now
    fn next_id(&self) -> TodoId {
        TodoId::from_timestamp(self.clock.now())
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::AddTodo { title } => match state.add_with(&title, || env.next_id()) {
                Some(id) => {
                    tracing::info!(%id, count = state.len(), "Todo added");
                }
                None => {
                    tracing::debug!("Ignored todo with an empty title");
                }
            },

            TodoAction::RemoveTodo { id } => {
                let removed = state.remove_by_id(id);
                if removed == 0 {
                    tracing::debug!(%id, "Ignored removal of unknown todo");
                } else {
                    tracing::debug!(%id, removed, count = state.len(), "Todo removed");
                }
            }

            TodoAction::RemoveAll => {
                let removed = state.len();
                state.remove_all();
                tracing::debug!(removed, "All todos removed");
            }

            TodoAction::EditTitle { id, title } => {
                if !state.set_title(id, &title) {
                    tracing::debug!(%id, "Ignored title edit");
                }
            }

            TodoAction::ToggleCompleted { id } => match state.toggle_completed(id) {
                Some(completed) => tracing::debug!(%id, completed, "Todo toggled"),
                None => tracing::debug!(%id, "Ignored toggle of unknown todo"),
            },
        }

        // Pure state machine - no side effects
        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Todo;
    use todo_widget_testing::{ReducerTest, SteppingClock, assertions, test_clock};

    fn create_test_env() -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(SteppingClock::starting_at_millis(1_000)))
    }

    fn state_with(titles: &[&str]) -> TodoState {
        let mut state = TodoState::new();
        for (raw, title) in (1..).zip(titles) {
            state.add(TodoId::new(raw), title);
        }
        state
    }

    fn titles(state: &TodoState) -> Vec<String> {
        state.iter().map(|todo| todo.title.clone()).collect()
    }

    #[test]
    fn test_add_todo_success() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::AddTodo {
                title: "Buy milk".to_string(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.as_slice(),
                    &[Todo::new(TodoId::new(1_000), "Buy milk".to_string())]
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_add_todo_keeps_submission_order() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::AddTodo {
                title: "test".to_string(),
            })
            .when_action(TodoAction::AddTodo {
                title: "   ".to_string(),
            })
            .when_action(TodoAction::AddTodo {
                title: " test2 ".to_string(),
            })
            .then_state(|state| {
                assert_eq!(titles(state), vec!["test", "test2"]);
                let ids: Vec<_> = state.iter().map(|todo| todo.id.get()).collect();
                assert_eq!(ids, vec![1_000, 1_001]);
            })
            .run();
    }

    #[test]
    fn test_add_todo_empty_title() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::AddTodo {
                title: "   ".to_string(), // Empty after trim
            })
            .then_state(|state| {
                assert!(state.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_add_with_fixed_clock_collides() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::new(Arc::new(test_clock())))
            .given_state(TodoState::new())
            .when_action(TodoAction::AddTodo {
                title: "one".to_string(),
            })
            .when_action(TodoAction::AddTodo {
                title: "two".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.len(), 2);
                assert_eq!(state.as_slice()[0].id, state.as_slice()[1].id);
            })
            .run();
    }

    #[test]
    fn test_remove_todo_success() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a", "b", "c"]))
            .when_action(TodoAction::RemoveTodo { id: TodoId::new(2) })
            .then_state(|state| {
                assert_eq!(titles(state), vec!["a", "c"]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_remove_todo_not_found() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a", "b"]))
            .when_action(TodoAction::RemoveTodo { id: TodoId::new(42) })
            .then_state(|state| {
                assert_eq!(*state, state_with(&["a", "b"]));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_remove_all_is_idempotent() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a", "b"]))
            .when_action(TodoAction::RemoveAll)
            .when_action(TodoAction::RemoveAll)
            .then_state(|state| {
                assert!(state.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_edit_title_updates_only_that_todo() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a", "b"]))
            .when_action(TodoAction::EditTitle {
                id: TodoId::new(2),
                title: "bread".to_string(),
            })
            .then_state(|state| {
                assert_eq!(titles(state), vec!["a", "bread"]);
            })
            .run();
    }

    #[test]
    fn test_edit_title_blank_is_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a"]))
            .when_action(TodoAction::EditTitle {
                id: TodoId::new(1),
                title: "  ".to_string(),
            })
            .when_action(TodoAction::EditTitle {
                id: TodoId::new(1),
                title: String::new(),
            })
            .then_state(|state| {
                assert_eq!(titles(state), vec!["a"]);
            })
            .run();
    }

    #[test]
    fn test_toggle_completed_twice_restores() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a", "b"]))
            .when_action(TodoAction::ToggleCompleted { id: TodoId::new(1) })
            .then_state(|state| {
                assert!(state.as_slice()[0].completed);
                assert!(!state.as_slice()[1].completed);
            })
            .run();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a", "b"]))
            .when_action(TodoAction::ToggleCompleted { id: TodoId::new(1) })
            .when_action(TodoAction::ToggleCompleted { id: TodoId::new(1) })
            .then_state(|state| {
                assert_eq!(state.completed_count(), 0);
            })
            .run();
    }

    #[test]
    fn test_toggle_unknown_is_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["a"]))
            .when_action(TodoAction::ToggleCompleted { id: TodoId::new(7) })
            .then_state(|state| {
                assert_eq!(state.completed_count(), 0);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
