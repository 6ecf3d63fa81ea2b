//! # Todo Widget Core
//!
//! Core traits and types shared by every crate of the todo widget.
//!
//! The widget follows a unidirectional data flow:
//!
//! - **State**: the in-memory todo list owned by a single store
//! - **Action**: every input that may change that state
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of follow-up work, executed by the runtime
//! - **Environment**: injected dependencies (clock, blocking dialogs)
//!
//! ## Example
//!
//! ```
//! use todo_widget_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Debug, Default)]
//! struct Tally {
//!     total: u32,
//! }
//!
//! enum TallyAction {
//!     Bump,
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = Tally;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Tally,
//!         action: TallyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Bump => state.total += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = Tally::default();
//! let _ = TallyReducer.reduce(&mut state, TallyAction::Bump, &());
//! assert_eq!(state.total, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state transitions and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most reducers return no effects at all; the inline capacity of
        /// four covers every reducer in this workspace without allocating.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution); the runtime decides when to run them.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed by the reducer. They are returned from reducers
    /// and executed by the Store runtime, which feeds any produced action back
    /// into the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation that may produce a follow-up action
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns true if executing this effect can never produce an action
        #[must_use]
        pub const fn is_noop(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Everything the widget needs from the outside world is abstracted behind a
/// trait here and injected, so tests can substitute deterministic versions.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Todo ids are derived from this clock, so a fixed clock in tests makes
    /// ids predictable.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Blocking user dialogs
    ///
    /// Both calls suspend the caller until the user answers. While a dialog is
    /// open no other event is processed, so no state mutation can interleave.
    pub trait Dialogs: Send + Sync {
        /// Ask for a line of text, seeded with `default`
        ///
        /// Returns `None` when the user cancels the dialog.
        fn prompt(&self, message: &str, default: &str) -> Option<String>;

        /// Ask the user to confirm an action
        fn confirm(&self, message: &str) -> bool;
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn only_none_is_noop() {
        let none: Effect<u8> = Effect::None;
        assert!(none.is_noop());
        assert_eq!(format!("{none:?}"), "Effect::None");
    }

    #[test]
    fn future_effect_resolves_to_action() {
        let effect: Effect<u8> = Effect::future(async { Some(7) });
        assert!(!effect.is_noop());

        let Effect::Future(fut) = effect else {
            unreachable!("Effect::future always builds a Future variant");
        };
        assert_eq!(tokio_test::block_on(fut), Some(7));
    }

    #[test]
    fn debug_output_hides_future_body() {
        let effect: Effect<u8> = Effect::future(async { None });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }
}
