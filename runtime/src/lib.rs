//! # Todo Widget Runtime
//!
//! Runtime implementation for the todo widget.
//!
//! This crate provides the [`Store`] that owns the todo state, runs the reducer
//! and executes the effects it returns.
//!
//! ## Run to completion
//!
//! The widget lives on a single UI thread where each user event is handled to
//! completion before the next one is looked at. The Store mirrors that: when
//! [`Store::send`] returns, the reducer has run, every effect has finished and
//! every action fed back by an effect has been reduced as well. Nothing is
//! left running in the background.
//!
//! ## Example
//!
//! ```ignore
//! use todo_widget_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use todo_widget_core::{effect::Effect, reducer::Reducer};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Default capacity of the action broadcast channel
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// Store module - the runtime coordinator
pub mod store {
    use super::{Arc, AtomicBool, Effect, Ordering, Reducer, RwLock, StoreError};
    use futures::future::{BoxFuture, FutureExt};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, written only by the reducer)
    /// 2. Reducer (state transitions)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        /// Every dispatched action, initial or fed back, is published here.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel gets [`DEFAULT_BROADCAST_CAPACITY`](crate::DEFAULT_BROADCAST_CAPACITY)
        /// slots; use [`Store::with_broadcast_capacity`] for more.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(
                initial_state,
                reducer,
                environment,
                crate::DEFAULT_BROADCAST_CAPACITY,
            )
        }

        /// Create a new store with a custom action broadcast capacity
        ///
        /// Slow subscribers that fall more than `capacity` actions behind
        /// observe a lag instead of blocking the store. A capacity of zero is
        /// raised to one.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then executes the returned effects to completion.
        /// Actions produced by effects are reduced recursively before this
        /// method returns.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates to the caller.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.is_shutting_down() {
                tracing::warn!("Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            self.dispatch(action).await;
            Ok(())
        }

        /// Read the current state through a closure
        ///
        /// The closure runs under the read lock; keep it short and return
        /// owned data.
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to every action dispatched through this store
        ///
        /// The receiver sees the actions passed to [`Store::send`] as well as
        /// the actions fed back by effects, in dispatch order.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Stop accepting new actions
        ///
        /// Shutdown is shared with every clone of this store.
        pub fn shutdown(&self) {
            if !self.shutdown.swap(true, Ordering::SeqCst) {
                tracing::info!("Store shutdown initiated");
            }
        }

        /// Returns true once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::SeqCst)
        }

        /// Reduce one action and run its effects
        ///
        /// Boxed because effects feed actions back into this method.
        fn dispatch(&self, action: A) -> BoxFuture<'_, ()> {
            async move {
                // No subscribers is the common case, not an error
                let _ = self.action_broadcast.send(action.clone());

                let effects = {
                    let mut state = self.state.write().await;
                    self.reducer.reduce(&mut state, action, &self.environment)
                };
                metrics::counter!("store.actions.processed").increment(1);

                for effect in effects {
                    self.execute_effect(effect).await;
                }
            }
            .boxed()
        }

        /// Execute an effect description
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Awaited; a produced action is dispatched
        fn execute_effect(&self, effect: Effect<A>) -> BoxFuture<'_, ()> {
            async move {
                match effect {
                    Effect::None => {
                        tracing::trace!("Executing Effect::None (no-op)");
                        metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                    }
                    Effect::Future(fut) => {
                        tracing::trace!("Executing Effect::Future");
                        metrics::counter!("store.effects.executed", "type" => "future")
                            .increment(1);
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            self.dispatch(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    }
                }
            }
            .boxed()
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_widget_core::{smallvec, SmallVec};

    #[derive(Debug, Clone, Default)]
    struct TestState {
        log: Vec<&'static str>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestAction {
        Record(&'static str),
        /// Records "start" and schedules "echo" through a future
        Echo,
        /// Records "start" and returns effects producing "first" and "second"
        Chain,
    }

    #[derive(Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TestState,
            action: TestAction,
            _env: &(),
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            if let TestAction::Record(entry) = action {
                state.log.push(entry);
                return smallvec![Effect::None];
            }

            state.log.push("start");
            match action {
                TestAction::Echo => {
                    smallvec![Effect::future(async { Some(TestAction::Record("echo")) })]
                }
                TestAction::Chain => smallvec![
                    Effect::future(async { Some(TestAction::Record("first")) }),
                    Effect::future(async { None }),
                    Effect::future(async { Some(TestAction::Record("second")) }),
                ],
                TestAction::Record(_) => SmallVec::new(),
            }
        }
    }

    fn store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::new(TestState::default(), TestReducer, ())
    }

    #[tokio::test]
    async fn send_applies_reducer() {
        let store = store();
        store.send(TestAction::Record("a")).await.unwrap();
        store.send(TestAction::Record("b")).await.unwrap();

        let log = store.state(|s| s.log.clone()).await;
        assert_eq!(log, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn future_effect_is_reduced_before_send_returns() {
        let store = store();
        store.send(TestAction::Echo).await.unwrap();

        let log = store.state(|s| s.log.clone()).await;
        assert_eq!(log, vec!["start", "echo"]);
    }

    #[tokio::test]
    async fn effects_run_in_returned_order() {
        let store = store();
        store.send(TestAction::Chain).await.unwrap();

        let log = store.state(|s| s.log.clone()).await;
        assert_eq!(log, vec!["start", "first", "second"]);
    }

    #[tokio::test]
    async fn subscribers_see_initial_and_fed_back_actions() {
        let store = store();
        let mut actions = store.subscribe_actions();

        store.send(TestAction::Echo).await.unwrap();

        assert_eq!(actions.recv().await.unwrap(), TestAction::Echo);
        assert_eq!(actions.recv().await.unwrap(), TestAction::Record("echo"));
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = store();
        let clone = store.clone();
        store.shutdown();

        assert!(clone.is_shutting_down());
        assert_eq!(
            clone.send(TestAction::Record("late")).await,
            Err(StoreError::ShutdownInProgress)
        );
        assert!(store.state(|s| s.log.is_empty()).await);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = store();
        let clone = store.clone();

        clone.send(TestAction::Record("from clone")).await.unwrap();

        let log = store.state(|s| s.log.clone()).await;
        assert_eq!(log, vec!["from clone"]);
    }

    #[tokio::test]
    async fn zero_capacity_is_raised() {
        let store = Store::with_broadcast_capacity(TestState::default(), TestReducer, (), 0);
        let mut actions = store.subscribe_actions();

        store.send(TestAction::Record("x")).await.unwrap();
        assert_eq!(actions.recv().await.unwrap(), TestAction::Record("x"));
    }
}
