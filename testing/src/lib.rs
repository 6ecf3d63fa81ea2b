//! # Todo Widget Testing
//!
//! Testing utilities and helpers for the todo widget.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits (clocks, dialogs)
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todo_widget_testing::{ScriptedDialogs, SteppingClock};
//!
//! let dialogs = ScriptedDialogs::new().confirm_with(true);
//! let clock = SteppingClock::starting_at_millis(1_000);
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use todo_widget_core::environment::{Clock, Dialogs};


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Dialogs, Mutex, TimeDelta, Utc, VecDeque};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible. Every todo
    /// created with it gets the same id, which is how the id-collision edge
    /// case is exercised.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_widget_testing::mocks::FixedClock;
    /// use todo_widget_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(20_089))
    }

    /// Clock that advances by one millisecond on every reading
    ///
    /// Gives distinct, increasing todo ids without depending on wall time.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: TimeDelta,
    }

    impl SteppingClock {
        /// Create a clock whose first reading is `start`
        #[must_use]
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                next: Mutex::new(start),
                step: TimeDelta::milliseconds(1),
            }
        }

        /// Create a clock whose first reading is `millis` after the Unix epoch
        #[must_use]
        pub fn starting_at_millis(millis: i64) -> Self {
            Self::new(DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(millis))
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// A dialog the widget opened, as seen by [`ScriptedDialogs`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DialogCall {
        /// `prompt(message, default)`
        Prompt {
            /// Message shown to the user
            message: String,
            /// Text the input was seeded with
            default: String,
        },
        /// `confirm(message)`
        Confirm {
            /// Message shown to the user
            message: String,
        },
    }

    /// Dialogs that answer from a script and record every call
    ///
    /// Prompt answers are consumed in order; once they run out every prompt
    /// is cancelled. Confirm answers are consumed the same way and fall back
    /// to the default set by [`ScriptedDialogs::confirm_with`] (`false`
    /// unless changed).
    #[derive(Debug, Default)]
    pub struct ScriptedDialogs {
        prompt_answers: Mutex<VecDeque<Option<String>>>,
        confirm_answers: Mutex<VecDeque<bool>>,
        confirm_default: bool,
        calls: Mutex<Vec<DialogCall>>,
    }

    impl ScriptedDialogs {
        /// Create dialogs that cancel every prompt and reject every confirm
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer every confirm without a scripted answer with `answer`
        ///
        /// Mirrors a native dialog handler that always accepts or always rejects.
        #[must_use]
        pub fn confirm_with(mut self, answer: bool) -> Self {
            self.confirm_default = answer;
            self
        }

        /// Queue the answer to the next prompt (`None` cancels it)
        #[must_use]
        pub fn then_prompt(self, answer: Option<&str>) -> Self {
            lock(&self.prompt_answers).push_back(answer.map(str::to_string));
            self
        }

        /// Queue the answer to the next confirm
        #[must_use]
        pub fn then_confirm(self, answer: bool) -> Self {
            lock(&self.confirm_answers).push_back(answer);
            self
        }

        /// Every dialog opened so far, in order
        #[must_use]
        pub fn calls(&self) -> Vec<DialogCall> {
            lock(&self.calls).clone()
        }
    }

    impl Dialogs for ScriptedDialogs {
        fn prompt(&self, message: &str, default: &str) -> Option<String> {
            lock(&self.calls).push(DialogCall::Prompt {
                message: message.to_string(),
                default: default.to_string(),
            });
            lock(&self.prompt_answers).pop_front().flatten()
        }

        fn confirm(&self, message: &str) -> bool {
            lock(&self.calls).push(DialogCall::Confirm {
                message: message.to_string(),
            });
            lock(&self.confirm_answers)
                .pop_front()
                .unwrap_or(self.confirm_default)
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, DialogCall, FixedClock, ScriptedDialogs, SteppingClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_stepping_clock_advances_one_milli() {
        let clock = SteppingClock::starting_at_millis(1_000);
        assert_eq!(clock.now().timestamp_millis(), 1_000);
        assert_eq!(clock.now().timestamp_millis(), 1_001);
        assert_eq!(clock.now().timestamp_millis(), 1_002);
    }

    #[test]
    fn test_scripted_prompts_are_consumed_in_order() {
        let dialogs = ScriptedDialogs::new()
            .then_prompt(Some("first"))
            .then_prompt(None);

        assert_eq!(dialogs.prompt("edit todo", "a"), Some("first".to_string()));
        assert_eq!(dialogs.prompt("edit todo", "b"), None);
        // Script exhausted: cancelled
        assert_eq!(dialogs.prompt("edit todo", "c"), None);

        assert_eq!(
            dialogs.calls()[0],
            DialogCall::Prompt {
                message: "edit todo".to_string(),
                default: "a".to_string(),
            }
        );
        assert_eq!(dialogs.calls().len(), 3);
    }

    #[test]
    fn test_confirm_falls_back_to_default() {
        let dialogs = ScriptedDialogs::new().confirm_with(true).then_confirm(false);

        assert!(!dialogs.confirm("sure?"));
        assert!(dialogs.confirm("sure?"));
        assert!(!ScriptedDialogs::new().confirm("sure?"));
    }
}
