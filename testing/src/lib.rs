//! # Todo Store Testing
//!
//! Testing utilities and helpers for reducers and stores.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - proptest strategies for text inputs
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_testing::{ReducerTest, ScriptedIds};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(TodoEnvironment::new(Arc::new(ScriptedIds::new([7]))))
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::Add { text: "buy milk".into() })
//!     .then_state(|state| assert_eq!(state.len(), 1))
//!     .run();
//! ```


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};
    use todo_store_core::environment::{IdGenerator, SequentialIdGenerator};

    /// Id generator replaying a fixed script
    ///
    /// Hands out the scripted ids in order, then continues with a counter
    /// starting at 1. Duplicates in the script are replayed as-is, which
    /// makes collisions easy to provoke.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_store_testing::mocks::ScriptedIds;
    /// use todo_store_core::environment::IdGenerator;
    ///
    /// let ids = ScriptedIds::new([5, 5]);
    /// assert_eq!(ids.next_id(), 5);
    /// assert_eq!(ids.next_id(), 5);
    /// assert_eq!(ids.next_id(), 1);
    /// assert_eq!(ids.calls(), 3);
    /// ```
    #[derive(Debug)]
    pub struct ScriptedIds {
        script: Mutex<VecDeque<u64>>,
        fallback: SequentialIdGenerator,
        calls: AtomicUsize,
    }

    impl ScriptedIds {
        /// Create a generator that replays `script` first
        #[must_use]
        pub fn new(script: impl IntoIterator<Item = u64>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                fallback: SequentialIdGenerator::new(),
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of ids handed out so far
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl IdGenerator for ScriptedIds {
        fn next_id(&self) -> u64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let scripted = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            scripted.unwrap_or_else(|| self.fallback.next_id())
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber once per process
    ///
    /// Honours `RUST_LOG`, defaulting to `warn`. Later calls are ignored.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest
pub mod properties {
    use proptest::prelude::*;

    /// Characters treated as whitespace by text validation
    ///
    /// The full set matched by `\s`: ASCII blanks, line terminators, the
    /// Unicode space separators and the byte-order mark. U+0085 is not
    /// included.
    pub const WHITESPACE: &[char] = &[
        ' ', '\t', '\n', '\r', '\u{0b}', '\u{0c}', '\u{a0}', '\u{1680}', '\u{2000}', '\u{2001}',
        '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}', '\u{2007}', '\u{2008}',
        '\u{2009}', '\u{200a}', '\u{2028}', '\u{2029}', '\u{202f}', '\u{205f}', '\u{3000}',
        '\u{feff}',
    ];

    /// Empty or whitespace-only strings
    pub fn blank_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(WHITESPACE), 0..8)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// Strings with at least one visible character, possibly padded with
    /// whitespace on either side
    pub fn non_blank_text() -> impl Strategy<Value = String> {
        (blank_text(), "[a-zA-Z0-9][ a-zA-Z0-9!?.,'-]{0,24}", blank_text())
            .prop_map(|(lead, body, tail)| format!("{lead}{body}{tail}"))
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::ScriptedIds;
pub use properties::{blank_text, non_blank_text};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use todo_store_core::environment::IdGenerator;

    #[test]
    fn scripted_ids_fall_back_to_counter() {
        let ids = ScriptedIds::new([9]);
        assert_eq!(ids.next_id(), 9);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.calls(), 3);
    }

    proptest! {
        #[test]
        fn blank_text_is_all_whitespace(text in blank_text()) {
            prop_assert!(text.chars().all(|c| properties::WHITESPACE.contains(&c)));
        }

        #[test]
        fn non_blank_text_has_visible_char(text in non_blank_text()) {
            prop_assert!(text.chars().any(char::is_alphanumeric));
        }
    }
}
