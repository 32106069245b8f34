//! Published, immutable views of store state.

use std::ops::Deref;
use std::sync::Arc;

/// Immutable state of a store at one point in time
///
/// Each publish bumps `revision` by one. The state behind a snapshot is never
/// mutated; later dispatches work on their own copy.
#[derive(Debug)]
pub struct Snapshot<S> {
    revision: u64,
    state: Arc<S>,
}

impl<S> Snapshot<S> {
    /// Wraps the initial state at revision 0
    #[must_use]
    pub fn initial(state: S) -> Self {
        Self {
            revision: 0,
            state: Arc::new(state),
        }
    }

    /// Builds the snapshot that follows `self`
    #[must_use]
    pub(crate) fn next(&self, state: S) -> Self {
        Self {
            revision: self.revision + 1,
            state: Arc::new(state),
        }
    }

    /// Number of publishes that led to this snapshot
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Shared handle to the state
    #[must_use]
    pub const fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Returns true if both snapshots share the same state allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

// Manual impl: cloning a snapshot never clones `S`
impl<S> Clone for Snapshot<S> {
    fn clone(&self) -> Self {
        Self {
            revision: self.revision,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> Deref for Snapshot<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}
