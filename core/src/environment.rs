//! Dependency injection traits
//!
//! External sources of non-determinism are abstracted behind traits and
//! injected through a reducer's environment, so tests can substitute
//! predictable implementations.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of raw identifiers for new records
///
/// Implementations only propose ids. Uniqueness within a collection is the
/// reducer's job: it asks again when a proposal collides.
///
/// # Examples
///
/// ```
/// use todo_store_core::environment::{IdGenerator, SequentialIdGenerator};
///
/// let ids = SequentialIdGenerator::new();
/// assert_eq!(ids.next_id(), 1);
/// assert_eq!(ids.next_id(), 2);
/// ```
pub trait IdGenerator: Send + Sync {
    /// Propose the next identifier
    fn next_id(&self) -> u64;
}

/// Monotonic counter starting at 1
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a counter whose first id is 1
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a counter whose first id is `first`
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Uniformly random ids in `0..bound`
///
/// Collisions are expected with small bounds; callers must check the
/// proposal against the ids they already hold.
#[derive(Debug, Clone, Copy)]
pub struct RandomIdGenerator {
    bound: u64,
}

impl RandomIdGenerator {
    /// Default exclusive upper bound
    pub const DEFAULT_BOUND: u64 = 10_000;

    /// Creates a generator drawing from `0..bound`
    ///
    /// A zero bound is treated as 1.
    #[must_use]
    pub const fn new(bound: u64) -> Self {
        Self {
            bound: if bound == 0 { 1 } else { bound },
        }
    }

    /// Exclusive upper bound of generated ids
    #[must_use]
    pub const fn bound(&self) -> u64 {
        self.bound
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BOUND)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> u64 {
        rand::thread_rng().gen_range(0..self.bound)
    }
}
