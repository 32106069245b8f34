//! # Todo Store Runtime
//!
//! Runtime that owns state for a reducer and publishes it to readers.
//!
//! ## Core Components
//!
//! - **Store**: the only writer; serialises dispatch and runs the reducer
//! - **Snapshot**: immutable, revisioned view of state handed to readers
//! - **Observers**: callbacks re-invoked with every new snapshot
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Every reader gets a stable snapshot
//! let before = store.snapshot();
//! store.send(Action::DoSomething).await?;
//! let after = store.snapshot();
//! assert_eq!(after.revision(), before.revision() + 1);
//! ```

use std::sync::Arc;
use todo_store_core::reducer::Reducer;

/// Immutable published state
pub mod snapshot;

pub use snapshot::Snapshot;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reducers never fail; these only describe the store's own lifecycle
    /// and guards.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// The store was closed and no longer accepts actions
        #[error("Store is closed")]
        Closed,

        /// A single dispatch fed back more actions than allowed
        ///
        /// The dispatch is abandoned and nothing is published.
        #[error("Dispatch exceeded {limit} actions")]
        DispatchLimitExceeded {
            /// Configured maximum
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use todo_store_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_actions_per_dispatch(8);
/// assert_eq!(config.max_actions_per_dispatch, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound on actions processed by one `send`, including follow-ups
    /// produced by effects
    pub max_actions_per_dispatch: usize,
}

impl StoreConfig {
    /// Default bound on actions per dispatch
    pub const DEFAULT_MAX_ACTIONS_PER_DISPATCH: usize = 64;

    /// Set the maximum number of actions per dispatch (at least 1)
    #[must_use]
    pub fn with_max_actions_per_dispatch(mut self, max: usize) -> Self {
        self.max_actions_per_dispatch = max.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_actions_per_dispatch: Self::DEFAULT_MAX_ACTIONS_PER_DISPATCH,
        }
    }
}

/// Handle returned by [`Store::observe`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Store module - The runtime coordinator
pub mod store {
    use super::{Arc, ObserverId, Reducer, Snapshot, StoreConfig, StoreError};
    use std::collections::VecDeque;
    use std::marker::PhantomData;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tokio::sync::watch;

    type Observer<S> = Arc<dyn Fn(&Snapshot<S>) + Send + Sync>;

    struct Shared<S, E, R> {
        reducer: R,
        environment: E,
        config: StoreConfig,
        /// Serialises dispatch; one action (and its follow-ups) at a time
        dispatch: tokio::sync::Mutex<()>,
        publisher: watch::Sender<Snapshot<S>>,
        observers: Mutex<Vec<(ObserverId, Observer<S>)>>,
        next_observer: AtomicU64,
        closed: AtomicBool,
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State, published as immutable [`Snapshot`]s
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observers re-invoked after each publish
    ///
    /// Cloning a store yields another handle to the same state.
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
        shared: Arc<Shared<S, E, R>>,
        _action: PhantomData<fn(A)>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                shared: Arc::clone(&self.shared),
                _action: PhantomData,
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone + PartialEq,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The initial state is published as revision 0.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (publisher, _) = watch::channel(Snapshot::initial(initial_state));

            Self {
                shared: Arc::new(Shared {
                    reducer,
                    environment,
                    config,
                    dispatch: tokio::sync::Mutex::new(()),
                    publisher,
                    observers: Mutex::new(Vec::new()),
                    next_observer: AtomicU64::new(0),
                    closed: AtomicBool::new(false),
                }),
                _action: PhantomData,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Waits for any in-flight dispatch to finish
        /// 2. Runs the reducer on a private copy of the current state
        /// 3. Runs follow-up actions from effects, in order, on the same copy
        /// 4. Publishes the copy as a new snapshot if it differs from the
        ///    current state, then notifies observers
        ///
        /// Returns the latest snapshot, which is the unchanged current one
        /// when the action was a no-op.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Closed`] if [`Store::close`] was called
        /// - [`StoreError::DispatchLimitExceeded`] if effects fed back more
        ///   actions than [`StoreConfig::max_actions_per_dispatch`]
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<Snapshot<S>, StoreError> {
            self.ensure_open()?;
            let _turn = self.shared.dispatch.lock().await;
            // close() may have landed while this dispatch was queued
            self.ensure_open()?;

            metrics::counter!("store.actions.total").increment(1);

            let current = self.snapshot();
            let mut next = S::clone(current.state());
            let processed = self.run_reducer(&mut next, action)?;

            if next == *current {
                tracing::debug!(
                    revision = current.revision(),
                    actions = processed,
                    "State unchanged, nothing published"
                );
                metrics::counter!("store.actions.unchanged").increment(1);
                return Ok(current);
            }

            let snapshot = current.next(next);
            self.shared.publisher.send_replace(snapshot.clone());
            metrics::counter!("store.snapshots.published").increment(1);
            tracing::debug!(
                revision = snapshot.revision(),
                actions = processed,
                "Published snapshot"
            );

            self.notify(&snapshot);
            Ok(snapshot)
        }

        /// Runs `action` and every follow-up it produces against `state`
        fn run_reducer(&self, state: &mut S, action: A) -> Result<usize, StoreError> {
            let limit = self.shared.config.max_actions_per_dispatch;
            let mut queue = VecDeque::from([action]);
            let mut processed = 0_usize;

            while let Some(action) = queue.pop_front() {
                if processed == limit {
                    tracing::error!(limit, "Dispatch abandoned: too many follow-up actions");
                    metrics::counter!("store.dispatch.rejected").increment(1);
                    return Err(StoreError::DispatchLimitExceeded { limit });
                }
                processed += 1;

                let start = std::time::Instant::now();
                let effects = self
                    .shared
                    .reducer
                    .reduce(state, action, &self.shared.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                for effect in effects {
                    queue.extend(effect.into_actions());
                }
            }

            Ok(processed)
        }

        fn ensure_open(&self) -> Result<(), StoreError> {
            if self.is_closed() {
                tracing::warn!("Rejected action: store is closed");
                metrics::counter!("store.dispatch.rejected").increment(1);
                return Err(StoreError::Closed);
            }
            Ok(())
        }

        fn notify(&self, snapshot: &Snapshot<S>) {
            // Call outside the lock so observers may (un)register
            let observers: Vec<Observer<S>> = self
                .observers()
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect();

            tracing::trace!("Notifying {} observers", observers.len());
            for observer in observers {
                observer(snapshot);
            }
        }

        fn observers(&self) -> MutexGuard<'_, Vec<(ObserverId, Observer<S>)>> {
            self.shared
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
        }

        /// Latest published snapshot
        #[must_use]
        pub fn snapshot(&self) -> Snapshot<S> {
            self.shared.publisher.borrow().clone()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let current = self.shared.publisher.borrow();
            f(&current)
        }

        /// Subscribe to published snapshots
        ///
        /// The receiver starts out having seen the current snapshot, so
        /// `changed()` resolves on the next publish.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<Snapshot<S>> {
            self.shared.publisher.subscribe()
        }

        /// Register a callback invoked with every new snapshot
        ///
        /// Callbacks run synchronously at the end of the dispatch that
        /// published, in registration order. They are not invoked for no-op
        /// actions.
        pub fn observe<F>(&self, observer: F) -> ObserverId
        where
            F: Fn(&Snapshot<S>) + Send + Sync + 'static,
        {
            let id = ObserverId(self.shared.next_observer.fetch_add(1, Ordering::Relaxed));
            self.observers().push((id, Arc::new(observer)));
            tracing::debug!(observer = id.0, "Observer registered");
            id
        }

        /// Remove a callback registered with [`Store::observe`]
        ///
        /// Returns false if the id was unknown or already removed.
        pub fn unobserve(&self, id: ObserverId) -> bool {
            let mut observers = self.observers();
            let before = observers.len();
            observers.retain(|(registered, _)| *registered != id);
            observers.len() != before
        }

        /// Stop accepting actions and drop every observer
        ///
        /// Snapshots stay readable. Closing twice is harmless.
        pub fn close(&self) {
            if !self.shared.closed.swap(true, Ordering::AcqRel) {
                self.observers().clear();
                tracing::info!(revision = self.snapshot().revision(), "Store closed");
            }
        }

        /// Returns true once [`Store::close`] was called
        #[must_use]
        pub fn is_closed(&self) -> bool {
            self.shared.closed.load(Ordering::Acquire)
        }

        /// The configuration this store was built with
        #[must_use]
        pub fn config(&self) -> &StoreConfig {
            &self.shared.config
        }
    }
}

pub use store::Store;
