//! Entry points collaborators use to change the todo list.
//!
//! Collaborators never touch [`TodoState`] directly. They call
//! [`TodoCallbacks`] and re-render from whatever snapshot the store
//! publishes next.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoCandidate, TodoId, TodoState};
use std::future::Future;
use todo_store_runtime::{ObserverId, Snapshot, Store, StoreConfig};
use tokio::sync::watch;

/// Store specialised to the todo list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Callbacks handed to the form and view collaborators
///
/// None of them report failure: invalid input is absorbed by the store.
pub trait TodoCallbacks {
    /// Add a new todo from a form candidate
    fn on_add(&self, candidate: TodoCandidate) -> impl Future<Output = ()> + Send;

    /// Replace the text of an existing todo
    fn on_edit(&self, id: TodoId, text: String) -> impl Future<Output = ()> + Send;

    /// Delete a todo
    fn on_delete(&self, id: TodoId) -> impl Future<Output = ()> + Send;

    /// Flip a todo's completion flag
    fn on_toggle_complete(&self, id: TodoId) -> impl Future<Output = ()> + Send;
}

/// Cloneable handle to a todo store
///
/// # Example
///
/// ```
/// use todo::{TodoCallbacks, TodoCandidate, TodoEnvironment, TodoHandle};
///
/// # async fn example() {
/// let todos = TodoHandle::new(TodoEnvironment::sequential());
/// todos.on_add(TodoCandidate::new("buy milk")).await;
///
/// let snapshot = todos.snapshot();
/// assert_eq!(snapshot.len(), 1);
/// assert_eq!(snapshot.as_slice()[0].text, "buy milk");
/// # }
/// ```
#[derive(Clone)]
pub struct TodoHandle {
    store: TodoStore,
}

impl TodoHandle {
    /// Creates an empty todo list with the default store configuration
    #[must_use]
    pub fn new(environment: TodoEnvironment) -> Self {
        Self::with_config(environment, StoreConfig::default())
    }

    /// Creates an empty todo list with a custom store configuration
    #[must_use]
    pub fn with_config(environment: TodoEnvironment, config: StoreConfig) -> Self {
        Self {
            store: Store::with_config(TodoState::new(), TodoReducer::new(), environment, config),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<TodoState> {
        self.store.snapshot()
    }

    /// Push-based stream of snapshots
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<TodoState>> {
        self.store.subscribe()
    }

    /// Register a re-render callback, see [`Store::observe`]
    pub fn observe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&Snapshot<TodoState>) + Send + Sync + 'static,
    {
        self.store.observe(observer)
    }

    /// Remove a re-render callback
    pub fn unobserve(&self, id: ObserverId) -> bool {
        self.store.unobserve(id)
    }

    /// Unmount: drop observers and ignore further callbacks
    pub fn close(&self) {
        self.store.close();
    }

    async fn dispatch(&self, action: TodoAction) {
        match self.store.send(action).await {
            Ok(snapshot) => {
                tracing::trace!(revision = snapshot.revision(), "Todo action applied");
            },
            Err(error) => {
                tracing::warn!(%error, "Dropped todo action");
            },
        }
    }
}

impl std::fmt::Debug for TodoHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoHandle")
            .field("revision", &self.snapshot().revision())
            .field("closed", &self.store.is_closed())
            .finish()
    }
}

impl TodoCallbacks for TodoHandle {
    async fn on_add(&self, candidate: TodoCandidate) {
        self.dispatch(TodoAction::Add {
            text: candidate.text,
        })
        .await;
    }

    async fn on_edit(&self, id: TodoId, text: String) {
        self.dispatch(TodoAction::Edit { id, text }).await;
    }

    async fn on_delete(&self, id: TodoId) {
        self.dispatch(TodoAction::Delete { id }).await;
    }

    async fn on_toggle_complete(&self, id: TodoId) {
        self.dispatch(TodoAction::ToggleComplete { id }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn callbacks_drive_the_store() {
        let todos = TodoHandle::new(TodoEnvironment::sequential());

        todos.on_add(TodoCandidate::new("a")).await;
        todos.on_add(TodoCandidate::new("b")).await;
        let id = todos.snapshot().as_slice()[1].id;

        todos.on_toggle_complete(id).await;
        todos.on_edit(id, "A".to_string()).await;

        let snapshot = todos.snapshot();
        assert_eq!(snapshot.revision(), 4);
        let a = snapshot.get(id).unwrap();
        assert_eq!(a.text, "A");
        assert!(a.is_complete);

        todos.on_delete(id).await;
        assert_eq!(todos.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn observer_sees_latest_revision() {
        let todos = TodoHandle::new(TodoEnvironment::sequential());
        let seen = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&seen);
        let id = todos.observe(move |snapshot| sink.store(snapshot.revision(), Ordering::SeqCst));

        todos.on_add(TodoCandidate::new("x")).await;
        todos.on_add(TodoCandidate::new(" ")).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        assert!(todos.unobserve(id));
        todos.on_add(TodoCandidate::new("y")).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn closed_handle_ignores_callbacks() {
        let todos = TodoHandle::new(TodoEnvironment::sequential());
        todos.on_add(TodoCandidate::new("kept")).await;

        todos.close();
        todos.on_add(TodoCandidate::new("dropped")).await;

        let snapshot = todos.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.as_slice()[0].text, "kept");
    }
}
