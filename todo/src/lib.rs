//! In-memory todo list built on the todo store runtime.
//!
//! The list is a single store owning an ordered collection of todos (most
//! recent first). Four operations change it: add, edit, delete and
//! toggle-complete. Blank text and unknown ids are silently ignored.
//!
//! - [`TodoReducer`] holds the rules
//! - [`TodoHandle`] exposes them as [`TodoCallbacks`]
//! - [`TodoForm`] and [`TodoView`] are the collaborators that call them
//! - [`TodoApp`] drives both from text commands
//!
//! # Quick Start
//!
//! ```
//! use todo::{TodoCallbacks, TodoCandidate, TodoEnvironment, TodoHandle};
//!
//! # async fn example() {
//! let todos = TodoHandle::new(TodoEnvironment::sequential());
//!
//! todos.on_add(TodoCandidate::new("Buy milk")).await;
//! todos.on_add(TodoCandidate::new("   ")).await; // ignored
//!
//! let snapshot = todos.snapshot();
//! let id = snapshot.as_slice()[0].id;
//! todos.on_toggle_complete(id).await;
//!
//! let state = todos.snapshot();
//! assert_eq!(state.len(), 1);
//! assert_eq!(state.completed_count(), 1);
//! // the earlier snapshot is untouched
//! assert_eq!(snapshot.completed_count(), 0);
//! # }
//! ```

pub mod app;
pub mod callbacks;
pub mod command;
pub mod config;
pub mod form;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use app::{Step, TodoApp};
pub use callbacks::{TodoCallbacks, TodoHandle, TodoStore};
pub use command::{Command, CommandError};
pub use config::{Config, ConfigError, IdStrategy, UnknownIdStrategy};
pub use form::{FormSubmission, TodoForm};
pub use reducer::{is_blank, TodoEnvironment, TodoReducer};
pub use types::{TodoAction, TodoCandidate, TodoId, TodoItem, TodoState};
pub use view::{EditContext, TodoRow, TodoView};
