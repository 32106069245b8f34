//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of records, most recent first, that
//! can be added to, edited, deleted from, and toggled.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses `12` or `#12`
impl FromStr for TodoId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('#').unwrap_or(s).parse().map(Self)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing, stored exactly as entered
    pub text: String,
    /// Whether the todo is completed
    pub is_complete: bool,
}

impl TodoItem {
    /// Creates a new, incomplete todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String) -> Self {
        Self {
            id,
            text,
            is_complete: false,
        }
    }

    /// Flips the completion flag
    pub fn toggle(&mut self) {
        self.is_complete = !self.is_complete;
    }
}

/// Text for a todo that does not exist yet
///
/// Ids and completion are assigned by the store, so a candidate carries
/// nothing else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCandidate {
    /// Requested text
    pub text: String,
}

impl TodoCandidate {
    /// Creates a candidate from any string-like value
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// State of the todo list
///
/// Records are ordered most recent first. Only the reducer mutates this
/// type; everyone else reads it through published snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoState {
    todos: Vec<TodoItem>,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub const fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Returns true if there are no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.is_complete).count()
    }

    /// Iterates over todos, most recent first
    pub fn iter(&self) -> std::slice::Iter<'_, TodoItem> {
        self.todos.iter()
    }

    /// All todos, most recent first
    #[must_use]
    pub fn as_slice(&self) -> &[TodoItem] {
        &self.todos
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Returns the index of a todo by ID
    #[must_use]
    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: TodoId) -> Option<&mut TodoItem> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn prepend(&mut self, item: TodoItem) {
        self.todos.insert(0, item);
    }

    pub(crate) fn remove(&mut self, id: TodoId) -> Option<TodoItem> {
        let index = self.position(id)?;
        Some(self.todos.remove(index))
    }

    /// Smallest id guaranteed to be free: one past the largest id in use,
    /// or the first gap when that would overflow
    pub(crate) fn next_free_id(&self) -> TodoId {
        let after_max = self
            .todos
            .iter()
            .map(|t| t.id.get())
            .max()
            .map_or(Some(0), |max| max.checked_add(1));

        match after_max {
            Some(raw) => TodoId(raw),
            None => (0..=u64::MAX)
                .map(TodoId)
                .find(|id| !self.contains(*id))
                .unwrap_or(TodoId(0)),
        }
    }
}

impl<'a> IntoIterator for &'a TodoState {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Operations on the todo list
///
/// None of them can fail. Blank text and unknown ids leave the state as it
/// was.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Prepend a new, incomplete todo
    Add {
        /// Text of the todo
        text: String,
    },

    /// Replace the text of an existing todo, keeping its position
    Edit {
        /// Todo to edit
        id: TodoId,
        /// Replacement text
        text: String,
    },

    /// Remove a todo
    Delete {
        /// Todo to delete
        id: TodoId,
    },

    /// Flip a todo's completion flag
    ToggleComplete {
        /// Todo to toggle
        id: TodoId,
    },
}
