//! List view collaborator.
//!
//! Renders one row per todo from a snapshot and turns user interactions into
//! [`TodoCallbacks`] calls. The only state it keeps is which row, if any, is
//! being edited.

use crate::callbacks::TodoCallbacks;
use crate::form::{FormSubmission, TodoForm};
use crate::types::{TodoId, TodoState};
use serde::Serialize;
use std::fmt;

/// Row selected for editing, with the text it had when selected
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditContext {
    /// Todo being edited
    pub id: TodoId,
    /// Text at the time editing began
    pub value: String,
}

/// One rendered todo
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRow {
    /// Todo id
    pub id: TodoId,
    /// Todo text
    pub text: String,
    /// Completion flag
    pub is_complete: bool,
    /// True for the row under edit
    pub editing: bool,
}

impl fmt::Display for TodoRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_complete { 'x' } else { ' ' };
        write!(f, "[{mark}] #{} {}", self.id, self.text)?;
        if self.editing {
            write!(f, "  (editing)")?;
        }
        Ok(())
    }
}

/// Stateless list renderer plus the local edit selection
#[derive(Clone, Debug, Default)]
pub struct TodoView {
    edit: Option<EditContext>,
}

impl TodoView {
    /// View with nothing selected
    #[must_use]
    pub const fn new() -> Self {
        Self { edit: None }
    }

    /// Current edit selection
    #[must_use]
    pub const fn editing(&self) -> Option<&EditContext> {
        self.edit.as_ref()
    }

    /// One row per todo, in collection order
    #[must_use]
    pub fn render(&self, state: &TodoState) -> Vec<TodoRow> {
        state
            .iter()
            .map(|todo| TodoRow {
                id: todo.id,
                text: todo.text.clone(),
                is_complete: todo.is_complete,
                editing: self.edit.as_ref().is_some_and(|edit| edit.id == todo.id),
            })
            .collect()
    }

    /// Rows joined one per line, with a summary footer
    #[must_use]
    pub fn render_text(&self, state: &TodoState) -> String {
        if state.is_empty() {
            return "(nothing planned)".to_string();
        }

        let mut out: Vec<String> = self.render(state).iter().map(ToString::to_string).collect();
        out.push(format!(
            "{}/{} completed",
            state.completed_count(),
            state.len()
        ));
        out.join("\n")
    }

    /// Select a row for editing
    ///
    /// Returns a form pre-filled with the row's text, or `None` (selection
    /// unchanged) if the id is not in `state`.
    pub fn begin_edit(&mut self, id: TodoId, state: &TodoState) -> Option<TodoForm> {
        let todo = state.get(id)?;
        self.edit = Some(EditContext {
            id,
            value: todo.text.clone(),
        });
        Some(TodoForm::for_edit(todo.text.clone()))
    }

    /// Drop the edit selection; returns false if there was none
    pub fn cancel_edit(&mut self) -> bool {
        self.edit.take().is_some()
    }

    /// Submit `form` through the callbacks
    ///
    /// Add submissions go to `on_add`. Edit submissions go to `on_edit` for
    /// the selected row and end the selection; without a selection they are
    /// dropped.
    pub async fn submit_form<C>(&mut self, form: &mut TodoForm, callbacks: &C)
    where
        C: TodoCallbacks + Sync,
    {
        match form.submit() {
            FormSubmission::Add(candidate) => callbacks.on_add(candidate).await,
            FormSubmission::Edit(text) => {
                let Some(edit) = self.edit.take() else {
                    tracing::debug!("Edit submitted with no row selected");
                    return;
                };
                callbacks.on_edit(edit.id, text).await;
            },
        }
    }

    /// Row clicked: flip its completion
    pub async fn toggle<C>(&self, id: TodoId, callbacks: &C)
    where
        C: TodoCallbacks + Sync,
    {
        callbacks.on_toggle_complete(id).await;
    }

    /// Delete icon clicked
    pub async fn remove<C>(&self, id: TodoId, callbacks: &C)
    where
        C: TodoCallbacks + Sync,
    {
        callbacks.on_delete(id).await;
    }
}
