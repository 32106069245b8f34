//! Line-oriented front end tying the form and view to a todo store.
//!
//! This is the rendering collaborator: it owns no todo data, forwards
//! commands through [`TodoCallbacks`], and redraws only when the store
//! publishes a new snapshot.

use crate::callbacks::TodoHandle;
use crate::command::{Command, HELP};
use crate::form::TodoForm;
use crate::types::TodoState;
use crate::view::TodoView;
use todo_store_runtime::Snapshot;
use tokio::sync::watch;

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep reading; print the text if it is not empty
    Continue(String),
    /// Leave the loop
    Quit,
}

/// CLI session state: add form, list view, edit form while editing
#[derive(Debug)]
pub struct TodoApp {
    todos: TodoHandle,
    updates: watch::Receiver<Snapshot<TodoState>>,
    add_form: TodoForm,
    edit_form: Option<TodoForm>,
    view: TodoView,
}

impl TodoApp {
    /// Mounts the front end on `todos`
    #[must_use]
    pub fn new(todos: TodoHandle) -> Self {
        let updates = todos.subscribe();
        Self {
            todos,
            updates,
            add_form: TodoForm::new(),
            edit_form: None,
            view: TodoView::new(),
        }
    }

    /// Prompt text reflecting the active form
    #[must_use]
    pub fn prompt(&self) -> &'static str {
        self.edit_form
            .as_ref()
            .unwrap_or(&self.add_form)
            .placeholder()
    }

    /// Run one command
    ///
    /// # Errors
    ///
    /// Returns an error only if the snapshot cannot be serialised for `json`.
    pub async fn execute(&mut self, command: Command) -> Result<Step, serde_json::Error> {
        let out = match command {
            Command::Add(text) => {
                self.add_form.set_input(text);
                self.view.submit_form(&mut self.add_form, &self.todos).await;
                self.rerender()
            },
            Command::Edit(id) => {
                let snapshot = self.todos.snapshot();
                match self.view.begin_edit(id, &snapshot) {
                    Some(form) => {
                        let out = format!("editing #{id}: {}", form.input());
                        self.edit_form = Some(form);
                        out
                    },
                    None => format!("no todo #{id}"),
                }
            },
            Command::Save(text) => match self.edit_form.take() {
                Some(mut form) => {
                    form.set_input(text);
                    self.view.submit_form(&mut form, &self.todos).await;
                    self.rerender()
                },
                None => "nothing is being edited (use `edit <id>`)".to_string(),
            },
            Command::Cancel => {
                self.edit_form = None;
                if self.view.cancel_edit() {
                    "edit cancelled".to_string()
                } else {
                    String::new()
                }
            },
            Command::Toggle(id) => {
                self.view.toggle(id, &self.todos).await;
                self.rerender()
            },
            Command::Remove(id) => {
                self.view.remove(id, &self.todos).await;
                self.rerender()
            },
            Command::List => {
                let snapshot = self.updates.borrow_and_update().clone();
                self.view.render_text(&snapshot)
            },
            Command::Json => serde_json::to_string_pretty(&*self.todos.snapshot())?,
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Continue(out))
    }

    /// Render if a snapshot was published since the last render
    fn rerender(&mut self) -> String {
        if !self.updates.has_changed().unwrap_or(false) {
            return String::new();
        }
        let snapshot = self.updates.borrow_and_update().clone();
        tracing::debug!(revision = snapshot.revision(), "Re-rendering");
        self.view.render_text(&snapshot)
    }
}
