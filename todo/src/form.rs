//! Input form collaborator.
//!
//! Holds the text being typed. It does not validate it: the store decides
//! what is acceptable.

use crate::types::TodoCandidate;

/// What a form submission asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormSubmission {
    /// Create a todo from the candidate
    Add(TodoCandidate),
    /// Replace the text of the todo being edited
    ///
    /// The form does not know which todo that is; the view holding the edit
    /// selection supplies the id.
    Edit(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum FormMode {
    #[default]
    Add,
    Edit,
}

/// Transient text input for adding or editing a todo
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoForm {
    input: String,
    mode: FormMode,
}

impl TodoForm {
    /// Empty form for adding todos
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            mode: FormMode::Add,
        }
    }

    /// Edit-mode form pre-filled with the current text
    #[must_use]
    pub fn for_edit(value: impl Into<String>) -> Self {
        Self {
            input: value.into(),
            mode: FormMode::Edit,
        }
    }

    /// Current input
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns true if submitting edits an existing todo
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.mode == FormMode::Edit
    }

    /// Replace the input, as typing does
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Hint shown while the input is empty
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add a todo",
            FormMode::Edit => "Update your item",
        }
    }

    /// Submit the input and clear it
    ///
    /// The input is cleared even if it is blank; whether a blank submission
    /// does anything is up to the store.
    pub fn submit(&mut self) -> FormSubmission {
        let text = std::mem::take(&mut self.input);
        match self.mode {
            FormMode::Add => FormSubmission::Add(TodoCandidate { text }),
            FormMode::Edit => FormSubmission::Edit(text),
        }
    }
}
