//! Reducer logic for the todo list.
//!
//! Every operation either applies cleanly or leaves the state untouched.
//! Rejections are logged, never returned: callers cannot tell a blank
//! submission from a successful one except by looking at the next snapshot.

use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use todo_store_core::{
    effect::Effect,
    environment::{IdGenerator, SequentialIdGenerator},
    reducer::Reducer,
    SmallVec,
};

/// Proposals requested from the id generator before scanning for a free id
const MAX_ID_ATTEMPTS: usize = 16;

/// Returns true if `text` is empty or whitespace only
///
/// Whitespace is the class the browser's `\s` matches: the ECMAScript
/// `WhiteSpace` and `LineTerminator` characters. Unlike
/// [`char::is_whitespace`] this excludes U+0085 and includes U+FEFF. Text
/// that passes is stored untrimmed.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_space)
}

const fn is_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0b}'
            | '\u{0c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for new todos
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Environment handing out ids 1, 2, 3, ...
    #[must_use]
    pub fn sequential() -> Self {
        Self::new(Arc::new(SequentialIdGenerator::new()))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Picks an id not used by any todo in `state`
    fn fresh_id(state: &TodoState, env: &TodoEnvironment) -> TodoId {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = TodoId::new(env.ids.next_id());
            if !state.contains(id) {
                return id;
            }
            tracing::trace!(%id, attempt, "Id already in use, asking again");
        }

        let id = state.next_free_id();
        tracing::debug!(%id, "Id generator kept colliding, using next free id");
        id
    }

    fn add(state: &mut TodoState, text: String, env: &TodoEnvironment) {
        if is_blank(&text) {
            tracing::debug!("Ignored add: blank text");
            return;
        }

        let id = Self::fresh_id(state, env);
        state.prepend(TodoItem::new(id, text));
        tracing::trace!(%id, "Todo added");
    }

    fn edit(state: &mut TodoState, id: TodoId, text: String) {
        if is_blank(&text) {
            tracing::debug!(%id, "Ignored edit: blank text");
            return;
        }

        let Some(todo) = state.get_mut(id) else {
            tracing::debug!(%id, "Ignored edit: no such todo");
            return;
        };
        todo.text = text;
    }

    fn delete(state: &mut TodoState, id: TodoId) {
        if state.remove(id).is_none() {
            tracing::debug!(%id, "Ignored delete: no such todo");
        }
    }

    fn toggle_complete(state: &mut TodoState, id: TodoId) {
        let Some(todo) = state.get_mut(id) else {
            tracing::debug!(%id, "Ignored toggle: no such todo");
            return;
        };
        todo.toggle();
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Add { text } => Self::add(state, text, env),
            TodoAction::Edit { id, text } => Self::edit(state, id, text),
            TodoAction::Delete { id } => Self::delete(state, id),
            TodoAction::ToggleComplete { id } => Self::toggle_complete(state, id),
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_store_testing::{assertions, ReducerTest, ScriptedIds};

    fn create_test_env() -> TodoEnvironment {
        TodoEnvironment::sequential()
    }

    fn state_with(texts: &[&str]) -> TodoState {
        let mut state = TodoState::new();
        let env = create_test_env();
        for text in texts.iter().rev() {
            let _ = TodoReducer::new().reduce(
                &mut state,
                TodoAction::Add {
                    text: (*text).to_string(),
                },
                &env,
            );
        }
        state
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n\r"));
        assert!(is_blank("\u{a0}\u{2003}\u{feff}"));
        assert!(!is_blank("x"));
        assert!(!is_blank("  x  "));
        assert!(is_blank("\u{2000}\u{200a}\u{205f}\u{3000}"));
        assert!(!is_blank("\u{200b}")); // zero-width space is not whitespace
        assert!(!is_blank("\u{85}")); // NEL is not in `\s`
    }

    #[test]
    fn test_add_todo_success() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::Add {
                text: "buy milk".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.len(), 1);
                let todo = &state.as_slice()[0];
                assert_eq!(todo.text, "buy milk");
                assert!(!todo.is_complete);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_add_prepends() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::Add {
                text: "a".to_string(),
            })
            .when_action(TodoAction::Add {
                text: "b".to_string(),
            })
            .then_state(|state| {
                let texts: Vec<_> = state.iter().map(|t| t.text.as_str()).collect();
                assert_eq!(texts, ["b", "a"]);
            })
            .run();
    }

    #[test]
    fn test_add_keeps_surrounding_whitespace() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::Add {
                text: "  padded ".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.as_slice()[0].text, "  padded ");
            })
            .run();
    }

    #[test]
    fn test_add_next_line_is_stored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::Add {
                text: "\u{85}".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.len(), 1);
                assert_eq!(state.as_slice()[0].text, "\u{85}");
            })
            .run();
    }

    #[test]
    fn test_add_blank_is_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state_with(&["keep"]))
            .when_action(TodoAction::Add {
                text: "   ".to_string(),
            })
            .when_action(TodoAction::Add {
                text: String::new(),
            })
            .then_state(|state| {
                assert_eq!(*state, state_with(&["keep"]));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_add_retries_colliding_ids() {
        let ids = Arc::new(ScriptedIds::new([7, 7, 7, 8]));
        let env = TodoEnvironment::new(ids.clone());

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(TodoState::new())
            .when_action(TodoAction::Add {
                text: "first".to_string(),
            })
            .when_action(TodoAction::Add {
                text: "second".to_string(),
            })
            .then_state(move |state| {
                let found: Vec<_> = state.iter().map(|t| t.id.get()).collect();
                assert_eq!(found, [8, 7]);
                assert_eq!(ids.calls(), 4);
            })
            .run();
    }

    #[test]
    fn test_add_falls_back_when_generator_is_stuck() {
        let env = TodoEnvironment::new(Arc::new(ScriptedIds::new(
            std::iter::repeat(0).take(64),
        )));

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(TodoState::new())
            .when_action(TodoAction::Add {
                text: "a".to_string(),
            })
            .when_action(TodoAction::Add {
                text: "b".to_string(),
            })
            .when_action(TodoAction::Add {
                text: "c".to_string(),
            })
            .then_state(|state| {
                let found: Vec<_> = state.iter().map(|t| t.id.get()).collect();
                assert_eq!(found, [2, 1, 0]);
            })
            .run();
    }

    #[test]
    fn test_edit_replaces_text_in_place() {
        let state = state_with(&["a", "b", "c"]);
        let target = state.as_slice()[1].id;

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(TodoAction::ToggleComplete { id: target })
            .when_action(TodoAction::Edit {
                id: target,
                text: "B".to_string(),
            })
            .then_state(move |state| {
                let texts: Vec<_> = state.iter().map(|t| t.text.as_str()).collect();
                assert_eq!(texts, ["a", "B", "c"]);
                let edited = state.get(target).unwrap();
                assert!(edited.is_complete);
                assert_eq!(state.position(target), Some(1));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_edit_blank_or_unknown_is_ignored() {
        let state = state_with(&["a"]);
        let id = state.as_slice()[0].id;
        let expected = state.clone();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(TodoAction::Edit {
                id,
                text: " \t".to_string(),
            })
            .when_action(TodoAction::Edit {
                id: TodoId::new(999),
                text: "valid".to_string(),
            })
            .then_state(move |state| assert_eq!(*state, expected))
            .run();
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let state = state_with(&["x", "y"]);
        let id = state.as_slice()[0].id;
        let expected = state.clone();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state.clone())
            .when_action(TodoAction::ToggleComplete { id })
            .then_state(move |state| {
                assert!(state.get(id).unwrap().is_complete);
                assert!(!state.as_slice()[1].is_complete);
            })
            .run();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(TodoAction::ToggleComplete { id })
            .when_action(TodoAction::ToggleComplete { id })
            .then_state(move |state| assert_eq!(*state, expected))
            .run();
    }

    #[test]
    fn test_delete_todo() {
        let state = state_with(&["a", "b"]);
        let id = state.as_slice()[0].id;

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(TodoAction::Delete { id })
            .when_action(TodoAction::Delete { id })
            .then_state(move |state| {
                assert_eq!(state.len(), 1);
                assert!(!state.contains(id));
                assert_eq!(state.as_slice()[0].text, "b");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_unknown_id_operations_are_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::Delete { id: TodoId::new(1) })
            .when_action(TodoAction::ToggleComplete { id: TodoId::new(1) })
            .then_state(|state| assert!(state.is_empty()))
            .run();
    }
}
