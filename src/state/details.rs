use super::forms::{
    ListForm,
    ListFormPatch,
    WordForm,
    WordFormPatch,
};
use crate::core::models::VocabularyList;

/// What the delete-confirmation dialog currently targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteTarget {
    #[default]
    None,
    List,
    Word(String),
}

impl DeleteTarget {
    pub fn is_some(&self) -> bool {
        !matches!(self, DeleteTarget::None)
    }
}

/// State for a single list's detail view. Mutations here are reconciled by
/// re-fetching the whole list, never by local patching.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailsState {
    pub list: Option<VocabularyList>,
    pub loading: bool,
    pub error: Option<String>,
    pub edit_list_form: ListForm,
    pub show_edit_list_modal: bool,
    pub edit_word_form: WordForm,
    /// Word targeted by the edit-word modal, when open.
    pub edit_word_modal: Option<String>,
    pub delete_target: DeleteTarget,
    pub saving: bool,
}

#[derive(Debug, Clone)]
pub enum DetailsAction {
    FetchStart,
    FetchSuccess(VocabularyList),
    FetchError(String),

    OpenEditList,
    CloseEditList,
    UpdateEditListForm(ListFormPatch),

    OpenEditWord(String),
    CloseEditWord,
    UpdateEditWordForm(WordFormPatch),

    ConfirmDeleteList,
    ConfirmDeleteWord(String),
    CancelDelete,

    SaveStart,
    SaveEnd,

    /// The list itself is gone; the host navigates away.
    ListDeleted,
}

/// Pure transition function. Never mutates its input.
pub fn reduce(state: &DetailsState, action: DetailsAction) -> DetailsState {
    let mut next = state.clone();

    match action {
        DetailsAction::FetchStart => {
            next.loading = true;
            next.error = None;
        }
        DetailsAction::FetchSuccess(list) => {
            next.list = Some(list);
            next.loading = false;
        }
        DetailsAction::FetchError(message) => {
            next.loading = false;
            next.error = Some(message);
        }

        DetailsAction::OpenEditList => {
            if let Some(list) = &state.list {
                next.edit_list_form = ListForm {
                    name: list.name.clone(),
                    description: list.description.clone(),
                    target_language: list.target_language.clone(),
                    native_language: list.native_language.clone(),
                };
            }
            next.show_edit_list_modal = true;
        }
        DetailsAction::CloseEditList => next.show_edit_list_modal = false,
        DetailsAction::UpdateEditListForm(patch) => {
            next.edit_list_form = state.edit_list_form.merged(patch);
        }

        DetailsAction::OpenEditWord(word_id) => {
            if let Some(word) = state.list.as_ref().and_then(|l| l.word(&word_id)) {
                next.edit_word_form = WordForm {
                    term: word.term.clone(),
                    translation: word.translation.clone(),
                    part_of_speech: word.part_of_speech.clone(),
                    difficulty: word.difficulty,
                };
            }
            next.edit_word_modal = Some(word_id);
        }
        DetailsAction::CloseEditWord => next.edit_word_modal = None,
        DetailsAction::UpdateEditWordForm(patch) => {
            next.edit_word_form = state.edit_word_form.merged(patch);
        }

        DetailsAction::ConfirmDeleteList => next.delete_target = DeleteTarget::List,
        DetailsAction::ConfirmDeleteWord(word_id) => {
            next.delete_target = DeleteTarget::Word(word_id);
        }
        DetailsAction::CancelDelete => next.delete_target = DeleteTarget::None,

        DetailsAction::SaveStart => next.saving = true,
        DetailsAction::SaveEnd => next.saving = false,

        DetailsAction::ListDeleted => {
            next.list = None;
            next.delete_target = DeleteTarget::None;
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        Difficulty,
        Word,
    };

    fn sample_list() -> VocabularyList {
        VocabularyList {
            id: "l1".into(),
            name: "Travel".into(),
            description: "Trip words".into(),
            user_id: "u1".into(),
            target_language: "es".into(),
            native_language: "en".into(),
            counts: None,
            words: vec![Word {
                id: "w1".into(),
                term: "playa".into(),
                translation: "beach".into(),
                part_of_speech: "noun".into(),
                difficulty: Difficulty::Easy,
                list_id: "l1".into(),
                progress: None,
            }],
        }
    }

    fn loaded_state() -> DetailsState {
        DetailsState { list: Some(sample_list()), ..DetailsState::default() }
    }

    #[test]
    fn delete_target_distinguishes_list_from_word() {
        let state = loaded_state();

        let next = reduce(&state, DetailsAction::ConfirmDeleteWord("w1".into()));
        assert_eq!(next.delete_target, DeleteTarget::Word("w1".into()));
        assert!(next.delete_target.is_some());

        let next = reduce(&next, DetailsAction::ConfirmDeleteList);
        assert_eq!(next.delete_target, DeleteTarget::List);

        let next = reduce(&next, DetailsAction::CancelDelete);
        assert_eq!(next.delete_target, DeleteTarget::None);
        assert!(!next.delete_target.is_some());
    }

    #[test]
    fn open_edit_list_prefills_the_form() {
        let state = loaded_state();
        let next = reduce(&state, DetailsAction::OpenEditList);
        assert!(next.show_edit_list_modal);
        assert_eq!(next.edit_list_form.name, "Travel");
        assert_eq!(next.edit_list_form.target_language, "es");
    }

    #[test]
    fn open_edit_word_prefills_from_the_matching_word() {
        let state = loaded_state();
        let next = reduce(&state, DetailsAction::OpenEditWord("w1".into()));
        assert_eq!(next.edit_word_modal.as_deref(), Some("w1"));
        assert_eq!(next.edit_word_form.term, "playa");
        assert_eq!(next.edit_word_form.difficulty, Difficulty::Easy);

        // Unknown word id still opens the modal, with the buffer untouched.
        let next = reduce(&state, DetailsAction::OpenEditWord("missing".into()));
        assert_eq!(next.edit_word_form, state.edit_word_form);
    }

    #[test]
    fn refetch_replaces_the_whole_list() {
        let state = loaded_state();
        let mut updated = sample_list();
        updated.name = "Travel 2024".into();
        updated.words.clear();

        let next = reduce(&state, DetailsAction::FetchSuccess(updated.clone()));
        assert_eq!(next.list, Some(updated));
        // Input untouched.
        assert_eq!(state.list.as_ref().unwrap().name, "Travel");
    }

    #[test]
    fn list_deleted_clears_state() {
        let state = reduce(&loaded_state(), DetailsAction::ConfirmDeleteList);
        let next = reduce(&state, DetailsAction::ListDeleted);
        assert_eq!(next.list, None);
        assert_eq!(next.delete_target, DeleteTarget::None);
    }

    #[test]
    fn fetch_error_keeps_current_list() {
        let state = loaded_state();
        let next = reduce(&state, DetailsAction::FetchError("not found".into()));
        assert_eq!(next.error.as_deref(), Some("not found"));
        assert_eq!(next.list, state.list);
    }
}
