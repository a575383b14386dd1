use chrono::{
    DateTime,
    Duration,
    Utc,
};
use uuid::Uuid;

use super::forms::{
    AiForm,
    AiFormPatch,
    ListForm,
    ListFormPatch,
    WordForm,
    WordFormPatch,
};
use crate::core::models::{
    MasteryStatus,
    VocabularyList,
    Word,
    WordProgress,
};

pub const PAGE_SIZE: usize = 20;

/// Single source of truth for the list-overview screen.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabState {
    pub lists: Vec<VocabularyList>,
    pub loading: bool,
    pub error: Option<String>,
    pub page: usize,
    pub has_more: bool,
    pub show_list_modal: bool,
    /// Destination list for the word-add form, when the modal is open.
    pub word_modal_list: Option<String>,
    pub list_form: ListForm,
    pub word_form: WordForm,
    pub saving: bool,
    pub show_ai_modal: bool,
    pub ai_form: AiForm,
    pub ai_loading: bool,
}

impl Default for VocabState {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            loading: false,
            error: None,
            page: 1,
            has_more: false,
            show_list_modal: false,
            word_modal_list: None,
            list_form: ListForm::default(),
            word_form: WordForm::default(),
            saving: false,
            show_ai_modal: false,
            ai_form: AiForm::default(),
            ai_loading: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum VocabAction {
    FetchStart,
    FetchSuccess { lists: Vec<VocabularyList>, has_more: bool, page: usize },
    FetchError(String),

    OpenListModal,
    CloseListModal,
    OpenWordModal(String),
    CloseWordModal,
    OpenAiModal,
    CloseAiModal,

    UpdateListForm(ListFormPatch),
    ResetListForm,
    UpdateWordForm(WordFormPatch),
    ResetWordForm,
    UpdateAiForm(AiFormPatch),
    ResetAiForm,

    SaveStart,
    SaveEnd,
    AiStart,
    AiEnd,

    AddWordSuccess { list_id: String, word: Word },
    UpdateWordProgress {
        word_id: String,
        status: MasteryStatus,
        mastery: f32,
        now: DateTime<Utc>,
    },
}

/// Pagination policy: a page counts as "more available" when the returned
/// set fills every page so far. An exactly-full final page reports true and
/// terminates on the next, empty fetch.
pub fn page_has_more(returned: usize, page: usize, limit: usize) -> bool {
    returned >= page * limit
}

/// Pure transition function. Never mutates its input.
pub fn reduce(state: &VocabState, action: VocabAction) -> VocabState {
    let mut next = state.clone();

    match action {
        VocabAction::FetchStart => {
            // Existing lists stay visible while the refetch is in flight.
            next.loading = true;
            next.error = None;
        }
        VocabAction::FetchSuccess { lists, has_more, page } => {
            next.lists = lists;
            next.has_more = has_more;
            next.page = page;
            next.loading = false;
        }
        VocabAction::FetchError(message) => {
            next.loading = false;
            next.error = Some(message);
        }

        VocabAction::OpenListModal => next.show_list_modal = true,
        VocabAction::CloseListModal => next.show_list_modal = false,
        VocabAction::OpenWordModal(list_id) => next.word_modal_list = Some(list_id),
        VocabAction::CloseWordModal => next.word_modal_list = None,
        VocabAction::OpenAiModal => next.show_ai_modal = true,
        VocabAction::CloseAiModal => next.show_ai_modal = false,

        VocabAction::UpdateListForm(patch) => next.list_form = state.list_form.merged(patch),
        VocabAction::ResetListForm => next.list_form = ListForm::default(),
        VocabAction::UpdateWordForm(patch) => next.word_form = state.word_form.merged(patch),
        VocabAction::ResetWordForm => next.word_form = WordForm::default(),
        VocabAction::UpdateAiForm(patch) => next.ai_form = state.ai_form.merged(patch),
        VocabAction::ResetAiForm => next.ai_form = AiForm::default(),

        VocabAction::SaveStart => next.saving = true,
        VocabAction::SaveEnd => next.saving = false,
        VocabAction::AiStart => next.ai_loading = true,
        VocabAction::AiEnd => next.ai_loading = false,

        VocabAction::AddWordSuccess { list_id, word } => {
            next.lists = state
                .lists
                .iter()
                .map(|list| {
                    if list.id != list_id {
                        return list.clone();
                    }
                    let mut updated = list.clone();
                    updated.words.push(word.clone());
                    if let Some(counts) = updated.counts.as_mut() {
                        counts.words += 1;
                    }
                    updated
                })
                .collect();
        }

        VocabAction::UpdateWordProgress { word_id, status, mastery, now } => {
            // Eager: every list is scanned, not just the visible one. The
            // word id is globally unique so at most one word per list hits.
            next.lists = state
                .lists
                .iter()
                .map(|list| {
                    let mut updated = list.clone();
                    updated.words = list
                        .words
                        .iter()
                        .map(|word| {
                            if word.id != word_id {
                                return word.clone();
                            }
                            let mut word = word.clone();
                            word.progress = Some(optimistic_progress(
                                word.progress.as_ref(),
                                &word.id,
                                status,
                                mastery,
                                now,
                            ));
                            word
                        })
                        .collect();
                    updated
                })
                .collect();
        }
    }

    next
}

/// Local guess at what the server will persist. Fields we cannot know yet
/// (progress id, owner) get placeholders; the next authoritative fetch
/// replaces the whole record.
fn optimistic_progress(
    existing: Option<&WordProgress>,
    word_id: &str,
    status: MasteryStatus,
    mastery: f32,
    now: DateTime<Utc>,
) -> WordProgress {
    let (id, user_id, review_count, streak) = match existing {
        Some(p) => (p.id.clone(), p.user_id.clone(), p.review_count, p.streak),
        None => (Uuid::new_v4().to_string(), String::new(), 0, 0),
    };

    WordProgress {
        id,
        word_id: word_id.to_string(),
        user_id,
        mastery,
        status,
        review_count: review_count + 1,
        streak: if status == MasteryStatus::Mastered { streak + 1 } else { 0 },
        last_reviewed: Some(now),
        next_review: Some(now + Duration::seconds((mastery as f64 * 7.0 * 86400.0) as i64)),
    }
}
