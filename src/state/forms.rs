use crate::core::models::Difficulty;

/// Buffer behind the create/edit list modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListForm {
    pub name: String,
    pub description: String,
    pub target_language: String,
    pub native_language: String,
}

/// Partial update for `ListForm`. Only populated fields are applied, so a
/// sequence of patches behaves like a shallow merge in order.
#[derive(Debug, Clone, Default)]
pub struct ListFormPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_language: Option<String>,
    pub native_language: Option<String>,
}

impl ListForm {
    pub fn merged(&self, patch: ListFormPatch) -> ListForm {
        ListForm {
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            target_language: patch.target_language.unwrap_or_else(|| self.target_language.clone()),
            native_language: patch.native_language.unwrap_or_else(|| self.native_language.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordForm {
    pub term: String,
    pub translation: String,
    pub part_of_speech: String,
    pub difficulty: Difficulty,
}

impl Default for WordForm {
    fn default() -> Self {
        Self {
            term: String::new(),
            translation: String::new(),
            part_of_speech: String::new(),
            difficulty: Difficulty::Medium,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordFormPatch {
    pub term: Option<String>,
    pub translation: Option<String>,
    pub part_of_speech: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl WordForm {
    pub fn merged(&self, patch: WordFormPatch) -> WordForm {
        WordForm {
            term: patch.term.unwrap_or_else(|| self.term.clone()),
            translation: patch.translation.unwrap_or_else(|| self.translation.clone()),
            part_of_speech: patch.part_of_speech.unwrap_or_else(|| self.part_of_speech.clone()),
            difficulty: patch.difficulty.unwrap_or(self.difficulty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiForm {
    pub topic: String,
    pub difficulty: Difficulty,
    pub word_count: u32,
}

impl Default for AiForm {
    fn default() -> Self {
        Self { topic: String::new(), difficulty: Difficulty::Medium, word_count: 10 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AiFormPatch {
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub word_count: Option<u32>,
}

impl AiForm {
    pub fn merged(&self, patch: AiFormPatch) -> AiForm {
        AiForm {
            topic: patch.topic.unwrap_or_else(|| self.topic.clone()),
            difficulty: patch.difficulty.unwrap_or(self.difficulty),
            word_count: patch.word_count.unwrap_or(self.word_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patches_shallow_merge_in_order() {
        let form = ListForm::default();
        let merged = form
            .merged(ListFormPatch { name: Some("Travel".into()), ..Default::default() })
            .merged(ListFormPatch {
                description: Some("Trip words".into()),
                target_language: Some("es".into()),
                ..Default::default()
            })
            .merged(ListFormPatch { name: Some("Travel 2024".into()), ..Default::default() });

        assert_eq!(merged.name, "Travel 2024");
        assert_eq!(merged.description, "Trip words");
        assert_eq!(merged.target_language, "es");
        assert_eq!(merged.native_language, "");
    }

    #[test]
    fn empty_patch_is_identity() {
        let form = ListForm {
            name: "Travel".into(),
            description: "Trip words".into(),
            target_language: "es".into(),
            native_language: "en".into(),
        };
        assert_eq!(form.merged(ListFormPatch::default()), form);
    }

    #[test]
    fn word_form_defaults_to_medium() {
        let form = WordForm::default();
        assert_eq!(form.difficulty, Difficulty::Medium);

        let merged = form.merged(WordFormPatch {
            difficulty: Some(Difficulty::Hard),
            term: Some("playa".into()),
            ..Default::default()
        });
        assert_eq!(merged.difficulty, Difficulty::Hard);
        assert_eq!(merged.translation, "");
    }
}
