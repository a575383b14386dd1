use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Learning state of a word. The server contract is the three-state form
/// below; some older endpoints still emit "learned", which collapses onto
/// `Mastered` at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStatus {
    NotStarted,
    Learning,
    #[serde(alias = "learned")]
    Mastered,
}

impl MasteryStatus {
    /// Binary rule used by optimistic local updates. Server-side mastery
    /// follows a spaced-repetition curve and may land anywhere in [0, 1];
    /// the next authoritative fetch overwrites whatever this guessed.
    pub fn optimistic_mastery(&self) -> f32 {
        match self {
            MasteryStatus::Mastered => 1.0,
            _ => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryStatus::NotStarted => "not_started",
            MasteryStatus::Learning => "learning",
            MasteryStatus::Mastered => "mastered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    pub id: String,
    pub word_id: String,
    #[serde(default)]
    pub user_id: String,
    /// Recall confidence in [0, 1].
    pub mastery: f32,
    pub status: MasteryStatus,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub term: String,
    pub translation: String,
    pub part_of_speech: String,
    pub difficulty: Difficulty,
    pub list_id: String,
    #[serde(default)]
    pub progress: Option<WordProgress>,
}

/// Server-side aggregate counts (`_count` in the wire shape). Advisory: once
/// the word collection is loaded, `words.len()` is the displayed truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCounts {
    pub words: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_id: String,
    pub target_language: String,
    pub native_language: String,
    #[serde(default, rename = "_count", skip_serializing_if = "Option::is_none")]
    pub counts: Option<ListCounts>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl VocabularyList {
    /// Displayed word count: the loaded collection wins over the advisory
    /// aggregate, which can be stale relative to the fetched slice.
    pub fn word_count(&self) -> usize {
        if self.words.is_empty() {
            self.counts.map(|c| c.words as usize).unwrap_or(0)
        } else {
            self.words.len()
        }
    }

    pub fn word(&self, word_id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == word_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_learned_status_maps_to_mastered() {
        let status: MasteryStatus = serde_json::from_str("\"learned\"").unwrap();
        assert_eq!(status, MasteryStatus::Mastered);

        let status: MasteryStatus = serde_json::from_str("\"learning\"").unwrap();
        assert_eq!(status, MasteryStatus::Learning);

        let status: MasteryStatus = serde_json::from_str("\"not_started\"").unwrap();
        assert_eq!(status, MasteryStatus::NotStarted);
    }

    #[test]
    fn status_serializes_to_authoritative_contract() {
        assert_eq!(serde_json::to_string(&MasteryStatus::Mastered).unwrap(), "\"mastered\"");
        assert_eq!(MasteryStatus::Mastered.as_str(), "mastered");
    }

    #[test]
    fn optimistic_mastery_is_binary() {
        assert_eq!(MasteryStatus::Mastered.optimistic_mastery(), 1.0);
        assert_eq!(MasteryStatus::Learning.optimistic_mastery(), 0.0);
        assert_eq!(MasteryStatus::NotStarted.optimistic_mastery(), 0.0);
    }

    #[test]
    fn list_deserializes_camel_case_wire_shape() {
        let json = r#"{
            "id": "l1",
            "name": "Travel",
            "description": "Trip words",
            "userId": "u1",
            "targetLanguage": "es",
            "nativeLanguage": "en",
            "_count": { "words": 2 },
            "words": [{
                "id": "w1",
                "term": "playa",
                "translation": "beach",
                "partOfSpeech": "noun",
                "difficulty": "easy",
                "listId": "l1",
                "progress": {
                    "id": "p1",
                    "wordId": "w1",
                    "userId": "u1",
                    "mastery": 0.25,
                    "status": "learning",
                    "reviewCount": 3,
                    "streak": 1
                }
            }]
        }"#;

        let list: VocabularyList = serde_json::from_str(json).unwrap();
        assert_eq!(list.name, "Travel");
        assert_eq!(list.target_language, "es");
        assert_eq!(list.counts, Some(ListCounts { words: 2 }));
        assert_eq!(list.words[0].difficulty, Difficulty::Easy);
        let progress = list.words[0].progress.as_ref().unwrap();
        assert_eq!(progress.status, MasteryStatus::Learning);
        assert_eq!(progress.review_count, 3);
    }

    #[test]
    fn loaded_words_win_over_stale_aggregate() {
        let json = r#"{
            "id": "l1",
            "name": "Travel",
            "targetLanguage": "es",
            "nativeLanguage": "en",
            "_count": { "words": 7 },
            "words": [{
                "id": "w1", "term": "playa", "translation": "beach",
                "partOfSpeech": "noun", "difficulty": "easy", "listId": "l1"
            }]
        }"#;
        let list: VocabularyList = serde_json::from_str(json).unwrap();
        assert_eq!(list.word_count(), 1);

        let json = r#"{
            "id": "l2",
            "name": "Food",
            "targetLanguage": "es",
            "nativeLanguage": "en",
            "_count": { "words": 7 }
        }"#;
        let unloaded: VocabularyList = serde_json::from_str(json).unwrap();
        assert_eq!(unloaded.word_count(), 7);
    }
}
