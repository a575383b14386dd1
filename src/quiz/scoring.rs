use std::sync::OnceLock;

use rand::seq::SliceRandom;
use regex::Regex;

use super::types::{
    QuestionKind,
    Quiz,
    QuizAttempt,
    QuizQuestion,
};

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Normalize a free-text answer for comparison: case-folded, trimmed,
/// inner whitespace collapsed.
pub fn normalize_answer(answer: &str) -> String {
    whitespace().replace_all(answer.trim(), " ").to_lowercase()
}

/// Client-side mirror of the server's per-question comparison. Choices must
/// match exactly (they are picked, not typed); free text is normalized.
pub fn grade_answer(question: &QuizQuestion, answer: &str) -> bool {
    match question.kind {
        QuestionKind::MultipleChoice => answer.trim() == question.correct_answer,
        QuestionKind::FreeText => {
            normalize_answer(answer) == normalize_answer(&question.correct_answer)
        }
    }
}

/// Grade a full answer set the way the server will, in question order.
/// Missing answers count as incorrect.
pub fn score_submission(quiz: &Quiz, answers: &[(String, String)]) -> (u32, u32) {
    let correct = quiz
        .questions
        .iter()
        .filter(|question| {
            answers
                .iter()
                .find(|(question_id, _)| *question_id == question.id)
                .is_some_and(|(_, answer)| grade_answer(question, answer))
        })
        .count() as u32;

    (correct, quiz.questions.len() as u32)
}

/// One row of the post-submit review screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReview {
    pub question: QuizQuestion,
    pub given_answer: String,
    pub is_correct: bool,
}

/// Merge the returned attempt into per-question review rows, in quiz order.
/// The server verdict wins where present; a question the attempt does not
/// cover is graded locally against an empty answer.
pub fn review_attempt(quiz: &Quiz, attempt: &QuizAttempt) -> Vec<QuestionReview> {
    quiz.questions
        .iter()
        .map(|question| {
            match attempt.answers.iter().find(|a| a.question_id == question.id) {
                Some(graded) => QuestionReview {
                    question: question.clone(),
                    given_answer: graded.answer.clone(),
                    is_correct: graded.is_correct,
                },
                None => QuestionReview {
                    question: question.clone(),
                    given_answer: String::new(),
                    is_correct: grade_answer(question, ""),
                },
            }
        })
        .collect()
}

/// Presentation order for multiple-choice options.
pub fn shuffled_options(question: &QuizQuestion) -> Vec<String> {
    let mut options = question.parsed_options();
    options.shuffle(&mut rand::rng());
    options
}
