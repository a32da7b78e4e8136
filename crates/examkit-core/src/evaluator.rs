//! Answer correctness rules.
//!
//! This is the only place answers are compared against expected answers.
//! Scoring and review both call [`is_correct`].

use std::collections::HashSet;

use crate::model::{Answer, Question, QuestionType};

/// Decide whether `answer` is a correct response to `question`.
///
/// Unanswered questions, answers of the wrong shape, questions missing their
/// answer key, and unknown question types are all incorrect. Never panics.
pub fn is_correct(question: &Question, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match question.question_type {
        QuestionType::MultipleChoice => match (answer.as_single(), &question.correct_answer) {
            (Some(given), Some(expected)) => given == expected,
            _ => false,
        },
        QuestionType::Checkbox => match (answer.as_multiple(), &question.correct_answers) {
            (Some(given), Some(expected)) => same_set(given, expected),
            _ => false,
        },
        QuestionType::Text => match (answer.as_single(), &question.correct_answer) {
            (Some(given), Some(expected)) => normalize_text(given) == normalize_text(expected),
            _ => false,
        },
        QuestionType::Unknown => false,
    }
}

/// Exact set equality: same cardinality and every expected item selected.
fn same_set(given: &[String], expected: &[String]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    let selected: HashSet<&str> = given.iter().map(String::as_str).collect();
    expected.iter().all(|e| selected.contains(e.as_str()))
}

fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}
