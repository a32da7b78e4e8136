//! Core data model types for examkit.
//!
//! Exams, questions, and answers as they are persisted in the key-value store.
//! Field names serialize in camelCase to match the stored layout.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a question, which decides how answers are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Single correct option, exact string match.
    MultipleChoice,
    /// Multi-select, exact set match.
    Checkbox,
    /// Free-form text, trimmed and case-insensitive match.
    Text,
    /// Anything this version does not recognise. Never scored as correct.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple-choice"),
            QuestionType::Checkbox => write!(f, "checkbox"),
            QuestionType::Text => write!(f, "text"),
            QuestionType::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple-choice" | "multiple_choice" | "mc" => Ok(QuestionType::MultipleChoice),
            "checkbox" | "multi-select" => Ok(QuestionType::Checkbox),
            "text" | "free-text" => Ok(QuestionType::Text),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A single question within an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, unique within its exam.
    pub id: String,
    /// Question type.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The question text shown to the user.
    #[serde(default)]
    pub prompt: String,
    /// Selectable options (multiple-choice and checkbox).
    #[serde(default)]
    pub options: Vec<String>,
    /// Correct answer for multiple-choice and text questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Correct answer set for checkbox questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<Vec<String>>,
}

impl Question {
    pub fn multiple_choice(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_type: QuestionType::MultipleChoice,
            prompt: prompt.into(),
            options,
            correct_answer: Some(correct.into()),
            correct_answers: None,
        }
    }

    pub fn checkbox(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_type: QuestionType::Checkbox,
            prompt: prompt.into(),
            options,
            correct_answer: None,
            correct_answers: Some(correct),
        }
    }

    pub fn text(
        id: impl Into<String>,
        prompt: impl Into<String>,
        correct: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_type: QuestionType::Text,
            prompt: prompt.into(),
            options: Vec::new(),
            correct_answer: Some(correct.into()),
            correct_answers: None,
        }
    }

    /// The expected answer in the shape the question type calls for.
    pub fn expected_answer(&self) -> Option<Answer> {
        match self.question_type {
            QuestionType::MultipleChoice | QuestionType::Text => {
                self.correct_answer.clone().map(Answer::Single)
            }
            QuestionType::Checkbox => self.correct_answers.clone().map(Answer::Multiple),
            QuestionType::Unknown => None,
        }
    }
}

/// An exam: an ordered list of questions with a time limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    /// Unique identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Time limit in minutes. Zero means untimed.
    #[serde(default)]
    pub time_limit: u32,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Folder the exam is filed under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Exam {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            time_limit: 0,
            questions: Vec::new(),
            folder_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit = minutes;
        self
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Time limit in seconds, or `None` for an untimed exam.
    pub fn time_limit_secs(&self) -> Option<u64> {
        (self.time_limit > 0).then(|| u64::from(self.time_limit) * 60)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// A user's answer to one question.
///
/// Stored untagged: a bare string for multiple-choice and text questions, a
/// list of strings for checkbox questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Answer::Single(s) => Some(s),
            Answer::Multiple(_) => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Answer::Single(_) => None,
            Answer::Multiple(v) => Some(v),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(s) => write!(f, "{s}"),
            Answer::Multiple(v) => write!(f, "{}", v.join(", ")),
        }
    }
}

/// Answers for one attempt, keyed by question id.
pub type AnswerMap = HashMap<String, Answer>;

/// A folder exams can be filed under. Owned by the folder backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    /// Opaque icon payload (emoji, name, or encoded image). Never decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(name: impl Into<String>, icon: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon,
            created_at: Utc::now(),
        }
    }
}
