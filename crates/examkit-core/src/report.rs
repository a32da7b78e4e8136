//! Attempt summaries and history rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Exam;
use crate::results::AttemptResult;
use crate::statistics::ExamHistory;

/// Flat, denormalized record of one attempt for cross-exam listings.
/// Created once at submission and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub id: Uuid,
    pub exam_id: String,
    pub exam_title: String,
    pub date: DateTime<Utc>,
    pub score: f64,
    pub total_questions: usize,
    pub time_spent_minutes: u64,
    pub time_limit_minutes: u32,
    pub correct_answers: usize,
    pub incorrect_answers: usize,
}

/// Project an attempt result plus exam metadata into a summary record.
pub fn summarize(exam: &Exam, result: &AttemptResult) -> ExamSummary {
    ExamSummary {
        id: Uuid::new_v4(),
        exam_id: result.exam_id.clone(),
        exam_title: exam.title.clone(),
        date: result.end_time,
        score: result.score,
        total_questions: result.total_questions,
        time_spent_minutes: (result.total_time_seconds / 60.0).round().max(0.0) as u64,
        time_limit_minutes: exam.time_limit,
        correct_answers: result.correct_answers,
        incorrect_answers: result.incorrect_answers,
    }
}

impl ExamHistory {
    /// Format the history as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**{}:** {} attempts, average {:.1}%, best {:.1}%, {:.1}s per question\n\n",
            self.exam_id,
            self.total_attempts,
            self.average_score,
            self.best_score,
            self.average_time_per_question
        ));

        if !self.attempts.is_empty() {
            md.push_str("| # | Date | Score | Correct | Time |\n");
            md.push_str("|---|------|-------|---------|------|\n");
            for (i, a) in self.attempts.iter().enumerate() {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {}/{} | {:.0}s |\n",
                    i + 1,
                    a.end_time.format("%Y-%m-%d %H:%M"),
                    a.score,
                    a.correct_answers,
                    a.total_questions,
                    a.total_time_seconds
                ));
            }
        }

        md
    }
}
