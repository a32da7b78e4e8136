//! Running exam history and cross-exam statistics.
//!
//! History averages are maintained incrementally from the prior aggregate and
//! the new attempt; they are never recomputed from the attempts list.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::ExamSummary;
use crate::results::AttemptResult;

/// Aggregate of every attempt at one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamHistory {
    pub exam_id: String,
    /// Attempts in chronological order.
    pub attempts: Vec<AttemptResult>,
    pub average_score: f64,
    pub best_score: f64,
    pub total_attempts: usize,
    /// Running mean of each attempt's seconds per question.
    pub average_time_per_question: f64,
    pub last_attempted: DateTime<Utc>,
}

/// Fold a new attempt into the prior history (or start one).
pub fn fold_history(prior: Option<ExamHistory>, result: AttemptResult) -> ExamHistory {
    let time_per_question = result.time_per_question();

    match prior {
        None => ExamHistory {
            exam_id: result.exam_id.clone(),
            average_score: result.score,
            best_score: result.score,
            total_attempts: 1,
            average_time_per_question: time_per_question,
            last_attempted: result.end_time,
            attempts: vec![result],
        },
        Some(mut history) => {
            let n = history.total_attempts as f64;
            history.average_score = (history.average_score * n + result.score) / (n + 1.0);
            history.best_score = history.best_score.max(result.score);
            history.average_time_per_question =
                (history.average_time_per_question * n + time_per_question) / (n + 1.0);
            history.total_attempts += 1;
            history.last_attempted = result.end_time;
            history.attempts.push(result);
            history
        }
    }
}

/// Statistics over the flat summary list, across all exams.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_attempts: usize,
    pub exams_attempted: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub total_time_minutes: u64,
    /// Attempt count per exam id.
    pub attempts_per_exam: BTreeMap<String, usize>,
}

impl OverallStats {
    pub fn from_summaries(summaries: &[ExamSummary]) -> Self {
        if summaries.is_empty() {
            return Self::default();
        }

        let mut attempts_per_exam = BTreeMap::new();
        for s in summaries {
            *attempts_per_exam.entry(s.exam_id.clone()).or_insert(0) += 1;
        }
        let exams: HashSet<&str> = summaries.iter().map(|s| s.exam_id.as_str()).collect();

        Self {
            total_attempts: summaries.len(),
            exams_attempted: exams.len(),
            average_score: summaries.iter().map(|s| s.score).sum::<f64>() / summaries.len() as f64,
            best_score: summaries.iter().map(|s| s.score).fold(0.0, f64::max),
            total_time_minutes: summaries.iter().map(|s| s.time_spent_minutes).sum(),
            attempts_per_exam,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn attempt(score: f64, total_questions: usize, total_time: f64) -> AttemptResult {
        let start = Utc::now();
        let correct = (score / 100.0 * total_questions as f64).round() as usize;
        AttemptResult {
            id: Uuid::new_v4(),
            exam_id: "e1".into(),
            start_time: start,
            end_time: start + Duration::milliseconds((total_time * 1000.0) as i64),
            total_time_seconds: total_time,
            question_stats: vec![],
            score,
            total_questions,
            correct_answers: correct,
            incorrect_answers: total_questions - correct,
        }
    }

    #[test]
    fn first_fold_seeds_history() {
        let result = attempt(80.0, 5, 100.0);
        let history = fold_history(None, result.clone());
        assert_eq!(history.average_score, 80.0);
        assert_eq!(history.best_score, 80.0);
        assert_eq!(history.total_attempts, 1);
        assert_eq!(history.average_time_per_question, 20.0);
        assert_eq!(history.last_attempted, result.end_time);
        assert_eq!(history.attempts.len(), 1);
    }

    #[test]
    fn sequential_folds_80_then_60() {
        let h1 = fold_history(None, attempt(80.0, 5, 50.0));
        let h2 = fold_history(Some(h1), attempt(60.0, 5, 100.0));
        assert_eq!(h2.average_score, 70.0);
        assert_eq!(h2.best_score, 80.0);
        assert_eq!(h2.total_attempts, 2);
        assert_eq!(h2.attempts.len(), 2);
        assert_eq!(h2.average_time_per_question, 15.0);
        assert_eq!(h2.attempts[1].score, 60.0);
    }

    #[test]
    fn fold_uses_prior_aggregate_not_attempt_list() {
        // A prior history whose attempts list is out of sync with its count.
        let mut prior = fold_history(None, attempt(100.0, 4, 40.0));
        prior.total_attempts = 3;
        prior.average_score = 50.0;

        let folded = fold_history(Some(prior), attempt(10.0, 4, 40.0));
        assert_eq!(folded.average_score, (50.0 * 3.0 + 10.0) / 4.0);
        assert_eq!(folded.total_attempts, 4);
    }

    #[test]
    fn zero_question_attempt_contributes_zero_time() {
        let h1 = fold_history(None, attempt(0.0, 0, 30.0));
        assert_eq!(h1.average_time_per_question, 0.0);
        assert!(h1.average_score.is_finite());

        let h2 = fold_history(
            Some(fold_history(None, attempt(50.0, 2, 20.0))),
            attempt(0.0, 0, 30.0),
        );
        assert_eq!(h2.average_time_per_question, 5.0);
    }

    #[test]
    fn overall_stats_from_summaries() {
        let make = |exam: &str, score: f64, minutes: u64| ExamSummary {
            id: Uuid::new_v4(),
            exam_id: exam.into(),
            exam_title: exam.to_uppercase(),
            date: Utc::now(),
            score,
            total_questions: 4,
            time_spent_minutes: minutes,
            time_limit_minutes: 10,
            correct_answers: 0,
            incorrect_answers: 4,
        };
        let stats = OverallStats::from_summaries(&[
            make("a", 50.0, 3),
            make("b", 100.0, 2),
            make("a", 75.0, 1),
        ]);
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.exams_attempted, 2);
        assert_eq!(stats.average_score, 75.0);
        assert_eq!(stats.best_score, 100.0);
        assert_eq!(stats.total_time_minutes, 6);
        assert_eq!(stats.attempts_per_exam["a"], 2);
    }

    #[test]
    fn overall_stats_empty() {
        assert_eq!(OverallStats::from_summaries(&[]), OverallStats::default());
    }
}
