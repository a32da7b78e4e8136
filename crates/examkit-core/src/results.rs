//! Attempt scoring: per-question stats and the attempt result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluator::is_correct;
use crate::model::{Answer, AnswerMap, Exam};
use crate::timing::{seconds_between, TimingTracker};

/// Correctness and timing for one question in one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStat {
    pub question_id: String,
    pub time_spent_seconds: f64,
    pub is_correct: bool,
    /// Always 1; retries within an attempt are not counted.
    pub attempts: u32,
    pub last_attempted: DateTime<Utc>,
}

/// The outcome of one submitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub id: Uuid,
    pub exam_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Wall-clock seconds from attempt start to submission.
    pub total_time_seconds: f64,
    pub question_stats: Vec<QuestionStat>,
    /// Percentage in `0.0..=100.0`.
    pub score: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub incorrect_answers: usize,
}

impl AttemptResult {
    /// A zero-score result with no question stats, used when there is nothing
    /// to score.
    pub fn neutral(exam_id: impl Into<String>, start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            exam_id: exam_id.into(),
            start_time: start,
            end_time: now,
            total_time_seconds: seconds_between(start, now),
            question_stats: Vec::new(),
            score: 0.0,
            total_questions: 0,
            correct_answers: 0,
            incorrect_answers: 0,
        }
    }

    /// Average wall-clock seconds per question; zero for an empty exam.
    pub fn time_per_question(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.total_time_seconds / self.total_questions as f64
        }
    }
}

/// Score an attempt. Pure: persisting the result is the caller's job.
pub fn score_attempt(
    exam: &Exam,
    answers: &AnswerMap,
    timing: &TimingTracker,
    exam_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AttemptResult {
    if exam.questions.is_empty() {
        return AttemptResult::neutral(&exam.id, exam_start, now);
    }

    let question_stats: Vec<QuestionStat> = exam
        .questions
        .iter()
        .map(|q| QuestionStat {
            question_id: q.id.clone(),
            time_spent_seconds: timing.time_spent_secs(&q.id, now),
            is_correct: is_correct(q, answers.get(&q.id)),
            attempts: 1,
            last_attempted: now,
        })
        .collect();

    let total_questions = question_stats.len();
    let correct_answers = question_stats.iter().filter(|s| s.is_correct).count();
    let score = 100.0 * correct_answers as f64 / total_questions as f64;

    AttemptResult {
        id: Uuid::new_v4(),
        exam_id: exam.id.clone(),
        start_time: exam_start,
        end_time: now,
        total_time_seconds: seconds_between(exam_start, now),
        question_stats,
        score,
        total_questions,
        correct_answers,
        incorrect_answers: total_questions - correct_answers,
    }
}

/// One row of post-submission review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question_id: String,
    pub prompt: String,
    pub given: Option<Answer>,
    pub expected: Option<Answer>,
    pub is_correct: bool,
}

/// Compare every answer against its question for display after submission.
pub fn review_attempt(exam: &Exam, answers: &AnswerMap) -> Vec<QuestionReview> {
    exam.questions
        .iter()
        .map(|q| {
            let given = answers.get(&q.id).cloned();
            QuestionReview {
                question_id: q.id.clone(),
                prompt: q.prompt.clone(),
                is_correct: is_correct(q, given.as_ref()),
                given,
                expected: q.expected_answer(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use chrono::Duration;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_exam() -> Exam {
        Exam::new("e1", "Sample")
            .with_question(Question::multiple_choice("q1", "", strings(&["A", "B"]), "A"))
            .with_question(Question::checkbox(
                "q2",
                "",
                strings(&["X", "Y", "Z"]),
                strings(&["X", "Y"]),
            ))
    }

    fn answers(pairs: Vec<(&str, Answer)>) -> AnswerMap {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn all_correct_scores_100() {
        let t0 = Utc::now();
        let given = answers(vec![
            ("q1", Answer::Single("A".into())),
            ("q2", Answer::Multiple(strings(&["Y", "X"]))),
        ]);
        let result = score_attempt(&sample_exam(), &given, &TimingTracker::new(), t0, t0);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.incorrect_answers, 0);
        assert_eq!(result.total_questions, 2);
    }

    #[test]
    fn all_wrong_scores_zero() {
        let t0 = Utc::now();
        let given = answers(vec![
            ("q1", Answer::Single("B".into())),
            ("q2", Answer::Multiple(strings(&["X"]))),
        ]);
        let result = score_attempt(&sample_exam(), &given, &TimingTracker::new(), t0, t0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.correct_answers, 0);
    }

    #[test]
    fn empty_answers_are_all_incorrect() {
        let t0 = Utc::now();
        let result = score_attempt(
            &sample_exam(),
            &AnswerMap::new(),
            &TimingTracker::new(),
            t0,
            t0,
        );
        assert_eq!(result.score, 0.0);
        assert_eq!(result.incorrect_answers, 2);
        assert_eq!(result.question_stats.len(), 2);
        assert!(result.question_stats.iter().all(|s| s.attempts == 1));
    }

    #[test]
    fn partial_score() {
        let t0 = Utc::now();
        let given = answers(vec![("q1", Answer::Single("A".into()))]);
        let result = score_attempt(&sample_exam(), &given, &TimingTracker::new(), t0, t0);
        assert_eq!(result.score, 50.0);
        assert_eq!(result.correct_answers + result.incorrect_answers, result.total_questions);
    }

    #[test]
    fn zero_questions_is_neutral() {
        let t0 = Utc::now();
        let exam = Exam::new("empty", "Empty");
        let result = score_attempt(&exam, &AnswerMap::new(), &TimingTracker::new(), t0, t0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.total_questions, 0);
        assert!(result.question_stats.is_empty());
        assert_eq!(result.time_per_question(), 0.0);
    }

    #[test]
    fn total_time_is_wall_clock_not_sum() {
        let t0 = Utc::now();
        let mut timing = TimingTracker::new();
        timing.activate("q1", t0 + Duration::seconds(50));
        timing.activate("q2", t0 + Duration::seconds(80));
        let now = t0 + Duration::seconds(90);

        let result = score_attempt(&sample_exam(), &AnswerMap::new(), &timing, t0, now);
        assert_eq!(result.total_time_seconds, 90.0);
        assert_eq!(result.question_stats[0].time_spent_seconds, 40.0);
        assert_eq!(result.question_stats[1].time_spent_seconds, 10.0);
        assert_eq!(result.start_time, t0);
        assert_eq!(result.end_time, now);
    }

    #[test]
    fn stats_preserve_question_order() {
        let t0 = Utc::now();
        let result = score_attempt(
            &sample_exam(),
            &AnswerMap::new(),
            &TimingTracker::new(),
            t0,
            t0,
        );
        let ids: Vec<&str> = result.question_stats.iter().map(|s| s.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[test]
    fn review_reports_expected_answers() {
        let given = answers(vec![("q1", Answer::Single("B".into()))]);
        let review = review_attempt(&sample_exam(), &given);
        assert_eq!(review.len(), 2);
        assert!(!review[0].is_correct);
        assert_eq!(review[0].expected, Some(Answer::Single("A".into())));
        assert_eq!(review[1].given, None);
    }
}
