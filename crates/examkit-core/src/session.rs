//! The attempt lifecycle: start, answer, tick, submit.
//!
//! A session moves `NotStarted -> InProgress -> Submitted` and never back.
//! Submission (explicit or on timer expiry) runs scoring, the history fold,
//! and the summary append exactly once; later submits return `None`.

use chrono::{DateTime, Utc};

use crate::answers::AnswerStore;
use crate::model::{Answer, AnswerMap, Exam, Question};
use crate::report::{summarize, ExamSummary};
use crate::repository::ExamRepository;
use crate::results::{review_attempt, score_attempt, AttemptResult, QuestionReview};
use crate::statistics::{fold_history, ExamHistory};
use crate::timing::{seconds_between, TimingTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Submitted,
}

/// Everything produced by a submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub result: AttemptResult,
    /// The updated history. Covers only this attempt when the stored
    /// history could not be read; the stored copy is then left as is.
    pub history: ExamHistory,
    pub summary: ExamSummary,
}

/// What a countdown tick observed.
#[derive(Debug)]
pub enum TickOutcome {
    /// The session is not in progress; the countdown should stop.
    Idle,
    /// No time limit.
    Untimed,
    /// Whole seconds remaining, rounded up.
    Remaining(u64),
    /// Time ran out and the attempt was submitted by this tick.
    Expired(Box<Submission>),
}

pub struct AttemptSession {
    exam: Exam,
    repo: ExamRepository,
    answers: AnswerStore,
    timing: TimingTracker,
    state: AttemptState,
    started_at: Option<DateTime<Utc>>,
    current: usize,
}

impl AttemptSession {
    /// Prepare a session for `exam`. Answers saved by an earlier,
    /// unsubmitted run are picked up.
    pub fn new(repo: ExamRepository, exam: Exam) -> Self {
        let answers = repo.answer_store(&exam.id);
        Self {
            exam,
            repo,
            answers,
            timing: TimingTracker::new(),
            state: AttemptState::NotStarted,
            started_at: None,
            current: 0,
        }
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn answers(&self) -> &AnswerMap {
        self.answers.answers()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.exam.questions.get(self.current)
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.state != AttemptState::NotStarted {
            return;
        }
        self.state = AttemptState::InProgress;
        self.started_at = Some(now);
        self.current = 0;
        if let Some(q) = self.exam.questions.first() {
            self.timing.activate(&q.id, now);
        }
        tracing::info!(
            "started attempt at {} ({} questions, {} resumed answers)",
            self.exam.id,
            self.exam.questions.len(),
            self.answers.len()
        );
    }

    /// Make question `index` the active one. Returns `false` when out of
    /// range or not in progress.
    pub fn activate(&mut self, index: usize, now: DateTime<Utc>) -> bool {
        if self.state != AttemptState::InProgress {
            return false;
        }
        let Some(q) = self.exam.questions.get(index) else {
            return false;
        };
        self.timing.activate(&q.id, now);
        self.current = index;
        true
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> bool {
        self.activate(self.current + 1, now)
    }

    pub fn previous(&mut self, now: DateTime<Utc>) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.activate(index, now),
            None => false,
        }
    }

    pub fn set_answer(&mut self, question_id: &str, answer: Answer) -> bool {
        if self.state != AttemptState::InProgress {
            return false;
        }
        self.answers.set(question_id, answer);
        true
    }

    pub fn clear_answer(&mut self, question_id: &str) -> bool {
        if self.state != AttemptState::InProgress {
            return false;
        }
        self.answers.clear(question_id);
        true
    }

    /// Seconds left, rounded up. `None` when untimed or not started.
    pub fn time_left(&self, now: DateTime<Utc>) -> Option<u64> {
        let limit = self.exam.time_limit_secs()?;
        let started = self.started_at?;
        let remaining = limit as f64 - seconds_between(started, now);
        Some(remaining.max(0.0).ceil() as u64)
    }

    /// Advance the countdown. Submits when the limit has been reached.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state != AttemptState::InProgress {
            return TickOutcome::Idle;
        }
        match self.time_left(now) {
            None => TickOutcome::Untimed,
            Some(0) => {
                tracing::info!("time limit reached for {}, submitting", self.exam.id);
                match self.submit(now) {
                    Some(submission) => TickOutcome::Expired(Box::new(submission)),
                    None => TickOutcome::Idle,
                }
            }
            Some(secs) => TickOutcome::Remaining(secs),
        }
    }

    /// Score and record the attempt. Only the first call while in progress
    /// does anything.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<Submission> {
        if self.state != AttemptState::InProgress {
            tracing::debug!("ignoring submit for {} in state {:?}", self.exam.id, self.state);
            return None;
        }
        self.state = AttemptState::Submitted;
        let started = self.started_at.unwrap_or(now);

        let result = score_attempt(&self.exam, self.answers.answers(), &self.timing, started, now);
        let history = match self.repo.history_for_update(&self.exam.id) {
            Ok(prior) => {
                let history = fold_history(prior, result.clone());
                self.repo.save_history(&history);
                history
            }
            Err(e) => {
                tracing::error!("leaving history for {} unchanged: {e}", self.exam.id);
                fold_history(None, result.clone())
            }
        };

        let summary = summarize(&self.exam, &result);
        self.repo.append_summary(summary.clone());

        tracing::info!(
            "submitted {}: {}/{} correct ({:.1}%)",
            self.exam.id,
            result.correct_answers,
            result.total_questions,
            result.score
        );
        Some(Submission {
            result,
            history,
            summary,
        })
    }

    pub fn review(&self) -> Vec<QuestionReview> {
        review_attempt(&self.exam, self.answers.answers())
    }

    /// Remove the saved in-progress answers, normally after submission.
    pub fn discard_saved_answers(&mut self) {
        self.answers.clear_all();
    }
}
