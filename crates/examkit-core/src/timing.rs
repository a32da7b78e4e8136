//! Per-question timing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Records when each question last became the active question.
#[derive(Debug, Clone, Default)]
pub struct TimingTracker {
    start_times: HashMap<String, DateTime<Utc>>,
}

impl TimingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `question_id` as activated at `at`. Re-activating resets its clock.
    pub fn activate(&mut self, question_id: &str, at: DateTime<Utc>) {
        self.start_times.insert(question_id.to_string(), at);
    }

    pub fn started_at(&self, question_id: &str) -> Option<DateTime<Utc>> {
        self.start_times.get(question_id).copied()
    }

    /// Seconds since the question was last activated, clamped at zero.
    /// A question that was never visited has spent zero seconds.
    pub fn time_spent_secs(&self, question_id: &str, now: DateTime<Utc>) -> f64 {
        self.start_times
            .get(question_id)
            .map(|start| seconds_between(*start, now))
            .unwrap_or(0.0)
    }
}

/// Fractional seconds from `start` to `end`, never negative.
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = end.signed_duration_since(start).num_milliseconds();
    (millis as f64 / 1000.0).max(0.0)
}
