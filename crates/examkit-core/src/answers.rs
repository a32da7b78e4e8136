//! In-progress answers for one exam, written through to the store.

use std::sync::Arc;

use crate::model::{Answer, AnswerMap};
use crate::store::{read_json, write_json};
use crate::traits::{answers_key, KeyValueStore};

/// Answers for the current attempt at one exam.
///
/// Every mutation is persisted under `exam-answers-{examId}` so an attempt
/// survives a restart. Persistence is best-effort.
pub struct AnswerStore {
    exam_id: String,
    answers: AnswerMap,
    store: Arc<dyn KeyValueStore>,
}

impl AnswerStore {
    /// Open the answer set for `exam_id`, loading anything previously saved.
    pub fn open(store: Arc<dyn KeyValueStore>, exam_id: &str) -> Self {
        let answers = read_json(store.as_ref(), &answers_key(exam_id)).unwrap_or_default();
        Self {
            exam_id: exam_id.to_string(),
            answers,
            store,
        }
    }

    pub fn exam_id(&self) -> &str {
        &self.exam_id
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn set(&mut self, question_id: &str, answer: Answer) {
        self.answers.insert(question_id.to_string(), answer);
        self.persist();
    }

    /// Mark a question unanswered again.
    pub fn clear(&mut self, question_id: &str) {
        if self.answers.remove(question_id).is_some() {
            self.persist();
        }
    }

    /// Drop every answer and the stored copy.
    pub fn clear_all(&mut self) {
        self.answers.clear();
        if let Err(e) = self.store.remove(&answers_key(&self.exam_id)) {
            tracing::error!("failed to clear saved answers for {}: {e}", self.exam_id);
        }
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    fn persist(&self) {
        write_json(self.store.as_ref(), &answers_key(&self.exam_id), &self.answers);
    }
}
