//! Typed access to everything the engine keeps in the key-value store.
//!
//! All reads and writes of exams, histories, and summaries go through
//! [`ExamRepository`]; nothing else touches those keys directly.

use std::sync::Arc;

use crate::answers::AnswerStore;
use crate::error::StoreError;
use crate::model::Exam;
use crate::report::ExamSummary;
use crate::statistics::ExamHistory;
use crate::store::{read_for_update, read_json, try_write_json, write_json};
use crate::traits::{history_key, KeyValueStore, EXAMS_KEY, SUMMARIES_KEY};

#[derive(Clone)]
pub struct ExamRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ExamRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    // Exams

    /// All stored exams. A missing or malformed list reads as empty.
    pub fn exams(&self) -> Vec<Exam> {
        read_json(self.store.as_ref(), EXAMS_KEY).unwrap_or_default()
    }

    /// The stored exam list for a read-modify-write. Unlike [`Self::exams`],
    /// a read failure other than malformed JSON is an error.
    pub fn exams_for_update(&self) -> Result<Vec<Exam>, StoreError> {
        Ok(read_for_update(self.store.as_ref(), EXAMS_KEY)?.unwrap_or_default())
    }

    pub fn find_exam(&self, exam_id: &str) -> Option<Exam> {
        self.exams().into_iter().find(|e| e.id == exam_id)
    }

    pub fn save_exams(&self, exams: &[Exam]) -> Result<(), StoreError> {
        try_write_json(self.store.as_ref(), EXAMS_KEY, exams)
    }

    /// Insert `exam`, replacing any exam with the same id in place.
    /// Returns `true` if an existing exam was replaced.
    pub fn upsert_exam(&self, exam: Exam) -> Result<bool, StoreError> {
        let mut exams = self.exams_for_update()?;
        let replaced = match exams.iter_mut().find(|e| e.id == exam.id) {
            Some(existing) => {
                *existing = exam;
                true
            }
            None => {
                exams.push(exam);
                false
            }
        };
        self.save_exams(&exams)?;
        Ok(replaced)
    }

    // History

    pub fn history(&self, exam_id: &str) -> Option<ExamHistory> {
        read_json(self.store.as_ref(), &history_key(exam_id))
    }

    /// The prior history ahead of folding a new attempt into it.
    pub fn history_for_update(&self, exam_id: &str) -> Result<Option<ExamHistory>, StoreError> {
        read_for_update(self.store.as_ref(), &history_key(exam_id))
    }

    pub fn save_history(&self, history: &ExamHistory) -> bool {
        write_json(self.store.as_ref(), &history_key(&history.exam_id), history)
    }

    // Summaries

    /// The cross-exam summary list, oldest first.
    pub fn summaries(&self) -> Vec<ExamSummary> {
        read_json(self.store.as_ref(), SUMMARIES_KEY).unwrap_or_default()
    }

    /// Append one summary. Existing entries are never modified: if the list
    /// cannot be read, nothing is written and `false` is returned.
    pub fn append_summary(&self, summary: ExamSummary) -> bool {
        let mut summaries: Vec<ExamSummary> =
            match read_for_update(self.store.as_ref(), SUMMARIES_KEY) {
                Ok(existing) => existing.unwrap_or_default(),
                Err(e) => {
                    tracing::error!("not recording summary for {}: {e}", summary.exam_id);
                    return false;
                }
            };
        summaries.push(summary);
        write_json(self.store.as_ref(), SUMMARIES_KEY, &summaries)
    }

    // Answers

    pub fn answer_store(&self, exam_id: &str) -> AnswerStore {
        AnswerStore::open(self.store(), exam_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::AttemptResult;
    use crate::report::summarize;
    use crate::statistics::fold_history;
    use crate::store::testing::UnreadableStore;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn repo() -> ExamRepository {
        ExamRepository::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn upsert_replaces_by_id() {
        let repo = repo();
        assert!(!repo.upsert_exam(Exam::new("e1", "First")).unwrap());
        assert!(!repo.upsert_exam(Exam::new("e2", "Second")).unwrap());
        assert!(repo.upsert_exam(Exam::new("e1", "Renamed")).unwrap());

        let exams = repo.exams();
        assert_eq!(exams.len(), 2);
        assert_eq!(exams[0].title, "Renamed");
        assert_eq!(repo.find_exam("e2").unwrap().title, "Second");
        assert!(repo.find_exam("e3").is_none());
    }

    #[test]
    fn malformed_exam_list_reads_empty() {
        let repo = repo();
        repo.store().set("exams", "oops").unwrap();
        assert!(repo.exams().is_empty());
    }

    #[test]
    fn history_roundtrip() {
        let repo = repo();
        assert!(repo.history("e1").is_none());
        let now = Utc::now();
        let history = fold_history(None, AttemptResult::neutral("e1", now, now));
        assert!(repo.save_history(&history));
        assert_eq!(repo.history("e1"), Some(history));
    }

    #[test]
    fn summaries_append_in_order() {
        let repo = repo();
        let exam = Exam::new("e1", "Exam");
        let now = Utc::now();
        let first = summarize(&exam, &AttemptResult::neutral("e1", now, now));
        let second = summarize(&exam, &AttemptResult::neutral("e1", now, now));
        repo.append_summary(first.clone());
        repo.append_summary(second.clone());
        assert_eq!(repo.summaries(), vec![first, second]);
    }

    #[test]
    fn unreadable_summaries_are_left_untouched() {
        let store = Arc::new(UnreadableStore::default());
        let repo = ExamRepository::new(store.clone());
        let exam = Exam::new("e1", "Exam");
        let now = Utc::now();
        assert!(repo.append_summary(summarize(&exam, &AttemptResult::neutral("e1", now, now))));

        store.set_broken(true);
        assert!(!repo.append_summary(summarize(&exam, &AttemptResult::neutral("e1", now, now))));
        assert!(repo.history_for_update("e1").is_err());
        assert!(repo.upsert_exam(Exam::new("e2", "Other")).is_err());

        store.set_broken(false);
        assert_eq!(repo.summaries().len(), 1);
        assert!(repo.find_exam("e2").is_none());
    }

    #[test]
    fn malformed_summaries_are_replaced() {
        let repo = repo();
        repo.store().set("examSummaries", "{oops").unwrap();
        let now = Utc::now();
        let summary = summarize(&Exam::new("e1", "Exam"), &AttemptResult::neutral("e1", now, now));
        assert!(repo.append_summary(summary));
        assert_eq!(repo.summaries().len(), 1);
    }
}
