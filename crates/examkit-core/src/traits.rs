//! Persistence seams: the key-value store and the folder backend.
//!
//! `examkit-store` provides the on-disk implementations; [`crate::store`]
//! provides an in-memory store for tests and ephemeral sessions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{FolderError, StoreError};
use crate::model::Folder;

// ---------------------------------------------------------------------------
// Key-value store
// ---------------------------------------------------------------------------

/// A string-keyed store of JSON documents, in the manner of browser local
/// storage. Values are opaque strings; typed access lives in
/// [`crate::store::read_json`] and [`crate::store::write_json`].
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value for `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently present, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Key holding the list of all exams.
pub const EXAMS_KEY: &str = "exams";

/// Key holding the append-only list of attempt summaries.
pub const SUMMARIES_KEY: &str = "examSummaries";

/// Key holding the list of folders.
pub const FOLDERS_KEY: &str = "folders";

/// Key holding in-progress answers for one exam.
pub fn answers_key(exam_id: &str) -> String {
    format!("exam-answers-{exam_id}")
}

/// Key holding the running history for one exam.
pub fn history_key(exam_id: &str) -> String {
    format!("exam-history-{exam_id}")
}

// ---------------------------------------------------------------------------
// Folder backend
// ---------------------------------------------------------------------------

/// Backend that owns folders and the exam-to-folder assignment.
#[async_trait]
pub trait FolderBackend: Send + Sync {
    /// Create a folder. The name must be non-empty after trimming.
    async fn create_folder(&self, name: &str, icon: Option<String>) -> Result<Folder, FolderError>;

    /// All folders, oldest first.
    async fn list_folders(&self) -> Result<Vec<Folder>, FolderError>;

    /// File `exam_id` under `folder_id`, or remove it from its folder when
    /// `folder_id` is `None`.
    async fn update_exam_folder(
        &self,
        exam_id: &str,
        folder_id: Option<Uuid>,
    ) -> Result<(), FolderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_exam_keys() {
        assert_eq!(answers_key("e1"), "exam-answers-e1");
        assert_eq!(history_key("e1"), "exam-history-e1");
    }
}
