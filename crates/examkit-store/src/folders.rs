//! Folder backend over the key-value store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use examkit_core::error::FolderError;
use examkit_core::model::Folder;
use examkit_core::repository::ExamRepository;
use examkit_core::error::StoreError;
use examkit_core::store::{read_for_update, try_write_json};
use examkit_core::traits::{FolderBackend, KeyValueStore, FOLDERS_KEY};

/// A [`FolderBackend`] that keeps folders under the `folders` key and
/// records assignments on the exams themselves.
pub struct StoreFolderBackend {
    store: Arc<dyn KeyValueStore>,
    repo: ExamRepository,
    // Serializes read-modify-write cycles on the folder and exam lists.
    write_lock: Mutex<()>,
}

impl StoreFolderBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            repo: ExamRepository::new(Arc::clone(&store)),
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// A malformed list reads as empty; an unreadable one is an error so it
    /// is never overwritten.
    fn folders(&self) -> Result<Vec<Folder>, StoreError> {
        Ok(read_for_update(self.store.as_ref(), FOLDERS_KEY)?.unwrap_or_default())
    }
}

#[async_trait]
impl FolderBackend for StoreFolderBackend {
    async fn create_folder(&self, name: &str, icon: Option<String>) -> Result<Folder, FolderError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FolderError::EmptyName);
        }

        let _guard = self.write_lock.lock().await;
        let folder = Folder::new(name, icon);
        let mut folders = self.folders()?;
        folders.push(folder.clone());
        try_write_json(self.store.as_ref(), FOLDERS_KEY, &folders)?;

        tracing::info!("created folder '{}' ({})", folder.name, folder.id);
        Ok(folder)
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, FolderError> {
        Ok(self.folders()?)
    }

    async fn update_exam_folder(
        &self,
        exam_id: &str,
        folder_id: Option<Uuid>,
    ) -> Result<(), FolderError> {
        let _guard = self.write_lock.lock().await;

        if let Some(id) = folder_id {
            if !self.folders()?.iter().any(|f| f.id == id) {
                return Err(FolderError::FolderNotFound(id));
            }
        }

        let mut exams = self.repo.exams_for_update()?;
        let exam = exams
            .iter_mut()
            .find(|e| e.id == exam_id)
            .ok_or_else(|| FolderError::ExamNotFound(exam_id.to_string()))?;
        exam.folder_id = folder_id;
        self.repo.save_exams(&exams)?;

        match folder_id {
            Some(id) => tracing::info!("filed exam {exam_id} under folder {id}"),
            None => tracing::info!("removed exam {exam_id} from its folder"),
        }
        Ok(())
    }
}
