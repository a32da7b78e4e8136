//! The `examkit list` command.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examkit_core::traits::FolderBackend;
use examkit_store::StoreFolderBackend;

pub async fn execute(config_path: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(config_path)?;
    let exams = ws.repo.exams();

    if exams.is_empty() {
        println!("No exams stored. Run `examkit import --exam <path>` first.");
        return Ok(());
    }

    let folders: HashMap<_, _> = StoreFolderBackend::new(ws.store.clone())
        .list_folders()
        .await?
        .into_iter()
        .map(|f| (f.id, f.name))
        .collect();

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Title",
        "Questions",
        "Time Limit",
        "Folder",
        "Attempts",
        "Best",
    ]);

    for exam in &exams {
        let history = ws.repo.history(&exam.id);
        let limit = match exam.time_limit {
            0 => "untimed".to_string(),
            m => format!("{m} min"),
        };
        let folder = exam
            .folder_id
            .and_then(|id| folders.get(&id).cloned())
            .unwrap_or_else(|| "-".into());
        table.add_row(vec![
            Cell::new(&exam.id),
            Cell::new(&exam.title),
            Cell::new(exam.questions.len()),
            Cell::new(limit),
            Cell::new(folder),
            Cell::new(history.as_ref().map_or(0, |h| h.total_attempts)),
            Cell::new(
                history
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |h| format!("{:.1}%", h.best_score)),
            ),
        ]);
    }

    println!("{table}");
    Ok(())
}
