//! The `examkit folders` subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use uuid::Uuid;

use examkit_core::traits::FolderBackend;
use examkit_store::StoreFolderBackend;

fn backend(config_path: Option<&Path>) -> Result<(StoreFolderBackend, super::Workspace)> {
    let ws = super::open_workspace(config_path)?;
    Ok((StoreFolderBackend::new(ws.store.clone()), ws))
}

pub async fn create(name: String, icon: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let (backend, _) = backend(config_path)?;
    let folder = backend.create_folder(&name, icon).await?;
    println!("Created folder {} ({})", folder.name, folder.id);
    Ok(())
}

pub async fn list(config_path: Option<&Path>) -> Result<()> {
    let (backend, ws) = backend(config_path)?;
    let folders = backend.list_folders().await?;

    if folders.is_empty() {
        println!("No folders. Create one with `examkit folders create --name <name>`.");
        return Ok(());
    }

    let exams = ws.repo.exams();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Icon", "Exams", "Created"]);
    for f in &folders {
        let count = exams.iter().filter(|e| e.folder_id == Some(f.id)).count();
        table.add_row(vec![
            Cell::new(f.id),
            Cell::new(&f.name),
            Cell::new(f.icon.as_deref().map(icon_preview).unwrap_or("-")),
            Cell::new(count),
            Cell::new(f.created_at.format("%Y-%m-%d")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn assign(
    exam_id: String,
    folder_id: Option<Uuid>,
    config_path: Option<&Path>,
) -> Result<()> {
    let (backend, _) = backend(config_path)?;
    backend
        .update_exam_folder(&exam_id, folder_id)
        .await
        .with_context(|| format!("failed to update folder for {exam_id}"))?;

    match folder_id {
        Some(id) => println!("Moved {exam_id} to folder {id}"),
        None => println!("Removed {exam_id} from its folder"),
    }
    Ok(())
}

/// Icons are opaque and may be large encoded images; show short ones only.
fn icon_preview(icon: &str) -> &str {
    if icon.chars().count() <= 16 {
        icon
    } else {
        "(image)"
    }
}
