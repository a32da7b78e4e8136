//! The `examkit import` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use examkit_core::parser::{load_exams, validate_exam};

pub fn execute(exam_path: PathBuf, config_path: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(config_path)?;
    let exams = load_exams(&exam_path, ws.config.default_time_limit_minutes)?;

    if exams.is_empty() {
        println!("No exams found in {}", exam_path.display());
        return Ok(());
    }

    for mut exam in exams {
        let warnings = validate_exam(&exam);
        if !warnings.is_empty() {
            println!("  {} has {} warning(s); run `examkit validate`", exam.id, warnings.len());
        }

        // Re-importing must not lose the folder assignment.
        if let Some(existing) = ws.repo.find_exam(&exam.id) {
            exam.folder_id = existing.folder_id;
        }

        let id = exam.id.clone();
        let count = exam.questions.len();
        let replaced = ws
            .repo
            .upsert_exam(exam)
            .with_context(|| format!("failed to store exam {id}"))?;
        let verb = if replaced { "Updated" } else { "Imported" };
        println!("{verb} {id} ({count} questions)");
    }

    Ok(())
}
