//! The `examkit validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use examkit_core::parser::{load_exams, validate_exam};

pub fn execute(exam_path: PathBuf, config_path: Option<&Path>) -> Result<()> {
    let config = examkit_store::load_config_from(config_path)?;
    let exams = load_exams(&exam_path, config.default_time_limit_minutes)?;

    let mut total_warnings = 0;

    for exam in &exams {
        println!("Exam: {} ({} questions)", exam.title, exam.questions.len());

        let warnings = validate_exam(exam);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All exams valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
