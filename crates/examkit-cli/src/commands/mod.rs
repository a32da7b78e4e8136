pub mod folders;
pub mod history;
pub mod import;
pub mod init;
pub mod list;
pub mod report;
pub mod submit;
pub mod summaries;
pub mod take;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use examkit_core::repository::ExamRepository;
use examkit_core::results::QuestionReview;
use examkit_core::session::Submission;
use examkit_core::traits::KeyValueStore;
use examkit_store::{ExamkitConfig, FileStore};

/// Loaded configuration plus the store it points at.
pub struct Workspace {
    pub config: ExamkitConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub repo: ExamRepository,
}

pub fn open_workspace(config_path: Option<&Path>) -> Result<Workspace> {
    let config = examkit_store::load_config_from(config_path)?;
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data dir: {}", config.data_dir.display()))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    Ok(Workspace {
        repo: ExamRepository::new(Arc::clone(&store)),
        store,
        config,
    })
}

pub fn print_submission(submission: &Submission) {
    let r = &submission.result;
    let h = &submission.history;
    println!();
    println!(
        "Score: {:.1}% ({}/{} correct) in {:.0}s",
        r.score, r.correct_answers, r.total_questions, r.total_time_seconds
    );
    println!(
        "History: {} attempt(s), average {:.1}%, best {:.1}%",
        h.total_attempts, h.average_score, h.best_score
    );
}

pub fn print_review(review: &[QuestionReview]) {
    println!("\nReview:");
    for (i, item) in review.iter().enumerate() {
        let mark = if item.is_correct { "correct" } else { "WRONG" };
        let given = item
            .given
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "(no answer)".into());
        println!("  {}. [{mark}] {}", i + 1, item.prompt);
        println!("     your answer: {given}");
        if !item.is_correct {
            if let Some(expected) = &item.expected {
                println!("     expected:    {expected}");
            }
        }
    }
}
