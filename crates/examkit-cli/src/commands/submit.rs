//! The `examkit submit` command: score a prepared answer file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use examkit_core::model::AnswerMap;
use examkit_core::session::AttemptSession;

pub fn execute(exam_id: String, answers_path: PathBuf, config_path: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(config_path)?;
    let exam = ws
        .repo
        .find_exam(&exam_id)
        .with_context(|| format!("exam not found: {exam_id}"))?;

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers: {}", answers_path.display()))?;
    let answers: AnswerMap = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", answers_path.display()))?;

    for id in answers.keys() {
        if exam.question(id).is_none() {
            tracing::warn!("answer for unknown question '{id}' will be ignored");
        }
    }

    let mut session = AttemptSession::new(ws.repo.clone(), exam);
    // The file is the whole attempt; answers left by an unfinished `take` do not count.
    session.discard_saved_answers();
    let now = Utc::now();
    session.start(now);
    for (question_id, answer) in answers {
        session.set_answer(&question_id, answer);
    }

    let submission = session
        .submit(Utc::now())
        .context("attempt was already submitted")?;
    super::print_submission(&submission);
    if ws.config.show_review {
        super::print_review(&session.review());
    }
    session.discard_saved_answers();

    Ok(())
}
