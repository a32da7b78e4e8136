//! The `examkit history` command.

use std::path::Path;

use anyhow::{Context, Result};

use crate::OutputFormat;

pub fn execute(exam_id: String, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(config_path)?;

    let Some(history) = ws.repo.history(&exam_id) else {
        if format == OutputFormat::Json {
            println!("null");
        } else {
            println!("No attempts recorded for {exam_id}.");
        }
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&history).context("failed to serialize history")?;
            println!("{json}");
        }
        OutputFormat::Markdown => print!("{}", history.to_markdown()),
        OutputFormat::Text => {
            let title = ws
                .repo
                .find_exam(&exam_id)
                .map(|e| e.title)
                .unwrap_or_else(|| exam_id.clone());
            println!("{title}");
            println!("  attempts:          {}", history.total_attempts);
            println!("  average score:     {:.1}%", history.average_score);
            println!("  best score:        {:.1}%", history.best_score);
            println!(
                "  avg time/question: {:.1}s",
                history.average_time_per_question
            );
            println!(
                "  last attempted:    {}",
                history.last_attempted.format("%Y-%m-%d %H:%M:%S UTC")
            );
            for (i, a) in history.attempts.iter().enumerate() {
                println!(
                    "  #{:<3} {}  {:>5.1}%  {}/{}  {:.0}s",
                    i + 1,
                    a.end_time.format("%Y-%m-%d %H:%M"),
                    a.score,
                    a.correct_answers,
                    a.total_questions,
                    a.total_time_seconds
                );
            }
        }
    }

    Ok(())
}
