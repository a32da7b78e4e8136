//! The `examkit summaries` command.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examkit_core::statistics::OverallStats;

use crate::OutputFormat;

pub fn execute(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(config_path)?;
    let summaries = ws.repo.summaries();
    let overall = OverallStats::from_summaries(&summaries);

    if format == OutputFormat::Json {
        let json = serde_json::json!({
            "summaries": summaries,
            "overall": overall,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("failed to serialize summaries")?
        );
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No attempts recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Exam", "Score", "Correct", "Time", "Limit"]);
    for s in &summaries {
        table.add_row(vec![
            Cell::new(s.date.format("%Y-%m-%d %H:%M")),
            Cell::new(&s.exam_title),
            Cell::new(format!("{:.1}%", s.score)),
            Cell::new(format!("{}/{}", s.correct_answers, s.total_questions)),
            Cell::new(format!("{} min", s.time_spent_minutes)),
            Cell::new(match s.time_limit_minutes {
                0 => "untimed".to_string(),
                m => format!("{m} min"),
            }),
        ]);
    }
    println!("{table}");

    println!(
        "\n{} attempt(s) across {} exam(s): average {:.1}%, best {:.1}%, {} min total",
        overall.total_attempts,
        overall.exams_attempted,
        overall.average_score,
        overall.best_score,
        overall.total_time_minutes
    );

    Ok(())
}
