//! The `examkit report` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use examkit_report::{write_html_report, ExamReport};

pub fn execute(output: PathBuf, config_path: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(config_path)?;

    let summaries = ws.repo.summaries();
    let histories = ws
        .repo
        .exams()
        .iter()
        .filter_map(|exam| ws.repo.history(&exam.id))
        .collect();

    let report = ExamReport::new(summaries, histories);
    write_html_report(&report, &output)?;

    println!(
        "Wrote report for {} attempt(s) to {}",
        report.overall.total_attempts,
        output.display()
    );
    Ok(())
}
