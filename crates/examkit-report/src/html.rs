//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use examkit_core::report::ExamSummary;
use examkit_core::statistics::{ExamHistory, OverallStats};

/// Everything a report shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamReport {
    pub generated_at: DateTime<Utc>,
    pub overall: OverallStats,
    pub histories: Vec<ExamHistory>,
    pub summaries: Vec<ExamSummary>,
}

impl ExamReport {
    pub fn new(summaries: Vec<ExamSummary>, histories: Vec<ExamHistory>) -> Self {
        Self {
            generated_at: Utc::now(),
            overall: OverallStats::from_summaries(&summaries),
            histories,
            summaries,
        }
    }

    /// Exam titles by id, taken from the most recent summary of each exam.
    fn titles(&self) -> HashMap<&str, &str> {
        self.summaries
            .iter()
            .map(|s| (s.exam_id.as_str(), s.exam_title.as_str()))
            .collect()
    }
}

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn score_class(score: f64) -> &'static str {
    if score >= 80.0 {
        "pass"
    } else if score >= 50.0 {
        "warn"
    } else {
        "fail"
    }
}

/// Generate an HTML report.
pub fn generate_html(report: &ExamReport) -> String {
    let titles = report.titles();
    let title_of = |exam_id: &str| -> String {
        html_escape(titles.get(exam_id).copied().unwrap_or(exam_id))
    };
    let overall = &report.overall;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>examkit report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>examkit report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} attempts | {} exams | generated {}</p>\n",
        overall.total_attempts,
        overall.exams_attempted,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Overview
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Overview</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Attempts</th><th>Exams</th><th>Average</th><th>Best</th><th>Time spent</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{} min</td></tr></tbody>\n",
        overall.total_attempts,
        overall.exams_attempted,
        overall.average_score,
        overall.best_score,
        overall.total_time_minutes,
    ));
    html.push_str("</table>\n");

    if !report.histories.is_empty() {
        html.push_str("<h2>Per exam</h2>\n");
        html.push_str("<table class=\"summary\">\n");
        html.push_str("<thead><tr><th>Exam</th><th>Attempts</th><th>Average</th><th>Best</th><th>Avg time / question</th><th>Last attempted</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for h in &report.histories {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td class=\"{}\">{:.1}%</td><td>{:.1}s</td><td>{}</td></tr>\n",
                title_of(&h.exam_id),
                h.total_attempts,
                h.average_score,
                score_class(h.best_score),
                h.best_score,
                h.average_time_per_question,
                h.last_attempted.format("%Y-%m-%d %H:%M"),
            ));
        }
        html.push_str("</tbody></table>\n");

        let bars: Vec<(String, f64)> = report
            .histories
            .iter()
            .map(|h| (title_of(&h.exam_id), h.best_score))
            .collect();
        html.push_str(&generate_bar_chart(&bars));
    }

    html.push_str("</section>\n");

    // Attempt log
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Attempts</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Date</th><th onclick=\"sortTable(1)\">Exam</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Correct</th><th onclick=\"sortTable(4)\">Time</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for s in &report.summaries {
        let class = score_class(s.score);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"{}\">{:.1}%</td><td>{}/{}</td><td>{} / {} min</td></tr>\n",
            s.date.format("%Y-%m-%d %H:%M"),
            html_escape(&s.exam_title),
            class,
            s.score,
            s.correct_answers,
            s.total_questions,
            s.time_spent_minutes,
            s.time_limit_minutes,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ExamReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

/// Horizontal bars of best score per exam. Labels must already be escaped.
fn generate_bar_chart(bars: &[(String, f64)]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = bars.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (label, score)) in bars.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (score.clamp(0.0, 100.0) / 100.0 * max_width as f64) as usize;
        let color = match score_class(*score) {
            "pass" => "#22c55e",
            "warn" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            label
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
