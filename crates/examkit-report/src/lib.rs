//! examkit-report: HTML reports of exam history.

pub mod html;

pub use html::{generate_html, write_html_report, ExamReport};
