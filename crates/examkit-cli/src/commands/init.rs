//! The `examkit init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("examkit.toml").exists() {
        println!("examkit.toml already exists, skipping.");
    } else {
        std::fs::write("examkit.toml", SAMPLE_CONFIG)?;
        println!("Created examkit.toml");
    }

    std::fs::create_dir_all("exams")?;
    let example_path = Path::new("exams/example.toml");
    if example_path.exists() {
        println!("exams/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_EXAM)?;
        println!("Created exams/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: examkit validate --exam exams/example.toml");
    println!("  2. Run: examkit import --exam exams");
    println!("  3. Run: examkit take --exam-id example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examkit configuration

# Where exams, answers, and history are stored. ${VAR} references expand.
data_dir = "./examkit-data"

# Used when an exam file does not set time_limit (minutes, 0 = untimed).
default_time_limit_minutes = 30

tick_interval_ms = 1000
show_review = true
"#;

const EXAMPLE_EXAM: &str = r#"[exam]
id = "example"
title = "Example Exam"
description = "A short exam showing each question type"
time_limit = 5

[[questions]]
id = "capital"
type = "multiple-choice"
prompt = "What is the capital of France?"
options = ["Paris", "Lyon", "Marseille"]
correct_answer = "Paris"

[[questions]]
id = "primes"
type = "checkbox"
prompt = "Which of these numbers are prime?"
options = ["2", "4", "7", "9"]
correct_answers = ["2", "7"]

[[questions]]
id = "ocean"
type = "text"
prompt = "Name the largest ocean on Earth."
correct_answer = "Pacific"
"#;
