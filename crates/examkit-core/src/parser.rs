//! TOML exam definition parser.
//!
//! Loads exams from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;

use crate::model::{Exam, Question, QuestionType};

/// Time limit applied when an exam file omits `time_limit`.
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

#[derive(Debug, Deserialize)]
struct TomlExamFile {
    exam: TomlExamHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    time_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    correct_answers: Option<Vec<String>>,
}

/// Parse a single TOML file into an `Exam`.
pub fn parse_exam(path: &Path, default_time_limit: u32) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path, default_time_limit)
}

/// Parse a TOML string into an `Exam`.
///
/// Unrecognised question types are kept as [`QuestionType::Unknown`] so that
/// validation can report them instead of the whole file failing.
pub fn parse_exam_str(content: &str, source_path: &Path, default_time_limit: u32) -> Result<Exam> {
    let parsed: TomlExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let question_type = q.question_type.parse().unwrap_or_else(|e: String| {
                tracing::debug!("{} in {}: {e}", q.id, source_path.display());
                QuestionType::Unknown
            });
            Question {
                id: q.id,
                question_type,
                prompt: q.prompt,
                options: q.options,
                correct_answer: q.correct_answer,
                correct_answers: q.correct_answers,
            }
        })
        .collect();

    Ok(Exam {
        id: parsed.exam.id,
        title: parsed.exam.title,
        description: parsed.exam.description,
        time_limit: parsed.exam.time_limit.unwrap_or(default_time_limit),
        questions,
        folder_id: None,
        created_at: Utc::now(),
    })
}

/// Parse a path that may be a single exam file or a directory of them.
pub fn load_exams(path: &Path, default_time_limit: u32) -> Result<Vec<Exam>> {
    if path.is_dir() {
        load_exam_directory(path, default_time_limit)
    } else {
        Ok(vec![parse_exam(path, default_time_limit)?])
    }
}

/// Recursively load all `.toml` exam files from a directory.
pub fn load_exam_directory(dir: &Path, default_time_limit: u32) -> Result<Vec<Exam>> {
    let mut exams = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            exams.extend(load_exam_directory(&path, default_time_limit)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_exam(&path, default_time_limit) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(exams)
}

/// A warning from exam validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Check an exam for problems that would make questions unanswerable or
/// impossible to score correctly.
pub fn validate_exam(exam: &Exam) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if exam.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "exam has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &exam.questions {
        if !seen_ids.insert(q.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }

        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "prompt is empty"));
        }

        match q.question_type {
            QuestionType::MultipleChoice => {
                if q.options.is_empty() {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        "multiple-choice question has no options",
                    ));
                }
                match &q.correct_answer {
                    None => warnings.push(ValidationWarning::question(
                        &q.id,
                        "multiple-choice question has no correct_answer",
                    )),
                    Some(answer) if !q.options.is_empty() && !q.options.contains(answer) => {
                        warnings.push(ValidationWarning::question(
                            &q.id,
                            format!("correct_answer {answer:?} is not one of the options"),
                        ));
                    }
                    Some(_) => {}
                }
            }
            QuestionType::Checkbox => match &q.correct_answers {
                None => warnings.push(ValidationWarning::question(
                    &q.id,
                    "checkbox question has no correct_answers",
                )),
                Some(answers) => {
                    let mut seen = HashSet::new();
                    for answer in answers {
                        if !seen.insert(answer) {
                            warnings.push(ValidationWarning::question(
                                &q.id,
                                format!("duplicate correct answer {answer:?}"),
                            ));
                        }
                        if !q.options.contains(answer) {
                            warnings.push(ValidationWarning::question(
                                &q.id,
                                format!("correct answer {answer:?} is not one of the options"),
                            ));
                        }
                    }
                }
            },
            QuestionType::Text => {
                if q.correct_answer.is_none() {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        "text question has no correct_answer",
                    ));
                }
            }
            QuestionType::Unknown => {
                warnings.push(ValidationWarning::question(
                    &q.id,
                    "unknown question type; it will always be scored incorrect",
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[exam]
id = "geo-101"
title = "World Capitals"
description = "Basic geography"
time_limit = 10

[[questions]]
id = "q1"
type = "multiple-choice"
prompt = "What is the capital of France?"
options = ["Paris", "Rome", "Madrid"]
correct_answer = "Paris"

[[questions]]
id = "q2"
type = "checkbox"
prompt = "Which of these are in Europe?"
options = ["Spain", "Peru", "Norway"]
correct_answers = ["Spain", "Norway"]

[[questions]]
id = "q3"
type = "text"
prompt = "Capital of Japan?"
correct_answer = "Tokyo"
"#;

    fn parse(content: &str) -> Exam {
        parse_exam_str(content, &PathBuf::from("test.toml"), DEFAULT_TIME_LIMIT_MINUTES).unwrap()
    }

    #[test]
    fn parse_valid_toml() {
        let exam = parse(VALID_TOML);
        assert_eq!(exam.id, "geo-101");
        assert_eq!(exam.time_limit, 10);
        assert_eq!(exam.questions.len(), 3);
        assert_eq!(exam.questions[1].question_type, QuestionType::Checkbox);
        assert_eq!(
            exam.questions[1].correct_answers.as_deref(),
            Some(&["Spain".to_string(), "Norway".to_string()][..])
        );
        assert!(validate_exam(&exam).is_empty());
    }

    #[test]
    fn missing_time_limit_uses_default() {
        let toml = r#"
[exam]
id = "minimal"
title = "Minimal"
"#;
        let exam = parse_exam_str(toml, &PathBuf::from("m.toml"), 45).unwrap();
        assert_eq!(exam.time_limit, 45);
        assert!(exam.questions.is_empty());
    }

    #[test]
    fn unknown_type_is_kept() {
        let toml = r#"
[exam]
id = "x"
title = "X"

[[questions]]
id = "q1"
type = "essay"
prompt = "Discuss."
"#;
        let exam = parse(toml);
        assert_eq!(exam.questions[0].question_type, QuestionType::Unknown);
        let warnings = validate_exam(&exam);
        assert!(warnings.iter().any(|w| w.message.contains("unknown question type")));
    }

    #[test]
    fn validate_reports_authoring_mistakes() {
        let toml = r#"
[exam]
id = "bad"
title = "Bad"

[[questions]]
id = "q1"
type = "multiple-choice"
prompt = "Pick"
options = ["A", "B"]
correct_answer = "C"

[[questions]]
id = "q1"
type = "checkbox"
prompt = ""
options = ["A", "B"]
correct_answers = ["A", "A", "Z"]

[[questions]]
id = "q3"
type = "text"
prompt = "Say"
"#;
        let warnings = validate_exam(&parse(toml));
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate question ID")));
        assert!(messages.iter().any(|m| m.contains("prompt is empty")));
        assert!(messages.iter().any(|m| m.contains("\"C\" is not one of the options")));
        assert!(messages.iter().any(|m| m.contains("duplicate correct answer")));
        assert!(messages.iter().any(|m| m.contains("\"Z\" is not one of the options")));
        assert!(messages.iter().any(|m| m.contains("text question has no correct_answer")));
    }

    #[test]
    fn validate_empty_exam() {
        let warnings = validate_exam(&Exam::new("e", "Empty"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].question_id.is_none());
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_exam_str("not [valid toml }{", &PathBuf::from("bad.toml"), 30);
        assert!(result.is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "[[[").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            nested.join("other.toml"),
            VALID_TOML.replace("geo-101", "geo-102"),
        )
        .unwrap();

        let exams = load_exam_directory(dir.path(), 30).unwrap();
        let ids: Vec<&str> = exams.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["geo-101", "geo-102"]);
    }

    #[test]
    fn load_exams_accepts_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo.toml");
        std::fs::write(&path, VALID_TOML).unwrap();
        assert_eq!(load_exams(&path, 30).unwrap().len(), 1);
    }
}
