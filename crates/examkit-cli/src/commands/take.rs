//! The `examkit take` command: an interactive, timed attempt.
//!
//! Input is read line by line. Lines starting with `:` are commands; any
//! other line answers the current question. A countdown tick runs alongside
//! and submits automatically when time runs out.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use examkit_core::model::{Answer, Question, QuestionType};
use examkit_core::session::{AttemptSession, Submission, TickOutcome};

const HELP: &str = "\
Commands:
  <answer>   answer the current question (option text or number; comma list for checkbox)
  :n         next question
  :p         previous question
  :g N       go to question N
  :clear     clear the current answer
  :submit    submit the attempt
  :help      show this help";

enum Step {
    Continue,
    Submit,
}

pub async fn execute(exam_id: String, config_path: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(config_path)?;
    let exam = ws
        .repo
        .find_exam(&exam_id)
        .with_context(|| format!("exam not found: {exam_id}"))?;

    let mut session = AttemptSession::new(ws.repo.clone(), exam);
    if !session.answers().is_empty() {
        println!("Resuming with {} saved answer(s).", session.answers().len());
    }

    session.start(Utc::now());
    print_header(&session);
    print_current(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let tick = Duration::from_millis(ws.config.tick_interval_ms.max(10));
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_announced = None;

    let submission: Option<Submission> = loop {
        tokio::select! {
            _ = ticker.tick() => {
                match session.tick(Utc::now()) {
                    TickOutcome::Expired(submission) => {
                        println!("\nTime is up. Submitting.");
                        break Some(*submission);
                    }
                    TickOutcome::Remaining(secs) => {
                        if should_announce(secs) && last_announced != Some(secs) {
                            last_announced = Some(secs);
                            println!("[{} remaining]", format_duration(secs));
                        }
                    }
                    TickOutcome::Untimed | TickOutcome::Idle => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    println!("\nInput closed. Submitting.");
                    break session.submit(Utc::now());
                };
                match handle_line(&mut session, line.trim()) {
                    Step::Continue => {}
                    Step::Submit => break session.submit(Utc::now()),
                }
            }
        }
    };

    let Some(submission) = submission else {
        anyhow::bail!("attempt was already submitted");
    };

    super::print_submission(&submission);
    if ws.config.show_review {
        super::print_review(&session.review());
    }
    session.discard_saved_answers();
    Ok(())
}

fn handle_line(session: &mut AttemptSession, line: &str) -> Step {
    let now = Utc::now();

    if let Some(command) = line.strip_prefix(':') {
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("submit"), _) => return Step::Submit,
            (Some("n"), _) => {
                if !session.next(now) {
                    println!("Already at the last question.");
                }
            }
            (Some("p"), _) => {
                if !session.previous(now) {
                    println!("Already at the first question.");
                }
            }
            (Some("g"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n >= 1 && session.activate(n - 1, now) => {}
                _ => println!("No question {n}."),
            },
            (Some("clear"), _) => {
                if let Some(id) = session.current_question().map(|q| q.id.clone()) {
                    session.clear_answer(&id);
                    println!("Cleared.");
                }
            }
            (Some("help"), _) => {
                println!("{HELP}");
                return Step::Continue;
            }
            _ => {
                println!("Unknown command. Type :help for the list.");
                return Step::Continue;
            }
        }
        print_current(session);
        return Step::Continue;
    }

    if line.is_empty() {
        return Step::Continue;
    }

    let Some(question) = session.current_question().cloned() else {
        println!("This exam has no questions. Type :submit to finish.");
        return Step::Continue;
    };
    match parse_answer(&question, line) {
        Ok(answer) => {
            println!("Saved: {answer}");
            session.set_answer(&question.id, answer);
            if session.next(now) {
                print_current(session);
            } else {
                println!("That was the last question. Type :submit to finish.");
            }
        }
        Err(message) => println!("{message}"),
    }
    Step::Continue
}

/// Turn typed input into an answer of the shape the question expects.
fn parse_answer(question: &Question, input: &str) -> Result<Answer, String> {
    match question.question_type {
        QuestionType::MultipleChoice => resolve_option(question, input).map(Answer::Single),
        QuestionType::Checkbox => {
            let mut selected: Vec<String> = Vec::new();
            for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let option = resolve_option(question, part)?;
                if !selected.contains(&option) {
                    selected.push(option);
                }
            }
            if selected.is_empty() {
                return Err("Select at least one option.".into());
            }
            Ok(Answer::Multiple(selected))
        }
        QuestionType::Text | QuestionType::Unknown => Ok(Answer::Single(input.to_string())),
    }
}

/// Accept an option by its 1-based number or its exact text.
fn resolve_option(question: &Question, input: &str) -> Result<String, String> {
    if let Some(option) = question.options.iter().find(|o| o.as_str() == input) {
        return Ok(option.clone());
    }
    if let Ok(n) = input.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| question.options.get(i)) {
            return Ok(option.clone());
        }
    }
    Err(format!("'{input}' is not one of the options."))
}

fn print_header(session: &AttemptSession) {
    let exam = session.exam();
    println!("{}", exam.title);
    if !exam.description.is_empty() {
        println!("{}", exam.description);
    }
    let limit = match exam.time_limit {
        0 => "untimed".to_string(),
        m => format!("{m} minute(s)"),
    };
    println!("{} question(s), {limit}. Type :help for commands.", exam.questions.len());
}

fn print_current(session: &AttemptSession) {
    let Some(question) = session.current_question() else {
        println!("\nThis exam has no questions. Type :submit to finish.");
        return;
    };
    let total = session.exam().questions.len();
    println!(
        "\nQuestion {}/{} ({})",
        session.current_index() + 1,
        total,
        question.question_type
    );
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    if let Some(answer) = session.answers().get(&question.id) {
        println!("Current answer: {answer}");
    }
}

fn should_announce(secs: u64) -> bool {
    secs % 60 == 0 || secs == 30 || secs == 10
}

fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
