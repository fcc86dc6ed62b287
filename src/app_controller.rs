use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::borrow::Cow;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::formatting::{format_elapsed, format_result};
use crate::session::{QueryOutcome, QuerySession};

// @module: Interactive question loop

/// Banner printed once before the first prompt
pub const READY_BANNER: &str = "Library System Ready. Ask questions about books or inventory.\nType 'exit' to quit.";

/// Prompt printed before each question
pub const PROMPT: &str = "Your question: ";

/// Shown after a translation failure
pub const REPHRASE_MESSAGE: &str = "Error: Unable to process query. Please try rephrasing.";

/// State of the interactive loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for input
    Idle,
    /// Running a question through the session
    Processing,
    /// The loop has stopped
    Terminated,
}

/// Classified line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// `exit` or `quit`, any case
    Exit,
    /// Blank line
    Empty,
    /// A question for the model
    Question(String),
}

impl UserInput {
    /// Classify a raw input line
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            Self::Exit
        } else {
            Self::Question(trimmed.to_string())
        }
    }
}

/// Interactive controller driving one session
pub struct Controller<'a> {
    // @field: Session answering the questions
    session: &'a QuerySession,
    // @field: Show a spinner while the model works
    show_spinner: bool,
    state: LoopState,
}

impl<'a> Controller<'a> {
    // @method: Create a controller over an open session
    pub fn new(session: &'a QuerySession) -> Self {
        Self {
            session,
            show_spinner: false,
            state: LoopState::Idle,
        }
    }

    /// Enable the progress spinner
    pub fn with_spinner(mut self, show_spinner: bool) -> Self {
        self.show_spinner = show_spinner;
        self
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Read questions from `input` until exit or end of input, writing answers to `output`
    pub async fn run<R, W>(&mut self, mut input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(output, "\n{}\n", READY_BANNER)?;
        self.state = LoopState::Idle;

        while self.state != LoopState::Terminated {
            write!(output, "\n{}", PROMPT)?;
            output.flush()?;

            let mut raw = Vec::new();
            if input.read_until(b'\n', &mut raw).await? == 0 {
                debug!("End of input");
                writeln!(output)?;
                self.state = LoopState::Terminated;
                break;
            }

            let line = String::from_utf8_lossy(&raw);
            if let Cow::Owned(_) = line {
                warn!("Input line was not valid UTF-8; invalid bytes replaced");
            }

            match UserInput::parse(&line) {
                UserInput::Empty => continue,
                UserInput::Exit => self.state = LoopState::Terminated,
                UserInput::Question(question) => {
                    self.state = LoopState::Processing;
                    info!("User query: {}", question);

                    let outcome = self.ask(&question).await;
                    writeln!(output, "{}", render_outcome(&outcome))?;

                    self.state = LoopState::Idle;
                }
            }
        }

        writeln!(output, "Exiting...")?;
        Ok(())
    }

    async fn ask(&self, question: &str) -> QueryOutcome {
        if !self.show_spinner {
            return self.session.ask(question).await;
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message("Generating SQL...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let outcome = self.session.ask(question).await;

        spinner.finish_and_clear();
        outcome
    }
}

/// Render the user-facing text for one outcome
pub fn render_outcome(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Answered { sql, result, elapsed } => format!(
            "\nResult ({}):\n{}\n\nGenerated SQL: {}",
            format_elapsed(*elapsed),
            format_result(result),
            sql
        ),
        QueryOutcome::ExecutionFailed { sql, elapsed, .. } => format!(
            "\nResult ({}):\nError while executing query\n\nGenerated SQL: {}",
            format_elapsed(*elapsed),
            sql
        ),
        QueryOutcome::NoSql { .. } => "\nSQL could not be generated".to_string(),
        QueryOutcome::TranslationFailed { .. } => format!("\n{}", REPHRASE_MESSAGE),
    }
}
