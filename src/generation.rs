//! Producing quiz items for a book, and refreshing the book list, through
//! external programs.

use crate::config::{CommandSpec, QuizConfig, SourceStrategy};
use crate::error::QuizError;
use crate::logger;
use crate::models::{BookTitle, QuizItem};
use crate::repository::{load_quiz_items_from, parse_generator_output};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

const GENERATOR_OUTPUT: &str = "generator output";
const STDERR_LOG_LIMIT: usize = 512;

#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(&self, title: &BookTitle) -> Result<Vec<QuizItem>, QuizError>;
}

#[async_trait]
pub trait BookRefresher: Send + Sync {
    async fn refresh(&self) -> Result<(), QuizError>;
}

/// Runs `command` (plus an optional trailing argument) to completion and
/// returns its stdout. Any exit other than 0 is a generation failure.
async fn run_command(command: &CommandSpec, trailing: Option<&str>) -> Result<Vec<u8>, QuizError> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args);
    if let Some(arg) = trailing {
        cmd.arg(arg);
    }
    cmd.stdin(Stdio::null());

    logger::log(&format!(
        "Running {} {:?} {:?}",
        command.program.display(),
        command.args,
        trailing
    ));

    let output = cmd.output().await.map_err(|e| {
        QuizError::Generation(format!(
            "failed to start {}: {}",
            command.program.display(),
            e
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr: String = stderr.chars().take(STDERR_LOG_LIMIT).collect();
        logger::log(&format!(
            "{} exited with {}: {}",
            command.program.display(),
            output.status,
            stderr.trim()
        ));
        return Err(QuizError::Generation(format!(
            "{} exited with {}",
            command.program.display(),
            output.status
        )));
    }

    Ok(output.stdout)
}

/// The one generation service, configured with where its items come from.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    command: CommandSpec,
    strategy: SourceStrategy,
}

impl ProcessGenerator {
    pub fn new(command: CommandSpec, strategy: SourceStrategy) -> Self {
        Self { command, strategy }
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.generator.clone(), config.strategy.clone())
    }

    pub fn strategy(&self) -> &SourceStrategy {
        &self.strategy
    }
}

#[async_trait]
impl QuizGenerator for ProcessGenerator {
    async fn generate(&self, title: &BookTitle) -> Result<Vec<QuizItem>, QuizError> {
        let items = match &self.strategy {
            SourceStrategy::StaticFile(path) => load_quiz_items_from(path)?,
            SourceStrategy::CapturedOutput => {
                let stdout = run_command(&self.command, Some(title.as_str())).await?;
                let text = String::from_utf8_lossy(&stdout);
                parse_generator_output(&text, GENERATOR_OUTPUT).map_err(|e| {
                    logger::log(&format!("Unusable generator output for '{}': {}", title, e));
                    QuizError::Generation(e.to_string())
                })?
            }
            SourceStrategy::RefreshFile(path) => {
                run_command(&self.command, Some(title.as_str())).await?;
                load_quiz_items_from(path)?
            }
        };

        if items.is_empty() {
            logger::log(&format!("Generator returned no questions for '{}'", title));
            return Err(QuizError::EmptyResult);
        }

        logger::log(&format!("Generated {} questions for '{}'", items.len(), title));
        Ok(items)
    }
}

/// Runs the book import program; the caller re-reads the book list afterwards.
#[derive(Debug, Clone)]
pub struct BookListUpdater {
    command: CommandSpec,
}

impl BookListUpdater {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.book_updater.clone())
    }
}

#[async_trait]
impl BookRefresher for BookListUpdater {
    async fn refresh(&self) -> Result<(), QuizError> {
        run_command(&self.command, None).await.map(|_| ())
    }
}

#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::time::Duration;

/// Mock generator for tests: replays configured results after a delay and
/// remembers which titles it was asked for.
#[cfg(test)]
pub struct MockGenerator {
    results: Mutex<VecDeque<Result<Vec<QuizItem>, QuizError>>>,
    delay: Duration,
    calls: Mutex<Vec<BookTitle>>,
}

#[cfg(test)]
impl MockGenerator {
    pub fn with_results(results: Vec<Result<Vec<QuizItem>, QuizError>>, delay: Duration) -> Self {
        Self {
            results: Mutex::new(results.into()),
            delay,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<BookTitle> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl QuizGenerator for MockGenerator {
    async fn generate(&self, title: &BookTitle) -> Result<Vec<QuizItem>, QuizError> {
        self.calls.lock().unwrap().push(title.clone());
        tokio::time::sleep(self.delay).await;
        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or(Err(QuizError::EmptyResult))
    }
}
