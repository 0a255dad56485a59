use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "/mnt/onboard/.adds/quiz";
pub const GENERATOR_SCRIPT: &str = "generateQuiz.sh";
pub const UPDATE_BOOKS_SCRIPT: &str = "updateBooks.sh";
pub const BOOKS_LIST_FILE: &str = "books.json";
pub const QUIZ_QUESTIONS_FILE: &str = "quiz_questions.json";

/// An external program plus any fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Where quiz items come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Run the generator and parse its stdout.
    CapturedOutput,
    /// Run the generator, then read the items it wrote to this file.
    RefreshFile(PathBuf),
    /// Read a pre-seeded item file without running anything.
    StaticFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub books_path: PathBuf,
    pub quiz_items_path: PathBuf,
    pub generator: CommandSpec,
    pub book_updater: CommandSpec,
    pub strategy: SourceStrategy,
}

impl QuizConfig {
    /// Layout used on the device: scripts and documents side by side in one directory.
    pub fn rooted_at(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            books_path: dir.join(BOOKS_LIST_FILE),
            quiz_items_path: dir.join(QUIZ_QUESTIONS_FILE),
            generator: CommandSpec::new(dir.join(GENERATOR_SCRIPT)),
            book_updater: CommandSpec::new(dir.join(UPDATE_BOOKS_SCRIPT)),
            strategy: SourceStrategy::CapturedOutput,
        }
    }

    pub fn with_strategy(mut self, strategy: SourceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn static_items(self) -> Self {
        let path = self.quiz_items_path.clone();
        self.with_strategy(SourceStrategy::StaticFile(path))
    }

    pub fn file_output(self) -> Self {
        let path = self.quiz_items_path.clone();
        self.with_strategy(SourceStrategy::RefreshFile(path))
    }
}

impl QuizConfig {
    /// Builds the configuration from command line arguments (program name
    /// already skipped): `[DATA_DIR] [--static | --file-output]`.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> io::Result<Self> {
        let mut dir: Option<PathBuf> = None;
        let mut strategy: Option<&str> = None;

        for arg in args {
            match arg.as_str() {
                "--static" | "--file-output" => {
                    if let Some(previous) = strategy
                        && previous != arg
                    {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("{} conflicts with {}", arg, previous),
                        ));
                    }
                    strategy = Some(if arg == "--static" {
                        "--static"
                    } else {
                        "--file-output"
                    });
                }
                flag if flag.starts_with("--") => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("unknown option {}", flag),
                    ));
                }
                _ if dir.is_some() => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("unexpected argument {}", arg),
                    ));
                }
                _ => dir = Some(PathBuf::from(&arg)),
            }
        }

        let config = match dir {
            Some(dir) => Self::rooted_at(dir),
            None => Self::default(),
        };
        Ok(match strategy {
            Some("--static") => config.static_items(),
            Some(_) => config.file_output(),
            None => config,
        })
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::rooted_at(DEFAULT_DATA_DIR)
    }
}
