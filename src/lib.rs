pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod generation_worker;
pub mod input;
pub mod logger;
pub mod models;
pub mod repository;
pub mod review;
pub mod scoring;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use config::{CommandSpec, QuizConfig, SourceStrategy};
pub use controller::{Delivery, ErrorRecovery, Phase, QuizState, SessionController};
pub use error::QuizError;
pub use generation::{BookListUpdater, BookRefresher, ProcessGenerator, QuizGenerator};
pub use generation_worker::spawn_generation_worker;
pub use input::{handle_key, KeyOutcome, UiCursor};
pub use models::{BookTitle, QuizItem, Session};
pub use repository::QuizRepository;
pub use review::{annotate, ReviewCard};
pub use scoring::{record_answer, summarize};
