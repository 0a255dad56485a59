//! The quiz session state machine.
//!
//! `SessionController` owns the active screen state and is the only thing that
//! mutates a `Session`. Generation runs elsewhere: `select_book` hands back a
//! `GenerationRequest`, and whoever runs it reports back through
//! `on_generation_complete`. Completions are matched on `RequestId`, so results
//! for abandoned requests fall on the floor.

use crate::error::QuizError;
use crate::logger;
use crate::models::{
    BookTitle, GenerationOutcome, GenerationRequest, QuizItem, RefreshRequest, RequestId, Session,
};
use crate::repository::QuizRepository;
use crate::review::{annotate, ReviewCard};
use crate::scoring;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Where acknowledging an error leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRecovery {
    BookSelection,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    BookSelection {
        books: Vec<BookTitle>,
        status: Option<StatusMessage>,
        refreshing: bool,
    },
    Generating {
        request: GenerationRequest,
    },
    Answering {
        session: Session,
    },
    Finished {
        session: Session,
    },
    Reviewing {
        session: Session,
        cursor: usize,
    },
    Error {
        message: String,
        recovery: ErrorRecovery,
    },
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BookSelection,
    Generating,
    Answering,
    Finished,
    Reviewing,
    Error,
    Closed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BookSelection => "selecting a book",
            Phase::Generating => "generating",
            Phase::Answering => "answering",
            Phase::Finished => "finished",
            Phase::Reviewing => "reviewing",
            Phase::Error => "showing an error",
            Phase::Closed => "closed",
        }
    }
}

impl QuizState {
    pub fn phase(&self) -> Phase {
        match self {
            QuizState::BookSelection { .. } => Phase::BookSelection,
            QuizState::Generating { .. } => Phase::Generating,
            QuizState::Answering { .. } => Phase::Answering,
            QuizState::Finished { .. } => Phase::Finished,
            QuizState::Reviewing { .. } => Phase::Reviewing,
            QuizState::Error { .. } => Phase::Error,
            QuizState::Closed => Phase::Closed,
        }
    }
}

/// What happened to a result delivered from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

#[derive(Debug)]
pub struct SessionController {
    repository: QuizRepository,
    state: QuizState,
    next_request_id: u64,
}

impl SessionController {
    pub fn new(repository: QuizRepository) -> Self {
        Self {
            repository,
            state: QuizState::BookSelection {
                books: Vec::new(),
                status: None,
                refreshing: false,
            },
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_closed(&self) -> bool {
        self.state == QuizState::Closed
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            QuizState::Answering { session }
            | QuizState::Finished { session }
            | QuizState::Reviewing { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn pending_request(&self) -> Option<&GenerationRequest> {
        match &self.state {
            QuizState::Generating { request } => Some(request),
            _ => None,
        }
    }

    pub fn books(&self) -> &[BookTitle] {
        match &self.state {
            QuizState::BookSelection { books, .. } => books,
            _ => &[],
        }
    }

    fn reject(&self, event: &'static str) -> QuizError {
        let phase = self.phase();
        logger::log(&format!("Rejected {} while {}", event, phase.as_str()));
        QuizError::NotAccepted {
            event,
            phase: phase.as_str(),
        }
    }

    fn fail(&mut self, error: &QuizError, recovery: ErrorRecovery) {
        logger::log(&format!("Error: {}", error));
        self.state = QuizState::Error {
            message: error.user_message(),
            recovery,
        };
    }

    /// Starts a run: loads the book list and shows it. Any previous session is dropped.
    pub fn open(&mut self) -> Phase {
        match self.repository.load_book_titles() {
            Ok(books) => {
                self.state = QuizState::BookSelection {
                    books,
                    status: None,
                    refreshing: false,
                };
            }
            Err(e) => self.fail(&e, ErrorRecovery::Close),
        }
        self.phase()
    }

    pub fn select_book(&mut self, title: Option<BookTitle>) -> Result<GenerationRequest, QuizError> {
        if let QuizState::Generating { request } = &self.state {
            logger::log(&format!(
                "Ignoring book selection, request {} still running",
                request.request_id
            ));
            return Err(QuizError::GenerationInProgress);
        }

        let QuizState::BookSelection { status, .. } = &mut self.state else {
            return Err(self.reject("select_book"));
        };
        let Some(title) = title else {
            let error = QuizError::NoSelection;
            *status = Some(StatusMessage::error(error.user_message()));
            logger::log("Select pressed without a book");
            return Err(error);
        };

        let request = GenerationRequest {
            request_id: RequestId(self.next_request_id),
            title,
        };
        self.next_request_id += 1;
        logger::log(&format!(
            "Generating quiz for '{}' (request {})",
            request.title, request.request_id
        ));
        self.state = QuizState::Generating {
            request: request.clone(),
        };
        Ok(request)
    }

    fn is_pending(&self, request_id: RequestId) -> bool {
        matches!(&self.state, QuizState::Generating { request } if request.request_id == request_id)
    }

    fn drop_stale(&self, request_id: RequestId) -> Delivery {
        logger::log(&format!(
            "Dropping stale generation result {} while {}",
            request_id,
            self.phase().as_str()
        ));
        Delivery::Stale
    }

    pub fn on_generation_success(&mut self, request_id: RequestId, items: Vec<QuizItem>) -> Delivery {
        if !self.is_pending(request_id) {
            return self.drop_stale(request_id);
        }
        if items.is_empty() {
            self.fail(&QuizError::EmptyResult, ErrorRecovery::BookSelection);
            return Delivery::Applied;
        }

        match mem::replace(&mut self.state, QuizState::Closed) {
            QuizState::Generating { request } => {
                logger::log(&format!(
                    "Request {} delivered {} questions",
                    request_id,
                    items.len()
                ));
                self.state = QuizState::Answering {
                    session: Session::new(request.title, items),
                };
                Delivery::Applied
            }
            other => {
                self.state = other;
                Delivery::Stale
            }
        }
    }

    pub fn on_generation_failure(&mut self, request_id: RequestId, error: QuizError) -> Delivery {
        if !self.is_pending(request_id) {
            return self.drop_stale(request_id);
        }
        self.fail(&error, ErrorRecovery::BookSelection);
        Delivery::Applied
    }

    pub fn on_generation_complete(&mut self, outcome: GenerationOutcome) -> Delivery {
        match outcome.result {
            Ok(items) => self.on_generation_success(outcome.request_id, items),
            Err(error) => self.on_generation_failure(outcome.request_id, error),
        }
    }

    /// Records the reader's choice (an option index, or none) for the current question.
    pub fn submit(&mut self, choice: Option<usize>) -> Result<Phase, QuizError> {
        match mem::replace(&mut self.state, QuizState::Closed) {
            QuizState::Answering { session } => {
                if session.is_finished() {
                    logger::log("Submit past the last question, finishing");
                    self.state = QuizState::Finished { session };
                    return Ok(Phase::Finished);
                }

                let session = scoring::record_answer(session, choice);
                self.state = if session.is_finished() {
                    logger::log(&format!(
                        "Quiz finished: {}/{}",
                        session.score(),
                        session.len()
                    ));
                    QuizState::Finished { session }
                } else {
                    QuizState::Answering { session }
                };
                Ok(self.phase())
            }
            other => {
                self.state = other;
                Err(self.reject("submit"))
            }
        }
    }

    pub fn review(&mut self) -> Result<(), QuizError> {
        match mem::replace(&mut self.state, QuizState::Closed) {
            QuizState::Finished { session } => {
                self.state = QuizState::Reviewing { session, cursor: 0 };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.reject("review"))
            }
        }
    }

    pub fn review_card(&self) -> Option<ReviewCard> {
        match &self.state {
            QuizState::Reviewing { session, cursor } => annotate(session, *cursor),
            _ => None,
        }
    }

    /// Moves the review cursor on; past the last question the run closes.
    pub fn next(&mut self) -> Result<Phase, QuizError> {
        match &mut self.state {
            QuizState::Reviewing { session, cursor } => {
                let next = *cursor + 1;
                if next < session.len() {
                    *cursor = next;
                } else {
                    logger::log("Review complete, closing");
                    self.state = QuizState::Closed;
                }
                Ok(self.phase())
            }
            _ => Err(self.reject("next")),
        }
    }

    pub fn acknowledge(&mut self) -> Result<Phase, QuizError> {
        match &self.state {
            QuizState::Error {
                recovery: ErrorRecovery::BookSelection,
                ..
            } => Ok(self.open()),
            QuizState::Error {
                recovery: ErrorRecovery::Close,
                ..
            } => {
                self.state = QuizState::Closed;
                Ok(Phase::Closed)
            }
            _ => Err(self.reject("acknowledge")),
        }
    }

    /// Closes the run from any state. An in-flight generation keeps running;
    /// its result will be dropped as stale.
    pub fn dismiss(&mut self) {
        if let Some(request) = self.pending_request() {
            logger::log(&format!("Abandoning generation request {}", request.request_id));
        }
        self.state = QuizState::Closed;
    }

    pub fn request_book_refresh(&mut self) -> Result<RefreshRequest, QuizError> {
        match &mut self.state {
            QuizState::BookSelection {
                refreshing: true, ..
            } => Err(QuizError::RefreshInProgress),
            QuizState::BookSelection {
                status, refreshing, ..
            } => {
                *refreshing = true;
                *status = Some(StatusMessage::info("Updating book list..."));
                logger::log("Refreshing book list");
                Ok(RefreshRequest)
            }
            _ => Err(self.reject("refresh_books")),
        }
    }

    pub fn on_books_refreshed(&mut self, result: Result<(), QuizError>) -> Delivery {
        if !matches!(
            self.state,
            QuizState::BookSelection {
                refreshing: true,
                ..
            }
        ) {
            logger::log("Dropping book refresh result outside book selection");
            return Delivery::Stale;
        }

        let reloaded = result.and_then(|()| self.repository.load_book_titles());
        if let QuizState::BookSelection {
            books,
            status,
            refreshing,
        } = &mut self.state
        {
            *refreshing = false;
            match reloaded {
                Ok(fresh) => {
                    *books = fresh;
                    *status = Some(StatusMessage::info("Book list updated."));
                }
                Err(e) => {
                    logger::log(&format!("Book refresh failed: {}", e));
                    *status = Some(StatusMessage::error(format!(
                        "Failed to update book list. {}",
                        e.user_message()
                    )));
                }
            }
        }
        Delivery::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{MockGenerator, QuizGenerator};
    use crate::review::OptionRole;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fixture(books_json: &str) -> (TempDir, SessionController) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("books.json"), books_json).unwrap();
        let repo = QuizRepository::new(
            dir.path().join("books.json"),
            dir.path().join("quiz_questions.json"),
        );
        (dir, SessionController::new(repo))
    }

    fn opened() -> (TempDir, SessionController) {
        let (dir, mut controller) = fixture(r#"{"books": ["Alpha", "Beta"]}"#);
        assert_eq!(controller.open(), Phase::BookSelection);
        (dir, controller)
    }

    fn spec_items() -> Vec<QuizItem> {
        vec![
            QuizItem::new("A?", ["x", "y"], "y"),
            QuizItem::new("B?", ["p", "q"], "p"),
        ]
    }

    fn answering() -> (TempDir, SessionController) {
        let (dir, mut controller) = opened();
        let request = controller.select_book(Some("Alpha".into())).unwrap();
        assert_eq!(
            controller.on_generation_success(request.request_id, spec_items()),
            Delivery::Applied
        );
        (dir, controller)
    }

    fn assert_progress_invariant(controller: &SessionController) {
        let session = controller.session().unwrap();
        assert_eq!(session.answers().len(), session.current_index());
        assert_eq!(
            session.score(),
            scoring::score_answers(session.items(), session.answers())
        );
    }

    #[test]
    fn test_open_loads_books() {
        let (_dir, controller) = opened();
        assert_eq!(
            controller.books(),
            &[BookTitle::from("Alpha"), BookTitle::from("Beta")]
        );
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_unreadable_book_list_closes_on_acknowledge() {
        let (_dir, mut controller) = fixture("{not json");
        assert_eq!(controller.open(), Phase::Error);
        assert!(matches!(
            controller.state(),
            QuizState::Error {
                recovery: ErrorRecovery::Close,
                ..
            }
        ));
        assert_eq!(controller.acknowledge(), Ok(Phase::Closed));
    }

    #[test]
    fn test_select_without_book_reprompts() {
        let (_dir, mut controller) = opened();
        assert_eq!(controller.select_book(None), Err(QuizError::NoSelection));
        assert_eq!(controller.phase(), Phase::BookSelection);
        match controller.state() {
            QuizState::BookSelection { books, status, .. } => {
                assert_eq!(books.len(), 2);
                assert_eq!(
                    status.as_ref().map(|s| s.kind),
                    Some(StatusKind::Error)
                );
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_full_walk_through_review() {
        let (_dir, mut controller) = answering();
        assert_eq!(controller.phase(), Phase::Answering);
        assert_progress_invariant(&controller);

        assert_eq!(controller.submit(Some(1)), Ok(Phase::Answering));
        assert_progress_invariant(&controller);
        assert_eq!(controller.submit(Some(1)), Ok(Phase::Finished));

        let session = controller.session().unwrap().clone();
        assert_eq!(session.score(), 1);
        assert_eq!(
            session.answers(),
            &[Some("y".to_string()), Some("q".to_string())]
        );
        assert_eq!(session.answers().len(), session.items().len());

        controller.review().unwrap();
        assert_eq!(controller.phase(), Phase::Reviewing);
        assert_eq!(controller.review_card().unwrap().index, 0);

        assert_eq!(controller.next(), Ok(Phase::Reviewing));
        let card = controller.review_card().unwrap();
        assert_eq!(card.index, 1);
        assert_eq!(card.options[0].text, "p");
        assert_eq!(card.options[0].role, OptionRole::Correct);
        assert_eq!(card.options[1].text, "q");
        assert_eq!(card.options[1].role, OptionRole::IncorrectSelected);

        assert_eq!(controller.session(), Some(&session));
        assert_eq!(controller.next(), Ok(Phase::Closed));
        assert!(controller.is_closed());
    }

    #[test]
    fn test_second_selection_while_generating_is_ignored() {
        let (_dir, mut controller) = opened();
        let first = controller.select_book(Some("Alpha".into())).unwrap();

        assert_eq!(
            controller.select_book(Some("Beta".into())),
            Err(QuizError::GenerationInProgress)
        );
        assert_eq!(controller.pending_request(), Some(&first));

        controller.on_generation_success(first.request_id, spec_items());
        let session = controller.session().unwrap();
        assert_eq!(session.title(), &BookTitle::from("Alpha"));
        assert_eq!(session.items(), spec_items().as_slice());
    }

    #[test]
    fn test_events_rejected_while_generating() {
        let (_dir, mut controller) = opened();
        controller.select_book(Some("Alpha".into())).unwrap();

        assert!(matches!(
            controller.submit(Some(0)),
            Err(QuizError::NotAccepted { event: "submit", .. })
        ));
        assert!(controller.review().is_err());
        assert!(controller.next().is_err());
        assert!(controller.acknowledge().is_err());
        assert!(controller.request_book_refresh().is_err());
        assert_eq!(controller.phase(), Phase::Generating);
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let (_dir, mut controller) = opened();
        let request = controller.select_book(Some("Alpha".into())).unwrap();

        let stale = RequestId(request.request_id.0 + 41);
        assert_eq!(
            controller.on_generation_success(stale, spec_items()),
            Delivery::Stale
        );
        assert_eq!(
            controller.on_generation_failure(stale, QuizError::EmptyResult),
            Delivery::Stale
        );
        assert_eq!(controller.phase(), Phase::Generating);
    }

    #[test]
    fn test_completion_after_dismiss_is_dropped() {
        let (_dir, mut controller) = opened();
        let request = controller.select_book(Some("Alpha".into())).unwrap();
        controller.dismiss();

        let outcome = GenerationOutcome {
            request_id: request.request_id,
            result: Ok(spec_items()),
        };
        assert_eq!(controller.on_generation_complete(outcome), Delivery::Stale);
        assert!(controller.is_closed());
    }

    #[test]
    fn test_completion_for_replaced_run_is_dropped() {
        let (_dir, mut controller) = opened();
        let old = controller.select_book(Some("Alpha".into())).unwrap();
        controller.dismiss();
        controller.open();
        let new = controller.select_book(Some("Beta".into())).unwrap();
        assert_ne!(old.request_id, new.request_id);

        assert_eq!(
            controller.on_generation_success(old.request_id, spec_items()),
            Delivery::Stale
        );
        assert_eq!(controller.pending_request(), Some(&new));
    }

    #[test]
    fn test_generation_error_then_acknowledge_returns_clean() {
        let (_dir, mut controller) = opened();
        let request = controller.select_book(Some("Alpha".into())).unwrap();
        controller.on_generation_failure(
            request.request_id,
            QuizError::Generation("exit status 1".into()),
        );

        match controller.state() {
            QuizState::Error { message, recovery } => {
                assert!(message.contains("internet connection"));
                assert_eq!(*recovery, ErrorRecovery::BookSelection);
            }
            other => panic!("unexpected state {:?}", other),
        }

        assert_eq!(controller.acknowledge(), Ok(Phase::BookSelection));
        assert!(controller.session().is_none());
        assert!(controller.pending_request().is_none());
        assert_eq!(controller.books().len(), 2);
    }

    #[test]
    fn test_empty_items_is_an_error() {
        let (_dir, mut controller) = opened();
        let request = controller.select_book(Some("Alpha".into())).unwrap();
        controller.on_generation_success(request.request_id, Vec::new());
        assert_eq!(controller.phase(), Phase::Error);
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_submit_past_end_forces_finished() {
        let (_dir, mut controller) = answering();
        let done = scoring::record_answer(
            scoring::record_answer(Session::new("Alpha".into(), spec_items()), Some(0)),
            Some(0),
        );
        controller.state = QuizState::Answering {
            session: done.clone(),
        };

        assert_eq!(controller.submit(Some(1)), Ok(Phase::Finished));
        assert_eq!(controller.session(), Some(&done));
    }

    #[test]
    fn test_review_cursor_out_of_range_closes() {
        let (_dir, mut controller) = answering();
        controller.submit(None).unwrap();
        controller.submit(None).unwrap();
        let session = controller.session().unwrap().clone();
        controller.state = QuizState::Reviewing { session, cursor: 7 };

        assert!(controller.review_card().is_none());
        assert_eq!(controller.next(), Ok(Phase::Closed));
    }

    #[test]
    fn test_review_leaves_answers_alone() {
        let (_dir, mut controller) = answering();
        controller.submit(None).unwrap();
        controller.submit(Some(0)).unwrap();
        let before = controller.session().unwrap().clone();
        assert_eq!(before.answers(), &[None, Some("p".to_string())]);
        assert_eq!(before.score(), 1);

        controller.review().unwrap();
        let _ = controller.review_card();
        controller.next().unwrap();
        assert_eq!(controller.session(), Some(&before));
    }

    #[test]
    fn test_submit_only_while_answering() {
        let (_dir, mut controller) = opened();
        assert!(controller.submit(Some(0)).is_err());
        assert_eq!(controller.phase(), Phase::BookSelection);
        assert!(controller.review().is_err());
    }

    #[test]
    fn test_reopen_discards_finished_session() {
        let (_dir, mut controller) = answering();
        controller.submit(Some(1)).unwrap();
        controller.submit(Some(0)).unwrap();
        assert_eq!(controller.phase(), Phase::Finished);

        assert_eq!(controller.open(), Phase::BookSelection);
        assert!(controller.session().is_none());
    }

    fn rewrite_books(dir: &Path, json: &str) {
        fs::write(dir.join("books.json"), json).unwrap();
    }

    #[test]
    fn test_book_refresh_rereads_list() {
        let (dir, mut controller) = opened();
        controller.request_book_refresh().unwrap();
        assert_eq!(
            controller.request_book_refresh(),
            Err(QuizError::RefreshInProgress)
        );

        rewrite_books(dir.path(), r#"{"books": ["Gamma"]}"#);
        assert_eq!(controller.on_books_refreshed(Ok(())), Delivery::Applied);
        assert_eq!(controller.books(), &[BookTitle::from("Gamma")]);
        match controller.state() {
            QuizState::BookSelection {
                status, refreshing, ..
            } => {
                assert!(!refreshing);
                assert_eq!(status.as_ref().map(|s| s.kind), Some(StatusKind::Info));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_failed_refresh_keeps_old_list() {
        let (_dir, mut controller) = opened();
        controller.request_book_refresh().unwrap();
        controller.on_books_refreshed(Err(QuizError::Generation("exit status 1".into())));
        assert_eq!(controller.books().len(), 2);
        assert!(controller.request_book_refresh().is_ok());
    }

    #[test]
    fn test_refresh_result_without_request_is_stale() {
        let (_dir, mut controller) = opened();
        assert_eq!(controller.on_books_refreshed(Ok(())), Delivery::Stale);
    }

    #[tokio::test]
    async fn test_generation_delivered_through_async_generator() {
        let (_dir, mut controller) = opened();
        let generator = MockGenerator::with_results(
            vec![Ok(spec_items())],
            Duration::from_millis(10),
        );

        let request = controller.select_book(Some("Beta".into())).unwrap();
        let result = generator.generate(&request.title).await;
        let delivery = controller.on_generation_complete(GenerationOutcome {
            request_id: request.request_id,
            result,
        });

        assert_eq!(delivery, Delivery::Applied);
        assert_eq!(controller.phase(), Phase::Answering);
        assert_eq!(generator.calls(), vec![BookTitle::from("Beta")]);
    }
}
