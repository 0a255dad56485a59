use book_quiz::logger::{self, DEFAULT_LOG_FILE};
use book_quiz::models::{WorkerRequest, WorkerResponse};
use book_quiz::{
    handle_key, spawn_generation_worker, BookListUpdater, KeyOutcome, ProcessGenerator,
    QuizConfig, QuizRepository, SessionController, UiCursor,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> io::Result<()> {
    let config = QuizConfig::from_args(std::env::args().skip(1))?;

    if let Err(e) = logger::init(DEFAULT_LOG_FILE) {
        eprintln!("Warning: could not open {}: {}", DEFAULT_LOG_FILE, e);
    }
    logger::log(&format!("Starting with {:?}", config));

    let (request_tx, request_rx) = unbounded::<WorkerRequest>();
    let (response_tx, response_rx) = unbounded::<WorkerResponse>();
    let worker = spawn_generation_worker(
        response_tx,
        request_rx,
        Arc::new(ProcessGenerator::from_config(&config)),
        Arc::new(BookListUpdater::from_config(&config)),
    )?;

    let mut controller = SessionController::new(QuizRepository::from_config(&config));
    controller.open();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut controller, &request_tx, &response_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Dropping the sender lets the worker thread wind down. A generation still
    // in flight is abandoned, so it is not joined.
    drop(request_tx);
    drop(worker);
    logger::log("Exiting");
    result
}

fn run(
    terminal: &mut Tui,
    controller: &mut SessionController,
    request_tx: &Sender<WorkerRequest>,
    response_rx: &Receiver<WorkerResponse>,
) -> io::Result<()> {
    let mut cursor = UiCursor::default();

    while !controller.is_closed() {
        while let Ok(response) = response_rx.try_recv() {
            match response {
                WorkerResponse::Generated(outcome) => {
                    controller.on_generation_complete(outcome);
                    cursor.option_index = None;
                }
                WorkerResponse::BooksRefreshed(result) => {
                    controller.on_books_refreshed(result);
                    cursor.book_index = 0;
                }
            }
        }

        terminal.draw(|f| book_quiz::ui::draw(f, controller, &cursor))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(controller, &mut cursor, key) {
                KeyOutcome::Continue => {}
                KeyOutcome::Dispatch(request) => {
                    if request_tx.send(request).is_err() {
                        return Err(io::Error::new(
                            io::ErrorKind::BrokenPipe,
                            "generation worker stopped",
                        ));
                    }
                }
                KeyOutcome::Quit => break,
            }
        }
    }

    Ok(())
}
