use crate::controller::{Phase, SessionController};
use crate::logger;
use crate::models::WorkerRequest;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the UI has highlighted. Lives outside the controller: nothing here is
/// committed until Enter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiCursor {
    pub book_index: usize,
    pub option_index: Option<usize>,
}

#[derive(Debug)]
pub enum KeyOutcome {
    Continue,
    Dispatch(WorkerRequest),
    Quit,
}

fn move_down(index: usize, len: usize) -> usize {
    if index + 1 < len { index + 1 } else { index }
}

fn close(controller: &mut SessionController) -> KeyOutcome {
    controller.dismiss();
    KeyOutcome::Quit
}

pub fn handle_key(
    controller: &mut SessionController,
    cursor: &mut UiCursor,
    key: KeyEvent,
) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return close(controller);
    }

    match controller.phase() {
        Phase::BookSelection => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => close(controller),
            KeyCode::Up | KeyCode::Char('k') => {
                cursor.book_index = cursor.book_index.saturating_sub(1);
                KeyOutcome::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                cursor.book_index = move_down(cursor.book_index, controller.books().len());
                KeyOutcome::Continue
            }
            KeyCode::Enter => {
                let title = controller.books().get(cursor.book_index).cloned();
                match controller.select_book(title) {
                    Ok(request) => KeyOutcome::Dispatch(WorkerRequest::Generate(request)),
                    Err(e) => {
                        logger::log(&format!("Book selection rejected: {}", e));
                        KeyOutcome::Continue
                    }
                }
            }
            KeyCode::Char('r') => match controller.request_book_refresh() {
                Ok(request) => KeyOutcome::Dispatch(WorkerRequest::RefreshBooks(request)),
                Err(e) => {
                    logger::log(&format!("Book refresh rejected: {}", e));
                    KeyOutcome::Continue
                }
            },
            _ => KeyOutcome::Continue,
        },
        Phase::Generating => match key.code {
            KeyCode::Esc => close(controller),
            _ => KeyOutcome::Continue,
        },
        Phase::Answering => {
            let option_count = controller
                .session()
                .and_then(|s| s.current_item())
                .map(|item| item.options.len())
                .unwrap_or(0);
            match key.code {
                KeyCode::Esc => close(controller),
                KeyCode::Up | KeyCode::Char('k') => {
                    cursor.option_index = cursor.option_index.map(|i| i.saturating_sub(1));
                    KeyOutcome::Continue
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if option_count > 0 {
                        cursor.option_index = Some(match cursor.option_index {
                            Some(i) => move_down(i, option_count),
                            None => 0,
                        });
                    }
                    KeyOutcome::Continue
                }
                KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                    let index = c as usize - '1' as usize;
                    if index < option_count {
                        cursor.option_index = Some(index);
                    }
                    KeyOutcome::Continue
                }
                KeyCode::Enter => {
                    if let Err(e) = controller.submit(cursor.option_index.take()) {
                        logger::log(&format!("Submit rejected: {}", e));
                    }
                    KeyOutcome::Continue
                }
                _ => KeyOutcome::Continue,
            }
        }
        Phase::Finished => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => close(controller),
            KeyCode::Enter | KeyCode::Char('r') => {
                if let Err(e) = controller.review() {
                    logger::log(&format!("Review rejected: {}", e));
                }
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        },
        Phase::Reviewing => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => close(controller),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => match controller.next() {
                Ok(Phase::Closed) => KeyOutcome::Quit,
                Ok(_) => KeyOutcome::Continue,
                Err(e) => {
                    logger::log(&format!("Next rejected: {}", e));
                    KeyOutcome::Continue
                }
            },
            _ => KeyOutcome::Continue,
        },
        Phase::Error => match key.code {
            KeyCode::Enter | KeyCode::Esc => match controller.acknowledge() {
                Ok(Phase::Closed) => KeyOutcome::Quit,
                Ok(_) => {
                    *cursor = UiCursor::default();
                    KeyOutcome::Continue
                }
                Err(e) => {
                    logger::log(&format!("Acknowledge rejected: {}", e));
                    KeyOutcome::Continue
                }
            },
            _ => KeyOutcome::Continue,
        },
        Phase::Closed => KeyOutcome::Quit,
    }
}
