use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

pub const DEFAULT_LOG_FILE: &str = "quiz_debug.log";

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

/// Opens (or appends to) the log file. Until this runs, `log` is a no-op.
pub fn init(path: impl AsRef<Path>) -> io::Result<()> {
    let mut logger = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if logger.is_none() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        *logger = Some(file);
    }
    Ok(())
}

pub fn log(message: &str) {
    let mut logger = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(file) = logger.as_mut() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {}", timestamp, message);
    }
}
