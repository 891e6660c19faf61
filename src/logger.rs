use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// 画面は raw mode で占有しているので、ログはファイルに書く
pub struct Logger {
    file: File,
}

impl Logger {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    pub fn log(&mut self, message: &str) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
    }
}

thread_local! {
    static LOGGER: RefCell<Option<Logger>> = const { RefCell::new(None) };
}

pub fn init<P: AsRef<Path>>(path: P) -> io::Result<()> {
    // debug build でのみロガーを初期化
    #[cfg(debug_assertions)]
    {
        let logger = Logger::new(path)?;
        LOGGER.with(|l| {
            *l.borrow_mut() = Some(logger);
        });
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = path;
    }
    Ok(())
}

pub fn debug(message: &str) {
    #[cfg(debug_assertions)]
    {
        LOGGER.with(|l| {
            if let Some(logger) = l.borrow_mut().as_mut() {
                logger.log(message);
            }
        });
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = message;
    }
}
