// A minimal stderr logger for the `log` crate. The classifier logs its
// decisions at the debug and trace levels, and that is all this needs to
// show, so there is no filtering beyond the global max level.

use log::{self, Log};

/// Writes every enabled record to stderr.
#[derive(Debug)]
pub struct Logger(());

const LOGGER: &'static Logger = &Logger(());

impl Logger {
    /// Install this logger as the global logger.
    pub fn init() -> Result<(), log::SetLoggerError> {
        log::set_logger(LOGGER)
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        // Filtering happens through log::set_max_level.
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => format!("|{}:{}", file, line),
            (Some(file), None) => format!("|{}", file),
            _ => String::new(),
        };
        eprintln!(
            "{}|{}{}: {}",
            record.level(),
            record.target(),
            location,
            record.args()
        );
    }

    fn flush(&self) {}
}
