//! Test-only [`Log`] implementation, capturing the records emitted by each thread.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

static LOGGER: CapturingLogger = CapturingLogger;
static INSTALL: Once = Once::new();

struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        // Records emitted while the thread is being torn down are dropped
        let _ = CAPTURED.try_with(|c| c.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

/// Start capturing the records emitted by the current thread, discarding any captured before.
pub fn start() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
}

/// Messages of the records captured on the current thread, at exactly `level`.
pub fn messages_at(level: Level) -> Vec<String> {
    CAPTURED.with(|c| c.borrow().iter().filter(|(l, _)| *l == level).map(|(_, m)| m.clone()).collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn captures_per_level() {
        start();
        error!("first");
        warn!("second");
        error!("third");

        assert_eq!(messages_at(Level::Error), vec!["first".to_string(), "third".to_string()]);
        assert_eq!(messages_at(Level::Warn), vec!["second".to_string()]);
        assert!(messages_at(Level::Info).is_empty());

        start();
        assert!(messages_at(Level::Error).is_empty());
    }
}
