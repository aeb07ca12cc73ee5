//! Log record capture for assertions on warnings.
//!
//! The test harness runs each test on its own thread, so records are kept
//! per thread and a test only ever sees what it logged itself.

use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let entry = (thread::current().id(), record.level(), record.args().to_string());
        self.records.lock().unwrap().push(entry);
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

/// Run `f` and return its result with the records it logged on this thread.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<(Level, String)>) {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    let me = thread::current().id();
    LOGGER.records.lock().unwrap().retain(|(id, ..)| *id != me);

    let value = f();

    let mut records = LOGGER.records.lock().unwrap();
    let (mine, others): (Vec<_>, Vec<_>) = records.drain(..).partition(|(id, ..)| *id == me);
    *records = others;
    let mine = mine
        .into_iter()
        .map(|(_, level, message)| (level, message))
        .collect();
    (value, mine)
}

/// Messages logged at `level`.
pub fn at_level(records: &[(Level, String)], level: Level) -> Vec<&str> {
    records
        .iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, message)| message.as_str())
        .collect()
}
