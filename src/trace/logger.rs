use std::{
    fs::OpenOptions,
    io::{self, Write},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use tracing::warn;

use crate::trace::trace::TraceEvent;

type Sink = Box<dyn Write + Send>;

/// JSONL sink for client events, one object per line.
///
/// Tracing is best effort. A path that cannot be opened yields a disabled
/// logger, and an event that cannot be written is dropped with a warning.
pub struct TraceLogger {
    sink: Option<Mutex<Sink>>,
    written: AtomicUsize,
}

impl TraceLogger {
    /// Append to `path`, creating it if needed.
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self::from_writer(file),
            Err(e) => {
                warn!(path, error = %e, "could not open trace file, tracing disabled");
                Self::disabled()
            }
        }
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Some(Mutex::new(Box::new(writer))),
            written: AtomicUsize::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self {
            sink: None,
            written: AtomicUsize::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Events that actually reached the sink.
    pub fn events_written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else { return };

        match write_line(sink, event) {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!(step = event.step, event = %event.event, error = %e, "dropped trace event"),
        }
    }
}

fn write_line(sink: &Mutex<Sink>, event: &TraceEvent) -> io::Result<()> {
    let mut line = serde_json::to_vec(event)?;
    line.push(b'\n');

    let mut sink = sink
        .lock()
        .map_err(|_| io::Error::other("trace sink lock poisoned"))?;
    sink.write_all(&line)?;
    sink.flush()
}
