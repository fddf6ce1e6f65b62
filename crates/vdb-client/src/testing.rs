//! In-memory connector and log capture used by unit tests

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::connection::Connector;

#[derive(Default)]
struct Shared {
    bytes: Vec<u8>,
    writes: usize,
    connect_attempts: usize,
    disconnects: usize,
}

/// Records every byte written; can refuse connections or short-write
#[derive(Clone, Default)]
pub struct MemoryConnector {
    shared: Rc<RefCell<Shared>>,
    refuse: bool,
    short_limit: Option<usize>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Every write accepts at most `limit` bytes
    pub fn short_writes(limit: usize) -> Self {
        Self {
            short_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn sent_text(&self) -> String {
        String::from_utf8_lossy(&self.shared.borrow().bytes).into_owned()
    }

    pub fn writes(&self) -> usize {
        self.shared.borrow().writes
    }

    pub fn connect_attempts(&self) -> usize {
        self.shared.borrow().connect_attempts
    }

    pub fn disconnects(&self) -> usize {
        self.shared.borrow().disconnects
    }

    pub fn disconnected(&self) -> bool {
        self.disconnects() > 0
    }
}

pub struct MemoryStream {
    shared: Rc<RefCell<Shared>>,
    short_limit: Option<usize>,
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.short_limit.map_or(buf.len(), |limit| buf.len().min(limit));
        let mut shared = self.shared.borrow_mut();
        shared.bytes.extend_from_slice(&buf[..n]);
        shared.writes += 1;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Connector for MemoryConnector {
    type Stream = MemoryStream;

    fn connect(&mut self) -> io::Result<MemoryStream> {
        self.shared.borrow_mut().connect_attempts += 1;
        if self.refuse {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "viewer not running",
            ));
        }
        Ok(MemoryStream {
            shared: Rc::clone(&self.shared),
            short_limit: self.short_limit,
        })
    }

    fn disconnect(&mut self, stream: MemoryStream) {
        drop(stream);
        self.shared.borrow_mut().disconnects += 1;
    }

    fn endpoint(&self) -> String {
        "memory".to_string()
    }
}

/// Formatted log output shared with the subscriber's writer
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber recording events at `level` and above; returns
/// one line per event.
pub fn capture_logs<T>(level: Level, f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    let lines = String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect();
    (value, lines)
}
