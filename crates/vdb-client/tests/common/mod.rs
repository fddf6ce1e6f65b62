//! Shared helpers for vdb-client integration tests

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::rc::Rc;
use std::thread::{self, JoinHandle};

use vdb_client::{Connector, VdbConfig};

/// A stand-in viewer: accepts one connection and collects everything sent
/// until the client closes it.
#[allow(dead_code)]
pub struct ViewerSink {
    addr: SocketAddr,
    handle: JoinHandle<io::Result<String>>,
}

#[allow(dead_code)]
impl ViewerSink {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind viewer sink");
        let addr = listener.local_addr().expect("viewer sink address");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept()?;
            let mut text = String::new();
            stream.read_to_string(&mut text)?;
            Ok(text)
        });
        Self { addr, handle }
    }

    pub fn config(&self) -> VdbConfig {
        VdbConfig::with_address(self.addr.to_string())
    }

    /// Wait for the client to disconnect and return the received text.
    /// Only call this once the client has connected.
    pub fn finish(self) -> String {
        self.handle
            .join()
            .expect("viewer sink thread panicked")
            .expect("viewer sink read failed")
    }
}

/// Address with nothing listening on it
#[allow(dead_code)]
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    addr.to_string()
}

#[derive(Default)]
struct Captured {
    bytes: Vec<u8>,
    writes: usize,
}

/// In-process connector that keeps every byte written
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct CaptureConnector {
    captured: Rc<RefCell<Captured>>,
}

#[allow(dead_code)]
impl CaptureConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.captured.borrow().bytes).into_owned()
    }

    pub fn writes(&self) -> usize {
        self.captured.borrow().writes
    }
}

#[allow(dead_code)]
pub struct CaptureStream {
    captured: Rc<RefCell<Captured>>,
}

impl Write for CaptureStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut captured = self.captured.borrow_mut();
        captured.bytes.extend_from_slice(buf);
        captured.writes += 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Connector for CaptureConnector {
    type Stream = CaptureStream;

    fn connect(&mut self) -> io::Result<CaptureStream> {
        Ok(CaptureStream {
            captured: Rc::clone(&self.captured),
        })
    }

    fn endpoint(&self) -> String {
        "capture".to_string()
    }
}
