//! Lazy, one-shot connection to the viewer
//!
//! The connection moves through `Uninitialized -> Connected -> Failed`
//! (or `Closed` on teardown) and never goes back. Only the first failure is
//! logged; afterwards every call reports [`VdbError::Disconnected`].

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use serde::{Deserialize, Serialize};

use crate::error::{VdbError, VdbResult};

/// Opens the byte stream the connection writes to
pub trait Connector {
    type Stream: Write;

    /// Open the stream. Called at most once per connection.
    fn connect(&mut self) -> io::Result<Self::Stream>;

    /// Release a stream that was successfully opened
    fn disconnect(&mut self, stream: Self::Stream) {
        drop(stream);
    }

    /// Endpoint description for diagnostics
    fn endpoint(&self) -> String;
}

/// TCP connector for the viewer's loopback endpoint
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: SocketAddr,
}

impl TcpConnector {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&mut self) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(self.addr)?;
        // Lines are already batched in the output buffer
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn disconnect(&mut self, stream: TcpStream) {
        if let Err(e) = stream.shutdown(Shutdown::Both) {
            tracing::debug!("vdb: shutdown of {} failed: {}", self.addr, e);
        }
    }

    fn endpoint(&self) -> String {
        self.addr.to_string()
    }
}

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection attempted yet
    Uninitialized,
    /// Stream open
    Connected,
    /// Connect or send failed; terminal
    Failed,
    /// Torn down; terminal
    Closed,
}

enum Link<S> {
    Uninitialized,
    Connected(S),
    Failed,
    Closed,
}

/// Where buffered bytes are handed for transmission
pub trait Sink {
    fn send(&mut self, bytes: &[u8]) -> VdbResult<()>;
}

/// Connection to the viewer over a [`Connector`]
pub struct Connection<C: Connector> {
    connector: C,
    link: Link<C::Stream>,
}

impl<C: Connector> Connection<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            link: Link::Uninitialized,
        }
    }

    pub fn state(&self) -> ConnectionState {
        match self.link {
            Link::Uninitialized => ConnectionState::Uninitialized,
            Link::Connected(_) => ConnectionState::Connected,
            Link::Failed => ConnectionState::Failed,
            Link::Closed => ConnectionState::Closed,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.link, Link::Connected(_))
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Open the connection on first call; later calls repeat the outcome.
    pub fn ensure_connected(&mut self) -> VdbResult<()> {
        match self.link {
            Link::Connected(_) => Ok(()),
            Link::Failed | Link::Closed => Err(VdbError::Disconnected),
            Link::Uninitialized => match self.connector.connect() {
                Ok(stream) => {
                    tracing::debug!("vdb: connected to {}", self.connector.endpoint());
                    self.link = Link::Connected(stream);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(
                        "vdb: cannot connect to viewer at {}: {}",
                        self.connector.endpoint(),
                        e
                    );
                    self.link = Link::Failed;
                    Err(VdbError::ConnectionUnavailable(e))
                }
            },
        }
    }

    /// Close the stream if it was ever opened. Idempotent.
    pub fn close(&mut self) {
        match std::mem::replace(&mut self.link, Link::Closed) {
            Link::Connected(stream) => {
                tracing::debug!("vdb: closing connection to {}", self.connector.endpoint());
                self.connector.disconnect(stream);
            }
            Link::Failed => self.link = Link::Failed,
            Link::Uninitialized | Link::Closed => {}
        }
    }

    fn fail(&mut self) {
        if let Link::Connected(stream) = std::mem::replace(&mut self.link, Link::Failed) {
            self.connector.disconnect(stream);
        }
    }
}

impl<C: Connector> Sink for Connection<C> {
    /// Hand the bytes to the stream in a single write. A short write is not
    /// retried; it fails the connection permanently.
    fn send(&mut self, bytes: &[u8]) -> VdbResult<()> {
        let stream = match &mut self.link {
            Link::Connected(stream) => stream,
            Link::Uninitialized => return Err(VdbError::NotConnected),
            Link::Failed | Link::Closed => return Err(VdbError::Disconnected),
        };
        if bytes.is_empty() {
            return Ok(());
        }

        let result = stream.write(bytes).and_then(|n| stream.flush().map(|()| n));
        match result {
            Ok(sent) if sent == bytes.len() => Ok(()),
            Ok(sent) => {
                tracing::error!(
                    "vdb: short send to {}: {} of {} bytes",
                    self.connector.endpoint(),
                    sent,
                    bytes.len()
                );
                self.fail();
                Err(VdbError::TransmissionIncomplete {
                    sent,
                    expected: bytes.len(),
                })
            }
            Err(e) => {
                tracing::error!("vdb: send to {} failed: {}", self.connector.endpoint(), e);
                self.fail();
                Err(VdbError::TransmissionFailed(e))
            }
        }
    }
}

impl<C: Connector> Drop for Connection<C> {
    fn drop(&mut self) {
        self.close();
    }
}
