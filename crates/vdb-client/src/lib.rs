//! vdb-client - Visual debugging transport
//!
//! Streams drawing commands (points, lines, normals, triangles, colors,
//! labels, frame markers) to a viewer process listening on a local TCP
//! port. Commands are encoded as text lines, buffered, and flushed when the
//! buffer nears capacity or a refresh is due.
//!
//! # Key Components
//!
//! - **Vdb**: the context that owns all transport state
//! - **Connection**: lazy one-shot connection with a terminal failure state
//! - **OutputBuffer**: fixed-capacity buffer with red-zone flushing
//! - **StringTable**: label interning
//! - **BatchDepth**: nested begin/end batching of refreshes
//! - **SampleGate**: probabilistic suppression of geometry
//!
//! # Failure model
//!
//! The channel is best-effort. If the viewer cannot be reached, or a send
//! comes up short, the failure is logged once and every later call returns
//! [`VdbError::Disconnected`] without touching the network. Callers are free
//! to ignore the results.
//!
//! # Examples
//!
//! ```no_run
//! use vdb_client::Vdb;
//!
//! # fn main() -> vdb_client::VdbResult<()> {
//! let mut vdb = Vdb::new()?;
//! vdb.begin();
//! vdb.color(1.0, 0.0, 0.0)?;
//! vdb.point(1.0, 2.0, 3.0)?;
//! vdb.point(4.0, 5.0, 6.0)?;
//! vdb.end()?;
//! # Ok(())
//! # }
//! ```

mod macros;

pub mod batch;
pub mod buffer;
pub mod config;
pub mod connection;
pub mod context;
pub mod draw;
pub mod error;
pub mod intern;
pub mod sample;

#[cfg(test)]
mod testing;

pub use config::VdbConfig;
pub use connection::{Connection, ConnectionState, Connector, Sink, TcpConnector};
pub use context::Vdb;
pub use error::{ConfigError, VdbError, VdbResult};
pub use vdb_protocol::{Command, GroupKind, Primitive};
