//! The vdb context
//!
//! [`Vdb`] owns the connection, output buffer, string table, batch depth and
//! sampling gate. It is a single-writer object: every mutating call takes
//! `&mut self`, so sharing one context between threads needs an outer lock.
//! Dropping the context flushes pending bytes and closes the connection once.

use std::borrow::Cow;

use vdb_protocol::{sanitize_label, Command, GroupKind, Primitive, Record};

use crate::batch::{BatchDepth, BatchEnd};
use crate::buffer::OutputBuffer;
use crate::config::VdbConfig;
use crate::connection::{Connection, ConnectionState, Connector, TcpConnector};
use crate::error::{VdbError, VdbResult};
use crate::intern::StringTable;
use crate::sample::SampleGate;

pub struct Vdb<C: Connector = TcpConnector> {
    connection: Connection<C>,
    buffer: OutputBuffer,
    strings: StringTable,
    batch: BatchDepth,
    sampling: SampleGate,
}

impl Vdb<TcpConnector> {
    /// Context for the viewer at the default endpoint
    pub fn new() -> VdbResult<Self> {
        Self::with_config(&VdbConfig::default())
    }

    /// Context for the endpoint and sizing in `config`
    pub fn with_config(config: &VdbConfig) -> VdbResult<Self> {
        config.validate()?;
        let connector = TcpConnector::new(config.socket_addr()?);
        Self::with_connector(connector, config)
    }
}

impl<C: Connector> Vdb<C> {
    /// Context over a custom transport. Nothing is opened until the first
    /// command needs the connection.
    pub fn with_connector(connector: C, config: &VdbConfig) -> VdbResult<Self> {
        let buffer = OutputBuffer::new(config.buffer_capacity, config.redzone)?;
        Ok(Self {
            connection: Connection::new(connector),
            buffer,
            strings: StringTable::new(),
            batch: BatchDepth::new(),
            sampling: SampleGate::new(config.sample_seed),
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn connector(&self) -> &C {
        self.connection.connector()
    }

    /// Bytes waiting in the output buffer
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn depth(&self) -> u32 {
        self.batch.depth()
    }

    pub fn sample_enabled(&self) -> bool {
        self.sampling.is_enabled()
    }

    /// Open the connection if this is the first use.
    pub fn ensure_connected(&mut self) -> VdbResult<()> {
        self.connection.ensure_connected()
    }

    /// Emit `count` records of `primitive`, the `i`-th starting at
    /// `payload[i * stride]`. Everything the drawing calls do goes through
    /// here.
    ///
    /// Geometry is dropped without touching the connection while sampling is
    /// disabled. Outside a batch the records are followed by a refresh.
    pub fn emit(
        &mut self,
        primitive: Primitive,
        count: usize,
        stride: usize,
        payload: &[f32],
    ) -> VdbResult<()> {
        if primitive.is_geometry() && !self.sampling.is_enabled() {
            return Ok(());
        }
        if count == 0 {
            return Ok(());
        }

        let arity = primitive.arity();
        let repeats = stride == 0 && count > 1;
        let required = (count - 1)
            .checked_mul(stride)
            .and_then(|offset| offset.checked_add(arity));
        if repeats || required.map_or(true, |required| required > payload.len()) {
            return Err(VdbError::InvalidPayload {
                len: payload.len(),
                count,
                arity,
                stride,
            });
        }

        self.connection.ensure_connected()?;
        for index in 0..count {
            let start = index * stride;
            let line = Record::new(primitive, &payload[start..start + arity]).to_string();
            self.buffer.append(&line, &mut self.connection)?;
        }

        if !self.batch.is_batched() {
            self.refresh()?;
        }
        Ok(())
    }

    /// Append a refresh and send everything buffered.
    pub fn refresh(&mut self) -> VdbResult<()> {
        self.connection.ensure_connected()?;
        self.buffer
            .append(&Command::Refresh.to_line(), &mut self.connection)?;
        self.buffer.flush(&mut self.connection)
    }

    /// Send everything buffered without a refresh.
    pub fn flush(&mut self) -> VdbResult<()> {
        self.connection.ensure_connected()?;
        self.buffer.flush(&mut self.connection)
    }

    /// Defer refreshes until the matching [`end`](Self::end).
    pub fn begin(&mut self) {
        self.batch.begin();
    }

    /// Close a batch. Closing the outermost batch refreshes; an `end`
    /// without a `begin` does nothing.
    pub fn end(&mut self) -> VdbResult<()> {
        match self.batch.end() {
            BatchEnd::Outermost => self.refresh(),
            BatchEnd::Inner | BatchEnd::Unbalanced => Ok(()),
        }
    }

    /// Run `f` inside a batch; the batch is closed even if `f` fails.
    pub fn batch<T>(&mut self, f: impl FnOnce(&mut Self) -> VdbResult<T>) -> VdbResult<T> {
        self.begin();
        let result = f(self);
        let ended = self.end();
        let value = result?;
        ended?;
        Ok(value)
    }

    /// Key for `label`, defining it on the wire the first time it is seen.
    ///
    /// Keys follow the caller's text; only the definition line carries the
    /// sanitized form, so distinct labels never share a key.
    pub fn intern(&mut self, label: &str) -> VdbResult<u32> {
        self.connection.ensure_connected()?;
        let interned = self.strings.intern(label);
        if interned.is_new() {
            let clean = sanitize_label(label);
            if let Cow::Owned(_) = clean {
                tracing::warn!("vdb: label {:?} rewritten to fit one line", label);
            }
            let define = Command::DefineString {
                key: interned.key(),
                label: clean.into_owned(),
            };
            self.buffer.append(&define.to_line(), &mut self.connection)?;
        }
        Ok(interned.key())
    }

    /// Attach `label` to the primitives that follow.
    pub fn group(&mut self, kind: GroupKind, label: &str) -> VdbResult<()> {
        let key = self.intern(label)?;
        self.buffer
            .append(&Command::group(kind, key).to_line(), &mut self.connection)
    }

    /// Plain label for the primitives that follow
    pub fn label(&mut self, label: &str) -> VdbResult<()> {
        self.group(GroupKind::Label, label)
    }

    /// Named line-segment annotation for the primitives that follow
    pub fn line_label(&mut self, label: &str) -> VdbResult<()> {
        self.group(GroupKind::NamedLine, label)
    }

    /// Set the sampling state; see [`SampleGate::set_sample`].
    pub fn set_sample(&mut self, probability: f32) -> bool {
        self.sampling.set_sample(probability)
    }
}

impl<C: Connector> Drop for Vdb<C> {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if self.connection.is_connected() {
            if let Err(e) = self.buffer.flush(&mut self.connection) {
                tracing::debug!("vdb: final flush failed: {}", e);
            }
        } else {
            self.buffer.discard();
        }
    }
}
