//! Fixed-capacity output buffer with red-zone flushing
//!
//! Encoded lines accumulate until a completed line leaves less than the
//! red zone free, at which point the whole buffer is handed to the sink.
//! Flushing always empties the buffer, even when the send fails.

use vdb_protocol::MAX_LINE_LEN;

use crate::connection::Sink;
use crate::error::{ConfigError, VdbResult};

pub struct OutputBuffer {
    data: Vec<u8>,
    capacity: usize,
    redzone: usize,
}

impl OutputBuffer {
    pub fn new(capacity: usize, redzone: usize) -> Result<Self, ConfigError> {
        if redzone < MAX_LINE_LEN || capacity <= redzone {
            return Err(ConfigError::OutOfRange(format!(
                "buffer of {} bytes with a {} byte redzone cannot hold a {} byte line",
                capacity, redzone, MAX_LINE_LEN
            )));
        }
        Ok(Self {
            data: Vec::with_capacity(capacity),
            capacity,
            redzone,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn free(&self) -> usize {
        self.capacity - self.data.len()
    }

    /// Append one encoded line, flushing if it lands in the red zone.
    pub fn append(&mut self, line: &str, sink: &mut impl Sink) -> VdbResult<()> {
        let bytes = line.as_bytes();
        debug_assert!(bytes.len() <= self.redzone);

        // Only reachable if a caller bypassed the newline check
        if bytes.len() > self.free() {
            self.flush(sink)?;
        }

        self.data.extend_from_slice(bytes);
        if self.data.last() == Some(&b'\n') && self.free() < self.redzone {
            self.flush(sink)?;
        }
        Ok(())
    }

    /// Send `[0, len)` and reset. The buffer is cleared whatever the outcome.
    pub fn flush(&mut self, sink: &mut impl Sink) -> VdbResult<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        let result = sink.send(&self.data);
        tracing::debug!("vdb: flushed {} bytes", self.data.len());
        self.data.clear();
        result
    }

    /// Drop pending bytes without sending them
    pub fn discard(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VdbError;

    #[derive(Default)]
    struct RecordingSink {
        flushes: Vec<Vec<u8>>,
        fail: bool,
    }

    impl Sink for RecordingSink {
        fn send(&mut self, bytes: &[u8]) -> VdbResult<()> {
            if self.fail {
                return Err(VdbError::Disconnected);
            }
            self.flushes.push(bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_rejects_small_redzone() {
        assert!(OutputBuffer::new(1024, 8).is_err());
        assert!(OutputBuffer::new(MAX_LINE_LEN, MAX_LINE_LEN).is_err());
        assert!(OutputBuffer::new(4096, 512).is_ok());
    }

    #[test]
    fn test_append_accumulates() {
        let mut buffer = OutputBuffer::new(4096, 512).unwrap();
        let mut sink = RecordingSink::default();
        buffer.append("p 1 2 3 \n", &mut sink).unwrap();
        buffer.append("r\n", &mut sink).unwrap();
        assert_eq!(buffer.len(), 11);
        assert!(sink.flushes.is_empty());
    }

    #[test]
    fn test_flush_on_redzone() {
        let mut buffer = OutputBuffer::new(1024, 512).unwrap();
        let mut sink = RecordingSink::default();
        let line = format!("{}\n", "x".repeat(99));

        // 5 * 100 = 500 bytes used, 524 free
        for _ in 0..5 {
            buffer.append(&line, &mut sink).unwrap();
        }
        assert!(sink.flushes.is_empty());

        // 600 used, 424 free: below the red zone
        buffer.append(&line, &mut sink).unwrap();
        assert_eq!(sink.flushes.len(), 1);
        assert_eq!(sink.flushes[0].len(), 600);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_partial_line_does_not_flush() {
        let mut buffer = OutputBuffer::new(1024, 512).unwrap();
        let mut sink = RecordingSink::default();
        buffer.append(&"y".repeat(500), &mut sink).unwrap();
        buffer.append(&"y".repeat(100), &mut sink).unwrap();
        assert!(sink.flushes.is_empty());
        buffer.append("\n", &mut sink).unwrap();
        assert_eq!(sink.flushes.len(), 1);
    }

    #[test]
    fn test_failed_flush_clears() {
        let mut buffer = OutputBuffer::new(4096, 512).unwrap();
        let mut sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        buffer.append("r\n", &mut sink).unwrap();
        assert!(buffer.flush(&mut sink).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_flush_sends_nothing() {
        let mut buffer = OutputBuffer::new(4096, 512).unwrap();
        let mut sink = RecordingSink::default();
        buffer.flush(&mut sink).unwrap();
        assert!(sink.flushes.is_empty());
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut buffer = OutputBuffer::new(MAX_LINE_LEN + 1, MAX_LINE_LEN).unwrap();
        let mut sink = RecordingSink::default();
        let line = format!("{}\n", "z".repeat(MAX_LINE_LEN - 1));
        for _ in 0..10 {
            buffer.append(&line, &mut sink).unwrap();
            assert!(buffer.len() <= buffer.capacity());
        }
        assert_eq!(sink.flushes.len(), 10);
    }
}
