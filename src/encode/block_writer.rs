//! Fixed-size block buffering in front of an output sink.

use std::io::{self, Write};

use crate::utils::error::{ArtifactError, Result};

/// Buffers bytes and hands them to the sink in blocks of `block_size`.
///
/// Purely an I/O granularity optimization: bytes reach the sink in exactly
/// the order they were written.
pub struct BlockWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    block_size: usize,
    blocks_flushed: usize,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(writer: W, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(ArtifactError::config("block size must be non-zero"));
        }
        Ok(Self {
            writer,
            buffer: Vec::with_capacity(block_size),
            block_size,
            blocks_flushed: 0,
        })
    }

    /// Appends one byte, flushing a full block to the sink when reached.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.buffer.push(byte);
        if self.buffer.len() == self.block_size {
            self.flush_block()?;
        }
        Ok(())
    }

    /// Hands whatever is buffered to the sink. Leaves the buffer empty.
    pub fn commit_remaining(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            self.flush_block()?;
        }
        Ok(())
    }

    /// Number of bytes currently held back from the sink.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Commits the remaining bytes, flushes the sink and returns it.
    pub fn finish(mut self) -> io::Result<W> {
        self.commit_remaining()?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn flush_block(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.buffer)?;
        self.blocks_flushed += 1;
        #[cfg(feature = "debug-logging")]
        log::trace!(
            "block writer: flushed block {} ({} bytes)",
            self.blocks_flushed,
            self.buffer.len()
        );
        self.buffer.clear();
        Ok(())
    }
}

impl<W: Write> Write for BlockWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while !rest.is_empty() {
            let room = self.block_size - self.buffer.len();
            let take = room.min(rest.len());
            self.buffer.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.buffer.len() == self.block_size {
                self.flush_block()?;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit_remaining()?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the size of every `write` call reaching the sink.
    #[derive(Default)]
    struct CountingSink {
        data: Vec<u8>,
        writes: Vec<usize>,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.extend_from_slice(buf);
            self.writes.push(buf.len());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_flushes_in_blocks() {
        let mut writer = BlockWriter::new(CountingSink::default(), 4).unwrap();
        for byte in 0u8..10 {
            writer.write_byte(byte).unwrap();
        }
        assert_eq!(writer.get_ref().writes, vec![4, 4]);
        assert_eq!(writer.buffered(), 2);

        let sink = writer.finish().unwrap();
        assert_eq!(sink.writes, vec![4, 4, 2]);
        assert_eq!(sink.data, (0u8..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_commit_remaining_empty_is_noop() {
        let mut writer = BlockWriter::new(CountingSink::default(), 4).unwrap();
        writer.commit_remaining().unwrap();
        assert!(writer.get_ref().writes.is_empty());
    }

    #[test]
    fn test_bulk_write_preserves_order() {
        let mut writer = BlockWriter::new(CountingSink::default(), 3).unwrap();
        writer.write_byte(0xaa).unwrap();
        writer.write_all(&[1, 2, 3, 4, 5]).unwrap();
        let sink = writer.finish().unwrap();
        assert_eq!(sink.data, vec![0xaa, 1, 2, 3, 4, 5]);
        assert_eq!(sink.writes, vec![3, 3]);
    }

    #[test]
    fn test_zero_block_size_rejected() {
        assert!(matches!(
            BlockWriter::new(Vec::new(), 0),
            Err(ArtifactError::Config(_))
        ));
    }

    #[test]
    fn test_sink_failure_propagates() {
        struct FailingSink;
        impl Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = BlockWriter::new(FailingSink, 2).unwrap();
        writer.write_byte(1).unwrap();
        assert!(writer.write_byte(2).is_err());
    }
}
