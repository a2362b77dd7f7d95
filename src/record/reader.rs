use embedded_io::Read;

use super::{Record, RecordBuffer};
use crate::error::ReadError;

/// Splits a byte stream into delimiter-bounded records
///
/// Bytes are pulled in chunks of `CHUNK` bytes. The chunk size is a tuning
/// constant: any split of the same stream yields the same records.
#[derive(Debug)]
pub struct RecordReader<const CHUNK: usize> {
    chunk: [u8; CHUNK],
    /// Next unscanned byte in `chunk`
    pos: usize,
    /// Number of valid bytes in `chunk`
    filled: usize,
    delimiter: u8,
}

impl<const CHUNK: usize> RecordReader<CHUNK> {
    pub const fn new(delimiter: u8) -> Self {
        const { assert!(CHUNK > 0, "chunk size must be positive") };
        Self {
            chunk: [0; CHUNK],
            pos: 0,
            filled: 0,
            delimiter,
        }
    }

    /// Forget any unscanned chunk bytes
    ///
    /// Must be called whenever the stream is repositioned.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }

    /// Read the next complete record
    ///
    /// Returns `Ok(None)` at a clean end of stream. Bytes left after the last
    /// delimiter are discarded and reported as [`ReadError::Truncated`].
    pub fn next_record<'b, R: Read>(
        &mut self,
        stream: &mut R,
        buffer: &'b mut RecordBuffer,
    ) -> Result<Option<Record<'b>>, ReadError<R::Error>> {
        self.next_record_or_cancel(stream, buffer, || false)
    }

    /// Read the next complete record, stopping early on cancellation
    ///
    /// `is_cancelled` is checked before every chunk read, so a long record
    /// is abandoned within one read. On [`ReadError::Cancelled`] the partial
    /// record and the chunk cursor are kept and a later call resumes.
    pub fn next_record_or_cancel<'b, R: Read>(
        &mut self,
        stream: &mut R,
        buffer: &'b mut RecordBuffer,
        is_cancelled: impl Fn() -> bool,
    ) -> Result<Option<Record<'b>>, ReadError<R::Error>> {
        loop {
            if self.pos == self.filled {
                if is_cancelled() {
                    return Err(ReadError::Cancelled);
                }
                let read = stream.read(&mut self.chunk).map_err(ReadError::Io)?;
                if read == 0 {
                    if buffer.is_empty() {
                        return Ok(None);
                    }
                    let len = buffer.len();
                    buffer.clear();
                    return Err(ReadError::Truncated { len });
                }
                self.pos = 0;
                self.filled = read;
            }

            let pending = &self.chunk[self.pos..self.filled];
            if let Some(end) = pending.iter().position(|&byte| byte == self.delimiter) {
                buffer.append(&pending[..end])?;
                self.pos += end + 1;
                return Ok(Some(buffer.take()));
            }

            buffer.append(pending)?;
            self.pos = self.filled;
        }
    }
}
