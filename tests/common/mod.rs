#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};
use myrtio_light_player::{FrameStore, OutputDriver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamError(pub ErrorKind);

impl embedded_io::Error for StreamError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// In-memory stream with configurable short reads and failures
#[derive(Debug, Clone)]
pub struct MemoryStream {
    data: Vec<u8>,
    pos: usize,
    /// Read sizes, used cyclically
    read_sizes: Vec<usize>,
    /// Successful reads so far, shared with clones
    reads: Rc<Cell<usize>>,
    /// Reads at or past this offset fail
    fail_at: Option<usize>,
}

impl MemoryStream {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            read_sizes: vec![usize::MAX],
            reads: Rc::default(),
            fail_at: None,
        }
    }

    pub fn with_read_sizes(mut self, sizes: &[usize]) -> Self {
        self.read_sizes = sizes.to_vec();
        self
    }

    pub fn failing_at(mut self, offset: usize) -> Self {
        self.fail_at = Some(offset);
        self
    }

    /// Handle to the read count, usable after the stream is moved
    pub fn read_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.reads)
    }
}

impl ErrorType for MemoryStream {
    type Error = StreamError;
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut end = self.data.len();
        if let Some(at) = self.fail_at {
            if self.pos >= at {
                return Err(StreamError(ErrorKind::Other));
            }
            end = end.min(at);
        }
        let reads = self.reads.get();
        let size = self.read_sizes[reads % self.read_sizes.len()];
        self.reads.set(reads + 1);
        let n = buf.len().min(size).min(end - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let target = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
            SeekFrom::End(offset) => self.data.len() as i64 + offset,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if target < 0 {
            return Err(StreamError(ErrorKind::InvalidInput));
        }
        self.pos = (target as usize).min(self.data.len());
        Ok(self.pos as u64)
    }
}

/// Store handing out fresh [`MemoryStream`]s
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub data: Vec<u8>,
    pub fail_open: bool,
    pub opens: usize,
}

impl MemoryStore {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            ..Self::default()
        }
    }
}

impl FrameStore for MemoryStore {
    type Stream = MemoryStream;

    fn open(&mut self) -> Result<MemoryStream, StreamError> {
        if self.fail_open {
            return Err(StreamError(ErrorKind::NotFound));
        }
        self.opens += 1;
        Ok(MemoryStream::new(&self.data))
    }
}

/// Driver remembering every transmitted frame
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub frames: Vec<Vec<u8>>,
    pub fail: bool,
}

impl OutputDriver for RecordingDriver {
    type Error = ();

    fn write(&mut self, frame: &[u8]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.frames.push(frame.to_vec());
        Ok(())
    }
}
