//! Delimiter-framed record parsing.
//!
//! Records arrive without a length prefix, so bytes are accumulated in a
//! [`RecordBuffer`] until the [`RecordReader`] sees the delimiter.

mod buffer;
mod reader;

pub use buffer::{Record, RecordBuffer};
pub use reader::RecordReader;

/// Byte separating two records in a storage stream
pub const DELIMITER: u8 = b';';

/// Default number of bytes pulled from the stream per read
pub const DEFAULT_CHUNK_SIZE: usize = 64;
