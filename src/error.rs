//! Error types shared across the playback pipeline.
//!
//! Malformed input ([`DecodeError`]) is recoverable: the record is skipped.
//! Everything in [`PlaybackError`] is fatal for the active session.

use embedded_io::ErrorKind;

/// A buffer could not be grown to the requested size.
///
/// Raised both when the allocator refuses and when the configured record
/// limit would be exceeded. The buffer is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

/// Error returned by the record reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError<E> {
    /// The underlying stream failed
    Io(E),
    /// The record buffer could not grow
    Alloc,
    /// The stream ended with `len` bytes after the last delimiter
    Truncated { len: usize },
    /// Cancellation was requested between two chunk reads
    Cancelled,
}

impl<E> From<AllocError> for ReadError<E> {
    fn from(_: AllocError) -> Self {
        Self::Alloc
    }
}

/// Reason a record was rejected by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Rate directive is not a decimal number in `1..=MAX_FPS`
    InvalidRate,
    /// Frame record has no bytes
    EmptyFrame,
    /// Frame record length is not a multiple of three
    NotTriplets { len: usize },
    /// Frame record does not match the LED count fixed for the session
    TopologyChanged { expected: usize, actual: usize },
    /// Pixel buffer could not be sized
    Alloc,
}

impl From<AllocError> for DecodeError {
    fn from(_: AllocError) -> Self {
        Self::Alloc
    }
}

/// Fatal playback failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    /// Stream could not be opened, read or rewound
    Io(ErrorKind),
    /// A session buffer could not be allocated
    Alloc,
    /// The output driver rejected a frame
    Transmit,
}

impl From<AllocError> for PlaybackError {
    fn from(_: AllocError) -> Self {
        Self::Alloc
    }
}

/// Error returned by the change-detecting output buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError<E> {
    /// Shadow storage could not be resized
    Alloc,
    /// The driver failed to transmit
    Driver(E),
}

impl<E> From<SubmitError<E>> for PlaybackError {
    fn from(err: SubmitError<E>) -> Self {
        match err {
            SubmitError::Alloc => Self::Alloc,
            SubmitError::Driver(_) => Self::Transmit,
        }
    }
}

/// Error returned while handling control-plane payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload is not valid JSON of the expected shape
    Json,
    /// Animation document has no frames
    EmptyDocument,
    /// Frame rate is outside `1..=MAX_FPS`
    InvalidRate,
    /// A frame has a different pixel count than the first one
    TopologyChanged { expected: usize, actual: usize },
    /// A pixel has neither a full RGB nor a full HSV triple
    IncompletePixel,
    /// An encoded frame record would exceed the player's record limit
    FrameTooLarge { len: usize, limit: usize },
    /// A live update addresses a pixel past the strip end
    IndexOutOfRange { index: usize, led_count: usize },
    /// Output buffer could not be allocated
    Alloc,
}

impl From<AllocError> for PayloadError {
    fn from(_: AllocError) -> Self {
        Self::Alloc
    }
}
