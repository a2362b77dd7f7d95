use alloc::vec::Vec;
use core::ops::Deref;

use crate::error::AllocError;

/// Smallest allocation made on first growth
const MIN_CAPACITY: usize = 16;

/// Growable byte buffer holding a partially received record
///
/// Capacity doubles on overflow and never exceeds `limit`. Growth is
/// all-or-nothing: on failure the buffer keeps its previous contents.
#[derive(Debug)]
pub struct RecordBuffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl RecordBuffer {
    /// Create an empty buffer that may grow up to `limit` bytes
    pub const fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    /// Number of accumulated bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Currently allocated capacity
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Maximum number of bytes the buffer may hold
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Make room for `additional` more bytes, preserving the current ones
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = self
            .bytes
            .len()
            .checked_add(additional)
            .ok_or(AllocError)?;
        if required > self.limit {
            return Err(AllocError);
        }
        if required <= self.bytes.capacity() {
            return Ok(());
        }

        let target = (self.bytes.capacity() * 2)
            .max(MIN_CAPACITY)
            .min(self.limit)
            .max(required);
        self.bytes
            .try_reserve_exact(target - self.bytes.len())
            .map_err(|_| AllocError)
    }

    /// Append bytes, growing the buffer if needed
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        self.ensure_capacity(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Take the accumulated record
    ///
    /// The buffer is cleared when the returned guard is dropped.
    /// Capacity is kept for the next record.
    pub fn take(&mut self) -> Record<'_> {
        Record {
            bytes: &mut self.bytes,
        }
    }

    /// Drop the accumulated bytes
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

/// A complete record borrowed from a [`RecordBuffer`]
#[derive(Debug)]
pub struct Record<'a> {
    bytes: &'a mut Vec<u8>,
}

impl Deref for Record<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl Drop for Record<'_> {
    fn drop(&mut self) {
        self.bytes.clear();
    }
}
