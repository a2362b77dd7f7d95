//! Change-detecting output buffer.
//!
//! The only path pixel data takes into the [`OutputDriver`]. A frame equal to
//! the last transmitted one is not sent again.

use alloc::vec::Vec;

use crate::OutputDriver;
use crate::error::SubmitError;

/// Output buffer that retains the last transmitted frame
#[derive(Debug)]
pub struct OutputBuffer<D: OutputDriver> {
    driver: D,
    /// Last successfully transmitted frame
    shadow: Vec<u8>,
    /// Whether `shadow` mirrors what the strip currently shows
    valid: bool,
}

impl<D: OutputDriver> OutputBuffer<D> {
    pub const fn new(driver: D) -> Self {
        Self {
            driver,
            shadow: Vec::new(),
            valid: false,
        }
    }

    /// Transmit `frame` unless it equals the last transmitted frame
    ///
    /// Returns `true` if the driver was called. A frame with a different
    /// byte length than the shadow is always transmitted.
    pub fn submit(&mut self, frame: &[u8]) -> Result<bool, SubmitError<D::Error>> {
        if self.valid && self.shadow.as_slice() == frame {
            return Ok(false);
        }

        if self.shadow.len() != frame.len() {
            let mut shadow = Vec::new();
            shadow
                .try_reserve_exact(frame.len())
                .map_err(|_| SubmitError::Alloc)?;
            self.shadow = shadow;
        } else {
            self.shadow.clear();
        }
        self.shadow.extend_from_slice(frame);
        self.valid = false;

        self.driver.write(frame).map_err(SubmitError::Driver)?;
        self.valid = true;
        Ok(true)
    }

    /// Forget the last frame so the next submit always transmits
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Last successfully transmitted frame
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.valid.then_some(self.shadow.as_slice())
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }
}
