//! Adapter from wire-order frames to `smart-leds` writers.

use smart_leds::SmartLedsWrite;

use crate::OutputDriver;
use crate::color::{ChannelOrder, Rgb};
use crate::frame::BYTES_PER_PIXEL;

/// Output driver backed by any [`SmartLedsWrite`] implementation
///
/// Wire bytes are decoded back into colors with the configured order, since
/// `smart-leds` writers apply their own channel order.
#[derive(Debug)]
pub struct SmartLedsDriver<W> {
    writer: W,
    order: ChannelOrder,
}

impl<W> SmartLedsDriver<W> {
    pub const fn new(writer: W, order: ChannelOrder) -> Self {
        Self { writer, order }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsDriver<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: core::fmt::Debug,
{
    type Error = W::Error;

    fn write(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        let order = self.order;
        let colors = frame
            .chunks_exact(BYTES_PER_PIXEL)
            .map(move |pixel| order.from_wire([pixel[0], pixel[1], pixel[2]]));
        self.writer.write(colors)
    }
}
