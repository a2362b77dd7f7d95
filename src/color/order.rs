use crate::color::Rgb;

/// Byte order of the three color channels on the LED wire
///
/// Source data (storage records, JSON documents) is always red-green-blue.
/// The wire order is a system constant applied to every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    Rgb,
    Rbg,
    /// WS2812 order
    #[default]
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl ChannelOrder {
    /// Encode a color into its three wire bytes
    pub const fn to_wire(self, color: Rgb) -> [u8; 3] {
        let Rgb { r, g, b } = color;
        match self {
            Self::Rgb => [r, g, b],
            Self::Rbg => [r, b, g],
            Self::Grb => [g, r, b],
            Self::Gbr => [g, b, r],
            Self::Brg => [b, r, g],
            Self::Bgr => [b, g, r],
        }
    }

    /// Decode three wire bytes back into a color
    pub const fn from_wire(self, bytes: [u8; 3]) -> Rgb {
        let [x, y, z] = bytes;
        let (r, g, b) = match self {
            Self::Rgb => (x, y, z),
            Self::Rbg => (x, z, y),
            Self::Grb => (y, x, z),
            Self::Gbr => (z, x, y),
            Self::Brg => (y, z, x),
            Self::Bgr => (z, y, x),
        };
        Rgb { r, g, b }
    }
}
