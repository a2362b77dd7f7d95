mod hsv;
mod order;

use smart_leds::RGB8;

pub use hsv::hsv_to_rgb;
pub use order::ChannelOrder;

pub type Rgb = RGB8;
