use crate::color::Rgb;

/// Degrees covered by one hue segment
const SEGMENT: u32 = 60;

/// Convert HSV to RGB
///
/// # Arguments
/// * `h` - Hue in degrees, taken modulo 360
/// * `s` - Saturation in percent, clamped to 100
/// * `v` - Value (brightness) in percent, clamped to 100
///
/// Each 60 degree segment linearly interpolates one channel between the
/// minimum and maximum brightness. The interpolation truncates, so
/// intermediate hues may be off by one from a floating point conversion.
#[allow(clippy::cast_possible_truncation)]
pub fn hsv_to_rgb(h: u16, s: u8, v: u8) -> Rgb {
    let h = u32::from(h) % 360;
    let s = u32::from(s.min(100));
    let v = u32::from(v.min(100));

    let max = v * 255 / 100;
    let min = max * (100 - s) / 100;

    let segment = h / SEGMENT;
    let diff = h % SEGMENT;
    let adj = (max - min) * diff / SEGMENT;

    // All values are bounded by 255 at this point
    let (r, g, b) = match segment {
        0 => (max, min + adj, min),
        1 => (max - adj, max, min),
        2 => (min, max, min + adj),
        3 => (min, max - adj, max),
        4 => (min + adj, min, max),
        _ => (max, min, max - adj),
    };

    Rgb {
        r: r as u8,
        g: g as u8,
        b: b as u8,
    }
}
