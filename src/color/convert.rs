//! Conversions between RGB and the cylindrical HSL / HSV color models
//!
//! All functions here are pure. RGB components are taken as real numbers in `[0, 255]` and
//! produced as rounded, clamped 8 bit channels. Saturation, lightness and value are not clamped
//! on the way in; that is the job of [ColorState](super::ColorState).
use rgb::Rgb;

const ONE_THIRD: f32 = 1.0 / 3.0;
const ONE_SIXTH: f32 = 1.0 / 6.0;
const TWO_THIRDS: f32 = 2.0 / 3.0;

/// A color in the HSL model
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub struct Hsl {
    /// Hue in degrees, `[0, 360)`
    pub hue: f32,
    /// Saturation, `[0, 1]`
    pub saturation: f32,
    /// Lightness, `[0, 1]`
    pub lightness: f32
}

impl Hsl {
    /// Creates a new HSL color without any normalization
    pub const fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Hsl {
            hue,
            saturation,
            lightness
        }
    }
}

/// A color in the HSV (aka HSB) model
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360)`
    pub hue: f32,
    /// Saturation, `[0, 1]`
    pub saturation: f32,
    /// Value or brightness, `[0, 1]`
    pub value: f32
}

impl Hsv {
    /// Creates a new HSV color without any normalization
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Hsv {
            hue,
            saturation,
            value
        }
    }
}

impl From<Hsl> for Rgb<u8> {
    fn from(hsl: Hsl) -> Self {
        hsl_to_rgb(hsl.hue, hsl.saturation, hsl.lightness)
    }
}

impl From<Hsv> for Rgb<u8> {
    fn from(hsv: Hsv) -> Self {
        hsv_to_rgb(hsv.hue, hsv.saturation, hsv.value)
    }
}

impl From<Rgb<u8>> for Hsl {
    fn from(rgb: Rgb<u8>) -> Self {
        rgb_to_hsl(rgb.r as f32, rgb.g as f32, rgb.b as f32)
    }
}

impl From<Rgb<u8>> for Hsv {
    fn from(rgb: Rgb<u8>) -> Self {
        rgb_to_hsv(rgb.r as f32, rgb.g as f32, rgb.b as f32)
    }
}

/// Wraps any hue angle into `[0, 360)`. Non-finite angles become 0.
pub fn normalize_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }

    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid of a tiny negative angle rounds up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Turns a unit fraction into an 8 bit channel using `floor(x * 255 + 0.5)`, clamped to `[0, 255]`
#[inline]
pub fn unit_to_channel(x: f32) -> u8 {
    num::clamp((x * 255.0 + 0.5).floor(), 0.0, 255.0) as u8
}

/// Rounds and clamps an arbitrary RGB component to `[0, 255]`
#[inline]
pub fn round_channel(x: f32) -> u8 {
    num::clamp((x + 0.5).floor(), 0.0, 255.0) as u8
}

fn hue_from_channels(r: f32, g: f32, b: f32, max: f32, delta: f32) -> f32 {
    let sector = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    normalize_hue(sector * 60.0)
}

/// Converts RGB components in `[0, 255]` to HSL
///
/// Achromatic input has a saturation and hue of 0.
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> Hsl {
    let (r, g, b) = (r / 255.0, g / 255.0, b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) * 0.5;

    if max == min {
        return Hsl::new(0.0, 0.0, lightness);
    }

    let delta = max - min;
    let saturation = if lightness < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    Hsl::new(hue_from_channels(r, g, b, max, delta), saturation, lightness)
}

/// Converts RGB components in `[0, 255]` to HSV
///
/// Achromatic input has a saturation and hue of 0.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> Hsv {
    let (r, g, b) = (r / 255.0, g / 255.0, b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    if max == min {
        return Hsv::new(0.0, 0.0, max);
    }

    let delta = max - min;
    Hsv::new(hue_from_channels(r, g, b, max, delta), delta / max, max)
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < ONE_SIXTH {
        p + (q - p) * t * 6.0
    } else if t < 0.5 {
        q
    } else if t < TWO_THIRDS {
        p + (q - p) * (TWO_THIRDS - t) * 6.0
    } else {
        p
    }
}

/// Converts an HSL color to rounded RGB
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb<u8> {
    if saturation == 0.0 {
        let v = unit_to_channel(lightness);
        return Rgb::new(v, v, v);
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    let h = normalize_hue(hue) / 360.0;

    Rgb::new(
        unit_to_channel(hue_to_channel(p, q, h + ONE_THIRD)),
        unit_to_channel(hue_to_channel(p, q, h)),
        unit_to_channel(hue_to_channel(p, q, h - ONE_THIRD))
    )
}

/// Converts an HSV color to rounded RGB
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb<u8> {
    let h = normalize_hue(hue) / 60.0;
    let sector = h.floor();
    let f = h - sector;

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector as u8 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q)
    };

    Rgb::new(unit_to_channel(r), unit_to_channel(g), unit_to_channel(b))
}
