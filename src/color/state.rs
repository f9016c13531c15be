use core::fmt;
use core::str::FromStr;

use rgb::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::convert::*;

/// The model used to interpret the third channel of a [ColorState]
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Hue, saturation, lightness
    #[default]
    Hsl,
    /// Hue, saturation, value
    Hsv
}

/// Returned when a color space token is neither `hsl` nor `hsv`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color space {0:?}, expected \"hsl\" or \"hsv\"")]
pub struct UnknownColorSpace(pub String);

impl FromStr for ColorSpace {
    type Err = UnknownColorSpace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hsl" => Ok(ColorSpace::Hsl),
            "hsv" => Ok(ColorSpace::Hsv),
            other => Err(UnknownColorSpace(other.into()))
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorSpace::Hsl => "hsl",
            ColorSpace::Hsv => "hsv"
        })
    }
}

/// Clamps a fraction to `[0, 1]`, mapping NaN to 0
#[inline]
pub fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        num::clamp(x, 0.0, 1.0)
    }
}

/// The single source of truth for the selected color
///
/// Hue, saturation and the "third" channel (lightness in [ColorSpace::Hsl], value in
/// [ColorSpace::Hsv]) are stored; the RGB triple is derived from them after every mutation and
/// is never written directly.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ColorState {
    hue: f32,
    saturation: f32,
    third: f32,
    space: ColorSpace,
    rgb: Rgb<u8>
}

impl Default for ColorState {
    fn default() -> Self {
        Self::new(ColorSpace::Hsl, 0.0, 1.0, 0.5)
    }
}

impl ColorState {
    /// Creates a new state from components in the given space, normalizing them
    pub fn new(space: ColorSpace, hue: f32, saturation: f32, third: f32) -> Self {
        let mut state = Self {
            hue,
            saturation,
            third,
            space,
            rgb: Rgb::new(0, 0, 0)
        };
        state.validate();
        state
    }

    /// Creates a new state from RGB components, converting them once into the given space
    pub fn from_rgb(space: ColorSpace, r: f32, g: f32, b: f32) -> Self {
        let mut state = Self::new(space, 0.0, 0.0, 0.0);
        state.set_rgb(r, g, b);
        state
    }

    /// Hue in degrees, always within `[0, 360)`
    pub const fn hue(&self) -> f32 {
        self.hue
    }

    /// Saturation in the active color space
    pub const fn saturation(&self) -> f32 {
        self.saturation
    }

    /// Lightness or value, depending on the active color space
    pub const fn third(&self) -> f32 {
        self.third
    }

    /// The active color space
    pub const fn space(&self) -> ColorSpace {
        self.space
    }

    /// The derived RGB triple
    pub const fn rgb(&self) -> Rgb<u8> {
        self.rgb
    }

    /// Replaces all three components, then normalizes and re-derives RGB
    pub fn set(&mut self, hue: f32, saturation: f32, third: f32) {
        self.hue = hue;
        self.saturation = saturation;
        self.third = third;
        self.validate();
    }

    /// Changes the hue, wrapping it into `[0, 360)`
    pub fn set_hue(&mut self, hue: f32) {
        self.set(hue, self.saturation, self.third);
    }

    /// Changes the saturation, clamping it to `[0, 1]`
    pub fn set_saturation(&mut self, saturation: f32) {
        self.set(self.hue, saturation, self.third);
    }

    /// Changes lightness or value, clamping it to `[0, 1]`
    pub fn set_third(&mut self, third: f32) {
        self.set(self.hue, self.saturation, third);
    }

    /// Sets the color from arbitrary RGB components, which are rounded and clamped first
    ///
    /// An achromatic color keeps the current hue, since any hue describes it equally well.
    pub fn set_rgb(&mut self, r: f32, g: f32, b: f32) {
        let rgb = Rgb::new(round_channel(r), round_channel(g), round_channel(b));
        let (hue, saturation, third) = self.components_of(rgb, self.space);
        self.set(if saturation == 0.0 { self.hue } else { hue }, saturation, third);
    }

    /// Re-expresses the current color in another space through its RGB triple
    ///
    /// Returns false without touching anything if the state is already in that space.
    pub fn set_space(&mut self, space: ColorSpace) -> bool {
        if space == self.space {
            return false;
        }

        let (hue, saturation, third) = self.components_of(self.rgb, space);
        self.space = space;
        self.set(if saturation == 0.0 { self.hue } else { hue }, saturation, third);
        true
    }

    /// Sets the color from components given in `space`, re-expressing them in the active space
    ///
    /// An achromatic color keeps the given hue.
    pub fn set_in(&mut self, space: ColorSpace, hue: f32, saturation: f32, third: f32) {
        if space == self.space {
            self.set(hue, saturation, third);
            return;
        }

        let rgb = ColorState::new(space, hue, saturation, third).rgb();
        let (h, s, t) = self.components_of(rgb, self.space);
        self.set(if s == 0.0 { hue } else { h }, s, t);
    }

    /// The current color in the HSL model, whatever the active space is
    pub fn hsl(&self) -> Hsl {
        match self.space {
            ColorSpace::Hsl => Hsl::new(self.hue, self.saturation, self.third),
            ColorSpace::Hsv => {
                let mut hsl = Hsl::from(self.rgb);
                if hsl.saturation == 0.0 {
                    hsl.hue = self.hue;
                }
                hsl
            }
        }
    }

    /// The current color in the HSV model, whatever the active space is
    pub fn hsv(&self) -> Hsv {
        match self.space {
            ColorSpace::Hsv => Hsv::new(self.hue, self.saturation, self.third),
            ColorSpace::Hsl => {
                let mut hsv = Hsv::from(self.rgb);
                if hsv.saturation == 0.0 {
                    hsv.hue = self.hue;
                }
                hsv
            }
        }
    }

    fn components_of(&self, rgb: Rgb<u8>, space: ColorSpace) -> (f32, f32, f32) {
        match space {
            ColorSpace::Hsl => {
                let c = Hsl::from(rgb);
                (c.hue, c.saturation, c.lightness)
            },
            ColorSpace::Hsv => {
                let c = Hsv::from(rgb);
                (c.hue, c.saturation, c.value)
            }
        }
    }

    fn validate(&mut self) {
        self.hue = normalize_hue(self.hue);
        self.saturation = clamp_unit(self.saturation);
        self.third = clamp_unit(self.third);
        self.rgb = match self.space {
            ColorSpace::Hsl => hsl_to_rgb(self.hue, self.saturation, self.third),
            ColorSpace::Hsv => hsv_to_rgb(self.hue, self.saturation, self.third)
        };
    }
}
