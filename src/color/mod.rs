#![doc = "Color models, conversions and the control's color state"]
pub mod convert;
pub mod parse;
mod state;

pub use convert::{Hsl, Hsv, hsl_to_rgb, hsv_to_rgb, rgb_to_hsl, rgb_to_hsv, normalize_hue};
pub use parse::{parse_color, ColorParseError};
pub use state::*;
