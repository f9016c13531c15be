//! Construction options and their tolerant JSON loader
//!
//! Options can be built in code starting from [WheelOptions::default], or loaded from a JSON
//! object using the same camelCase keys web hosts already pass around. Loading never fails on
//! content: unknown keys and values of the wrong type are skipped and the default is kept.
use std::time::Duration;

use log::debug;
use rgb::Rgba;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::color::{parse_color, ColorSpace, ColorState};
use crate::interaction::{Features, KeyBindings, KeyDeltas};
use crate::layout::*;
use crate::notify::DEFAULT_DEBOUNCE;
use crate::render::Style;

/// Errors from [WheelOptions::from_json]
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The text is not JSON at all
    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON is valid but not an object
    #[error("options must be a JSON object, got {0}")]
    NotAnObject(&'static str)
}

/// Everything that can be configured when creating a [HueWheel](crate::wheel::HueWheel)
#[derive(Clone, PartialEq, Debug)]
pub struct WheelOptions {
    /// Width and height of the control
    pub diameter: f32,
    /// Width of the shadow around the rings, 0 for none
    pub shadow_blur: f32,
    /// Color of the shadow
    pub shadow_color: Rgba<u8>,
    /// Initial hue in degrees
    pub hue: f32,
    /// Initial saturation
    pub saturation: f32,
    /// Initial lightness or value
    pub lightness: f32,
    /// Initial color as RGB; takes precedence over hue, saturation and lightness
    pub rgb: Option<[f32; 3]>,
    /// Dragging the hue knob inward changes saturation
    pub change_saturation: bool,
    /// Show the lightness ring
    pub change_lightness: bool,
    /// Color space the third channel is interpreted in
    pub color_space: ColorSpace,
    /// Show the current color in the middle
    pub show_color_spot: bool,
    /// Radius of the center swatch as a fraction of the space inside the hue ring
    pub color_spot_width: f32,
    /// Width of the swatch border, 0 for none
    pub color_spot_border: f32,
    /// Color of the swatch border
    pub color_spot_border_color: Rgba<u8>,
    /// Hue ring thickness, derived from the diameter when absent
    pub thickness_hue: Option<f32>,
    /// Lightness ring thickness, derived from the diameter when absent
    pub thickness_lightness: Option<f32>,
    /// Gradient samples per degree
    pub quality: usize,
    /// Hue knob size as a fraction of the diameter
    pub hue_knob_size: f32,
    /// Hue knob fill while idle
    pub hue_knob_color: Rgba<u8>,
    /// Lightness knob fill while idle
    pub lightness_knob_color: Rgba<u8>,
    /// Hue knob fill while dragged
    pub hue_knob_color_selected: Rgba<u8>,
    /// Lightness knob fill while dragged
    pub lightness_knob_color_selected: Rgba<u8>,
    /// Clicking the lightness ring sets lightness
    pub lightness_ring_clickable: bool,
    /// The hue knob casts a shadow when the shadow is on
    pub hue_knob_shadow: bool,
    /// Accept keyboard commands
    pub use_keys: bool,
    /// Keyboard step sizes
    pub key_deltas: KeyDeltas,
    /// Keyboard codes
    pub key_bindings: KeyBindings,
    /// Whether the host should make the control reachable with tab
    pub tabable: bool,
    /// Quiet period before a change is delivered
    pub debounce: Duration,
}

impl Default for WheelOptions {
    fn default() -> Self {
        let style = Style::default();
        Self {
            diameter: 250.0,
            shadow_blur: 0.0,
            shadow_color: style.shadow_color,
            hue: 0.0,
            saturation: 1.0,
            lightness: 0.5,
            rgb: None,
            change_saturation: true,
            change_lightness: true,
            color_space: ColorSpace::Hsl,
            show_color_spot: style.show_swatch,
            color_spot_width: 0.8,
            color_spot_border: style.swatch_border,
            color_spot_border_color: style.swatch_border_color,
            thickness_hue: None,
            thickness_lightness: None,
            quality: 2,
            hue_knob_size: 0.1,
            hue_knob_color: style.hue_knob,
            lightness_knob_color: style.lightness_knob,
            hue_knob_color_selected: style.hue_knob_selected,
            lightness_knob_color_selected: style.lightness_knob_selected,
            lightness_ring_clickable: false,
            hue_knob_shadow: style.knob_shadow,
            use_keys: true,
            key_deltas: KeyDeltas::default(),
            key_bindings: KeyBindings::default(),
            tabable: true,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object"
    }
}

fn number(key: &str, value: &Value) -> Option<f32> {
    let n = value.as_f64().map(|n| n as f32).filter(|n| n.is_finite());
    if n.is_none() {
        debug!("Ignoring option {key}: expected a number, got {}", json_type(value));
    }
    n
}

fn boolean(key: &str, value: &Value) -> Option<bool> {
    let b = value.as_bool();
    if b.is_none() {
        debug!("Ignoring option {key}: expected a boolean, got {}", json_type(value));
    }
    b
}

fn code(key: &str, value: &Value) -> Option<u32> {
    let c = value.as_u64().and_then(|c| u32::try_from(c).ok());
    if c.is_none() {
        debug!("Ignoring option {key}: expected a key code, got {}", json_type(value));
    }
    c
}

fn color(key: &str, value: &Value) -> Option<Rgba<u8>> {
    match value.as_str().map(parse_color) {
        Some(Ok(color)) => Some(color),
        Some(Err(err)) => {
            debug!("Ignoring option {key}: {err}");
            None
        },
        None => {
            debug!("Ignoring option {key}: expected a color string, got {}", json_type(value));
            None
        }
    }
}

fn triple(key: &str, value: &Value) -> Option<[f32; 3]> {
    match value.as_array().map(Vec::as_slice) {
        Some([r, g, b]) => match (r.as_f64(), g.as_f64(), b.as_f64()) {
            (Some(r), Some(g), Some(b)) => Some([r as f32, g as f32, b as f32]),
            _ => {
                debug!("Ignoring option {key}: components must be numbers");
                None
            }
        },
        _ => {
            debug!("Ignoring option {key}: expected an array of three numbers");
            None
        }
    }
}

macro_rules! set_if {
    ($target:expr, $parsed:expr) => {
        if let Some(v) = $parsed {
            $target = v;
        }
    };
}

impl WheelOptions {
    /// Parses options from JSON text, starting from the defaults
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        let value: Value = serde_json::from_str(text)?;
        let mut options = Self::default();
        options.apply_json(&value)?;
        Ok(options)
    }

    /// Applies every recognized key of a JSON object on top of these options
    ///
    /// Keys are applied in document order. Unknown keys and mistyped values are skipped.
    pub fn apply_json(&mut self, value: &Value) -> Result<(), OptionsError> {
        let object: &Map<String, Value> = value.as_object().ok_or(OptionsError::NotAnObject(json_type(value)))?;

        for (key, v) in object {
            let key = key.as_str();
            match key {
                "diameter" => set_if!(self.diameter, number(key, v)),
                "shadowBlur" => set_if!(self.shadow_blur, number(key, v)),
                "shadowColor" => set_if!(self.shadow_color, color(key, v)),
                "hue" => set_if!(self.hue, number(key, v)),
                "saturation" => set_if!(self.saturation, number(key, v)),
                "lightness" | "brightness" => set_if!(self.lightness, number(key, v)),
                "rgb" => {
                    if let Some(rgb) = triple(key, v) {
                        self.rgb = Some(rgb);
                    }
                },
                "changeSaturation" => set_if!(self.change_saturation, boolean(key, v)),
                "changeLightness" => set_if!(self.change_lightness, boolean(key, v)),
                "colorSpace" => match serde_json::from_value::<ColorSpace>(v.clone()) {
                    Ok(space) => self.color_space = space,
                    Err(err) => debug!("Ignoring option {key}: {err}")
                },
                "showColorSpot" => set_if!(self.show_color_spot, boolean(key, v)),
                "colorSpotWidth" => set_if!(self.color_spot_width, number(key, v)),
                "colorSpotBorder" => set_if!(self.color_spot_border, number(key, v)),
                "colorSpotBorderColor" => set_if!(self.color_spot_border_color, color(key, v)),
                "thicknessHue" => {
                    if let Some(t) = number(key, v) {
                        self.thickness_hue = Some(t);
                    }
                },
                "thicknessLightness" | "thicknessLuma" => {
                    if let Some(t) = number(key, v) {
                        self.thickness_lightness = Some(t);
                    }
                },
                "quality" => match v.as_u64() {
                    Some(q) => self.quality = q as usize,
                    None => debug!("Ignoring option {key}: expected a positive integer, got {}", json_type(v))
                },
                "hueKnobSize" => set_if!(self.hue_knob_size, number(key, v)),
                "hueKnobColor" => set_if!(self.hue_knob_color, color(key, v)),
                "lightnessKnobColor" => set_if!(self.lightness_knob_color, color(key, v)),
                "hueKnobColorSelected" => set_if!(self.hue_knob_color_selected, color(key, v)),
                "lightnessKnobColorSelected" => set_if!(self.lightness_knob_color_selected, color(key, v)),
                "lightnessRingClickable" => set_if!(self.lightness_ring_clickable, boolean(key, v)),
                "hueKnobShadow" => set_if!(self.hue_knob_shadow, boolean(key, v)),
                "useKeys" => set_if!(self.use_keys, boolean(key, v)),
                "hueKeyDelta" => set_if!(self.key_deltas.hue, number(key, v)),
                "saturationKeyDelta" => set_if!(self.key_deltas.saturation, number(key, v)),
                "lightnessKeyDelta" => set_if!(self.key_deltas.lightness, number(key, v)),
                "keyShiftFactor" | "shiftKeyFactor" => set_if!(self.key_deltas.modifier_factor, number(key, v)),
                "hueKeyCodeUp" => set_if!(self.key_bindings.hue_decrease, code(key, v)),
                "hueKeyCodeDown" => set_if!(self.key_bindings.hue_increase, code(key, v)),
                "saturationKeyCodeUp" => set_if!(self.key_bindings.saturation_decrease, code(key, v)),
                "saturationKeyCodeDown" => set_if!(self.key_bindings.saturation_increase, code(key, v)),
                "lightnessKeyCodeUp" => set_if!(self.key_bindings.lightness_increase, code(key, v)),
                "lightnessKeyCodeDown" => set_if!(self.key_bindings.lightness_decrease, code(key, v)),
                "tabable" => set_if!(self.tabable, boolean(key, v)),
                "debounce" => match v.as_u64() {
                    Some(ms) => self.debounce = Duration::from_millis(ms),
                    None => debug!("Ignoring option {key}: expected milliseconds, got {}", json_type(v))
                },
                other => debug!("Ignoring unknown option {other}")
            }
        }
        Ok(())
    }

    /// The sizing the layout is derived from, with the diameter and thicknesses clamped
    pub fn sizing(&self) -> Sizing {
        let diameter = clamp_diameter(self.diameter);
        let hue_thickness = self.thickness_hue.unwrap_or_else(|| default_hue_thickness(diameter));
        let lightness_thickness = self.thickness_lightness.unwrap_or_else(|| default_lightness_thickness(diameter));
        Sizing {
            diameter,
            hue_thickness: clamp_hue_thickness(hue_thickness, diameter),
            lightness_thickness: clamp_lightness_thickness(lightness_thickness, diameter),
            shadow_blur: self.shadow_blur,
            hue_knob_size: self.hue_knob_size,
            color_spot_width: self.color_spot_width,
        }
    }

    /// Colors and drawing switches
    pub fn style(&self) -> Style {
        Style {
            hue_knob: self.hue_knob_color,
            hue_knob_selected: self.hue_knob_color_selected,
            lightness_knob: self.lightness_knob_color,
            lightness_knob_selected: self.lightness_knob_color_selected,
            show_swatch: self.show_color_spot,
            swatch_border: self.color_spot_border,
            swatch_border_color: self.color_spot_border_color,
            shadow_color: self.shadow_color,
            knob_shadow: self.hue_knob_shadow,
        }
    }

    /// Which parts of the control respond to input
    pub fn features(&self) -> Features {
        Features {
            lightness: self.change_lightness,
            saturation: self.change_saturation,
            lightness_clickable: self.lightness_ring_clickable,
            keys: self.use_keys,
        }
    }

    /// The starting color. An `rgb` triple wins over hue, saturation and lightness.
    pub fn initial_color(&self) -> ColorState {
        match self.rgb {
            Some([r, g, b]) => ColorState::from_rgb(self.color_space, r, g, b),
            None => ColorState::new(self.color_space, self.hue, self.saturation, self.lightness)
        }
    }
}
