#![doc = "Sizing options and the derived geometry of the control"]
use core::f32::consts::TAU;

use log::debug;

use crate::geometry::*;

/// Smallest diameter the control will lay itself out at
pub const MIN_DIAMETER: f32 = 16.0;

/// Largest diameter the control will lay itself out at
pub const MAX_DIAMETER: f32 = 4096.0;

/// Smallest ring thickness
pub const MIN_THICKNESS: f32 = 3.0;

/// The raw sizing options a [Layout] is derived from
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Sizing {
    /// Width and height of the control
    pub diameter: f32,
    /// Thickness of the hue ring
    pub hue_thickness: f32,
    /// Thickness of the lightness ring when it is shown
    pub lightness_thickness: f32,
    /// Width of the shadow around the rings, 0 for none
    pub shadow_blur: f32,
    /// Hue knob size as a fraction of the diameter
    pub hue_knob_size: f32,
    /// Center swatch radius as a fraction of the space inside the hue ring
    pub color_spot_width: f32,
}

impl Sizing {
    /// Default sizing for a control of the given diameter
    pub fn for_diameter(diameter: f32) -> Self {
        Self {
            diameter,
            hue_thickness: default_hue_thickness(diameter),
            lightness_thickness: default_lightness_thickness(diameter),
            shadow_blur: 0.0,
            hue_knob_size: 0.1,
            color_spot_width: 0.8,
        }
    }
}

impl Default for Sizing {
    fn default() -> Self {
        Self::for_diameter(250.0)
    }
}

/// Hue ring thickness used when none is configured
pub fn default_hue_thickness(diameter: f32) -> f32 {
    (diameter * 0.12).max(MIN_THICKNESS)
}

/// Lightness ring thickness used when none is configured
pub fn default_lightness_thickness(diameter: f32) -> f32 {
    (diameter * 0.05).max(MIN_THICKNESS)
}

/// Clamps a hue ring thickness to `[3, floor(0.3 * diameter)]`
pub fn clamp_hue_thickness(thickness: f32, diameter: f32) -> f32 {
    clamp_thickness(thickness, (diameter * 0.3).floor())
}

/// Clamps a lightness ring thickness to `[3, floor(0.2 * diameter)]`
pub fn clamp_lightness_thickness(thickness: f32, diameter: f32) -> f32 {
    clamp_thickness(thickness, (diameter * 0.2).floor())
}

/// Clamps a diameter to `[16, 4096]`
pub fn clamp_diameter(diameter: f32) -> f32 {
    if diameter.is_nan() {
        MIN_DIAMETER
    } else {
        diameter.clamp(MIN_DIAMETER, MAX_DIAMETER)
    }
}

fn clamp_thickness(thickness: f32, max: f32) -> f32 {
    if thickness.is_nan() {
        MIN_THICKNESS
    } else {
        thickness.min(max).max(MIN_THICKNESS)
    }
}

/// Geometry derived from a [Sizing], shared by rendering and hit-testing
///
/// A layout is immutable; any change to the sizing produces a new one.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Layout {
    /// Width and height of the control
    pub diameter: f32,
    /// Center of both rings
    pub center: Point,
    /// Thickness of the hue ring
    pub hue_thickness: f32,
    /// Thickness of the lightness ring, 0 when it is hidden
    pub lightness_thickness: f32,
    /// Width of the shadow around the rings
    pub shadow_blur: f32,
    /// Radius of the hue ring's center line
    pub hue_radius: f32,
    /// Radius of the lightness ring's center line
    pub lightness_radius: f32,
    /// Radius of the lightness knob
    pub lightness_knob_radius: f32,
    /// Center of the lightness knob at a lightness of 0
    pub lightness_knob_anchor: Point,
    /// Length of the hue knob
    pub knob_length: f32,
    /// Radius of the center swatch
    pub swatch_radius: f32,
}

impl Layout {
    /// Derives the geometry for a sizing, with or without the lightness ring
    pub fn new(sizing: &Sizing, lightness: bool) -> Self {
        let w = if sizing.diameter.is_nan() { MIN_DIAMETER } else { sizing.diameter.max(MIN_DIAMETER) };
        let th = sizing.hue_thickness.max(0.0);
        let tl = if lightness { sizing.lightness_thickness.max(0.0) } else { 0.0 };
        let sb = sizing.shadow_blur.max(0.0);
        let center = Point::new(w * 0.5, w * 0.5);

        let hue_radius = ((w - th - 3.0 * tl - sb * if lightness { 1.0 } else { 2.0 }) * 0.5 + 1.0).max(0.0);
        let lightness_radius = ((w - tl - sb) * 0.5 + 1.0).max(0.0);

        let layout = Self {
            diameter: w,
            center,
            hue_thickness: th,
            lightness_thickness: tl,
            shadow_blur: sb,
            hue_radius,
            lightness_radius,
            lightness_knob_radius: tl * 0.5,
            lightness_knob_anchor: Point::new(center.x - 1.0, center.y + lightness_radius),
            knob_length: (w * sizing.hue_knob_size).max(5.0),
            swatch_radius: ((hue_radius - th * 0.5) * crate::color::clamp_unit(sizing.color_spot_width)).max(0.0),
        };
        debug!("Layout rebuilt for {w}px: hue radius {hue_radius}, lightness radius {lightness_radius}");
        layout
    }

    /// Side length of a pixmap holding the whole control
    pub fn pixel_size(&self) -> usize {
        self.diameter.ceil() as usize
    }

    /// The hue ring
    pub fn hue_ring(&self) -> Ring {
        Ring {
            center: self.center,
            radius: self.hue_radius,
            thickness: self.hue_thickness
        }
    }

    /// The lightness ring, if the layout has one
    pub fn lightness_ring(&self) -> Option<Ring> {
        if self.lightness_thickness > 0.0 {
            Some(Ring {
                center: self.center,
                radius: self.lightness_radius,
                thickness: self.lightness_thickness
            })
        } else {
            None
        }
    }

    /// How far the hue knob can travel toward the center
    pub fn saturation_travel(&self) -> f32 {
        self.hue_radius - self.knob_length
    }

    /// Saturation selected by dragging the hue knob to `distance` from the center
    pub fn saturation_from_distance(&self, distance: f32) -> f32 {
        distance_to_saturation(distance, self.saturation_travel())
    }

    /// The hue knob triangle for a hue, pulled inward by `saturation` when one is given
    pub fn hue_knob(&self, hue: f32, saturation: Option<f32>) -> Triangle {
        let (cx, cy) = (self.center.x, self.center.y);
        let l = self.knob_length;
        let kx = cx + l + (self.hue_radius - self.hue_thickness * 0.5 - l) * saturation.unwrap_or(1.0);
        Triangle::new(
            Point::new(kx - 1.0, cy),
            Point::new(kx - l, cy - l * 0.7),
            Point::new(kx - l, cy + l * 0.7)
        ).rotated_about(&self.center, hue.to_radians())
    }

    /// The lightness knob for a lightness or value
    pub fn lightness_knob(&self, third: f32) -> Disc {
        Disc::new(
            self.lightness_knob_anchor.rotated_about(&self.center, TAU * third),
            self.lightness_knob_radius
        )
    }

    /// The line the hue knob slides along while saturation is adjustable
    pub fn saturation_guide(&self, hue: f32) -> Segment {
        Segment::new(
            self.center,
            Point::new(self.center.x + self.hue_radius - self.hue_thickness * 0.5, self.center.y)
        ).rotated_about(&self.center, hue.to_radians())
    }

    /// The center swatch
    pub fn swatch(&self) -> Disc {
        Disc::new(self.center, self.swatch_radius)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(&Sizing::default(), true)
    }
}
