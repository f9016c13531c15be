//! Precomputed color ramps the rings are painted from
//!
//! The hue ramp runs red, yellow, green, cyan, blue, magenta and back to red; the lightness ramp
//! runs from black to white. Both have `360 * quality` entries so a ring can be drawn with one
//! table lookup per pixel.
use log::{debug, warn};
use rgb::Rgb;

/// Number of samples per quality step
pub const SAMPLES_PER_QUALITY: usize = 360;

const HUE_STOPS: [Rgb<u8>; 7] = [
    Rgb { r: 255, g: 0, b: 0 },
    Rgb { r: 255, g: 255, b: 0 },
    Rgb { r: 0, g: 255, b: 0 },
    Rgb { r: 0, g: 255, b: 255 },
    Rgb { r: 0, g: 0, b: 255 },
    Rgb { r: 255, g: 0, b: 255 },
    Rgb { r: 255, g: 0, b: 0 },
];

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    let v = a as f32 + (b as f32 - a as f32) * t;
    num::clamp((v + 0.5).floor(), 0.0, 255.0) as u8
}

fn spectrum(t: f32) -> Rgb<u8> {
    let scaled = t.rem_euclid(1.0) * 6.0;
    let segment = (scaled.floor() as usize).min(5);
    let frac = scaled - segment as f32;
    let (from, to) = (HUE_STOPS[segment], HUE_STOPS[segment + 1]);
    Rgb::new(lerp(from.r, to.r, frac), lerp(from.g, to.g, frac), lerp(from.b, to.b, frac))
}

/// The immutable hue and lightness ramps
#[derive(Clone, PartialEq, Debug)]
pub struct GradientTable {
    quality: usize,
    hue: Vec<Rgb<u8>>,
    lightness: Option<Vec<Rgb<u8>>>
}

impl GradientTable {
    /// Builds the ramps at `360 * quality` samples each
    ///
    /// A quality of 0 is raised to 1. The lightness ramp is only built when `with_lightness` is set.
    pub fn new(quality: usize, with_lightness: bool) -> Self {
        let quality = quality.max(1);
        if !quality.is_power_of_two() {
            warn!("Gradient quality {quality} is not a power of two; ring steps will not align with whole degrees");
        }

        let len = quality * SAMPLES_PER_QUALITY;
        let hue = (0..len).map(|i| spectrum(i as f32 / len as f32)).collect();
        let lightness = with_lightness.then(|| {
            (0..len).map(|i| {
                let v = lerp(0, 255, i as f32 / (len - 1) as f32);
                Rgb::new(v, v, v)
            }).collect()
        });

        debug!("Built gradient table with {len} samples, lightness ramp: {with_lightness}");
        Self {
            quality,
            hue,
            lightness
        }
    }

    /// The effective quality the table was built with
    pub const fn quality(&self) -> usize {
        self.quality
    }

    /// Number of samples in each ramp
    pub fn len(&self) -> usize {
        self.hue.len()
    }

    /// Always false; a table holds at least 360 samples
    pub fn is_empty(&self) -> bool {
        self.hue.is_empty()
    }

    /// True when the lightness ramp was built
    pub fn has_lightness(&self) -> bool {
        self.lightness.is_some()
    }

    /// Hue ramp sample by index, wrapping out-of-range indices
    pub fn hue_sample(&self, index: isize) -> Rgb<u8> {
        self.hue[index.rem_euclid(self.hue.len() as isize) as usize]
    }

    /// The hue ramp color nearest to a hue in degrees
    pub fn hue_at(&self, degrees: f32) -> Rgb<u8> {
        self.hue_sample(nearest(degrees / 360.0 * self.len() as f32))
    }

    /// Lightness ramp sample by index, wrapping out-of-range indices
    pub fn lightness_sample(&self, index: isize) -> Option<Rgb<u8>> {
        self.lightness
            .as_ref()
            .map(|ramp| ramp[index.rem_euclid(ramp.len() as isize) as usize])
    }

    /// The gray nearest to a lightness fraction, if the lightness ramp was built
    pub fn lightness_at(&self, fraction: f32) -> Option<Rgb<u8>> {
        self.lightness_sample(nearest(fraction * (self.len() - 1) as f32))
    }
}

fn nearest(position: f32) -> isize {
    if position.is_finite() {
        (position + 0.5).floor() as isize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_quality() {
        assert_eq!(GradientTable::new(1, false).len(), 360);
        assert_eq!(GradientTable::new(2, true).len(), 720);
        assert_eq!(GradientTable::new(4, false).len(), 1440);
        assert_eq!(GradientTable::new(3, false).len(), 1080);

        let zero = GradientTable::new(0, false);
        assert_eq!(zero.quality(), 1);
        assert_eq!(zero.len(), 360);
    }

    #[test]
    fn hue_ramp_hits_the_primaries() {
        let table = GradientTable::new(2, false);
        assert_eq!(table.hue_at(0.0), Rgb::new(255, 0, 0));
        assert_eq!(table.hue_at(60.0), Rgb::new(255, 255, 0));
        assert_eq!(table.hue_at(120.0), Rgb::new(0, 255, 0));
        assert_eq!(table.hue_at(180.0), Rgb::new(0, 255, 255));
        assert_eq!(table.hue_at(240.0), Rgb::new(0, 0, 255));
        assert_eq!(table.hue_at(300.0), Rgb::new(255, 0, 255));
        assert_eq!(table.hue_at(30.0), Rgb::new(255, 128, 0));
    }

    #[test]
    fn lookups_wrap() {
        let table = GradientTable::new(1, true);
        assert_eq!(table.hue_sample(-1), table.hue_sample(359));
        assert_eq!(table.hue_sample(360), table.hue_sample(0));
        assert_eq!(table.hue_at(360.0), table.hue_at(0.0));
        assert_eq!(table.hue_at(-60.0), Rgb::new(255, 0, 255));
        assert_eq!(table.lightness_sample(360), table.lightness_sample(0));
    }

    #[test]
    fn lightness_ramp_is_black_to_white() {
        let table = GradientTable::new(2, true);
        assert_eq!(table.lightness_at(0.0), Some(Rgb::new(0, 0, 0)));
        assert_eq!(table.lightness_at(1.0), Some(Rgb::new(255, 255, 255)));
        assert_eq!(table.lightness_at(0.5), Some(Rgb::new(128, 128, 128)));

        assert!(GradientTable::new(2, false).lightness_at(0.5).is_none());
    }
}
