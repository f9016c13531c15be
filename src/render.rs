//! The core rendering engine types and the two-tier ring renderer
//!
//! Everything is drawn by [Shader]s: functions that turn a point in [WheelSpace] into a color.
//! A [Painter] runs a shader over every pixel center inside a rectangle of a [Sample]-able
//! buffer and composites the result over what is already there.
//!
//! The [Renderer] keeps two [Pixmap]s. The background (shadow halo, hue ring, lightness ring)
//! only depends on the [Layout] and the [GradientTable] and is cached between frames. The
//! overlay (saturation guide, knobs, center swatch) is cleared and redrawn whenever the color
//! or the interaction state changes.
use log::{debug, trace};
use rgb::{Rgb, Rgba};

use crate::blend::PixelSink;
use crate::color::ColorState;
use crate::geometry::*;
use crate::gradient::GradientTable;
use crate::interaction::{DragMode, Features};
use crate::layout::Layout;
use crate::pixbuf::{Pixbuf, Pixmap};

/// Types that can provide mutable access to individual pixels within a rectangle shaped selection
pub trait Sample<Space: CoordinateSpace> {
    /// The type of pixel this sampler supports
    type Output;

    /// Iterates over the pixels inside the given [Rectangle] selection
    fn sample<'a>(&'a mut self, rect: &Rectangle<Space>) -> impl Iterator<Item = (Coordinates<Space>, &'a mut Self::Output)> + 'a;
}

/// Function type that can provide an RGBA color given a location in [WheelSpace] and global rendering state
pub trait Shader<Uniforms> {
    /// Turns a [WheelSpace] coordinate into a color. Fully transparent means "leave untouched".
    fn draw(&self, coords: &Point, uniforms: &Uniforms) -> Rgba<u8>;
}

impl<T, U> Shader<U> for T where T: Fn(&Point, &U) -> Rgba<u8> {
    fn draw(&self, coords: &Point, uniforms: &U) -> Rgba<u8> {
        self(coords, uniforms)
    }
}

/// Types which can draw a shader over some pre-defined geometrical regions
pub trait Painter<U> {
    /// Draws the shader over the entire buffer
    fn fill(&mut self, shader: &impl Shader<U>, uniforms: &U);

    /// Draws the shader over every pixel whose center lies in the given rectangle's pixel cover
    fn paint(&mut self, shader: &impl Shader<U>, uniforms: &U, rect: &Rectangle<WheelSpace>);
}

impl<U, T, P> Painter<U> for T where T: Sample<PixelSpace, Output = P>, P: PixelSink<Rgba<u8>> {
    fn fill(&mut self, shader: &impl Shader<U>, uniforms: &U) {
        for (coords, pixel) in self.sample(&Rectangle::everything()) {
            pixel.add(shader.draw(&Point::from_pixel(&coords), uniforms), 255);
        }
    }

    fn paint(&mut self, shader: &impl Shader<U>, uniforms: &U, rect: &Rectangle<WheelSpace>) {
        for (coords, pixel) in self.sample(&rect.to_pixels(usize::MAX, usize::MAX)) {
            pixel.add(shader.draw(&Point::from_pixel(&coords), uniforms), 255);
        }
    }
}

/// Colors and switches of the drawn control
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Style {
    /// Hue knob fill while idle
    pub hue_knob: Rgba<u8>,
    /// Hue knob fill while dragged
    pub hue_knob_selected: Rgba<u8>,
    /// Lightness knob fill while idle
    pub lightness_knob: Rgba<u8>,
    /// Lightness knob fill while dragged
    pub lightness_knob_selected: Rgba<u8>,
    /// Whether the current color is shown in the middle
    pub show_swatch: bool,
    /// Width of the swatch border, 0 for none
    pub swatch_border: f32,
    /// Color of the swatch border
    pub swatch_border_color: Rgba<u8>,
    /// Color of the shadow halo
    pub shadow_color: Rgba<u8>,
    /// Whether the hue knob casts a shadow too
    pub knob_shadow: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            hue_knob: WHITE,
            hue_knob_selected: Rgba::new(0x77, 0x77, 0x77, 255),
            lightness_knob: WHITE,
            lightness_knob_selected: Rgba::new(0x77, 0x77, 0x77, 255),
            show_swatch: true,
            swatch_border: 2.0,
            swatch_border_color: BLACK,
            shadow_color: BLACK,
            knob_shadow: false,
        }
    }
}

const BLACK: Rgba<u8> = Rgba { r: 0, g: 0, b: 0, a: 255 };
const WHITE: Rgba<u8> = Rgba { r: 255, g: 255, b: 255, a: 255 };
const CLEAR: Rgba<u8> = Rgba { r: 0, g: 0, b: 0, a: 0 };

fn with_coverage(color: Rgb<u8>, coverage: f32) -> Rgba<u8> {
    Rgba::new(color.r, color.g, color.b, (crate::color::clamp_unit(coverage) * 255.0 + 0.5) as u8)
}

fn fade(color: Rgba<u8>, amount: f32) -> Rgba<u8> {
    Rgba::new(color.r, color.g, color.b, (color.a as f32 * crate::color::clamp_unit(amount) + 0.5) as u8)
}

/// Anti-aliased coverage of a point at `distance` from the center of a ring band
fn ring_coverage(ring: &Ring, distance: f32) -> f32 {
    0.5 - ((distance - ring.radius).abs() - ring.thickness * 0.5)
}

/// Paints the hue ring from the hue ramp
#[derive(Debug)]
pub struct HueRingShader {
    /// The ring to paint
    pub ring: Ring
}

impl Shader<GradientTable> for HueRingShader {
    fn draw(&self, coords: &Point, gradient: &GradientTable) -> Rgba<u8> {
        let p = polar(&self.ring.center, coords);
        with_coverage(gradient.hue_at(angle_to_hue(p.angle)), ring_coverage(&self.ring, p.distance))
    }
}

/// Paints the lightness ring from the gray ramp, black at the bottom turning clockwise to white
#[derive(Debug)]
pub struct LightnessRingShader {
    /// The ring to paint
    pub ring: Ring
}

impl Shader<GradientTable> for LightnessRingShader {
    fn draw(&self, coords: &Point, gradient: &GradientTable) -> Rgba<u8> {
        let p = polar(&self.ring.center, coords);
        match gradient.lightness_at(angle_to_lightness(p.angle)) {
            Some(gray) => with_coverage(gray, ring_coverage(&self.ring, p.distance)),
            None => CLEAR
        }
    }
}

/// A soft halo fading out over `blur` pixels on both sides of a ring
#[derive(Debug)]
pub struct ShadowShader {
    /// The ring casting the shadow
    pub ring: Ring,
    /// Width of the falloff
    pub blur: f32
}

impl Shader<Style> for ShadowShader {
    fn draw(&self, coords: &Point, style: &Style) -> Rgba<u8> {
        let outside = (coords.distance_to(&self.ring.center) - self.ring.radius).abs() - self.ring.thickness * 0.5;
        if outside <= 0.0 || self.blur <= 0.0 {
            return CLEAR;
        }
        let falloff = 1.0 - outside / self.blur;
        fade(style.shadow_color, falloff * falloff)
    }
}

/// Fills a shape, optionally with a one pixel outline
#[derive(Debug)]
pub struct KnobShader<S: Shape> {
    /// The knob outline
    pub shape: S,
    /// Fill color
    pub fill: Rgba<u8>,
    /// Outline color, if any
    pub outline: Option<Rgba<u8>>
}

impl<S: Shape, U> Shader<U> for KnobShader<S> {
    fn draw(&self, coords: &Point, _uniforms: &U) -> Rgba<u8> {
        if !self.shape.contains(coords) {
            return CLEAR;
        }
        match self.outline {
            Some(outline) if self.shape.edge_distance(coords) < 1.0 => outline,
            _ => self.fill
        }
    }
}

/// A shadow cast around a shape
#[derive(Debug)]
pub struct KnobShadowShader<S: Shape> {
    /// The shape casting the shadow
    pub shape: S,
    /// Width of the falloff
    pub blur: f32
}

impl<S: Shape> Shader<Style> for KnobShadowShader<S> {
    fn draw(&self, coords: &Point, style: &Style) -> Rgba<u8> {
        if self.blur <= 0.0 || self.shape.contains(coords) {
            return CLEAR;
        }
        let falloff = 1.0 - self.shape.edge_distance(coords) / self.blur;
        fade(style.shadow_color, falloff * falloff)
    }
}

/// The current color in a disc with a border centered on its edge
#[derive(Debug)]
pub struct SwatchShader {
    /// The swatch area
    pub disc: Disc,
    /// The color shown
    pub color: Rgb<u8>
}

impl Shader<Style> for SwatchShader {
    fn draw(&self, coords: &Point, style: &Style) -> Rgba<u8> {
        let distance = coords.distance_to(&self.disc.center);
        let half_border = style.swatch_border.max(0.0) * 0.5;
        if distance <= self.disc.radius - half_border {
            Rgba::new(self.color.r, self.color.g, self.color.b, 255)
        } else if distance <= self.disc.radius + half_border {
            style.swatch_border_color
        } else {
            CLEAR
        }
    }
}

/// A two pixel wide guide, black on one side of the line and white on the other
#[derive(Debug)]
pub struct GuideShader {
    /// The line the hue knob slides along
    pub segment: Segment
}

impl<U> Shader<U> for GuideShader {
    fn draw(&self, coords: &Point, _uniforms: &U) -> Rgba<u8> {
        let (start, end) = (self.segment.start, self.segment.end);
        let (dx, dy) = (end.x - start.x, end.y - start.y);
        let length = dx.hypot(dy);
        if length == 0.0 {
            return CLEAR;
        }
        let along = ((coords.x - start.x) * dx + (coords.y - start.y) * dy) / length;
        let across = ((coords.y - start.y) * dx - (coords.x - start.x) * dy) / length;
        if !(0.0..=length).contains(&along) {
            return CLEAR;
        }
        match across {
            a if (-1.0..0.0).contains(&a) => BLACK,
            a if (0.0..1.0).contains(&a) => WHITE,
            _ => CLEAR
        }
    }
}

fn disc_bounds(center: &Point, radius: f32) -> Rectangle<WheelSpace> {
    Disc::new(*center, radius).bounds()
}

/// Two-tier renderer holding the cached background and the per-change overlay
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    background: Pixmap,
    overlay: Pixmap,
    background_builds: usize,
    overlay_draws: usize
}

impl Renderer {
    /// Creates a renderer and draws its background once
    pub fn new(layout: &Layout, gradient: &GradientTable, style: &Style) -> Self {
        let mut renderer = Self::default();
        renderer.rebuild_background(layout, gradient, style);
        renderer
    }

    /// Redraws the cached background from scratch
    pub fn rebuild_background(&mut self, layout: &Layout, gradient: &GradientTable, style: &Style) {
        let size = layout.pixel_size();
        let mut pixmap = Pixmap::new(size, size);
        let hue_ring = layout.hue_ring();

        if layout.shadow_blur > 0.0 {
            let shadow = ShadowShader {
                ring: hue_ring,
                blur: layout.shadow_blur
            };
            pixmap.paint(&shadow, style, &disc_bounds(&layout.center, hue_ring.outer_radius() + layout.shadow_blur));
        }

        pixmap.paint(&HueRingShader { ring: hue_ring }, gradient, &disc_bounds(&layout.center, hue_ring.outer_radius() + 1.0));

        if let Some(ring) = layout.lightness_ring() {
            pixmap.paint(&LightnessRingShader { ring }, gradient, &disc_bounds(&layout.center, ring.outer_radius() + 1.0));
        }

        self.background = pixmap;
        self.background_builds += 1;
        debug!("Rebuilt {size}x{size} background, build #{}", self.background_builds);
    }

    /// Clears and redraws the overlay for the given color and interaction state
    pub fn redraw(&mut self, layout: &Layout, style: &Style, color: &ColorState, features: &Features, mode: DragMode) {
        let size = layout.pixel_size();
        if self.overlay.width() != size || self.overlay.height() != size {
            self.overlay = Pixmap::new(size, size);
        } else {
            self.overlay.blank();
        }

        if style.show_swatch {
            let swatch = SwatchShader {
                disc: layout.swatch(),
                color: color.rgb()
            };
            let reach = swatch.disc.radius + style.swatch_border.max(0.0) * 0.5 + 1.0;
            self.overlay.paint(&swatch, style, &disc_bounds(&layout.center, reach));
        }

        if features.saturation {
            let guide = GuideShader {
                segment: layout.saturation_guide(color.hue())
            };
            self.overlay.paint(&guide, style, &disc_bounds(&layout.center, layout.hue_radius));
        }

        let knob = layout.hue_knob(color.hue(), features.saturation.then_some(color.saturation()));
        if style.knob_shadow && layout.shadow_blur > 0.0 {
            let shadow = KnobShadowShader {
                shape: knob,
                blur: layout.shadow_blur
            };
            self.overlay.paint(&shadow, style, &knob.bounds().inflated(layout.shadow_blur));
        }
        let hue_knob = KnobShader {
            shape: knob,
            fill: if mode == DragMode::DraggingHue { style.hue_knob_selected } else { style.hue_knob },
            outline: Some(BLACK)
        };
        self.overlay.paint(&hue_knob, style, &knob.bounds().inflated(1.0));

        if features.lightness && layout.lightness_knob_radius > 0.0 {
            let disc = layout.lightness_knob(color.third());
            let rim = KnobShader {
                shape: disc,
                fill: BLACK,
                outline: None
            };
            let inner = KnobShader {
                shape: Disc::new(disc.center, (disc.radius - 1.0).max(0.0)),
                fill: if mode == DragMode::DraggingLightness { style.lightness_knob_selected } else { style.lightness_knob },
                outline: None
            };
            self.overlay.paint(&rim, style, &disc.bounds().inflated(1.0));
            self.overlay.paint(&inner, style, &disc.bounds().inflated(1.0));
        }

        self.overlay_draws += 1;
        trace!("Redrew overlay #{} for {:?} in {:?}", self.overlay_draws, color.rgb(), mode);
    }

    /// The cached static layer
    pub fn background(&self) -> &Pixmap {
        &self.background
    }

    /// The dynamic layer
    pub fn overlay(&self) -> &Pixmap {
        &self.overlay
    }

    /// The overlay blended over the background as a single frame
    pub fn compose(&self) -> Pixmap {
        let mut frame = self.background.clone();
        frame.compose(&self.overlay);
        frame
    }

    /// How many times the background has been drawn
    pub const fn background_builds(&self) -> usize {
        self.background_builds
    }

    /// How many times the overlay has been drawn
    pub const fn overlay_draws(&self) -> usize {
        self.overlay_draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSpace;

    fn setup() -> (Layout, GradientTable, Style, Features) {
        (Layout::default(), GradientTable::new(2, true), Style::default(), Features::default())
    }

    #[test]
    fn closures_are_shaders() {
        let mut pixmap = Pixmap::new(4, 4);
        let red = |_: &Point, _: &()| Rgba::new(255, 0, 0, 255);
        pixmap.fill(&red, &());
        assert!(pixmap.pixels().iter().all(|px| *px == Rgba::new(255, 0, 0, 255)));

        let mut pixmap = Pixmap::new(4, 4);
        pixmap.paint(&red, &(), &Rectangle::new_from_coordinates(0.0, 0.0, 2.0, 1.0));
        assert_eq!(pixmap.pixel(1, 0), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(pixmap.pixel(2, 0), Some(Rgba::new(0, 0, 0, 0)));
        assert_eq!(pixmap.pixel(0, 1), Some(Rgba::new(0, 0, 0, 0)));
    }

    #[test]
    fn background_shows_hue_and_lightness_rings() {
        let (layout, gradient, style, _) = setup();
        let renderer = Renderer::new(&layout, &gradient, &style);
        let bg = renderer.background();
        assert_eq!(bg.width(), 250);

        // right side of the hue ring is red, bottom is chartreuse
        let right = bg.pixel(217, 125).unwrap_or_default();
        assert_eq!((right.r, right.b, right.a), (255, 0, 255));
        assert!(right.g <= 4);
        let bottom = bg.pixel(125, 217).unwrap_or_default();
        assert_eq!((bottom.g, bottom.b, bottom.a), (255, 0, 255));
        assert!((120..140).contains(&bottom.r));

        // lightness ring starts dark just clockwise of the bottom, mid gray at the top
        let dark = bg.pixel(124, 244).map(|px| px.r).unwrap_or(255);
        let light = bg.pixel(125, 6).map(|px| px.r).unwrap_or(0);
        assert!(dark < 10);
        assert!(light > 120);

        // center stays clear
        assert_eq!(bg.pixel(125, 125), Some(Rgba::new(0, 0, 0, 0)));
        assert_eq!(renderer.background_builds(), 1);
    }

    #[test]
    fn overlay_has_swatch_and_knobs() {
        let (layout, gradient, style, features) = setup();
        let mut renderer = Renderer::new(&layout, &gradient, &style);
        let color = ColorState::new(ColorSpace::Hsl, 120.0, 1.0, 0.5);
        renderer.redraw(&layout, &style, &color, &features, DragMode::Idle);

        let overlay = renderer.overlay();
        assert_eq!(overlay.pixel(125, 110), Some(Rgba::new(0, 255, 0, 255)));

        // hue knob at 120 degrees, filled with the idle color
        let tip = layout.hue_knob(120.0, Some(1.0)).centroid();
        assert_eq!(overlay.pixel(tip.x as usize, tip.y as usize), Some(style.hue_knob));

        renderer.redraw(&layout, &style, &color, &features, DragMode::DraggingHue);
        let overlay = renderer.overlay();
        assert_eq!(overlay.pixel(tip.x as usize, tip.y as usize), Some(style.hue_knob_selected));
        assert_eq!(renderer.overlay_draws(), 2);
        assert_eq!(renderer.background_builds(), 1);
    }

    #[test]
    fn hidden_swatch_leaves_the_center_clear() {
        let (layout, gradient, mut style, features) = setup();
        style.show_swatch = false;
        let mut renderer = Renderer::new(&layout, &gradient, &style);
        renderer.redraw(&layout, &style, &ColorState::default(), &features, DragMode::Idle);
        assert_eq!(renderer.overlay().pixel(125, 140), Some(Rgba::new(0, 0, 0, 0)));
    }

    #[test]
    fn compose_puts_the_overlay_on_top() {
        let (layout, gradient, style, features) = setup();
        let mut renderer = Renderer::new(&layout, &gradient, &style);
        renderer.redraw(&layout, &style, &ColorState::default(), &features, DragMode::Idle);
        let frame = renderer.compose();
        assert_eq!(frame.pixel(125, 100), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(frame.pixel(217, 125), renderer.background().pixel(217, 125));
    }
}
