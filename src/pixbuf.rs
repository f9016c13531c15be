#![doc = "Pixel buffer types"]
use rgb::Rgba;

use crate::blend::PixelSink;
use crate::geometry::*;
use crate::render::Sample;

/// Types that provide access to a buffer of pixels
pub trait Pixbuf {
    /// The pixel type stored in the buffer
    type Format;

    /// Blanks the pixels, usually to transparent black
    fn blank(&mut self);

    /// Returns the number of pixels accessable through this buffer
    fn pixel_count(&self) -> usize;
}

/// A row-major RGBA image owned in memory
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Pixmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgba<u8>>
}

impl Pixmap {
    /// Creates a fully transparent pixmap
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::new(0, 0, 0, 0); width * height]
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The pixels in row-major order
    pub fn pixels(&self) -> &[Rgba<u8>] {
        &self.pixels
    }

    /// Reads a single pixel, or None outside of the pixmap
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba<u8>> {
        if x < self.width && y < self.height {
            self.pixels.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// The whole pixmap as a rectangle
    pub fn bounds(&self) -> Rectangle<PixelSpace> {
        Rectangle::new_from_coordinates(0, 0, self.width, self.height)
    }

    /// The pixels as tightly packed RGBA bytes, for handing to a host surface
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| [px.r, px.g, px.b, px.a]).collect()
    }

    /// Draws `top` over this pixmap, aligned at the top left corner
    pub fn compose(&mut self, top: &Pixmap) {
        let overlap = top.bounds().clipped(self.width, self.height);
        for (coords, pixel) in self.sample(&overlap) {
            if let Some(src) = top.pixel(coords.x, coords.y) {
                pixel.add(src, 255);
            }
        }
    }
}

impl Pixbuf for Pixmap {
    type Format = Rgba<u8>;

    fn blank(&mut self) {
        self.pixels.fill(Rgba::new(0, 0, 0, 0));
    }

    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}

impl Sample<PixelSpace> for Pixmap {
    type Output = Rgba<u8>;

    fn sample<'a>(&'a mut self, rect: &Rectangle<PixelSpace>) -> impl Iterator<Item = (Coordinates<PixelSpace>, &'a mut Self::Output)> + 'a {
        let rect = rect.clipped(self.width, self.height);
        let (left, span) = (rect.left(), rect.width());
        let stride = self.width.max(1);
        self.pixels
            .chunks_mut(stride)
            .enumerate()
            .skip(rect.top())
            .take(rect.height())
            .flat_map(move |(y, row)| {
                row.iter_mut()
                    .enumerate()
                    .skip(left)
                    .take(span)
                    .map(move |(x, pixel)| (Coordinates::new(x, y), pixel))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pixmap_is_transparent() {
        let pixmap = Pixmap::new(3, 2);
        assert_eq!(pixmap.pixel_count(), 6);
        assert!(pixmap.pixels().iter().all(|px| px.a == 0));
        assert_eq!(pixmap.pixel(3, 0), None);
        assert_eq!(pixmap.to_rgba_bytes().len(), 24);
    }

    #[test]
    fn sample_visits_only_the_selection() {
        let mut pixmap = Pixmap::new(4, 4);
        let rect = Rectangle::new_from_coordinates(1, 1, 3, 10);
        let mut visited = 0;
        for (coords, pixel) in pixmap.sample(&rect) {
            assert!((1..3).contains(&coords.x));
            assert!((1..4).contains(&coords.y));
            *pixel = Rgba::new(255, 0, 0, 255);
            visited += 1;
        }
        assert_eq!(visited, 6);
        assert_eq!(pixmap.pixel(1, 1), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(pixmap.pixel(0, 1), Some(Rgba::new(0, 0, 0, 0)));

        pixmap.blank();
        assert_eq!(pixmap.pixel(1, 1), Some(Rgba::new(0, 0, 0, 0)));
    }

    #[test]
    fn compose_draws_over() {
        let mut bottom = Pixmap::new(2, 2);
        for (_, pixel) in bottom.sample(&Rectangle::everything()) {
            *pixel = Rgba::new(0, 0, 255, 255);
        }
        let mut top = Pixmap::new(1, 1);
        for (_, pixel) in top.sample(&Rectangle::everything()) {
            *pixel = Rgba::new(255, 0, 0, 255);
        }
        bottom.compose(&top);
        assert_eq!(bottom.pixel(0, 0), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(bottom.pixel(1, 1), Some(Rgba::new(0, 0, 255, 255)));
    }

    #[test]
    fn empty_pixmap_samples_nothing() {
        let mut pixmap = Pixmap::new(0, 0);
        assert_eq!(pixmap.sample(&Rectangle::everything()).count(), 0);
    }
}
