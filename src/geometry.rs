//! 2D Geometry primitives such as coordinates, rectangles, polar math and the knob shapes
//!
//! Two coordinate spaces are used. [WheelSpace] is the continuous space of the control, with
//! the origin at the top left corner and y growing downward, in which pointer samples arrive
//! and all hit-testing happens. [PixelSpace] addresses discrete pixels of a
//! [Pixmap](crate::pixbuf::Pixmap).
use core::cmp::min;
use core::f32::consts::{FRAC_PI_2, TAU};
use core::fmt::Debug;

use num::Num;

use crate::color::normalize_hue;

/// Trait for describing coordinate spaces
pub trait CoordinateSpace: 'static + Debug + Copy + Clone + PartialEq {
    /// The underlying data type used for this coordinate space
    type Data: Num + PartialOrd + Copy + Debug;
}

/// The fundamental 2d coordinate type
#[derive(PartialEq, Clone, Copy, PartialOrd, Debug)]
pub struct Coordinates<S: CoordinateSpace> {
    /// X coordinate
    pub x: S::Data,
    /// Y coordinate
    pub y: S::Data,
}

impl<S: CoordinateSpace> Coordinates<S> {
    /// Creates a new coordinate
    pub const fn new(x: S::Data, y: S::Data) -> Self {
        Self {
            x,
            y
        }
    }
}

/// The continuous coordinate space of the control
#[derive(PartialEq, Debug, Copy, Clone, Default)]
pub struct WheelSpace {}
impl CoordinateSpace for WheelSpace {
    type Data = f32;
}

/// The discrete coordinate space of a pixel buffer
#[derive(PartialEq, Debug, Copy, Clone, Default)]
pub struct PixelSpace {}
impl CoordinateSpace for PixelSpace {
    type Data = usize;
}

/// A point in [WheelSpace]
pub type Point = Coordinates<WheelSpace>;

/// A pixel address in [PixelSpace]
pub type PixelCoordinates = Coordinates<PixelSpace>;

impl Point {
    /// Calculates the distance from this point to another point
    pub fn distance_to(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns this point rotated by `radians` around `center`
    ///
    /// Positive angles turn clockwise on screen, matching `atan2` with y pointing down.
    pub fn rotated_about(&self, center: &Self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos
        )
    }

    /// The center of a pixel
    pub fn from_pixel(pixel: &PixelCoordinates) -> Self {
        Self::new(pixel.x as f32 + 0.5, pixel.y as f32 + 0.5)
    }
}

/// A 2d rectangle specified with two [Coordinates]
///
/// In [PixelSpace] the bottom right corner is exclusive.
#[derive(PartialEq, Copy, Clone, Debug, PartialOrd)]
pub struct Rectangle<Space: CoordinateSpace> {
    /// Top left [Coordinates] of the rectangle
    pub top_left: Coordinates<Space>,
    /// Bottom right [Coordinates] of the rectangle
    pub bottom_right: Coordinates<Space>
}

impl<Space: CoordinateSpace> Rectangle<Space> {
    /// Creates a new rectangle using two [Coordinates]
    pub const fn new(top_left: Coordinates<Space>, bottom_right: Coordinates<Space>) -> Self {
        Self {
            top_left,
            bottom_right
        }
    }

    /// A shortcut for Rectangle::new without having to use Coordinates::new(x, y)
    pub const fn new_from_coordinates(left: Space::Data, top: Space::Data, right: Space::Data, bottom: Space::Data) -> Self {
        Self::new(Coordinates::new(left, top), Coordinates::new(right, bottom))
    }

    /// Calculates the width of the rectangle
    pub fn width(&self) -> Space::Data {
        self.bottom_right.x - self.top_left.x
    }

    /// Calculates the height of the rectangle
    pub fn height(&self) -> Space::Data {
        self.bottom_right.y - self.top_left.y
    }

    /// Returns the leftmost X coordinate of the rectangle
    pub const fn left(&self) -> Space::Data {
        self.top_left.x
    }

    /// Returns the topmost Y coordinate of the rectangle
    pub const fn top(&self) -> Space::Data {
        self.top_left.y
    }

    /// Returns the rightmost X coordinate of the rectangle
    pub const fn right(&self) -> Space::Data {
        self.bottom_right.x
    }

    /// Returns the bottommost Y coordinate of the rectangle
    pub const fn bottom(&self) -> Space::Data {
        self.bottom_right.y
    }
}

impl Rectangle<PixelSpace> {
    /// Creates a new rectangle that covers every addressable pixel
    pub const fn everything() -> Self {
        Self::new_from_coordinates(0, 0, usize::MAX, usize::MAX)
    }

    /// Restricts the rectangle to a buffer of the given size
    pub fn clipped(&self, width: usize, height: usize) -> Self {
        let left = min(self.left(), width);
        let top = min(self.top(), height);
        Self::new_from_coordinates(
            left,
            top,
            min(self.right(), width).max(left),
            min(self.bottom(), height).max(top)
        )
    }
}

impl Rectangle<WheelSpace> {
    /// The smallest pixel rectangle covering this area, clipped to a buffer of the given size
    pub fn to_pixels(&self, width: usize, height: usize) -> Rectangle<PixelSpace> {
        let floor = |v: f32| if v.is_nan() { 0 } else { v.floor().max(0.0) as usize };
        let ceil = |v: f32| if v.is_nan() { 0 } else { v.ceil().max(0.0) as usize };
        Rectangle::new_from_coordinates(
            floor(self.left()),
            floor(self.top()),
            ceil(self.right()),
            ceil(self.bottom())
        ).clipped(width, height)
    }

    /// Grows the rectangle by `amount` on every side
    pub fn inflated(&self, amount: f32) -> Self {
        Self::new_from_coordinates(
            self.left() - amount,
            self.top() - amount,
            self.right() + amount,
            self.bottom() + amount
        )
    }
}

/// A point relative to a center, as a distance and an `atan2` angle in radians
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Polar {
    /// Euclidean distance from the center
    pub distance: f32,
    /// Angle in radians, `(-pi, pi]`, 0 pointing right and growing clockwise on screen
    pub angle: f32
}

/// Calculates the distance and angle of `point` seen from `center`
pub fn polar(center: &Point, point: &Point) -> Polar {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Polar {
        distance: dx.hypot(dy),
        angle: dy.atan2(dx)
    }
}

/// True when `distance` lies strictly inside the annulus of the given radius and thickness
#[inline]
pub fn in_ring(distance: f32, radius: f32, thickness: f32) -> bool {
    let half = thickness * 0.5;
    radius - half < distance && distance < radius + half
}

/// Maps an `atan2` angle onto a hue in `[0, 360)`
pub fn angle_to_hue(angle: f32) -> f32 {
    let degrees = angle.to_degrees();
    normalize_hue(if degrees < 0.0 { degrees + 360.0 } else { degrees })
}

/// Maps an `atan2` angle onto a lightness fraction in `[0, 1)`
///
/// A lightness of 0 sits at the bottom of the ring and grows clockwise.
pub fn angle_to_lightness(angle: f32) -> f32 {
    let fraction = ((angle + FRAC_PI_2) / TAU + 0.5).rem_euclid(1.0);
    if fraction >= 1.0 {
        0.0
    } else {
        fraction
    }
}

/// Maps a distance from the center onto a saturation in `[0, 1]` over the given travel
///
/// Without any travel to speak of the knob always sits at full saturation.
pub fn distance_to_saturation(distance: f32, travel: f32) -> f32 {
    if travel <= 0.0 || travel.is_nan() {
        return 1.0;
    }
    num::clamp(distance, 0.0, travel) / travel
}

/// A circular band around a center
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Ring {
    /// Center of the band
    pub center: Point,
    /// Radius of the band's center line
    pub radius: f32,
    /// Width of the band
    pub thickness: f32
}

impl Ring {
    /// Tests whether a point lies strictly inside the band
    pub fn contains(&self, point: &Point) -> bool {
        in_ring(point.distance_to(&self.center), self.radius, self.thickness)
    }

    /// Inner edge radius
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.thickness * 0.5
    }

    /// Outer edge radius
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness * 0.5
    }
}

/// Closed regions that can be hit-tested and rasterized with the same test
pub trait Shape: Debug {
    /// True when the point is inside or on the edge of the shape
    fn contains(&self, point: &Point) -> bool;

    /// Axis aligned bounding box
    fn bounds(&self) -> Rectangle<WheelSpace>;

    /// Distance from an interior point to the nearest edge
    fn edge_distance(&self, point: &Point) -> f32;
}

/// A filled circle
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Disc {
    /// Center of the disc
    pub center: Point,
    /// Radius of the disc
    pub radius: f32
}

impl Disc {
    /// Creates a new disc
    pub const fn new(center: Point, radius: f32) -> Self {
        Self {
            center,
            radius
        }
    }
}

impl Shape for Disc {
    fn contains(&self, point: &Point) -> bool {
        point.distance_to(&self.center) <= self.radius
    }

    fn bounds(&self) -> Rectangle<WheelSpace> {
        Rectangle::new_from_coordinates(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius
        )
    }

    fn edge_distance(&self, point: &Point) -> f32 {
        (self.radius - point.distance_to(&self.center)).abs()
    }
}

/// A straight line segment
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Segment {
    /// Starting point
    pub start: Point,
    /// Ending point
    pub end: Point
}

impl Segment {
    /// Creates a new segment
    pub const fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end
        }
    }

    /// Shortest distance from a point to any point of the segment
    pub fn distance_to(&self, point: &Point) -> f32 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let length_sq = dx * dx + dy * dy;
        let t = if length_sq == 0.0 {
            0.0
        } else {
            num::clamp(((point.x - self.start.x) * dx + (point.y - self.start.y) * dy) / length_sq, 0.0, 1.0)
        };
        point.distance_to(&Point::new(self.start.x + dx * t, self.start.y + dy * t))
    }

    /// Returns the segment rotated by `radians` around `center`
    pub fn rotated_about(&self, center: &Point, radians: f32) -> Self {
        Self::new(self.start.rotated_about(center, radians), self.end.rotated_about(center, radians))
    }
}

/// A filled triangle
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Triangle {
    /// The three corners
    pub points: [Point; 3]
}

impl Triangle {
    /// Creates a new triangle
    pub const fn new(a: Point, b: Point, c: Point) -> Self {
        Self {
            points: [a, b, c]
        }
    }

    /// Returns the triangle rotated by `radians` around `center`
    pub fn rotated_about(&self, center: &Point, radians: f32) -> Self {
        let [a, b, c] = self.points;
        Self::new(
            a.rotated_about(center, radians),
            b.rotated_about(center, radians),
            c.rotated_about(center, radians)
        )
    }

    /// The average of the corners
    pub fn centroid(&self) -> Point {
        let [a, b, c] = self.points;
        Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    fn edges(&self) -> [Segment; 3] {
        let [a, b, c] = self.points;
        [Segment::new(a, b), Segment::new(b, c), Segment::new(c, a)]
    }
}

fn cross(o: &Point, a: &Point, p: &Point) -> f32 {
    (a.x - o.x) * (p.y - o.y) - (a.y - o.y) * (p.x - o.x)
}

impl Shape for Triangle {
    fn contains(&self, point: &Point) -> bool {
        let [a, b, c] = &self.points;
        let d1 = cross(a, b, point);
        let d2 = cross(b, c, point);
        let d3 = cross(c, a, point);
        let has_negative = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_positive = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_negative && has_positive)
    }

    fn bounds(&self) -> Rectangle<WheelSpace> {
        let [a, b, c] = self.points;
        Rectangle::new_from_coordinates(
            a.x.min(b.x).min(c.x),
            a.y.min(b.y).min(c.y),
            a.x.max(b.x).max(c.x),
            a.y.max(b.y).max(c.y)
        )
    }

    fn edge_distance(&self, point: &Point) -> f32 {
        self.edges()
            .iter()
            .map(|edge| edge.distance_to(point))
            .fold(f32::INFINITY, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;
    use proptest::prelude::*;

    fn approx_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "expected {b}, got {a}");
    }

    #[test]
    fn polar_of_cardinal_points() {
        let center = Point::new(50.0, 50.0);

        let right = polar(&center, &Point::new(80.0, 50.0));
        approx_eq(right.distance, 30.0);
        approx_eq(right.angle, 0.0);

        let below = polar(&center, &Point::new(50.0, 90.0));
        approx_eq(below.distance, 40.0);
        approx_eq(below.angle, FRAC_PI_2);

        let left = polar(&center, &Point::new(10.0, 50.0));
        approx_eq(left.angle, PI);
    }

    #[test]
    fn empty_ring_contains_nothing() {
        assert!(!in_ring(100.0, 100.0, 0.0));
    }

    proptest! {
        #[test]
        fn ring_boundaries(radius in 1.0f32..2000.0, thickness in 0.01f32..500.0) {
            let half = thickness / 2.0;
            let epsilon = 1e-3 + (radius + half) * 1e-5;
            prop_assert!(in_ring(radius, radius, thickness));
            prop_assert!(!in_ring(radius + half + epsilon, radius, thickness));
            prop_assert!(!in_ring(radius - half - epsilon, radius, thickness));
            prop_assert!(!in_ring(radius - half, radius, thickness));
        }
    }

    #[test]
    fn angle_mappings() {
        approx_eq(angle_to_hue(0.0), 0.0);
        approx_eq(angle_to_hue(FRAC_PI_2), 90.0);
        approx_eq(angle_to_hue(-FRAC_PI_2), 270.0);
        approx_eq(angle_to_hue(PI), 180.0);

        // bottom of the ring is lightness 0, then clockwise
        approx_eq(angle_to_lightness(FRAC_PI_2), 0.0);
        approx_eq(angle_to_lightness(PI), 0.25);
        approx_eq(angle_to_lightness(-FRAC_PI_2), 0.5);
        approx_eq(angle_to_lightness(0.0), 0.75);
    }

    #[test]
    fn saturation_travel_is_clamped() {
        approx_eq(distance_to_saturation(-5.0, 50.0), 0.0);
        approx_eq(distance_to_saturation(25.0, 50.0), 0.5);
        approx_eq(distance_to_saturation(80.0, 50.0), 1.0);
        approx_eq(distance_to_saturation(10.0, 0.0), 1.0);
    }

    #[test]
    fn rotation_is_clockwise_on_screen() {
        let center = Point::new(0.0, 0.0);
        let p = Point::new(10.0, 0.0).rotated_about(&center, FRAC_PI_2);
        approx_eq(p.x, 0.0);
        approx_eq(p.y, 10.0);
    }

    #[test]
    fn triangle_contains_and_edges() {
        let tri = Triangle::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0));
        assert!(tri.contains(&Point::new(2.0, 2.0)));
        assert!(tri.contains(&Point::new(5.0, 0.0)));
        assert!(!tri.contains(&Point::new(8.0, 8.0)));
        approx_eq(tri.edge_distance(&Point::new(2.0, 1.0)), 1.0);

        let bounds = tri.bounds();
        approx_eq(bounds.width(), 10.0);
        approx_eq(bounds.height(), 10.0);

        // winding does not matter
        let reversed = Triangle::new(Point::new(0.0, 10.0), Point::new(10.0, 0.0), Point::new(0.0, 0.0));
        assert!(reversed.contains(&Point::new(2.0, 2.0)));
    }

    #[test]
    fn rotated_triangle_follows_its_points() {
        let center = Point::new(50.0, 50.0);
        let tri = Triangle::new(Point::new(80.0, 50.0), Point::new(70.0, 45.0), Point::new(70.0, 55.0));
        let inside = tri.centroid();
        let turned = tri.rotated_about(&center, PI);
        assert!(turned.contains(&inside.rotated_about(&center, PI)));
        assert!(!turned.contains(&inside));
    }

    #[test]
    fn disc_and_segment() {
        let disc = Disc::new(Point::new(5.0, 5.0), 2.0);
        assert!(disc.contains(&Point::new(7.0, 5.0)));
        assert!(!disc.contains(&Point::new(7.1, 5.0)));

        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        approx_eq(seg.distance_to(&Point::new(5.0, 3.0)), 3.0);
        approx_eq(seg.distance_to(&Point::new(-4.0, 3.0)), 5.0);
    }

    #[test]
    fn wheel_rect_to_pixels_is_clipped() {
        let rect = Rectangle::<WheelSpace>::new_from_coordinates(-3.5, 2.2, 12.1, 400.0);
        assert_eq!(rect.to_pixels(10, 100), Rectangle::new_from_coordinates(0, 2, 10, 100));
        assert_eq!(Rectangle::everything().clipped(4, 4), Rectangle::new_from_coordinates(0, 0, 4, 4));
    }
}
