#![doc = "8 bit fractional math for compositing pixels"]
use rgb::{Rgb, Rgba};

/// An alias for u8 to indicate that the value is a fraction from 0-255 where 0 is 0% and 255 is 100%
pub type Fract8 = u8;

/// Fixed point scaling and blending
pub trait Fract8Ops {
    /// Scales the value by `scale / 255`
    fn scale8(self, scale: Fract8) -> Self;
    /// Mixes `other` into `self` by `scale / 255`
    fn blend8(self, other: Self, scale: Fract8) -> Self;
}

impl Fract8Ops for u8 {
    #[inline(always)]
    fn scale8(self, scale: Fract8) -> Self {
        (self as u16 * scale as u16 / 255) as u8
    }

    #[inline(always)]
    fn blend8(self, other: Self, scale: Fract8) -> Self {
        match scale {
            0 => self,
            255 => other,
            _ => (((self as u16).wrapping_shl(8) | other as u16)
                .wrapping_add(other as u16 * scale as u16)
                .wrapping_sub(self as u16 * scale as u16))
                .wrapping_shr(8) as u8
        }
    }
}

macro_rules! fract8_color_impl {
    ($color_type:tt $($component:ident),+) => {
        impl Fract8Ops for $color_type<u8> {
            #[inline(always)]
            fn scale8(self, scale: Fract8) -> Self {
                Self {
                    $($component: self.$component.scale8(scale)),*
                }
            }

            #[inline(always)]
            fn blend8(self, other: Self, scale: Fract8) -> Self {
                Self {
                    $($component: self.$component.blend8(other.$component, scale)),*
                }
            }
        }
    };
}

fract8_color_impl!(Rgb r,g,b);
fract8_color_impl!(Rgba r,g,b,a);

/// Types that can composite another pixel over themselves
pub trait PixelSink<Src> {
    /// Draws `pixel` over `self` at the given opacity, honoring the source alpha
    fn add(&mut self, pixel: Src, opacity: Fract8);
}

impl PixelSink<Rgba<u8>> for Rgba<u8> {
    fn add(&mut self, pixel: Rgba<u8>, opacity: Fract8) {
        let alpha = pixel.a.scale8(opacity);
        match (alpha, self.a) {
            (Fract8::MIN, _) => (),
            (Fract8::MAX, _) => *self = Rgba::new(pixel.r, pixel.g, pixel.b, 255),
            (_, Fract8::MAX) => {
                let src = Rgba::new(pixel.r, pixel.g, pixel.b, 255);
                *self = self.blend8(src, alpha);
            },
            (_, dst_alpha) => {
                // Porter-Duff source-over against a translucent destination
                let sa = alpha as f32 / 255.0;
                let da = dst_alpha as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                let mix = |s: u8, d: u8| -> u8 {
                    ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a + 0.5).floor() as u8
                };
                *self = Rgba::new(
                    mix(pixel.r, self.r),
                    mix(pixel.g, self.g),
                    mix(pixel.b, self.b),
                    (out_a * 255.0 + 0.5).floor() as u8
                );
            }
        }
    }
}

impl PixelSink<Rgb<u8>> for Rgba<u8> {
    #[inline]
    fn add(&mut self, pixel: Rgb<u8>, opacity: Fract8) {
        self.add(Rgba::new(pixel.r, pixel.g, pixel.b, 255), opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_and_blend_endpoints() {
        assert_eq!(255u8.scale8(255), 255);
        assert_eq!(200u8.scale8(0), 0);
        assert_eq!(10u8.blend8(200, 0), 10);
        assert_eq!(10u8.blend8(200, 255), 200);
        assert_eq!(0u8.blend8(255, 128), 128);
    }

    #[test]
    fn opaque_source_replaces_destination() {
        let mut px = Rgba::new(1, 2, 3, 0);
        px.add(Rgb::new(9, 8, 7), 255);
        assert_eq!(px, Rgba::new(9, 8, 7, 255));
    }

    #[test]
    fn transparent_source_is_ignored() {
        let mut px = Rgba::new(1, 2, 3, 4);
        px.add(Rgba::new(255, 255, 255, 0), 255);
        assert_eq!(px, Rgba::new(1, 2, 3, 4));
        px.add(Rgba::new(255, 255, 255, 255), 0);
        assert_eq!(px, Rgba::new(1, 2, 3, 4));
    }

    #[test]
    fn translucent_source_over_empty_keeps_its_color() {
        let mut px = Rgba::new(0, 0, 0, 0);
        px.add(Rgba::new(200, 100, 50, 128), 255);
        assert_eq!(px, Rgba::new(200, 100, 50, 128));
    }

    #[test]
    fn translucent_source_over_opaque_mixes() {
        let mut px = Rgba::new(0, 0, 0, 255);
        px.add(Rgba::new(255, 255, 255, 128), 255);
        assert_eq!(px.a, 255);
        assert_eq!(px.r, 128);
    }
}
