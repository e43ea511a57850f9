/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
///
/// Rationale:
/// - Correct blending with linear filtering (avoids fringes).
/// - Matches the GPU blending configuration the renderers use.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    ///
    /// This is the preferred constructor for colors written as hex literals.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components in `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Scales every channel by `factor`.
    ///
    /// For premultiplied colors this fades coverage and brightness together,
    /// so the result stays premultiplied.
    #[inline]
    pub fn faded(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a * factor,
        }
    }

    /// Channel-wise linear interpolation toward `other`.
    ///
    /// `t = 0` returns `self`, `t = 1` returns `other`. Interpolation happens
    /// on the numeric channels, never through a string round-trip.
    #[inline]
    pub fn mix(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_straight_premultiplies() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c.r, 0.5);
        assert_eq!(c.g, 0.25);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn mix_endpoints() {
        let off = Color::from_srgb_u8(0x4f, 0x45, 0x61, 0xff);
        let on = Color::from_srgb_u8(0x29, 0xbb, 0xff, 0xff);
        assert_eq!(off.mix(on, 0.0), off);
        assert_eq!(off.mix(on, 1.0), on);
        let mid = off.mix(on, 0.5);
        assert!(mid.g > off.g && mid.g < on.g);
    }

    #[test]
    fn faded_keeps_premultiplication() {
        let c = Color::from_straight(1.0, 1.0, 1.0, 1.0).faded(0.25);
        assert_eq!(c.a, 0.25);
        assert_eq!(c.r, 0.25);
    }
}
