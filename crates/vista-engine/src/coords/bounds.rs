use super::{Rect, Vec2};

/// World-space axis-aligned bounding box as edge coordinates.
///
/// Invariant: `left <= right` and `top <= bottom`. Elements derive their
/// bounds on demand; nothing in the engine caches them between queries.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.x,
            bottom: origin.y + size.y,
        }
    }

    /// Square bounds of radius `radius` around `center`.
    #[inline]
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            left: center.x - radius,
            top: center.y - radius,
            right: center.x + radius,
            bottom: center.y + radius,
        }
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// True when the edges are ordered (`left <= right`, `top <= bottom`).
    /// NaN edges fail the comparison and report unordered.
    #[inline]
    pub fn is_ordered(self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    /// Expands the bounds to include `p`.
    #[inline]
    pub fn include(self, p: Vec2) -> Self {
        Self {
            left: self.left.min(p.x),
            top: self.top.min(p.y),
            right: self.right.max(p.x),
            bottom: self.bottom.max(p.y),
        }
    }

    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::new(self.left, self.top, self.width(), self.height())
    }

    /// Strict overlap against the half-open area `[position, position + size)`.
    ///
    /// All four comparisons are strict: bounds that merely touch an edge of
    /// the area (zero-width overlap) do not count. Visibility culling depends
    /// on this exact rule.
    #[inline]
    pub fn overlaps_area(self, position: Vec2, size: Vec2) -> bool {
        self.right > position.x
            && self.bottom > position.y
            && self.left < position.x + size.x
            && self.top < position.y + size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(x: f32, y: f32, w: f32, h: f32) -> (Vec2, Vec2) {
        (Vec2::new(x, y), Vec2::new(w, h))
    }

    // ── overlaps_area ─────────────────────────────────────────────────────

    #[test]
    fn overlap_interior() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let (p, s) = area(5.0, 5.0, 10.0, 10.0);
        assert!(b.overlaps_area(p, s));
    }

    #[test]
    fn overlap_contained() {
        let b = Bounds::new(2.0, 2.0, 4.0, 4.0);
        let (p, s) = area(0.0, 0.0, 10.0, 10.0);
        assert!(b.overlaps_area(p, s));
    }

    #[test]
    fn touching_right_edge_is_excluded() {
        // Bounds end exactly where the area begins: zero-width contact.
        let b = Bounds::new(10.0, 0.0, 20.0, 10.0);
        let (p, s) = area(20.0, 0.0, 10.0, 10.0);
        assert!(!b.overlaps_area(p, s));
    }

    #[test]
    fn touching_bottom_edge_is_excluded() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let (p, s) = area(0.0, 10.0, 10.0, 10.0);
        assert!(!b.overlaps_area(p, s));
    }

    #[test]
    fn one_unit_past_the_edge_is_included() {
        let b = Bounds::new(10.0, 0.0, 20.0, 10.0);
        let (p, s) = area(19.0, 0.0, 10.0, 10.0);
        assert!(b.overlaps_area(p, s));
    }

    #[test]
    fn disjoint() {
        let b = Bounds::new(0.0, 0.0, 5.0, 5.0);
        let (p, s) = area(100.0, 100.0, 5.0, 5.0);
        assert!(!b.overlaps_area(p, s));
    }

    // ── validity ──────────────────────────────────────────────────────────

    #[test]
    fn ordered_and_finite() {
        assert!(Bounds::new(0.0, 0.0, 1.0, 1.0).is_ordered());
        assert!(!Bounds::new(1.0, 0.0, 0.0, 1.0).is_ordered());
        assert!(!Bounds::new(f32::NAN, 0.0, 1.0, 1.0).is_ordered());
        assert!(!Bounds::new(f32::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!Bounds::new(0.0, 0.0, f32::INFINITY, 1.0).is_finite());
    }

    #[test]
    fn include_grows_in_every_direction() {
        let b = Bounds::new(0.0, 0.0, 1.0, 1.0)
            .include(Vec2::new(-2.0, 5.0))
            .include(Vec2::new(3.0, -4.0));
        assert_eq!(b, Bounds::new(-2.0, -4.0, 3.0, 5.0));
    }
}
