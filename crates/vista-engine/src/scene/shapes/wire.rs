use crate::coords::{Bounds, Vec2};
use crate::error::Result;
use crate::paint::Color;
use crate::scene::Renderable;
use crate::surface::{RenderSurface, Stroke};

/// Base stroke width in world units.
const BASE_WIDTH: f32 = 2.0;

/// Extra width added to the glow pass at full glow, in world units.
const GLOW_WIDTH: f32 = 4.0;

/// Alpha of the glow pass at full glow.
const GLOW_ALPHA: f32 = 0.25;

/// Polyline from one endpoint to another through optional interior bend
/// points, with an optional glow pass.
///
/// Glow is a second, wider, translucent stroke over the same path;
/// `glow` ranges from `0.0` (off) to `1.0`.
#[derive(Debug, Clone)]
pub struct Wire {
    from: Vec2,
    to: Vec2,
    path: Vec<Vec2>,
    color: Color,
    glow: f32,
}

impl Wire {
    pub fn new(from: Vec2, to: Vec2, path: Vec<Vec2>, color: Color) -> Self {
        Self {
            from,
            to,
            path,
            color,
            glow: 0.0,
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn glow(&self) -> f32 {
        self.glow
    }

    pub fn set_glow(&mut self, glow: f32) {
        self.glow = glow.clamp(0.0, 1.0);
    }

    fn surface_points(&self, offset: Vec2, scale: Vec2) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(self.path.len() + 2);
        points.push((self.from + offset) * scale);
        for p in &self.path {
            points.push((*p + offset) * scale);
        }
        points.push((self.to + offset) * scale);
        points
    }
}

impl Renderable for Wire {
    fn bounding_box(&self) -> Bounds {
        let mut bounds = Bounds {
            left: self.from.x.min(self.to.x),
            top: self.from.y.min(self.to.y),
            right: self.from.x.max(self.to.x),
            bottom: self.from.y.max(self.to.y),
        };
        for p in &self.path {
            bounds = bounds.include(*p);
        }
        bounds
    }

    fn render(&self, surface: &mut dyn RenderSurface, offset: Vec2, scale: Vec2) -> Result<()> {
        let points = self.surface_points(offset, scale);
        let width = BASE_WIDTH * scale.x;

        surface.stroke_polyline(&points, Stroke::new(width, self.color))?;

        if self.glow > 0.0 {
            let glow_stroke = Stroke::new(
                width + GLOW_WIDTH * scale.x * self.glow,
                self.color.faded(GLOW_ALPHA * self.glow),
            );
            surface.stroke_polyline(&points, glow_stroke)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_endpoints_and_bends() {
        let wire = Wire::new(
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, 0.0),
            vec![Vec2::new(20.0, -3.0)],
            Color::BLACK,
        );
        assert_eq!(wire.bounding_box(), Bounds::new(0.0, -3.0, 20.0, 5.0));
    }

    #[test]
    fn glow_is_clamped() {
        let mut wire = Wire::new(Vec2::zero(), Vec2::splat(1.0), Vec::new(), Color::BLACK);
        wire.set_glow(3.0);
        assert_eq!(wire.glow(), 1.0);
        wire.set_glow(-1.0);
        assert_eq!(wire.glow(), 0.0);
    }
}
