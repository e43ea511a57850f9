use crate::coords::{Bounds, Rect, Vec2};
use crate::error::Result;
use crate::paint::Color;
use crate::scene::Renderable;
use crate::surface::RenderSurface;

/// Rectangular outline drawn as four bars.
///
/// `thickness` is in surface pixels and does not scale with the viewport, so
/// the outline stays readable at any zoom.
#[derive(Debug, Clone)]
pub struct Square {
    position: Vec2,
    size: Vec2,
    thickness: f32,
    color: Color,
}

impl Square {
    pub fn new(position: Vec2, size: Vec2, thickness: f32, color: Color) -> Self {
        Self {
            position,
            size,
            thickness,
            color,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Renderable for Square {
    /// The outline's bounds are the outlined rectangle itself; thickness
    /// draws inward.
    fn bounding_box(&self) -> Bounds {
        Bounds::from_origin_size(self.position, self.size)
    }

    fn render(&self, surface: &mut dyn RenderSurface, offset: Vec2, scale: Vec2) -> Result<()> {
        let origin = (self.position + offset) * scale;
        let extent = self.size * scale;
        let t = self.thickness;

        // Top, left, right, bottom bars.
        surface.fill_rect(
            Rect::new(origin.x, origin.y, extent.x, t),
            self.color,
        )?;
        surface.fill_rect(
            Rect::new(origin.x, origin.y, t, extent.y),
            self.color,
        )?;
        surface.fill_rect(
            Rect::new(origin.x + extent.x - t, origin.y, t, extent.y),
            self.color,
        )?;
        surface.fill_rect(
            Rect::new(origin.x, origin.y + extent.y - t, extent.x, t),
            self.color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_ignore_thickness() {
        let square = Square::new(Vec2::new(2.0, 3.0), Vec2::splat(10.0), 4.0, Color::BLACK);
        assert_eq!(square.bounding_box(), Bounds::new(2.0, 3.0, 12.0, 13.0));
    }
}
