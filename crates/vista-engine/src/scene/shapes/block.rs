use crate::coords::{Bounds, Rect, Vec2, lerp};
use crate::error::Result;
use crate::paint::Color;
use crate::scene::Renderable;
use crate::surface::RenderSurface;

/// Solid axis-aligned block.
#[derive(Debug, Clone)]
pub struct Block {
    position: Vec2,
    size: Vec2,
    color: Color,
}

impl Block {
    pub fn new(position: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            position,
            size,
            color,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position = self.position + delta;
    }

    /// Moves the position a fraction `t` of the way toward `target`.
    pub fn lerp_to(&mut self, target: Vec2, t: f32) {
        self.position = Vec2::new(
            lerp(self.position.x, target.x, t),
            lerp(self.position.y, target.y, t),
        );
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Renderable for Block {
    fn bounding_box(&self) -> Bounds {
        Bounds::from_origin_size(self.position, self.size)
    }

    fn render(&self, surface: &mut dyn RenderSurface, offset: Vec2, scale: Vec2) -> Result<()> {
        let origin = (self.position + offset) * scale;
        surface.fill_rect(Rect::from_origin_size(origin, self.size * scale), self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_position() {
        let mut block = Block::new(Vec2::new(10.0, 20.0), Vec2::splat(5.0), Color::BLACK);
        assert_eq!(block.bounding_box(), Bounds::new(10.0, 20.0, 15.0, 25.0));

        block.move_by(Vec2::new(-10.0, -20.0));
        assert_eq!(block.bounding_box(), Bounds::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn lerp_to_halfway() {
        let mut block = Block::new(Vec2::zero(), Vec2::splat(1.0), Color::BLACK);
        block.lerp_to(Vec2::new(10.0, 20.0), 0.5);
        assert_eq!(block.position(), Vec2::new(5.0, 10.0));
    }
}
