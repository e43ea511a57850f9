use crate::coords::{Bounds, Vec2};
use crate::error::Result;
use crate::paint::Color;
use crate::scene::Renderable;
use crate::surface::RenderSurface;

/// Filled circle around a center point.
///
/// The drawn radius follows the horizontal scale axis; under non-uniform
/// scaling the circle keeps its shape rather than squashing into an ellipse.
#[derive(Debug, Clone)]
pub struct Circle {
    position: Vec2,
    radius: f32,
    color: Color,
}

impl Circle {
    pub fn new(position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            position,
            radius,
            color,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Renderable for Circle {
    fn bounding_box(&self) -> Bounds {
        Bounds::around(self.position, self.radius)
    }

    fn render(&self, surface: &mut dyn RenderSurface, offset: Vec2, scale: Vec2) -> Result<()> {
        let center = (self.position + offset) * scale;
        surface.fill_circle(center, self.radius * scale.x, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_span_the_diameter() {
        let circle = Circle::new(Vec2::new(10.0, 10.0), 3.0, Color::BLACK);
        assert_eq!(circle.bounding_box(), Bounds::new(7.0, 7.0, 13.0, 13.0));
    }
}
