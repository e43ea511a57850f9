//! Render-surface contract.
//!
//! Responsibilities:
//! - expose the pixel dimensions the viewport projection derives its scale from
//! - provide the drawing primitives shape elements render with
//!
//! The viewport itself only reads dimensions and calls [`RenderSurface::clear`]
//! / [`RenderSurface::commit`]; everything else is invoked by `Renderable`
//! implementations. Coordinates handed to draw calls are surface pixels
//! (origin top-left, +Y down); callers apply the frame transform first.

use crate::coords::{Rect, Vec2};
use crate::error::Result;
use crate::paint::Color;

/// Stroke parameters for polyline drawing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    /// Line width in surface pixels.
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    #[inline]
    pub const fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// A pixel-addressable 2D drawing target.
///
/// Implementations may batch draw calls; a frame is the span from `clear` to
/// `commit`, and draws land in call order (later calls paint over earlier
/// ones). A surface that draws immediately may treat `commit` as a no-op.
pub trait RenderSurface {
    /// Current drawable size in logical pixels.
    fn dimensions(&self) -> Vec2;

    /// Begins a frame and clears the whole surface.
    fn clear(&mut self) -> Result<()>;

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<()>;

    /// Strokes an open polyline with round caps and joins.
    fn stroke_polyline(&mut self, points: &[Vec2], stroke: Stroke) -> Result<()>;

    /// Draws a small diagnostic label with its top-left corner at `origin`.
    ///
    /// Surfaces without a text facility may draw nothing; labels are
    /// cosmetic and never affect culling or transforms.
    fn draw_label(&mut self, text: &str, origin: Vec2, size: f32, color: Color) -> Result<()>;

    /// Finishes the frame begun by `clear`, presenting it if applicable.
    fn commit(&mut self) -> Result<()>;
}
