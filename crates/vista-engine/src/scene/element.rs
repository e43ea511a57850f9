use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{Bounds, Vec2};
use crate::error::Result;
use crate::surface::RenderSurface;

/// Capability contract for anything a scene can hold and a viewport can draw.
///
/// Both operations are required; a type that cannot report bounds or draw
/// itself simply does not implement the trait, so a half-capable element is
/// unrepresentable.
pub trait Renderable {
    /// Reports the element's current world-space bounding box.
    ///
    /// Derived on demand — callers may mutate the element's geometry between
    /// queries and expect the next query to see it. Must be side-effect free.
    fn bounding_box(&self) -> Bounds;

    /// Draws the element onto `surface` under the frame transform: a world
    /// point `p` lands at `(p + offset) * scale` in surface pixels.
    ///
    /// May have surface side effects only.
    fn render(&self, surface: &mut dyn RenderSurface, offset: Vec2, scale: Vec2) -> Result<()>;
}

/// Shared handle to a scene element.
///
/// Elements stay externally mutable after insertion — a simulation may update
/// a cell's color between frames through its own clone of the handle. The
/// single-dispatch-thread model makes the `RefCell` sound; nothing here is
/// `Send`.
pub type SharedElement = Rc<RefCell<dyn Renderable>>;
