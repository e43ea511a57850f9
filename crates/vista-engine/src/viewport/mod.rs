//! Viewport: a rectangular window into world space projected onto a pixel
//! surface.
//!
//! Responsibilities:
//! - coordinate transforms between world space and surface space
//! - visibility culling via scene range queries
//! - the render cycle and the self-paced render loop
//!
//! Multiple viewports may project the same scene; each owns its position,
//! size, and run state exclusively.

mod pacing;
mod view;

pub use pacing::FramePacer;
pub use view::Viewport;
