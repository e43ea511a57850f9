//! Scene types.
//!
//! Responsibilities:
//! - define the `Renderable` capability contract every drawable implements
//! - store elements in insertion order and answer world-space range queries
//! - keep shape-specific code isolated per shape file under `scene::shapes`

mod element;
mod world;

pub mod shapes;

pub use element::{Renderable, SharedElement};
pub use world::Scene;
