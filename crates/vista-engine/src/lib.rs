//! Vista engine crate.
//!
//! A 2D scene/viewport engine: a scene holds renderable elements with spatial
//! extents, and independent viewports project rectangular regions of that
//! world onto pixel surfaces with pan/zoom. The winit/wgpu host lives in
//! `device`, `render`, and `window`; everything above those modules is
//! platform-agnostic.

pub mod coords;
pub mod error;
pub mod input;
pub mod logging;
pub mod paint;
pub mod scene;
pub mod surface;
pub mod viewport;

pub mod device;
pub mod render;
pub mod window;
