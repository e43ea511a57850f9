//! GPU implementation of the render-surface contract.
//!
//! Draw calls record batched primitive instances; `commit` flushes them in
//! call order through the rect/circle/segment/glyph pipelines, so the
//! insertion-order painting the scene promises survives batching.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod canvas;
mod circle;
mod common;
mod glyph;
mod rect;
mod segment;

pub use canvas::GpuCanvas;
