//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and window, translates host events into engine
//! input events, and drives the hosted viewport's render loop from its own
//! scheduled deadlines.

mod app;
mod runtime;

pub use app::{App, AppControl};
pub use runtime::{Runtime, RuntimeConfig};
