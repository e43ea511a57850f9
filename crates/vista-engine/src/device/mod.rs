//! GPU device + swapchain management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the window surface (swapchain)
//! - acquiring frames and classifying surface errors

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
