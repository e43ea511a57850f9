//! Shared GPU types and utilities used by all primitive pipelines.

use bytemuck::{Pod, Zeroable};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

/// Minimum binding size for the viewport uniform buffer.
///
/// `ViewportUniform` is 16 bytes, so the size is always non-zero;
/// centralising this avoids `.unwrap()` at each pipeline-creation site.
pub(super) fn viewport_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
        .expect("ViewportUniform has non-zero size by construction")
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
