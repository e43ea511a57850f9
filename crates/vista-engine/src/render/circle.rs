use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Vec2;

use super::common::{
    QUAD_INDICES, QUAD_VERTICES, QuadVertex, ViewportUniform, premul_alpha_blend,
    viewport_ubo_min_binding_size,
};

/// Filled-circle pipeline.
///
/// Each instance expands a unit quad around the circle's center; the fragment
/// shader resolves coverage from the signed distance to the radius, giving a
/// one-pixel antialiased edge.
#[derive(Default)]
pub(super) struct CirclePipeline {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl CirclePipeline {
    pub(super) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        viewport: Vec2,
        instances: &[CircleInstance],
    ) {
        self.ensure_pipeline(device, format);
        self.ensure_static_buffers(device);
        self.ensure_bindings(device);

        if let Some(ubo) = self.viewport_ubo.as_ref() {
            let u = ViewportUniform {
                viewport: [viewport.x.max(1.0), viewport.y.max(1.0)],
                _pad: [0.0; 2],
            };
            queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        if instances.is_empty() {
            return;
        }
        self.ensure_instance_capacity(device, instances.len());
        if let Some(vbo) = self.instance_vbo.as_ref() {
            queue.write_buffer(vbo, 0, bytemuck::cast_slice(instances));
        }
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        if range.is_empty() {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, range);
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vista circle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/circle.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vista circle bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(viewport_ubo_min_binding_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vista circle pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vista circle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), CircleInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, device: &wgpu::Device) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vista circle viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vista circle bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, device: &wgpu::Device) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vista circle quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vista circle quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_instance_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vista circle instance vbo"),
            size: (new_cap * std::mem::size_of::<CircleInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CircleInstance {
    pub center: [f32; 2],
    /// `x` is the radius in logical pixels; `y` pads to 16-byte stride steps.
    pub radius_pad: [f32; 2],
    pub color: [f32; 4],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // radius (+ pad)
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
