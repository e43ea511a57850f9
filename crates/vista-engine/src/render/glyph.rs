use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Vec2;
use crate::paint::Color;

use super::common::{
    QUAD_INDICES, QUAD_VERTICES, QuadVertex, ViewportUniform, premul_alpha_blend,
    viewport_ubo_min_binding_size,
};

/// Side length of the square R8 glyph atlas.
///
/// Labels are small diagnostic strings at one size, so a modest atlas holds
/// every glyph they can produce.
const ATLAS_SIZE: u32 = 512;

/// Pixels between glyphs in the atlas.
const GLYPH_PADDING: u32 = 1;

/// Cache key: character + pixel size bits.
type GlyphKey = (char, u32);

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Label-text pipeline.
///
/// Rasterizes glyphs on first use via fontdue into a shelf-packed atlas and
/// draws them as textured quads. One font, straight left-to-right pen
/// advance — enough for diagnostic labels, nothing more.
#[derive(Default)]
pub(super) struct GlyphPipeline {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // Bindings are rebuilt when the atlas is (re)created.
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    atlas_cursor_x: u32,
    atlas_cursor_y: u32,
    atlas_row_height: u32,
    atlas_full: bool,
    warned_full: bool,

    glyph_cache: HashMap<GlyphKey, CachedGlyph>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl GlyphPipeline {
    /// Lays out `text` with its top-left corner at `origin`, rasterizing and
    /// uploading any glyphs not yet in the atlas, and appends the resulting
    /// instances to `out`. Returns how many instances were appended.
    pub(super) fn push_label(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        font: &fontdue::Font,
        text: &str,
        origin: Vec2,
        size: f32,
        color: Color,
        out: &mut Vec<GlyphInstance>,
    ) -> u32 {
        self.ensure_atlas(device);

        let ascent = font
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size);
        let baseline = origin.y + ascent;
        let color = [color.r, color.g, color.b, color.a];

        let mut appended = 0;
        let mut pen_x = origin.x;

        for ch in text.chars() {
            let metrics = font.metrics(ch, size);

            if metrics.width > 0 && metrics.height > 0 {
                let key = (ch, size.to_bits());
                if !self.glyph_cache.contains_key(&key) {
                    let (metrics, bitmap) = font.rasterize(ch, size);
                    if let Some(entry) = self.place_glyph(
                        queue,
                        &bitmap,
                        metrics.width as u32,
                        metrics.height as u32,
                    ) {
                        self.glyph_cache.insert(key, entry);
                    }
                }

                if let Some(cached) = self.glyph_cache.get(&key) {
                    let x = pen_x + metrics.xmin as f32;
                    let y = baseline - (metrics.height as f32 + metrics.ymin as f32);
                    out.push(GlyphInstance {
                        dst_min: [x, y],
                        dst_max: [x + metrics.width as f32, y + metrics.height as f32],
                        uv_min: cached.uv_min,
                        uv_max: cached.uv_max,
                        color,
                    });
                    appended += 1;
                }
            }

            pen_x += metrics.advance_width;
        }

        appended
    }

    pub(super) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        viewport: Vec2,
        instances: &[GlyphInstance],
    ) {
        self.ensure_pipeline(device, format);
        self.ensure_atlas(device);
        self.ensure_sampler(device);
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

    // ── atlas ─────────────────────────────────────────────────────────────

    fn place_glyph(
        &mut self,
        queue: &wgpu::Queue,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) -> Option<CachedGlyph> {
        if self.atlas_full {
            return None;
        }

        // Advance to a new shelf row when the glyph doesn't fit horizontally.
        if self.atlas_cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.atlas_cursor_y += self.atlas_row_height + GLYPH_PADDING;
            self.atlas_cursor_x = GLYPH_PADDING;
            self.atlas_row_height = 0;
        }

        if self.atlas_cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            if !self.warned_full {
                log::warn!(
                    "glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); further label glyphs are dropped"
                );
                self.warned_full = true;
            }
            self.atlas_full = true;
            return None;
        }

        let gx = self.atlas_cursor_x;
        let gy = self.atlas_cursor_y;
        let atlas = self.atlas_texture.as_ref()?;

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );

        self.atlas_cursor_x += w + GLYPH_PADDING;
        self.atlas_row_height = self.atlas_row_height.max(h);

        let atlas_f = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        })
    }

    fn ensure_atlas(&mut self, device: &wgpu::Device) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vista glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.atlas_cursor_x = GLYPH_PADDING;
        self.atlas_cursor_y = GLYPH_PADDING;
        self.atlas_row_height = 0;
        self.atlas_full = false;

        // Bindings reference the atlas view; force a rebuild.
        self.bind_group = None;
    }

    fn ensure_sampler(&mut self, device: &wgpu::Device) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("vista glyph sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    // ── lazy-init helpers ─────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vista glyph shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/glyph.wgsl").into()),
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vista glyph bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(viewport_ubo_min_binding_size()),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vista glyph pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vista glyph pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), GlyphInstance::layout()],
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
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, device: &wgpu::Device) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vista glyph viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vista glyph bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, device: &wgpu::Device) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vista glyph quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vista glyph quad ibo"),
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
            label: Some("vista glyph instance vbo"),
            size: (new_cap * std::mem::size_of::<GlyphInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct GlyphInstance {
    pub dst_min: [f32; 2],
    pub dst_max: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
