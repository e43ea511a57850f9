use winit::dpi::PhysicalSize;

use crate::coords::{Rect, Vec2};
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::error::{EngineError, Result};
use crate::paint::Color;
use crate::surface::{RenderSurface, Stroke};

use super::circle::{CircleInstance, CirclePipeline};
use super::glyph::{GlyphInstance, GlyphPipeline};
use super::rect::{RectInstance, RectPipeline};
use super::segment::{SegmentInstance, SegmentPipeline};

/// Which primitive pipeline a run of draw calls belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PrimKind {
    Rect,
    Circle,
    Segment,
    Glyph,
}

/// A run of consecutive same-kind draw calls; `start`/`count` index into that
/// kind's instance vector.
#[derive(Debug, Copy, Clone)]
struct Run {
    kind: PrimKind,
    start: u32,
    count: u32,
}

/// Frame lifecycle between `clear` and `commit`.
enum FrameState {
    /// No frame in flight.
    Idle,
    /// Frame acquired and cleared; draw calls are being recorded.
    Recording(GpuFrame),
    /// Acquisition hit a transient error; draw calls no-op until `commit`.
    Skipped,
}

/// wgpu-backed render surface for one window.
///
/// Draw calls append primitive instances and a run list; `commit` uploads
/// everything and replays the runs in call order inside a single render
/// pass, so later calls paint over earlier ones exactly as recorded.
pub struct GpuCanvas<'w> {
    gpu: Gpu<'w>,
    scale_factor: f32,
    clear_color: Color,
    font: Option<fontdue::Font>,

    rect_pipeline: RectPipeline,
    circle_pipeline: CirclePipeline,
    segment_pipeline: SegmentPipeline,
    glyph_pipeline: GlyphPipeline,

    rects: Vec<RectInstance>,
    circles: Vec<CircleInstance>,
    segments: Vec<SegmentInstance>,
    glyphs: Vec<GlyphInstance>,
    runs: Vec<Run>,

    state: FrameState,
}

impl<'w> GpuCanvas<'w> {
    /// Wraps a GPU context into a drawable canvas.
    ///
    /// `font_bytes` backs the label facility; without it (or when parsing
    /// fails) labels draw nothing and a warning is logged once.
    pub fn new(
        gpu: Gpu<'w>,
        scale_factor: f32,
        clear_color: Color,
        font_bytes: Option<Vec<u8>>,
    ) -> Self {
        let font = font_bytes.and_then(|bytes| {
            match fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
                Ok(font) => Some(font),
                Err(err) => {
                    log::warn!("label font unavailable: {err}");
                    None
                }
            }
        });

        Self {
            gpu,
            scale_factor: scale_factor.max(0.01),
            clear_color,
            font,
            rect_pipeline: RectPipeline::default(),
            circle_pipeline: CirclePipeline::default(),
            segment_pipeline: SegmentPipeline::default(),
            glyph_pipeline: GlyphPipeline::default(),
            rects: Vec::new(),
            circles: Vec::new(),
            segments: Vec::new(),
            glyphs: Vec::new(),
            runs: Vec::new(),
            state: FrameState::Idle,
        }
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor.max(0.01);
    }

    /// Reconfigures the swapchain after the window resized.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    fn recording(&self) -> bool {
        matches!(self.state, FrameState::Recording(_))
    }

    /// Extends the current run if it has the same kind, else opens a new one.
    fn record_run(&mut self, kind: PrimKind, start: u32, count: u32) {
        if count == 0 {
            return;
        }
        match self.runs.last_mut() {
            Some(run) if run.kind == kind => run.count += count,
            _ => self.runs.push(Run { kind, start, count }),
        }
    }

    fn reset_recording(&mut self) {
        self.rects.clear();
        self.circles.clear();
        self.segments.clear();
        self.glyphs.clear();
        self.runs.clear();
    }
}

impl RenderSurface for GpuCanvas<'_> {
    fn dimensions(&self) -> Vec2 {
        let size = self.gpu.size();
        Vec2::new(size.width as f32, size.height as f32) / self.scale_factor
    }

    fn clear(&mut self) -> Result<()> {
        self.reset_recording();

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let err_msg = err.to_string();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        // Transient; swallow this frame and try again next tick.
                        self.state = FrameState::Skipped;
                        Ok(())
                    }
                    SurfaceErrorAction::Fatal => {
                        self.state = FrameState::Idle;
                        Err(EngineError::SurfaceAcquisition(err_msg))
                    }
                };
            }
        };

        // Clear pass; the scoped borrow ends before the encoder moves on.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vista clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.clear_color.r as f64,
                            g: self.clear_color.g as f64,
                            b: self.clear_color.b as f64,
                            a: self.clear_color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.state = FrameState::Recording(frame);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        if !self.recording() {
            return Ok(());
        }
        let rect = rect.normalized();
        if rect.is_empty() || !rect.is_finite() {
            return Ok(());
        }

        let start = self.rects.len() as u32;
        self.rects.push(RectInstance {
            origin: [rect.origin.x, rect.origin.y],
            size: [rect.size.x, rect.size.y],
            color: [color.r, color.g, color.b, color.a],
        });
        self.record_run(PrimKind::Rect, start, 1);
        Ok(())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<()> {
        if !self.recording() {
            return Ok(());
        }
        if radius <= 0.0 || !radius.is_finite() || !center.is_finite() {
            return Ok(());
        }

        let start = self.circles.len() as u32;
        self.circles.push(CircleInstance {
            center: [center.x, center.y],
            radius_pad: [radius, 0.0],
            color: [color.r, color.g, color.b, color.a],
        });
        self.record_run(PrimKind::Circle, start, 1);
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: Stroke) -> Result<()> {
        if !self.recording() {
            return Ok(());
        }
        if points.len() < 2 || stroke.width <= 0.0 {
            return Ok(());
        }

        let start = self.segments.len() as u32;
        let color = [
            stroke.color.r,
            stroke.color.g,
            stroke.color.b,
            stroke.color.a,
        ];
        let mut count = 0;
        for pair in points.windows(2) {
            if !pair[0].is_finite() || !pair[1].is_finite() {
                continue;
            }
            self.segments.push(SegmentInstance {
                p0: [pair[0].x, pair[0].y],
                p1: [pair[1].x, pair[1].y],
                width_pad: [stroke.width, 0.0],
                color,
            });
            count += 1;
        }
        self.record_run(PrimKind::Segment, start, count);
        Ok(())
    }

    fn draw_label(&mut self, text: &str, origin: Vec2, size: f32, color: Color) -> Result<()> {
        if !self.recording() {
            return Ok(());
        }
        let Some(font) = self.font.as_ref() else {
            return Ok(());
        };

        let start = self.glyphs.len() as u32;
        let count = self.glyph_pipeline.push_label(
            self.gpu.device(),
            self.gpu.queue(),
            font,
            text,
            origin,
            size,
            color,
            &mut self.glyphs,
        );
        self.record_run(PrimKind::Glyph, start, count);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, FrameState::Idle);
        let frame = match state {
            FrameState::Idle | FrameState::Skipped => return Ok(()),
            FrameState::Recording(frame) => frame,
        };
        let mut frame = frame;

        let viewport = self.dimensions();
        let format = self.gpu.surface_format();
        let device = self.gpu.device();
        let queue = self.gpu.queue();

        self.rect_pipeline
            .prepare(device, queue, format, viewport, &self.rects);
        self.circle_pipeline
            .prepare(device, queue, format, viewport, &self.circles);
        self.segment_pipeline
            .prepare(device, queue, format, viewport, &self.segments);
        self.glyph_pipeline
            .prepare(device, queue, format, viewport, &self.glyphs);

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vista draw"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for run in &self.runs {
                let range = run.start..run.start + run.count;
                match run.kind {
                    PrimKind::Rect => self.rect_pipeline.draw(&mut rpass, range),
                    PrimKind::Circle => self.circle_pipeline.draw(&mut rpass, range),
                    PrimKind::Segment => self.segment_pipeline.draw(&mut rpass, range),
                    PrimKind::Glyph => self.glyph_pipeline.draw(&mut rpass, range),
                }
            }
        }

        self.gpu.submit(frame);
        self.reset_recording();
        Ok(())
    }
}
