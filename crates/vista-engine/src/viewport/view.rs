use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::coords::Vec2;
use crate::error::{EngineError, Result};
use crate::paint::Color;
use crate::scene::Scene;
use crate::surface::RenderSurface;

use super::pacing::FramePacer;

/// Surface-space anchor of the frame-rate overlay.
const OVERLAY_ANCHOR: Vec2 = Vec2::new(10.0, 10.0);
const OVERLAY_TEXT_SIZE: f32 = 16.0;
const OVERLAY_COLOR: Color = Color::from_premul(0.5, 0.5, 0.5, 0.9);

/// Render-loop state.
///
/// `next_due` is the deadline of the next scheduled tick; a tick arriving
/// earlier is not yet due, a tick arriving at or after it renders and
/// reschedules.
enum RunState {
    Inactive,
    Active {
        pacer: FramePacer,
        next_due: Instant,
    },
}

/// A rectangular window into world space, projected onto a pixel surface.
///
/// The projection is fully described by `position` and `size` in world units
/// plus the surface's current pixel dimensions; scale derives per axis as
/// `surface / size`, so non-uniform scaling falls out naturally when aspect
/// ratios differ. Storing position + size instead of a matrix keeps the
/// transform trivially invertible for pointer input.
///
/// Several viewports may share one scene (`Rc<RefCell<Scene>>`); each owns
/// its position, size, surface, and run state exclusively.
pub struct Viewport<S: RenderSurface> {
    position: Vec2,
    size: Vec2,
    scene: Rc<RefCell<Scene>>,
    surface: S,
    run: RunState,
    show_frame_rate: bool,
}

impl<S: RenderSurface> fmt::Debug for Viewport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("show_frame_rate", &self.show_frame_rate)
            .finish_non_exhaustive()
    }
}

impl<S: RenderSurface> Viewport<S> {
    /// Creates a viewport over `scene` rendering to `surface`.
    ///
    /// Fails with [`EngineError::InvalidConfiguration`] unless both world-size
    /// axes are positive and finite — the projection is undefined otherwise.
    pub fn new(scene: Rc<RefCell<Scene>>, surface: S, position: Vec2, size: Vec2) -> Result<Self> {
        validate_world_size(size)?;
        validate_world_position(position)?;
        Ok(Self {
            position,
            size,
            scene,
            surface,
            run: RunState::Inactive,
            show_frame_rate: false,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Enables the frame-rate overlay drawn at the surface's top-left corner.
    pub fn set_show_frame_rate(&mut self, show: bool) {
        self.show_frame_rate = show;
    }

    // ── coordinate transforms ─────────────────────────────────────────────

    /// The current frame transform as `(offset, scale)`: a world point `p`
    /// lands at `(p + offset) * scale` in surface pixels.
    pub fn frame_transform(&self) -> (Vec2, Vec2) {
        (-self.position, self.surface.dimensions() / self.size)
    }

    /// Surface-space point to world-space point.
    pub fn to_world(&self, surface_point: Vec2) -> Vec2 {
        self.position + surface_point / self.surface.dimensions() * self.size
    }

    /// Surface-space delta to world-space delta (no translation term).
    pub fn to_world_delta(&self, surface_delta: Vec2) -> Vec2 {
        surface_delta / self.surface.dimensions() * self.size
    }

    /// World-space point to surface-space point.
    pub fn to_surface(&self, world_point: Vec2) -> Vec2 {
        let (offset, scale) = self.frame_transform();
        (world_point + offset) * scale
    }

    // ── navigation ────────────────────────────────────────────────────────
    //
    // Every navigation call redraws immediately, independent of the running
    // loop's cadence, so feedback is visible even while the loop is stopped
    // or between ticks.

    pub fn set_position(&mut self, position: Vec2) -> Result<()> {
        validate_world_position(position)?;
        self.position = position;
        self.render()
    }

    pub fn move_by(&mut self, delta: Vec2) -> Result<()> {
        self.set_position(self.position + delta)
    }

    pub fn set_size(&mut self, size: Vec2) -> Result<()> {
        validate_world_size(size)?;
        self.size = size;
        self.render()
    }

    /// Scales the world size by a per-axis factor; use [`Vec2::splat`] for a
    /// uniform factor. Factors above `1.0` zoom out, below `1.0` zoom in.
    pub fn scale_by(&mut self, factor: Vec2) -> Result<()> {
        self.set_size(self.size * factor)
    }

    // ── render cycle ──────────────────────────────────────────────────────

    /// Renders one frame: queries the visible set, clears, draws each element
    /// in insertion order under the current frame transform, then commits.
    ///
    /// Element failures propagate; nothing is drawn past the first error.
    pub fn render(&mut self) -> Result<()> {
        let visible = self.scene.borrow().query(self.position, self.size);
        let (offset, scale) = self.frame_transform();

        self.surface.clear()?;
        for element in &visible {
            element.borrow().render(&mut self.surface, offset, scale)?;
        }

        if self.show_frame_rate {
            if let Some(rate) = self.frame_rate() {
                self.surface.draw_label(
                    &format!("{rate:.0} FPS"),
                    OVERLAY_ANCHOR,
                    OVERLAY_TEXT_SIZE,
                    OVERLAY_COLOR,
                )?;
            }
        }

        self.surface.commit()
    }

    // ── render loop ───────────────────────────────────────────────────────

    /// Enters the active run state targeting `target_rate` frames per second.
    ///
    /// Starting while already active is a stop-then-restart: timing state is
    /// discarded and the first tick of the new loop is due immediately. There
    /// is never a second layered loop.
    pub fn start(&mut self, target_rate: f32) -> Result<()> {
        if !target_rate.is_finite() || target_rate <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "target frame rate {target_rate} must be positive and finite"
            )));
        }
        self.stop();
        self.run = RunState::Active {
            pacer: FramePacer::new(target_rate),
            next_due: Instant::now(),
        };
        Ok(())
    }

    /// Leaves the active run state, discarding the pending deadline, the last
    /// tick timestamp, and the measured rate. No-op while inactive.
    pub fn stop(&mut self) {
        self.run = RunState::Inactive;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run, RunState::Active { .. })
    }

    /// Latest measured frame rate; `None` while inactive or before the
    /// second tick.
    pub fn frame_rate(&self) -> Option<f32> {
        match &self.run {
            RunState::Active { pacer, .. } => pacer.rate(),
            RunState::Inactive => None,
        }
    }

    /// Deadline of the next scheduled tick; `None` while inactive.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.run {
            RunState::Active { next_due, .. } => Some(*next_due),
            RunState::Inactive => None,
        }
    }

    /// Advances the render loop.
    ///
    /// A tick that arrives while inactive is a no-op — the host may have had
    /// one queued when `stop` was called. A tick before the scheduled
    /// deadline leaves state untouched and reports the same deadline. A due
    /// tick records timing, renders, and schedules the next tick after
    /// `period − render_cost` (floored at zero).
    ///
    /// A render failure stops the loop before propagating, so a broken state
    /// is never silently re-ticked.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Instant>> {
        match &mut self.run {
            RunState::Inactive => return Ok(None),
            RunState::Active { pacer, next_due } => {
                if now < *next_due {
                    return Ok(Some(*next_due));
                }
                pacer.begin_tick(now);
            }
        }

        if let Err(err) = self.render() {
            self.stop();
            return Err(err);
        }

        let render_cost = now.elapsed();
        match &mut self.run {
            RunState::Active { pacer, next_due } => {
                *next_due = pacer.next_deadline(now, render_cost);
                Ok(Some(*next_due))
            }
            RunState::Inactive => Ok(None),
        }
    }
}

fn validate_world_size(size: Vec2) -> Result<()> {
    if size.is_finite() && size.x > 0.0 && size.y > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidConfiguration(format!(
            "world size ({}, {}) must be positive on both axes",
            size.x, size.y
        )))
    }
}

fn validate_world_position(position: Vec2) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidConfiguration(format!(
            "world position ({}, {}) must be finite",
            position.x, position.y
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::scene::shapes::Block;
    use crate::surface::Stroke;

    /// Draw-call recorder standing in for a real surface.
    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Rect(Rect, Color),
        Circle(Vec2, f32),
        Polyline(usize),
        Label(String),
        Commit,
    }

    struct RecordingSurface {
        dims: Vec2,
        ops: Rc<RefCell<Vec<Op>>>,
    }

    impl RecordingSurface {
        fn new(width: f32, height: f32) -> (Self, Rc<RefCell<Vec<Op>>>) {
            let ops = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    dims: Vec2::new(width, height),
                    ops: ops.clone(),
                },
                ops,
            )
        }
    }

    impl RenderSurface for RecordingSurface {
        fn dimensions(&self) -> Vec2 {
            self.dims
        }

        fn clear(&mut self) -> Result<()> {
            self.ops.borrow_mut().push(Op::Clear);
            Ok(())
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
            self.ops.borrow_mut().push(Op::Rect(rect, color));
            Ok(())
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Color) -> Result<()> {
            self.ops.borrow_mut().push(Op::Circle(center, radius));
            Ok(())
        }

        fn stroke_polyline(&mut self, points: &[Vec2], _stroke: Stroke) -> Result<()> {
            self.ops.borrow_mut().push(Op::Polyline(points.len()));
            Ok(())
        }

        fn draw_label(&mut self, text: &str, _origin: Vec2, _size: f32, _color: Color) -> Result<()> {
            self.ops.borrow_mut().push(Op::Label(text.to_string()));
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            self.ops.borrow_mut().push(Op::Commit);
            Ok(())
        }
    }

    fn empty_scene() -> Rc<RefCell<Scene>> {
        Rc::new(RefCell::new(Scene::new()))
    }

    fn viewport_200(scene: Rc<RefCell<Scene>>) -> (Viewport<RecordingSurface>, Rc<RefCell<Vec<Op>>>) {
        let (surface, ops) = RecordingSurface::new(200.0, 200.0);
        let vp = Viewport::new(scene, surface, Vec2::zero(), Vec2::splat(200.0)).unwrap();
        (vp, ops)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn rejects_non_positive_world_size() {
        for size in [
            Vec2::new(0.0, 100.0),
            Vec2::new(100.0, -1.0),
            Vec2::new(f32::NAN, 100.0),
        ] {
            let (surface, _) = RecordingSurface::new(100.0, 100.0);
            let err = Viewport::new(empty_scene(), surface, Vec2::zero(), size).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        }
    }

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn transform_round_trip() {
        let (surface, _) = RecordingSurface::new(640.0, 480.0);
        let vp = Viewport::new(
            empty_scene(),
            surface,
            Vec2::new(-35.0, 120.0),
            Vec2::new(500.0, 250.0),
        )
        .unwrap();

        for p in [
            Vec2::zero(),
            Vec2::new(320.0, 240.0),
            Vec2::new(13.7, 599.2),
            Vec2::new(-50.0, 1000.0),
        ] {
            let there_and_back = vp.to_surface(vp.to_world(p));
            assert!((there_and_back.x - p.x).abs() < 1e-2, "{p:?}");
            assert!((there_and_back.y - p.y).abs() < 1e-2, "{p:?}");
        }
    }

    #[test]
    fn scale_is_independent_per_axis() {
        let (surface, _) = RecordingSurface::new(400.0, 100.0);
        let vp = Viewport::new(
            empty_scene(),
            surface,
            Vec2::zero(),
            Vec2::new(200.0, 200.0),
        )
        .unwrap();

        let (offset, scale) = vp.frame_transform();
        assert_eq!(offset, Vec2::zero());
        assert_eq!(scale, Vec2::new(2.0, 0.5));
    }

    #[test]
    fn world_delta_ignores_translation() {
        let (surface, _) = RecordingSurface::new(200.0, 200.0);
        let vp = Viewport::new(
            empty_scene(),
            surface,
            Vec2::new(1000.0, 1000.0),
            Vec2::splat(400.0),
        )
        .unwrap();

        let delta = vp.to_world_delta(Vec2::new(100.0, 50.0));
        assert_eq!(delta, Vec2::new(200.0, 100.0));
    }

    // ── navigation ────────────────────────────────────────────────────────

    #[test]
    fn move_is_exactly_invertible() {
        let (mut vp, _) = viewport_200(empty_scene());
        let delta = Vec2::new(12.5, -7.25);
        vp.move_by(delta).unwrap();
        vp.move_by(-delta).unwrap();
        assert_eq!(vp.position(), Vec2::zero());
    }

    #[test]
    fn navigation_triggers_immediate_render() {
        let (mut vp, ops) = viewport_200(empty_scene());
        vp.set_position(Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(*ops.borrow(), vec![Op::Clear, Op::Commit]);
    }

    #[test]
    fn scale_by_rejects_collapse_to_zero() {
        let (mut vp, _) = viewport_200(empty_scene());
        let err = vp.scale_by(Vec2::splat(0.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        // Size is untouched after the failed call.
        assert_eq!(vp.size(), Vec2::splat(200.0));
    }

    // ── render cycle ──────────────────────────────────────────────────────

    #[test]
    fn renders_visible_elements_in_order_with_unit_transform() {
        let scene = empty_scene();
        {
            let mut s = scene.borrow_mut();
            s.insert(Block::new(
                Vec2::new(0.0, 0.0),
                Vec2::splat(100.0),
                Color::from_srgb_u8(0xff, 0x00, 0x00, 0xff),
            ))
            .unwrap();
            s.insert(Block::new(
                Vec2::new(100.0, 100.0),
                Vec2::splat(100.0),
                Color::from_srgb_u8(0x00, 0xff, 0x00, 0xff),
            ))
            .unwrap();
            s.insert(Block::new(
                Vec2::new(800.0, 200.0),
                Vec2::splat(100.0),
                Color::from_srgb_u8(0x00, 0x00, 0xff, 0xff),
            ))
            .unwrap();
        }

        // 200x200 world region onto a 200x200 surface: offset zero, scale one.
        let (mut vp, ops) = viewport_200(scene);
        vp.render().unwrap();

        let ops = ops.borrow();
        assert_eq!(ops.len(), 4, "clear + two blocks + commit: {ops:?}");
        assert_eq!(ops[0], Op::Clear);
        assert_eq!(
            ops[1],
            Op::Rect(
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Color::from_srgb_u8(0xff, 0x00, 0x00, 0xff)
            )
        );
        assert_eq!(
            ops[2],
            Op::Rect(
                Rect::new(100.0, 100.0, 100.0, 100.0),
                Color::from_srgb_u8(0x00, 0xff, 0x00, 0xff)
            )
        );
        assert_eq!(ops[3], Op::Commit);
    }

    #[test]
    fn overlay_waits_for_a_measured_rate() {
        let (mut vp, ops) = viewport_200(empty_scene());
        vp.set_show_frame_rate(true);

        // No rate yet: no label.
        vp.render().unwrap();
        assert!(!ops.borrow().iter().any(|op| matches!(op, Op::Label(_))));

        vp.start(60.0).unwrap();
        let t0 = Instant::now();
        vp.tick(t0).unwrap();
        vp.tick(t0 + std::time::Duration::from_millis(20)).unwrap();
        assert!(ops.borrow().iter().any(|op| matches!(op, Op::Label(_))));
    }

    // ── run loop ──────────────────────────────────────────────────────────

    #[test]
    fn start_requires_positive_rate() {
        let (mut vp, _) = viewport_200(empty_scene());
        assert!(vp.start(0.0).is_err());
        assert!(vp.start(-30.0).is_err());
        assert!(!vp.is_running());
    }

    #[test]
    fn tick_renders_and_schedules_within_one_period() {
        let (mut vp, ops) = viewport_200(empty_scene());
        vp.start(50.0).unwrap();

        let now = Instant::now();
        let deadline = vp.tick(now).unwrap().unwrap();
        assert!(deadline >= now);
        assert!(deadline <= now + std::time::Duration::from_millis(20));
        assert_eq!(*ops.borrow(), vec![Op::Clear, Op::Commit]);
    }

    #[test]
    fn early_tick_does_not_render() {
        let (mut vp, ops) = viewport_200(empty_scene());
        vp.start(50.0).unwrap();

        let now = Instant::now();
        let deadline = vp.tick(now).unwrap().unwrap();
        let frames_before = ops.borrow().len();

        // Arriving before the deadline leaves everything untouched.
        let again = vp.tick(now).unwrap().unwrap();
        assert_eq!(again, deadline);
        assert_eq!(ops.borrow().len(), frames_before);
    }

    #[test]
    fn stop_prevents_further_ticks() {
        let (mut vp, ops) = viewport_200(empty_scene());
        vp.start(50.0).unwrap();
        vp.tick(Instant::now()).unwrap();
        vp.stop();

        assert!(!vp.is_running());
        assert!(vp.frame_rate().is_none());
        assert!(vp.next_deadline().is_none());

        // A tick already queued by the host when stop was called: no-op.
        let frames_before = ops.borrow().len();
        assert_eq!(vp.tick(Instant::now()).unwrap(), None);
        assert_eq!(ops.borrow().len(), frames_before);
    }

    #[test]
    fn stop_while_inactive_is_a_no_op() {
        let (mut vp, _) = viewport_200(empty_scene());
        vp.stop();
        assert!(!vp.is_running());
    }

    #[test]
    fn render_failure_stops_the_loop() {
        struct FailingElement;

        impl crate::scene::Renderable for FailingElement {
            fn bounding_box(&self) -> crate::coords::Bounds {
                crate::coords::Bounds::new(0.0, 0.0, 10.0, 10.0)
            }

            fn render(
                &self,
                _surface: &mut dyn RenderSurface,
                _offset: Vec2,
                _scale: Vec2,
            ) -> Result<()> {
                Err(EngineError::SurfaceAcquisition("boom".into()))
            }
        }

        let scene = empty_scene();
        scene.borrow_mut().insert(FailingElement).unwrap();

        let (mut vp, _) = viewport_200(scene);
        vp.start(50.0).unwrap();
        assert!(vp.tick(Instant::now()).is_err());
        assert!(!vp.is_running());
    }

    // ── multi-viewport independence ───────────────────────────────────────

    #[test]
    fn viewports_sharing_a_scene_stay_independent() {
        let scene = empty_scene();
        let (mut a, _) = viewport_200(scene.clone());
        let (mut b, _) = viewport_200(scene);

        a.move_by(Vec2::new(50.0, 0.0)).unwrap();
        a.scale_by(Vec2::splat(2.0)).unwrap();
        a.start(30.0).unwrap();

        assert_eq!(b.position(), Vec2::zero());
        assert_eq!(b.size(), Vec2::splat(200.0));
        assert!(!b.is_running());
        b.stop();
        assert!(a.is_running());
    }
}
