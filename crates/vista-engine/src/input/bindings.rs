use crate::coords::Vec2;
use crate::error::Result;
use crate::surface::RenderSurface;
use crate::viewport::Viewport;

use super::types::InputEvent;

/// How far one wheel unit scales the viewport: factor = 1 + delta / 1000.
const WHEEL_SCALE_DIVISOR: f32 = 1000.0;

/// Pan/zoom gesture adapter for one viewport.
///
/// Owns all pointer state the gestures need — the drag anchor and the last
/// hovered position. One `NavBindings` per viewport: two viewports over the
/// same scene never share drag or hover state, and a gesture on one never
/// touches the other's position or size.
///
/// Only one pointer is tracked; a second concurrent pointer is not handled.
#[derive(Debug)]
pub struct NavBindings {
    /// Last recorded pointer position while a drag is in progress.
    drag: Option<Vec2>,
    /// Last known pointer position while the pointer is over the surface.
    hover: Option<Vec2>,
    pan_on_drag: bool,
    zoom_on_scroll: bool,
}

impl Default for NavBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl NavBindings {
    /// Bindings with both gestures enabled.
    pub fn new() -> Self {
        Self {
            drag: None,
            hover: None,
            pan_on_drag: true,
            zoom_on_scroll: true,
        }
    }

    pub fn set_pan_on_drag(&mut self, enabled: bool) {
        self.pan_on_drag = enabled;
        if !enabled {
            self.drag = None;
        }
    }

    pub fn set_zoom_on_scroll(&mut self, enabled: bool) {
        self.zoom_on_scroll = enabled;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Applies one input event, translating it into navigation calls on
    /// `viewport`. Events the gestures do not consume (keys) pass through
    /// untouched.
    pub fn apply<S: RenderSurface>(
        &mut self,
        viewport: &mut Viewport<S>,
        event: &InputEvent,
    ) -> Result<()> {
        match *event {
            InputEvent::PointerPressed { at, .. } => {
                self.hover = Some(at);
                if self.pan_on_drag {
                    self.drag = Some(at);
                }
                Ok(())
            }

            InputEvent::PointerReleased { .. } => {
                self.drag = None;
                Ok(())
            }

            InputEvent::PointerLeft => {
                self.drag = None;
                self.hover = None;
                Ok(())
            }

            InputEvent::PointerMoved { at } => {
                self.hover = Some(at);
                if let Some(last) = self.drag {
                    self.drag = Some(at);
                    // Content follows the pointer: pan by the inverse of the
                    // pointer's surface-space movement, mapped to world units.
                    let delta = viewport.to_world_delta(last - at);
                    viewport.move_by(delta)?;
                }
                Ok(())
            }

            InputEvent::Wheel { delta } => {
                if !self.zoom_on_scroll {
                    return Ok(());
                }
                let Some(hover) = self.hover else {
                    // Wheel without a hovered pointer has no anchor; ignore.
                    return Ok(());
                };
                // Keep the world point under the cursor fixed: measure it
                // before the rescale, again after, and pan by the drift.
                let before = viewport.to_world(hover);
                viewport.scale_by(Vec2::splat(1.0 + delta / WHEEL_SCALE_DIVISOR))?;
                let after = viewport.to_world(hover);
                viewport.move_by(before - after)
            }

            InputEvent::Resized { old, new } => {
                // Preserve world-units-per-pixel across the resize.
                if old.x > 0.0 && old.y > 0.0 {
                    let rescaled = viewport.size() * (new / old);
                    viewport.set_size(rescaled)?;
                }
                Ok(())
            }

            InputEvent::KeyPressed { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;
    use crate::scene::Scene;
    use crate::surface::Stroke;

    /// Surface that swallows every draw call.
    struct StubSurface {
        dims: Vec2,
    }

    impl RenderSurface for StubSurface {
        fn dimensions(&self) -> Vec2 {
            self.dims
        }
        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
        fn fill_rect(&mut self, _rect: Rect, _color: Color) -> Result<()> {
            Ok(())
        }
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) -> Result<()> {
            Ok(())
        }
        fn stroke_polyline(&mut self, _points: &[Vec2], _stroke: Stroke) -> Result<()> {
            Ok(())
        }
        fn draw_label(&mut self, _text: &str, _origin: Vec2, _size: f32, _color: Color) -> Result<()> {
            Ok(())
        }
        fn commit(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn viewport() -> Viewport<StubSurface> {
        let scene = Rc::new(RefCell::new(Scene::new()));
        let surface = StubSurface {
            dims: Vec2::splat(200.0),
        };
        Viewport::new(scene, surface, Vec2::zero(), Vec2::splat(200.0)).unwrap()
    }

    fn press(at: Vec2) -> InputEvent {
        InputEvent::PointerPressed {
            button: crate::input::PointerButton::Left,
            at,
        }
    }

    fn release(at: Vec2) -> InputEvent {
        InputEvent::PointerReleased {
            button: crate::input::PointerButton::Left,
            at,
        }
    }

    // ── drag-to-pan ───────────────────────────────────────────────────────

    #[test]
    fn drag_pans_against_pointer_motion() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &press(Vec2::new(100.0, 100.0))).unwrap();
        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::new(110.0, 95.0) })
            .unwrap();

        // Pointer moved (+10, -5); the world window moves the opposite way.
        assert_eq!(vp.position(), Vec2::new(-10.0, 5.0));
    }

    #[test]
    fn drag_accumulates_across_moves() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &press(Vec2::new(50.0, 50.0))).unwrap();
        for x in [60.0, 70.0, 80.0] {
            nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::new(x, 50.0) })
                .unwrap();
        }
        assert_eq!(vp.position(), Vec2::new(-30.0, 0.0));
    }

    #[test]
    fn motion_without_press_does_not_pan() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::new(150.0, 150.0) })
            .unwrap();
        assert_eq!(vp.position(), Vec2::zero());
        assert!(!nav.is_dragging());
    }

    #[test]
    fn release_ends_the_drag() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &press(Vec2::new(100.0, 100.0))).unwrap();
        nav.apply(&mut vp, &release(Vec2::new(100.0, 100.0))).unwrap();
        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::new(120.0, 100.0) })
            .unwrap();
        assert_eq!(vp.position(), Vec2::zero());
    }

    #[test]
    fn pointer_leave_ends_the_drag() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &press(Vec2::new(100.0, 100.0))).unwrap();
        nav.apply(&mut vp, &InputEvent::PointerLeft).unwrap();
        assert!(!nav.is_dragging());
    }

    #[test]
    fn pan_can_be_disabled() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();
        nav.set_pan_on_drag(false);

        nav.apply(&mut vp, &press(Vec2::new(100.0, 100.0))).unwrap();
        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::new(150.0, 100.0) })
            .unwrap();
        assert_eq!(vp.position(), Vec2::zero());
    }

    // ── zoom-at-cursor ────────────────────────────────────────────────────

    #[test]
    fn wheel_scales_the_world_size() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::new(100.0, 100.0) })
            .unwrap();
        nav.apply(&mut vp, &InputEvent::Wheel { delta: 500.0 }).unwrap();

        // factor 1.5: zooming out grows the visible world region.
        assert_eq!(vp.size(), Vec2::splat(300.0));
    }

    #[test]
    fn zoom_keeps_the_hovered_world_point_fixed() {
        let hover = Vec2::new(37.0, 141.0);

        for delta in [-500.0_f32, 0.0, 500.0, 1000.0] {
            let mut vp = viewport();
            let mut nav = NavBindings::new();

            vp.set_position(Vec2::new(12.0, -40.0)).unwrap();
            nav.apply(&mut vp, &InputEvent::PointerMoved { at: hover }).unwrap();

            let before = vp.to_world(hover);
            nav.apply(&mut vp, &InputEvent::Wheel { delta }).unwrap();
            let after = vp.to_world(hover);

            assert!(
                (before.x - after.x).abs() < 1e-2 && (before.y - after.y).abs() < 1e-2,
                "delta {delta}: {before:?} vs {after:?}"
            );
        }
    }

    #[test]
    fn wheel_without_hover_is_ignored() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &InputEvent::Wheel { delta: 500.0 }).unwrap();
        assert_eq!(vp.size(), Vec2::splat(200.0));

        // Hover, then leave: still ignored.
        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::splat(10.0) })
            .unwrap();
        nav.apply(&mut vp, &InputEvent::PointerLeft).unwrap();
        nav.apply(&mut vp, &InputEvent::Wheel { delta: 500.0 }).unwrap();
        assert_eq!(vp.size(), Vec2::splat(200.0));
    }

    #[test]
    fn zoom_can_be_disabled() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();
        nav.set_zoom_on_scroll(false);

        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::splat(100.0) })
            .unwrap();
        nav.apply(&mut vp, &InputEvent::Wheel { delta: 500.0 }).unwrap();
        assert_eq!(vp.size(), Vec2::splat(200.0));
    }

    #[test]
    fn full_zoom_out_in_one_notch_fails_loudly() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(&mut vp, &InputEvent::PointerMoved { at: Vec2::splat(100.0) })
            .unwrap();
        // delta -1000 gives factor 0: the collapse is rejected, not masked.
        let err = nav
            .apply(&mut vp, &InputEvent::Wheel { delta: -1000.0 })
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::EngineError::InvalidConfiguration(_)
        ));
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_preserves_world_units_per_pixel() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(
            &mut vp,
            &InputEvent::Resized {
                old: Vec2::new(200.0, 200.0),
                new: Vec2::new(400.0, 100.0),
            },
        )
        .unwrap();
        assert_eq!(vp.size(), Vec2::new(400.0, 100.0));
    }

    #[test]
    fn resize_from_zero_dimensions_is_ignored() {
        let mut vp = viewport();
        let mut nav = NavBindings::new();

        nav.apply(
            &mut vp,
            &InputEvent::Resized {
                old: Vec2::zero(),
                new: Vec2::new(400.0, 100.0),
            },
        )
        .unwrap();
        assert_eq!(vp.size(), Vec2::splat(200.0));
    }

    // ── independence ──────────────────────────────────────────────────────

    #[test]
    fn gesture_state_is_private_per_viewport() {
        let scene = Rc::new(RefCell::new(Scene::new()));
        let mut vp_a = Viewport::new(
            scene.clone(),
            StubSurface { dims: Vec2::splat(200.0) },
            Vec2::zero(),
            Vec2::splat(200.0),
        )
        .unwrap();
        let mut vp_b = Viewport::new(
            scene,
            StubSurface { dims: Vec2::splat(200.0) },
            Vec2::zero(),
            Vec2::splat(200.0),
        )
        .unwrap();

        let mut nav_a = NavBindings::new();
        let mut nav_b = NavBindings::new();

        // A drags and zooms; B sees none of it.
        nav_a.apply(&mut vp_a, &press(Vec2::splat(100.0))).unwrap();
        nav_a
            .apply(&mut vp_a, &InputEvent::PointerMoved { at: Vec2::splat(150.0) })
            .unwrap();
        nav_a.apply(&mut vp_a, &InputEvent::Wheel { delta: 500.0 }).unwrap();

        assert!(nav_a.is_dragging());
        assert!(!nav_b.is_dragging());
        assert_eq!(vp_b.position(), Vec2::zero());
        assert_eq!(vp_b.size(), Vec2::splat(200.0));

        // B's own wheel is still anchored to B's hover state only.
        nav_b
            .apply(&mut vp_b, &InputEvent::Wheel { delta: 500.0 })
            .unwrap();
        assert_eq!(vp_b.size(), Vec2::splat(200.0));
    }
}
