use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{
    ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, StartCause, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::coords::Vec2;
use crate::device::{Gpu, GpuInit};
use crate::input::{InputEvent, Key, NavBindings, PointerButton};
use crate::paint::Color;
use crate::render::GpuCanvas;
use crate::scene::Scene;
use crate::surface::RenderSurface;
use crate::viewport::Viewport;

use super::app::{App, AppControl};

/// Signed zoom-delta units per wheel line (positive = scroll down = zoom out).
const WHEEL_LINE_DELTA: f32 = 100.0;

/// Runtime configuration for the hosted window + viewport.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// World-space position of the viewport's top-left corner at startup.
    pub world_position: Vec2,

    /// World units per surface pixel at startup; the initial world size is
    /// the window's logical size times this.
    pub world_scale: f32,

    /// Target rate for the self-paced render loop. `None` renders only on
    /// navigation and host redraw requests.
    pub target_frame_rate: Option<f32>,

    pub show_frame_rate: bool,
    pub pan_on_drag: bool,
    pub zoom_on_scroll: bool,
    pub clear_color: Color,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "vista".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            world_position: Vec2::zero(),
            world_scale: 1.0,
            target_frame_rate: Some(60.0),
            show_frame_rate: false,
            pan_on_drag: true,
            zoom_on_scroll: true,
            clear_color: Color::WHITE,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, seeds the app's scene, and runs the event loop to
    /// completion. A render failure stops the loop and is returned here.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        anyhow::ensure!(
            config.world_scale.is_finite() && config.world_scale > 0.0,
            "world_scale must be positive"
        );

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    viewport: Viewport<GpuCanvas<'this>>,
}

struct HostState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    app: A,
    scene: Rc<RefCell<Scene>>,
    scene_built: bool,

    entry: Option<WindowEntry>,
    window_id: Option<WindowId>,
    nav: NavBindings,

    /// Last known pointer position in logical pixels, for button events.
    pointer: Vec2,

    last_update: Option<Instant>,
    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> HostState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        let mut nav = NavBindings::new();
        nav.set_pan_on_drag(config.pan_on_drag);
        nav.set_zoom_on_scroll(config.zoom_on_scroll);

        Self {
            config,
            app,
            scene: Rc::new(RefCell::new(Scene::new())),
            scene_built: false,
            entry: None,
            window_id: None,
            nav,
            pointer: Vec2::zero(),
            last_update: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        if !self.scene_built {
            self.app
                .build(&mut self.scene.borrow_mut())
                .context("app scene setup failed")?;
            self.scene_built = true;
        }

        let scene = self.scene.clone();
        let scale_factor = window.scale_factor() as f32;
        let clear_color = self.config.clear_color;
        let world_position = self.config.world_position;
        let world_scale = self.config.world_scale;
        let show_frame_rate = self.config.show_frame_rate;
        let font_bytes = if show_frame_rate { load_label_font() } else { None };

        let mut entry = WindowEntryBuilder {
            window,
            viewport_builder: |window| {
                let gpu = pollster::block_on(Gpu::new(window, GpuInit::default()))
                    .expect("GPU initialization failed for window");
                let canvas = GpuCanvas::new(gpu, scale_factor, clear_color, font_bytes);
                let world_size = canvas.dimensions() * world_scale;
                let mut viewport = Viewport::new(scene, canvas, world_position, world_size)
                    .expect("viewport rejected startup configuration");
                viewport.set_show_frame_rate(show_frame_rate);
                viewport
            },
        }
        .build();

        let target_frame_rate = self.config.target_frame_rate;
        entry
            .with_viewport_mut(|viewport| -> crate::error::Result<()> {
                if let Some(rate) = target_frame_rate {
                    viewport.start(rate)?;
                }
                viewport.render()
            })
            .context("initial render failed")?;

        self.window_id = Some(entry.with_window(|w| w.id()));
        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    fn fail(&mut self, err: anyhow::Error) {
        log::error!("runtime failure: {err:#}");
        self.failure = Some(err);
        self.exit_requested = true;
    }

    /// Runs one frame: app update, then either a paced tick or an on-demand
    /// render.
    fn drive_frame(&mut self) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_update
            .map(|t| now.saturating_duration_since(t).as_secs_f32())
            .unwrap_or(0.0);
        self.last_update = Some(now);

        if self.app.update(dt) == AppControl::Exit {
            self.exit_requested = true;
            return;
        }

        // Nothing to project onto while minimized.
        let minimized = entry.with_viewport(|viewport| {
            let dims = viewport.surface().dimensions();
            dims.x <= 0.0 || dims.y <= 0.0
        });
        if minimized {
            return;
        }

        let result = entry.with_viewport_mut(|viewport| {
            if viewport.is_running() {
                viewport.tick(now).map(|_| ())
            } else {
                viewport.render()
            }
        });

        if let Err(err) = result {
            self.fail(anyhow::Error::from(err).context("frame render failed"));
        }
    }

    /// Routes an engine input event through the gesture bindings.
    fn apply_input(&mut self, event: InputEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let nav = &mut self.nav;
        let result = entry.with_viewport_mut(|viewport| nav.apply(viewport, &event));
        if let Err(err) = result {
            self.fail(anyhow::Error::from(err).context("input handling failed"));
        }
    }

    /// Converts a physical cursor position into logical surface pixels.
    fn to_surface_point(&self, x: f64, y: f64) -> Vec2 {
        let scale = self
            .entry
            .as_ref()
            .map(|entry| entry.with_viewport(|viewport| viewport.surface().scale_factor()))
            .unwrap_or(1.0);
        Vec2::new(x as f32 / scale, y as f32 / scale)
    }
}

impl<A> ApplicationHandler for HostState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(err) = self.create_entry(event_loop) {
            self.fail(err.context("failed to create initial window"));
            event_loop.exit();
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // A scheduled tick deadline fired; ask for a redraw to run it.
        if let StartCause::ResumeTimeReached { .. } = cause {
            if let Some(entry) = self.entry.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Sleep until the viewport's next scheduled tick, or indefinitely
        // when no loop is running.
        let deadline = self
            .entry
            .as_ref()
            .and_then(|entry| entry.with_viewport(|viewport| viewport.next_deadline()));

        match deadline {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    let nav = &mut self.nav;
                    let result = entry.with_viewport_mut(|viewport| {
                        let old = viewport.surface().dimensions();
                        viewport.surface_mut().resize(new_size);
                        let new = viewport.surface().dimensions();
                        if new.x > 0.0 && new.y > 0.0 {
                            nav.apply(viewport, &InputEvent::Resized { old, new })
                        } else {
                            Ok(())
                        }
                    });
                    if let Err(err) = result {
                        self.fail(anyhow::Error::from(err).context("resize handling failed"));
                    }
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_mut(|fields| {
                        fields
                            .viewport
                            .surface_mut()
                            .set_scale_factor(scale_factor as f32);
                        let size = fields.window.inner_size();
                        fields.viewport.surface_mut().resize(size);
                        fields.window.request_redraw();
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let at = self.to_surface_point(position.x, position.y);
                self.pointer = at;
                self.apply_input(InputEvent::PointerMoved { at });
            }

            WindowEvent::CursorLeft { .. } => {
                self.apply_input(InputEvent::PointerLeft);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(button);
                let at = self.pointer;
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerPressed { button, at },
                    ElementState::Released => InputEvent::PointerReleased { button, at },
                };
                self.apply_input(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    // winit reports scroll-down as negative; the zoom contract
                    // wants scroll-down positive (zoom out).
                    MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_DELTA,
                    MouseScrollDelta::PixelDelta(pos) => -self.to_surface_point(pos.x, pos.y).y,
                };
                self.apply_input(InputEvent::Wheel { delta });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    let key = map_key(event.physical_key);
                    if self.app.key_pressed(key) == AppControl::Exit {
                        self.exit_requested = true;
                        event_loop.exit();
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.drive_frame();
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

fn map_mouse_button(button: WinitMouseButton) -> PointerButton {
    match button {
        WinitMouseButton::Left => PointerButton::Left,
        WinitMouseButton::Right => PointerButton::Right,
        WinitMouseButton::Middle => PointerButton::Middle,
        WinitMouseButton::Back => PointerButton::Other(3),
        WinitMouseButton::Forward => PointerButton::Other(4),
        WinitMouseButton::Other(v) => PointerButton::Other(v),
    }
}

fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Space => Key::Space,
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            other => Key::Unknown(other as u32),
        },
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

/// Probes common system font paths for the frame-rate label.
///
/// Returns `None` when no font is found; the overlay is then disabled.
fn load_label_font() -> Option<Vec<u8>> {
    let candidates = [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    let found = candidates.iter().find_map(|path| std::fs::read(path).ok());
    if found.is_none() {
        log::warn!("no label font found; frame-rate overlay disabled");
    }
    found
}
