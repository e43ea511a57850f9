use crate::input::Key;
use crate::scene::Scene;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by client code.
///
/// The runtime owns the scene and the viewport; the app seeds the scene once
/// at startup and advances its own state between frames. Elements stay
/// mutable through the handles `Scene::insert` returns, so per-frame updates
/// go through those rather than back through the scene.
pub trait App {
    /// Populates the scene once, before the first frame.
    fn build(&mut self, scene: &mut Scene) -> anyhow::Result<()>;

    /// Advances application state; `dt` is seconds since the previous frame.
    fn update(&mut self, dt: f32) -> AppControl {
        let _ = dt;
        AppControl::Continue
    }

    /// Handles a pressed key (no auto-repeat).
    fn key_pressed(&mut self, key: Key) -> AppControl {
        let _ = key;
        AppControl::Continue
    }
}
