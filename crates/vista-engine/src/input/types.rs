use crate::coords::Vec2;

/// Pointer button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Keyboard key identifier.
///
/// Intentionally minimal: only the keys applications built on this engine
/// have asked for. The runtime maps platform keycodes into these variants
/// and uses `Key::Unknown(u32)` with a stable platform code otherwise.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Pointer coordinates are surface-space logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved over the surface.
    PointerMoved { at: Vec2 },

    /// Pointer button went down at `at`.
    PointerPressed { button: PointerButton, at: Vec2 },

    /// Pointer button came up at `at`.
    PointerReleased { button: PointerButton, at: Vec2 },

    /// Pointer left the surface entirely.
    PointerLeft,

    /// Wheel scrolled. Positive delta means scroll down / zoom out.
    Wheel { delta: f32 },

    /// Surface pixel dimensions changed.
    Resized { old: Vec2, new: Vec2 },

    /// A key was pressed (no auto-repeat).
    KeyPressed { key: Key },
}
