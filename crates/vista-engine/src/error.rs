use std::fmt;

/// Errors surfaced by the engine core.
///
/// All of these are synchronous and reported to the direct caller; the engine
/// never substitutes default behavior for a failed operation. A spatial query
/// with no matches is an empty result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A scene element reported geometry that cannot participate in spatial
    /// queries (non-finite or inverted bounding box).
    InvalidElement(String),

    /// A viewport was asked to adopt an unusable configuration, such as a
    /// non-positive world size or target frame rate.
    InvalidConfiguration(String),

    /// The render target could not provide a drawable frame.
    SurfaceAcquisition(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidElement(msg) => write!(f, "invalid scene element: {msg}"),
            EngineError::InvalidConfiguration(msg) => {
                write!(f, "invalid viewport configuration: {msg}")
            }
            EngineError::SurfaceAcquisition(msg) => {
                write!(f, "failed to acquire render surface: {msg}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
