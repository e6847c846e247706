use std::fmt;

/// Errors reported by the canvas facade.
///
/// Sequencing errors (`NotInitialized`, `AlreadyInitialized`, `ShutDown`) are
/// fatal to the call but leave state unchanged. `UnsupportedTarget` and
/// `UnsupportedPolygonFill` report missing functionality without aborting the
/// frame. `Backend` wraps a collaborator failure; after a failed frame
/// submission the context is shut down rather than resumed.
#[derive(Debug)]
pub enum CanvasError {
    /// An operation arrived before `set_mode`.
    NotInitialized,
    /// `set_mode` was called on an already-initialized context.
    AlreadyInitialized,
    /// An operation arrived after `quit` (or after a fatal backend failure).
    ShutDown,
    /// The draw targeted a surface other than the active screen.
    UnsupportedTarget,
    /// Filled polygons are not implemented; only outlines are supported.
    UnsupportedPolygonFill,
    /// The window or renderer collaborator failed.
    Backend(anyhow::Error),
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::NotInitialized => {
                write!(f, "display mode has not been set; call set_mode first")
            }
            CanvasError::AlreadyInitialized => {
                write!(f, "set_mode was already called for this context")
            }
            CanvasError::ShutDown => write!(f, "render context has been shut down"),
            CanvasError::UnsupportedTarget => {
                write!(f, "drawing to a non-active surface is unsupported")
            }
            CanvasError::UnsupportedPolygonFill => {
                write!(f, "filled polygons are unsupported; pass a positive stroke width")
            }
            CanvasError::Backend(e) => write!(f, "backend failure: {e:#}"),
        }
    }
}

impl std::error::Error for CanvasError {}

impl From<anyhow::Error> for CanvasError {
    fn from(e: anyhow::Error) -> Self {
        CanvasError::Backend(e)
    }
}
