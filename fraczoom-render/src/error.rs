use thiserror::Error;

/// Errors originating from the session and frame pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid frame rate: {0} fps (must be within 5..=60)")]
    InvalidFrameRate(u32),

    #[error("invalid resolution scale: {0} (must be within 1.0..=8.0)")]
    InvalidResolutionScale(f64),

    #[error("invalid scroll sensitivity: {0} (must be > 0.0)")]
    InvalidScrollSensitivity(f64),

    #[error(transparent)]
    Core(#[from] fraczoom_core::CoreError),
}
