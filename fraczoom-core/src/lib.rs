pub mod camera;
pub mod complex;
pub mod double_float;
pub mod error;
pub mod polynomial;
pub mod viewport;

// Re-export primary types for convenience.
pub use camera::{Camera, FractalKind, NewtonColouring, PanDirection, MAX_ZOOM_LOG2};
pub use complex::Complex;
pub use double_float::{DoubleFloat, DoubleFloat2};
pub use error::CoreError;
pub use polynomial::Polynomial;
pub use viewport::{Rect, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
