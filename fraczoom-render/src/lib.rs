pub mod error;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod shader_params;

pub use error::RenderError;
pub use scheduler::{RenderScheduler, SchedulerState};
pub use session::{FrameSink, InputEvent, Session};
pub use settings::SessionSettings;
pub use shader_params::{
    FrameUniforms, NewtonUniforms, ShaderParameters, FLAG_JULIA_MODE, FLAG_ROOT_COLOURING,
    FLAG_USE_DOUBLE_PRECISION,
};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
