use thiserror::Error;

/// Errors originating from the core coordinate engine.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("cannot build a polynomial from an empty root list")]
    EmptyRoots,

    #[error("root index {0} out of range (Newton mode has 3 roots)")]
    RootIndexOutOfRange(usize),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },
}
