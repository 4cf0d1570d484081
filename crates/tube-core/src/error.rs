use thiserror::Error;

#[derive(Debug, Error)]
pub enum TubeError {
    /// Invalid radius, side count, or other parameter.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Insufficient input: need at least {required} points, got {actual}")]
    InsufficientInput { required: usize, actual: usize },

    /// An external collaborator (path planner) failed or returned unusable output.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Geometry error: {0}")]
    Geometry(String),
}

impl TubeError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TubeError>;
