use thiserror::Error;

/// Errors raised synchronously to callers. Degraded layouts are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid container dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("root member '{0}' not found")]
    RootNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl LayoutError {
    /// Stable machine-readable name, used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::InvalidDimensions { .. } => "invalid_dimensions",
            LayoutError::RootNotFound(_) => "root_not_found",
            LayoutError::InvalidInput(_) => "invalid_input",
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::InvalidInput(e.to_string())
    }
}
