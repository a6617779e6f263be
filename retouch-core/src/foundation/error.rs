/// Convenience result type used across the crate.
pub type RetouchResult<T> = Result<T, RetouchError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum RetouchError {
    /// Caller-supplied data outside its allowed domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal invariant broken while rendering (buffer shape, dimension drift).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// No presentation surface available at draw or export time.
    #[error("surface error: {0}")]
    Surface(String),

    /// Decode or encode failure reported by the image codec.
    #[error("codec error: {0}")]
    Codec(String),

    /// Errors when serializing or deserializing adjustment data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetouchError {
    /// Build a [`RetouchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RetouchError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`RetouchError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`RetouchError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`RetouchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
