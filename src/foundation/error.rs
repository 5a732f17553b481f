/// Convenience result type used across gifloom.
pub type GifloomResult<T> = Result<T, GifloomError>;

/// Top-level error taxonomy used by pipeline entry points.
///
/// Every variant is fatal to the operation that produced it; nothing in the pipeline retries.
#[derive(thiserror::Error, Debug)]
pub enum GifloomError {
    /// A raster surface (or its pixel buffer) could not be acquired.
    #[error("surface error: {0}")]
    Surface(String),

    /// Invalid caller-provided input (empty lists, bad options, malformed frames).
    #[error("input error: {0}")]
    Input(String),

    /// A GIF or still image failed to load or decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// Writing GIF, still-image or archive bytes failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifloomError {
    /// Build a [`GifloomError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`GifloomError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`GifloomError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GifloomError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
