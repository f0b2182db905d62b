/// Convenience result alias used across the crate.
pub type EngraveResult<T> = Result<T, EngraveError>;

/// Crate-wide error type.
///
/// Nothing on the per-frame path returns these; they surface from construction (viewport
/// validation), asset decoding and content loading, where callers pick a fallback.
#[derive(thiserror::Error, Debug)]
pub enum EngraveError {
    /// Invalid input such as a zero-sized viewport or a malformed color.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterization failed (surface limits, allocation).
    #[error("render error: {0}")]
    Render(String),

    /// Tool content could not be produced.
    #[error("content error: {0}")]
    Content(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngraveError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }
}
