use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("invalid scope configuration: {0}")]
    InvalidConfig(String),
    #[error("not enough samples buffered: requested {requested}, available {available}")]
    InsufficientData { requested: usize, available: usize },
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("sample rate mismatch: expected {expected}, got {actual}")]
    SampleRateMismatch { expected: f64, actual: f64 },
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },
    #[error("ragged channels: expected {expected} samples per channel, got {actual}")]
    ChannelLength { expected: usize, actual: usize },
    #[error("buffer keeps {capacity} samples per channel, {requested} requested")]
    HistoryTooShort { requested: usize, capacity: usize },
    #[error("buffer not initialized yet; feed at least one batch first")]
    BufferUninitialized,
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("settings store error: {0}")]
    Settings(String),
}
impl ScopeError {
    /// Soft failures that clear up on a later tick (buffer still filling).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScopeError::InsufficientData { .. } | ScopeError::BufferUninitialized
        )
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Plot(value.to_string())
    }
}
impl From<std::io::Error> for ScopeError {
    fn from(value: std::io::Error) -> Self {
        ScopeError::Settings(value.to_string())
    }
}
impl From<serde_json::Error> for ScopeError {
    fn from(value: serde_json::Error) -> Self {
        ScopeError::Settings(value.to_string())
    }
}
