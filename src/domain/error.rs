// Error taxonomy for the wake cycle
use thiserror::Error;

/// Every failure mode the cycle distinguishes. Only `TimeUnavailable` is
/// fatal for a cycle; the rest degrade a single category and the renderer
/// works with whatever is left in memory.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("local time unavailable")]
    TimeUnavailable,

    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("payload decode failed: {0}")]
    DecodeFailed(String),

    #[error("stored record is {actual} bytes, expected {expected}")]
    StorageReadCorrupt { expected: usize, actual: usize },

    #[error("storage write failed")]
    StorageWriteFailed(#[from] std::io::Error),

    #[error("indoor sensor unavailable")]
    SensorUnavailable,
}
