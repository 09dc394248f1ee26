use thiserror::Error;

/// Failures while reading calendar input.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("malformed event list: {0}")]
    MalformedEvents(#[from] serde_json::Error),
}

/// Why the visualization panel could not obtain a rendering surface.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no graphics adapter available")]
    NoAdapter,
    #[error("surface creation failed: {0}")]
    Surface(String),
    #[error("device request failed: {0}")]
    Device(String),
}
