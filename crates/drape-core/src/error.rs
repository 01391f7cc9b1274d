/// Errors returned by fallible drape operations.
///
/// Focus and overlay degenerate cases (nothing focusable, no trigger to
/// return to) are not errors; they are handled by policy where they occur.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No element carries the requested `id` attribute.
    #[error("no element with id `{0}`")]
    ElementNotFound(String),
    /// The receiving end of a request channel was dropped.
    #[error("request channel closed")]
    RequestChannelClosed,
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
