use std::sync::Arc;

/// Represents a result type for operations in this crate.
///
/// This `Result` type is a standard Rust `Result` type where the error variant is defined by the
/// crate-specific [`Error`] enum.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors produced by the wrapper.
///
/// Failures inside the underlying flag client are not represented here: the wrapper neither
/// retries nor reinterprets them, and whatever the embedder's initializer reports is propagated
/// as-is.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The underlying flag client failed to initialize.
    #[error("failed to initialize flag client")]
    // Initializer errors are arbitrary, so we're wrapping them in an Arc to keep `Error` clonable.
    Initialization(#[source] Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// The wrapper was reset before the ready signal fired, so a pending operation can never
    /// complete.
    #[error("flag client closed before signaling ready")]
    Closed,
}

impl Error {
    /// Wrap an initializer failure.
    pub fn initialization(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::Initialization(Arc::new(err))
    }
}
