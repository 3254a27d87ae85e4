//! Error types for sitenav.
//!
//! Library crates use [`SitenavError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Navigation chrome must never break a page render, so the server-side
//! actions do not hand errors back as plain `Err(SitenavError)`. They return
//! `Result<T, Degraded<T>>`, where the error side still carries a safe value
//! the caller can fall back to.

use std::path::PathBuf;

/// Top-level error type for all sitenav operations.
#[derive(Debug, thiserror::Error)]
pub enum SitenavError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network, HTTP status, or GraphQL-level failure from the content graph.
    #[error("transport error: {0}")]
    Transport(String),

    /// The content graph answered, but not in the shape we expected.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid input (bad locale tag, bad endpoint URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A required piece of UI state is absent at the call site.
    #[error("precondition violated: {message}")]
    Precondition { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SitenavError>;

impl SitenavError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a precondition error from any displayable message.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from talking to the content graph.
    ///
    /// Decode failures count: there is no schema validation layer, so a
    /// malformed response is just another way the query failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode { .. })
    }
}

// ---------------------------------------------------------------------------
// Degraded
// ---------------------------------------------------------------------------

/// A failed fail-soft operation: the captured cause plus the safe default the
/// caller should render instead.
#[derive(Debug)]
pub struct Degraded<T> {
    /// Safe value to use in place of the real result.
    pub fallback: T,
    /// Why the real result could not be produced.
    pub error: SitenavError,
}

impl<T> Degraded<T> {
    pub fn new(fallback: T, error: SitenavError) -> Self {
        Self { fallback, error }
    }

    /// Log the captured cause and yield the fallback value.
    pub fn into_fallback(self) -> T {
        tracing::warn!(error = %self.error, "using degraded fallback");
        self.fallback
    }
}

impl<T> std::fmt::Display for Degraded<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "degraded: {}", self.error)
    }
}

impl<T: std::fmt::Debug> std::error::Error for Degraded<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Return type of fail-soft boundaries: the value, or a degraded stand-in.
pub type FailSoft<T> = std::result::Result<T, Degraded<T>>;

/// Collapse a fail-soft result into its value, falling back when degraded.
pub trait OrFallback<T> {
    fn or_fallback(self) -> T;
}

impl<T> OrFallback<T> for FailSoft<T> {
    fn or_fallback(self) -> T {
        match self {
            Ok(value) => value,
            Err(degraded) => degraded.into_fallback(),
        }
    }
}
