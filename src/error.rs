//! Error types shared by every storage backend.
//!
//! [`BenchError`] is the central error type for the harness. Lookups that
//! find nothing are not errors: `get_event` returns `None` and a backend
//! without a secondary index returns an empty list. Everything else a
//! driver reports is mapped into one of the variants below and propagated
//! to the caller unchanged.

/// Harness error enum with stable numeric codes.
///
/// # Error Code Ranges
///
/// | Range     | Category      |
/// |-----------|---------------|
/// | 1000–1999 | Configuration |
/// | 2000–2999 | Data          |
/// | 3000–3999 | Backend       |
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The storage medium could not be reached, or the backend was closed.
    #[error("connectivity failure: {0}")]
    Connectivity(String),

    /// An insert collided with an existing primary key, or its key is not
    /// the event's own id.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other failure reported by the underlying driver.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration or generator parameters are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BenchError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidConfig(_) => 1001,
            Self::Serialization(_) => 2001,
            Self::ConstraintViolation(_) => 2002,
            Self::Connectivity(_) => 3001,
            Self::Backend(_) => 3002,
        }
    }

    /// Returns `true` if the error means the medium is unreachable.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}
