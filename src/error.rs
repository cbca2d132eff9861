//! Shared error conventions.

/// Stable machine-readable code attached to user-facing errors.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    /// Whether the same request may succeed if tried again.
    fn retryable(&self) -> bool {
        false
    }
}
