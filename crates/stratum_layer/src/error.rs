// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache layer callbacks.

/// An error raised by a cache layer collaborator.
///
/// This is an opaque error type that wraps whatever went wrong in a local cache, a
/// source or a resolver. The invoker never inspects it; it is returned to the caller
/// as is. Use [`std::error::Error::source()`] to access the underlying cause.
///
/// # Example
///
/// ```
/// use stratum_layer::Error;
///
/// let error = Error::from_message("disk unavailable");
/// assert!(error.to_string().contains("disk unavailable"));
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_layer::Error;
    ///
    /// let io = std::io::Error::other("permission denied");
    /// let error = Error::from_message(io);
    /// ```
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// A specialized [`Result`] type for cache layer callbacks.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_debug_contains_cause_message() {
        let error = Error::from_message("local store unreachable");
        let debug_str = format!("{error:?}");
        assert!(
            debug_str.contains("local store unreachable"),
            "debug output should contain the cause message, got: {debug_str}"
        );
    }

    #[test]
    fn error_display_contains_cause_message() {
        let error = Error::from_message(std::io::Error::other("source timed out"));
        let display_str = format!("{error}");
        assert!(
            display_str.contains("source timed out"),
            "display output should contain the cause message, got: {display_str}"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Error>();
    }
}
