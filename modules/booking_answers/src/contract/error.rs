//! Contract error types for booking answers
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Booking answers domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingAnswersError {
    /// Scope is not one of option, instance, course, system
    #[error("Invalid scope: {scope}")]
    InvalidScope {
        /// Scope as supplied by the caller
        scope: String,
    },
    /// Encoded table token could not be decoded
    #[error("Malformed table token: {details}")]
    MalformedTableToken {
        /// Decoding failure details
        details: String,
    },
    /// Caller may not download this table
    #[error("Download not allowed for scope {scope} with status {status_param}")]
    DownloadNotAllowed {
        /// Scope of the table
        scope: String,
        /// Listed status
        status_param: i64,
    },
    /// Booking option does not exist
    #[error("Booking option not found: {option_id}")]
    OptionNotFound {
        /// Booking option identifier
        option_id: i64,
    },
    /// Internal error
    #[error("Internal error")]
    Internal,
}
