//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps the category to
//! a status code and serialises the reason/message pair as the response
//! envelope; nothing in here knows about HTTP.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Failure category used by inbound adapters to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Credentials were rejected.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request could not complete in the allotted time.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain or an adapter.
    InternalError,
}

/// Machine-readable reason code reported to clients.
///
/// The wire form is the SCREAMING_SNAKE_CASE variant name, e.g.
/// `"BODY_DECODE_FAILED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    /// The request body could not be read or is not valid JSON.
    BodyDecodeFailed,
    /// A route path parameter was absent or empty.
    PathParameterNotPresent,
    /// A path parameter could not be decoded into the expected format.
    PathParameterMalformed,
    /// No resource matched the lookup, or credentials were rejected.
    NoMatchingResource,
    /// The account store refused the insert.
    AccountNotCreated,
    /// The body parsed as JSON but does not carry the required fields.
    InvalidJsonBody,
    /// Catch-all for internal and deadline failures.
    ProcessingRequestFailed,
}

impl ErrorReason {
    /// Wire representation of the reason.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BodyDecodeFailed => "BODY_DECODE_FAILED",
            Self::PathParameterNotPresent => "PATH_PARAMETER_NOT_PRESENT",
            Self::PathParameterMalformed => "PATH_PARAMETER_MALFORMED",
            Self::NoMatchingResource => "NO_MATCHING_RESOURCE",
            Self::AccountNotCreated => "ACCOUNT_NOT_CREATED",
            Self::InvalidJsonBody => "INVALID_JSON_BODY",
            Self::ProcessingRequestFailed => "PROCESSING_REQUEST_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error: a category plus the (reason, message) descriptor shown to
/// clients.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use idp::domain::{Error, ErrorCode, ErrorReason};
///
/// let err = Error::not_found(ErrorReason::NoMatchingResource, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.reason(), ErrorReason::NoMatchingResource);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    reason: ErrorReason,
    message: String,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

const FALLBACK_MESSAGE: &str = "Internal server error";

impl Error {
    /// Create a new error. Blank messages are replaced by a generic one so
    /// constructing an error never fails.
    pub fn new(code: ErrorCode, reason: ErrorReason, message: impl Into<String>) -> Self {
        match Self::try_new(code, reason, message) {
            Ok(value) => value,
            Err(_) => Self {
                code,
                reason,
                message: FALLBACK_MESSAGE.to_owned(),
            },
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        reason: ErrorReason,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            reason,
            message,
        })
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Machine-readable reason code.
    pub fn reason(&self) -> ErrorReason {
        self.reason
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(reason: ErrorReason, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, reason, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(reason: ErrorReason, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, reason, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(reason: ErrorReason, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, reason, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(reason: ErrorReason, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, reason, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`] with the
    /// generic processing reason.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalError,
            ErrorReason::ProcessingRequestFailed,
            message,
        )
    }

    /// Internal error with an explicit reason.
    pub fn internal_with(reason: ErrorReason, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, reason, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorReason::BodyDecodeFailed, "\"BODY_DECODE_FAILED\"")]
    #[case(ErrorReason::PathParameterNotPresent, "\"PATH_PARAMETER_NOT_PRESENT\"")]
    #[case(ErrorReason::PathParameterMalformed, "\"PATH_PARAMETER_MALFORMED\"")]
    #[case(ErrorReason::NoMatchingResource, "\"NO_MATCHING_RESOURCE\"")]
    #[case(ErrorReason::AccountNotCreated, "\"ACCOUNT_NOT_CREATED\"")]
    #[case(ErrorReason::InvalidJsonBody, "\"INVALID_JSON_BODY\"")]
    #[case(ErrorReason::ProcessingRequestFailed, "\"PROCESSING_REQUEST_FAILED\"")]
    fn reasons_serialise_to_wire_vocabulary(#[case] reason: ErrorReason, #[case] wire: &str) {
        let encoded = serde_json::to_string(&reason).expect("reason serialises");
        assert_eq!(encoded, wire);
        assert_eq!(format!("\"{}\"", reason.as_str()), wire);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn try_new_rejects_blank_messages(#[case] message: &str) {
        let err = Error::try_new(ErrorCode::NotFound, ErrorReason::NoMatchingResource, message)
            .expect_err("blank message");
        assert_eq!(err, ErrorValidationError::EmptyMessage);
    }

    #[test]
    fn new_substitutes_generic_message_for_blank_input() {
        let err = Error::new(ErrorCode::InternalError, ErrorReason::ProcessingRequestFailed, " ");
        assert_eq!(err.message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn display_includes_reason_and_message() {
        let err = Error::invalid_request(ErrorReason::BodyDecodeFailed, "bad body");
        assert_eq!(err.to_string(), "BODY_DECODE_FAILED: bad body");
    }
}
