//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! failure one exit: the status comes from the error category and the body is
//! the `{reason, err_msg}` envelope. Nothing else in the crate builds an error
//! response.

use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, ErrorReason};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Body emitted when nothing better can be produced.
pub(crate) const FALLBACK_BODY: &str =
    r#"{"reason":"PROCESSING_REQUEST_FAILED","err_msg":"Internal server error"}"#;

/// Error envelope returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable reason code.
    pub reason: ErrorReason,
    /// Human-readable description of the failure.
    #[schema(example = "Request body did not contain valid JSON")]
    pub err_msg: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            reason: err.reason(),
            err_msg: err.message().to_owned(),
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Fixed 500 response used when a response cannot be built as declared.
pub(crate) fn fallback_response() -> HttpResponse {
    HttpResponse::InternalServerError()
        .insert_header((CONTENT_TYPE, HeaderValue::from_static("application/json")))
        .body(FALLBACK_BODY)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(reason = %self.reason(), message = self.message(), "request failed");
        } else {
            warn!(reason = %self.reason(), status = status.as_u16(), "request rejected");
        }
        match serde_json::to_vec(&ErrorResponse::from(self)) {
            Ok(body) => HttpResponse::build(status)
                .insert_header((CONTENT_TYPE, HeaderValue::from_static("application/json")))
                .body(body),
            Err(err) => {
                error!(error = %err, "error envelope serialisation failed");
                fallback_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
    #[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
    #[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn categories_map_to_statuses(#[case] code: ErrorCode, #[case] expected: StatusCode) {
        let err = Error::new(code, ErrorReason::ProcessingRequestFailed, "x");
        assert_eq!(err.status_code(), expected);
    }

    #[actix_web::test]
    async fn error_response_serialises_reason_and_message() {
        let err = Error::invalid_request(
            ErrorReason::BodyDecodeFailed,
            "Request body did not contain valid JSON",
        );

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

        assert_eq!(
            value,
            serde_json::json!({
                "reason": "BODY_DECODE_FAILED",
                "err_msg": "Request body did not contain valid JSON",
            })
        );
    }

    #[actix_web::test]
    async fn store_messages_are_passed_through_on_server_errors() {
        let err = Error::internal_with(
            ErrorReason::AccountNotCreated,
            "Did not create the requested account: connection refused",
        );

        let bytes = to_bytes(err.error_response().into_body())
            .await
            .expect("body");
        let body: ErrorResponse = serde_json::from_slice(&bytes).expect("envelope");

        assert_eq!(body.reason, ErrorReason::AccountNotCreated);
        assert!(body.err_msg.ends_with("connection refused"));
    }

    #[actix_web::test]
    async fn fallback_is_a_well_formed_envelope() {
        let response = fallback_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let body: ErrorResponse = serde_json::from_slice(&bytes).expect("envelope");

        assert_eq!(body.reason, ErrorReason::ProcessingRequestFailed);
        assert_eq!(body.err_msg, "Internal server error");
    }
}
