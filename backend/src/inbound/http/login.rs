//! Login handler.
//!
//! ```text
//! POST /login {"authenticate_as":"a@b.com","passphrase":"x"}
//! ```

use actix_web::http::StatusCode;
use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorReason, LoginAttempt, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::pipeline::{Reply, RequestContext};
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "a@b.com")]
    pub authenticate_as: String,
    pub passphrase: String,
}

impl TryFrom<&LoginRequest> for LoginAttempt {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.authenticate_as, &value.passphrase)
    }
}

/// Signed session token issued on successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SuccessfulAuthenticationResponse {
    pub token: String,
}

/// Authenticate and issue a session token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Token issued", body = SuccessfulAuthenticationResponse),
        (status = 400, description = "Unreadable or incomplete body", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 503, description = "Deadline exceeded", body = ErrorResponse)
    ),
    tags = ["login"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(state: web::Data<HttpState>, payload: web::Payload) -> ApiResult<Reply> {
    let ctx = RequestContext::new()
        .with_timeout(state.timeouts.login)
        .decode_json::<LoginRequest>(payload)
        .await?;
    let attempt = LoginAttempt::try_from(ctx.body())
        .map_err(|err| Error::invalid_request(ErrorReason::InvalidJsonBody, err.to_string()))?;
    let token = ctx
        .within_deadline(state.login.authenticate(&attempt))
        .await??;
    let body = SuccessfulAuthenticationResponse {
        token: token.into_inner(),
    };
    Ok(ctx.reply(StatusCode::CREATED, &body))
}
