//! Account API handlers.
//!
//! ```text
//! POST /accounts {"email":"a@b.com","password":"x"}
//! GET /accounts/{id}
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Account, AccountValidationError, Error, ErrorReason, NewAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::pipeline::{Reply, RequestContext};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /accounts`.
///
/// Absent fields decode as empty strings and are then rejected.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateAccountRequest {
    #[schema(example = "a@b.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<&CreateAccountRequest> for NewAccount {
    type Error = AccountValidationError;

    fn try_from(value: &CreateAccountRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Full account view returned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = "65f1a2b3c4d5e6f708192a3b")]
    pub id: String,
    pub email: String,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_hex(),
            email: account.email.clone(),
            active: account.active,
            created: account.created,
            modified: account.modified,
        }
    }
}

/// Basic account view returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct BasicAccountInfoResponse {
    pub id: String,
    pub email: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl From<&Account> for BasicAccountInfoResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_hex(),
            email: account.email.clone(),
            created: account.created,
            modified: account.modified,
        }
    }
}

fn map_account_validation_error(err: AccountValidationError) -> Error {
    Error::invalid_request(ErrorReason::InvalidJsonBody, err.to_string())
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Unreadable or incomplete body", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
        (status = 503, description = "Deadline exceeded", body = ErrorResponse)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/accounts")]
pub async fn create_account(
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<Reply> {
    let ctx = RequestContext::new()
        .with_timeout(state.timeouts.create_account)
        .decode_json::<CreateAccountRequest>(payload)
        .await?;
    let new_account = NewAccount::try_from(ctx.body()).map_err(map_account_validation_error)?;
    let account = ctx
        .within_deadline(state.accounts.create_account(new_account))
        .await??;
    Ok(ctx.reply(StatusCode::CREATED, &AccountResponse::from(&account)))
}

/// Look up an active account by identifier.
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = String, Path, description = "24-character hex account identifier")),
    responses(
        (status = 200, description = "Account found", body = BasicAccountInfoResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No active account or no identifier", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
        (status = 503, description = "Deadline exceeded", body = ErrorResponse)
    ),
    tags = ["accounts"],
    operation_id = "findAccount"
)]
#[get("/accounts/{id}")]
pub async fn find_account(req: HttpRequest, state: web::Data<HttpState>) -> ApiResult<Reply> {
    lookup(&req, &state).await
}

/// Same lookup routed without an identifier, so the path step can report it.
#[get("/accounts/")]
pub async fn find_account_without_id(
    req: HttpRequest,
    state: web::Data<HttpState>,
) -> ApiResult<Reply> {
    lookup(&req, &state).await
}

async fn lookup(req: &HttpRequest, state: &HttpState) -> ApiResult<Reply> {
    let ctx = RequestContext::new()
        .with_timeout(state.timeouts.find_account)
        .extract_path(req, &["id"])?;
    let id = ctx.path_param("id").unwrap_or_default();
    let account = ctx
        .within_deadline(state.accounts_query.find_account(id))
        .await??;
    Ok(ctx.reply(StatusCode::OK, &BasicAccountInfoResponse::from(&account)))
}
