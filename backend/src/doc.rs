//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together with
//! the request, response and error envelope schemas. Swagger UI serves it in
//! debug builds.

use utoipa::OpenApi;

use crate::domain::ErrorReason;
use crate::inbound::http::accounts::{
    AccountResponse, BasicAccountInfoResponse, CreateAccountRequest,
};
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::login::{LoginRequest, SuccessfulAuthenticationResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity provider API",
        description = "Account creation, lookup and session token issuance."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::find_account,
        crate::inbound::http::login::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateAccountRequest,
        AccountResponse,
        BasicAccountInfoResponse,
        LoginRequest,
        SuccessfulAuthenticationResponse,
        ErrorResponse,
        ErrorReason,
    )),
    tags(
        (name = "accounts", description = "Account creation and lookup"),
        (name = "login", description = "Credential verification and token issuance"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
