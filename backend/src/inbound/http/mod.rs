//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod error;
pub mod health;
pub mod login;
pub mod pipeline;
pub mod state;

pub use error::ApiResult;

use actix_web::web;

use crate::domain::{Error, ErrorReason};

/// Register the account and login routes.
///
/// Probes are registered separately because they need [`health::HealthState`]
/// rather than [`state::HttpState`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use idp::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::create_account)
        .service(accounts::find_account)
        .service(accounts::find_account_without_id)
        .service(login::login);
}

/// Fallback for unmatched routes, so even unknown paths get the JSON envelope.
pub async fn unmatched_route() -> ApiResult<()> {
    Err(Error::not_found(
        ErrorReason::NoMatchingResource,
        "No route matches the request",
    ))
}
