//! Builders wiring adapters into domain services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use idp::domain::ports::CredentialHasher;
use idp::domain::{AccountRepository, AccountService, AuthenticationService};
use idp::inbound::http::state::{HttpState, HttpStatePorts};
use idp::outbound::crypto::{Argon2CredentialHasher, JwtTokenSigner};
use idp::outbound::store::InMemoryAccountStore;

use super::ServerConfig;

/// Build the handler state over the in-memory store, Argon2id and HS256.
///
/// # Errors
/// Fails when the signing key cannot be constructed.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let store = Arc::new(InMemoryAccountStore::new(clock.clone()));
    let repository = AccountRepository::new(store, clock.clone());
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2CredentialHasher::new());
    let signer = JwtTokenSigner::new(
        &config.signing_secret,
        &config.token_policy,
        config.token_leeway,
        clock.clone(),
    )
    .map_err(|err| std::io::Error::other(err.to_string()))?;

    let accounts = Arc::new(AccountService::new(repository.clone(), hasher.clone()));
    let login = Arc::new(AuthenticationService::new(
        repository,
        hasher,
        Arc::new(signer),
        clock,
        config.token_policy.clone(),
    ));

    Ok(web::Data::new(HttpState::new(
        HttpStatePorts {
            accounts: accounts.clone(),
            accounts_query: accounts,
            login,
        },
        config.timeouts,
    )))
}
