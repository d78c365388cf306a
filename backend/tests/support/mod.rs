//! Shared wiring for black-box HTTP tests over the real adapters.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::Clock;

use idp::domain::ports::{CredentialHasher, TokenSigner};
use idp::domain::{AccountRepository, AccountService, AuthenticationService, TokenPolicy};
use idp::inbound::http::state::{HttpState, HttpStatePorts, RouteTimeouts};
use idp::outbound::crypto::{Argon2CredentialHasher, JwtTokenSigner};
use idp::outbound::store::InMemoryAccountStore;
use idp::test_support::MutableClock;

pub const SECRET: &[u8] = b"integration-suite-signing-secret";
pub const ISSUER: &str = "tournabyte-idp";
pub const AUDIENCE: &str = "tournabyte";

/// Token lifetime used by the suite.
pub fn policy() -> TokenPolicy {
    TokenPolicy::new(ISSUER, AUDIENCE, chrono::Duration::hours(24))
}

/// Real adapters sharing one controllable clock.
pub struct Wiring {
    pub clock: Arc<MutableClock>,
    pub signer: Arc<JwtTokenSigner>,
    pub state: web::Data<HttpState>,
}

pub fn wiring() -> Wiring {
    let clock = Arc::new(MutableClock::default());
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let store = Arc::new(InMemoryAccountStore::new(dyn_clock.clone()));
    let repository = AccountRepository::new(store, dyn_clock.clone());
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2CredentialHasher::new());
    let signer = Arc::new(
        JwtTokenSigner::new(
            SECRET,
            &policy(),
            chrono::Duration::seconds(30),
            dyn_clock.clone(),
        )
        .expect("signer"),
    );
    let token_signer: Arc<dyn TokenSigner> = signer.clone();

    let accounts = Arc::new(AccountService::new(repository.clone(), hasher.clone()));
    let login = Arc::new(AuthenticationService::new(
        repository,
        hasher,
        token_signer,
        dyn_clock,
        policy(),
    ));
    let state = web::Data::new(HttpState::new(
        HttpStatePorts {
            accounts: accounts.clone(),
            accounts_query: accounts,
            login,
        },
        RouteTimeouts::uniform(Duration::from_secs(60)),
    ));

    Wiring {
        clock,
        signer,
        state,
    }
}
