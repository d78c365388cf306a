//! Login flow: look the account up, verify the secret, issue a session token.
//!
//! Every rejection yields the same status, reason and message, whether the
//! email was unknown, the account inactive or the secret wrong. Unknown and
//! inactive accounts still pay for one hash comparison against a dummy
//! credential.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::account_repository::{AccountRepository, AccountRepositoryError};
use crate::domain::ports::{CredentialHasher, LoginService, TokenSigner};
use crate::domain::{
    CredentialHash, Error, ErrorReason, LoginAttempt, SessionToken, TokenPolicy,
};

pub(crate) const REJECTION_MESSAGE: &str = "Invalid email or password";

const DUMMY_SECRET: &str = "dummy-secret-for-unknown-accounts";

/// Implements [`LoginService`].
pub struct AuthenticationService {
    repository: AccountRepository,
    hasher: Arc<dyn CredentialHasher>,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    policy: TokenPolicy,
    dummy_hash: OnceCell<CredentialHash>,
}

impl AuthenticationService {
    pub fn new(
        repository: AccountRepository,
        hasher: Arc<dyn CredentialHasher>,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            repository,
            hasher,
            signer,
            clock,
            policy,
            dummy_hash: OnceCell::new(),
        }
    }

    async fn burn_comparison(&self, secret: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash(DUMMY_SECRET))
            .await;
        match dummy {
            Ok(hash) => {
                let _ = self.hasher.verify(secret, hash).await;
            }
            Err(err) => debug!(error = %err, "dummy credential unavailable"),
        }
    }
}

fn rejection() -> Error {
    Error::unauthorized(ErrorReason::NoMatchingResource, REJECTION_MESSAGE)
}

#[async_trait]
impl LoginService for AuthenticationService {
    async fn authenticate(&self, attempt: &LoginAttempt) -> Result<SessionToken, Error> {
        let account = match self.repository.find_by_email(attempt.identifier()).await {
            Ok(account) if account.active => account,
            Ok(account) => {
                self.burn_comparison(attempt.secret()).await;
                info!(account_id = %account.id, "login rejected for inactive account");
                return Err(rejection());
            }
            Err(AccountRepositoryError::NotFound) => {
                self.burn_comparison(attempt.secret()).await;
                info!("login rejected");
                return Err(rejection());
            }
            Err(err) => {
                warn!(error = %err, "account lookup failed during login");
                return Err(Error::internal(err.to_string()));
            }
        };

        match self
            .hasher
            .verify(attempt.secret(), &account.credential_hash)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                info!(account_id = %account.id, "login rejected");
                return Err(rejection());
            }
            Err(err) => {
                warn!(account_id = %account.id, error = %err, "credential comparison failed");
                return Err(rejection());
            }
        }

        let Some(claims) = self.policy.claims_for(&account.id, self.clock.utc()) else {
            warn!(account_id = %account.id, "session token expiry out of range");
            return Err(Error::internal("session token expiry out of range"));
        };
        let token = self.signer.sign(&claims).map_err(|err| {
            warn!(error = %err, "session token signing failed");
            Error::internal(err.to_string())
        })?;
        info!(account_id = %account.id, "session token issued");
        Ok(token)
    }
}
