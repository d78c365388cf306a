//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::warn;
use zeroize::Zeroizing;

use idp::domain::TokenPolicy;
use idp::inbound::http::state::RouteTimeouts;
use idp::settings::IdpSettings;

const EPHEMERAL_SECRET_LEN: usize = 32;

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) timeouts: RouteTimeouts,
    pub(crate) token_policy: TokenPolicy,
    pub(crate) token_leeway: chrono::Duration,
    pub(crate) signing_secret: Zeroizing<Vec<u8>>,
}

impl ServerConfig {
    /// Resolve settings into a server configuration.
    ///
    /// # Errors
    /// Fails when a timeout, the token lifetime or the leeway cannot be
    /// applied to the current time. Release builds also fail when no signing
    /// secret is configured; debug builds fall back to a random per-process
    /// secret.
    pub fn from_settings(settings: &IdpSettings) -> std::io::Result<Self> {
        let signing_secret = match settings.jwt_secret() {
            Some(secret) => Zeroizing::new(secret.as_bytes().to_vec()),
            None if cfg!(debug_assertions) => {
                warn!("IDP_JWT_SECRET unset; using an ephemeral signing secret (dev only)");
                Zeroizing::new(rand::random::<[u8; EPHEMERAL_SECRET_LEN]>().to_vec())
            }
            None => {
                return Err(std::io::Error::other(
                    "IDP_JWT_SECRET must be set to sign session tokens",
                ));
            }
        };
        let timeouts = RouteTimeouts {
            create_account: checked_timeout("create account", settings.create_account_timeout())?,
            find_account: checked_timeout("find account", settings.find_account_timeout())?,
            login: checked_timeout("login", settings.login_timeout())?,
        };
        let ttl = chrono::Duration::from_std(settings.token_ttl())
            .ok()
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| std::io::Error::other("token ttl out of range"))?;
        let token_leeway = chrono::Duration::from_std(settings.token_leeway())
            .ok()
            .filter(|leeway| Utc::now().checked_sub_signed(*leeway).is_some())
            .ok_or_else(|| std::io::Error::other("token leeway out of range"))?;
        Ok(Self {
            bind_addr: settings.bind_addr(),
            timeouts,
            token_policy: TokenPolicy::new(&settings.jwt_issuer, &settings.jwt_audience, ttl),
            token_leeway,
            signing_secret,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn checked_timeout(route: &str, timeout: Duration) -> std::io::Result<Duration> {
    match Instant::now().checked_add(timeout) {
        Some(_) => Ok(timeout),
        None => Err(std::io::Error::other(format!(
            "{route} request timeout out of range"
        ))),
    }
}
