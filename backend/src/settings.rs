//! Process configuration loaded via OrthoConfig.
//!
//! Values layer as defaults, then a configuration file, then `IDP_*`
//! environment variables, then command-line flags.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_issuer() -> String {
    String::from("tournabyte-idp")
}

fn default_audience() -> String {
    String::from("tournabyte")
}

/// Settings for the identity provider process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IDP")]
pub struct IdpSettings {
    /// Interface to bind.
    #[ortho_config(default = default_bind_address())]
    pub bind_address: IpAddr,
    /// Port to listen on.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Shared secret used to sign session tokens.
    pub jwt_secret: Option<String>,
    /// `iss` claim stamped on issued tokens.
    #[ortho_config(default = default_issuer())]
    pub jwt_issuer: String,
    /// `aud` claim stamped on issued tokens.
    #[ortho_config(default = default_audience())]
    pub jwt_audience: String,
    /// Session token lifetime in seconds.
    #[ortho_config(default = 86_400)]
    pub token_ttl_secs: u64,
    /// Clock skew tolerated when checking token expiry, in seconds.
    #[ortho_config(default = 30)]
    pub token_leeway_secs: u64,
    /// Deadline granted to each request, in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Deadline override for `POST /accounts`.
    pub create_account_timeout_secs: Option<u64>,
    /// Deadline override for `GET /accounts/{id}`.
    pub find_account_timeout_secs: Option<u64>,
    /// Deadline override for `POST /login`.
    pub login_timeout_secs: Option<u64>,
}

impl IdpSettings {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Configured signing secret, if any non-blank value was supplied.
    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn token_leeway(&self) -> Duration {
        Duration::from_secs(self.token_leeway_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Deadline for account creation, falling back to the request timeout.
    pub fn create_account_timeout(&self) -> Duration {
        self.route_timeout(self.create_account_timeout_secs)
    }

    pub fn find_account_timeout(&self) -> Duration {
        self.route_timeout(self.find_account_timeout_secs)
    }

    pub fn login_timeout(&self) -> Duration {
        self.route_timeout(self.login_timeout_secs)
    }

    fn route_timeout(&self, override_secs: Option<u64>) -> Duration {
        override_secs.map_or_else(|| self.request_timeout(), Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 11] = [
        "IDP_BIND_ADDRESS",
        "IDP_PORT",
        "IDP_JWT_SECRET",
        "IDP_JWT_ISSUER",
        "IDP_JWT_AUDIENCE",
        "IDP_TOKEN_TTL_SECS",
        "IDP_TOKEN_LEEWAY_SECS",
        "IDP_REQUEST_TIMEOUT_SECS",
        "IDP_CREATE_ACCOUNT_TIMEOUT_SECS",
        "IDP_FIND_ACCOUNT_TIMEOUT_SECS",
        "IDP_LOGIN_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> IdpSettings {
        IdpSettings::load_from_iter([OsString::from("idp")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert!(settings.jwt_secret().is_none());
        assert_eq!(settings.jwt_issuer, "tournabyte-idp");
        assert_eq!(settings.jwt_audience, "tournabyte");
        assert_eq!(settings.token_ttl(), Duration::from_secs(86_400));
        assert_eq!(settings.token_leeway(), Duration::from_secs(30));
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.create_account_timeout(), Duration::from_secs(30));
        assert_eq!(settings.find_account_timeout(), Duration::from_secs(30));
        assert_eq!(settings.login_timeout(), Duration::from_secs(30));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("IDP_CREATE_ACCOUNT_TIMEOUT_SECS", None),
            ("IDP_FIND_ACCOUNT_TIMEOUT_SECS", None),
            ("IDP_LOGIN_TIMEOUT_SECS", None),
            ("IDP_BIND_ADDRESS", Some("127.0.0.1".to_owned())),
            ("IDP_PORT", Some("9090".to_owned())),
            ("IDP_JWT_SECRET", Some("s3cr3t".to_owned())),
            ("IDP_JWT_ISSUER", Some("issuer.example".to_owned())),
            ("IDP_JWT_AUDIENCE", Some("clients".to_owned())),
            ("IDP_TOKEN_TTL_SECS", Some("600".to_owned())),
            ("IDP_TOKEN_LEEWAY_SECS", Some("5".to_owned())),
            ("IDP_REQUEST_TIMEOUT_SECS", Some("2".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(settings.jwt_secret(), Some("s3cr3t"));
        assert_eq!(settings.jwt_issuer, "issuer.example");
        assert_eq!(settings.jwt_audience, "clients");
        assert_eq!(settings.token_ttl(), Duration::from_secs(600));
        assert_eq!(settings.token_leeway(), Duration::from_secs(5));
        assert_eq!(settings.request_timeout(), Duration::from_secs(2));
        assert_eq!(settings.login_timeout(), Duration::from_secs(2));
    }

    #[rstest]
    fn route_timeouts_override_the_request_timeout() {
        let mut guard_vars = VARS.map(|name| (name, None::<String>));
        guard_vars[8] = ("IDP_CREATE_ACCOUNT_TIMEOUT_SECS", Some("45".to_owned()));
        guard_vars[10] = ("IDP_LOGIN_TIMEOUT_SECS", Some("5".to_owned()));
        let _guard = lock_env(guard_vars);

        let settings = load_from_empty_args();
        assert_eq!(settings.create_account_timeout(), Duration::from_secs(45));
        assert_eq!(settings.find_account_timeout(), Duration::from_secs(30));
        assert_eq!(settings.login_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn blank_secrets_count_as_unset() {
        let mut guard_vars = VARS.map(|name| (name, None::<String>));
        guard_vars[2] = ("IDP_JWT_SECRET", Some("   ".to_owned()));
        let _guard = lock_env(guard_vars);

        assert!(load_from_empty_args().jwt_secret().is_none());
    }
}
