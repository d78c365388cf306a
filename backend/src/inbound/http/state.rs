//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{AccountCommand, AccountQuery, LoginService};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub login: Arc<dyn LoginService>,
}

/// Deadline the timeout step grants each route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTimeouts {
    pub create_account: Duration,
    pub find_account: Duration,
    pub login: Duration,
}

impl RouteTimeouts {
    /// Apply `timeout` to every route.
    pub const fn uniform(timeout: Duration) -> Self {
        Self {
            create_account: timeout,
            find_account: timeout,
            login: timeout,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub login: Arc<dyn LoginService>,
    pub timeouts: RouteTimeouts,
}

impl HttpState {
    /// Construct state from a ports bundle and the per-route deadlines.
    pub fn new(ports: HttpStatePorts, timeouts: RouteTimeouts) -> Self {
        let HttpStatePorts {
            accounts,
            accounts_query,
            login,
        } = ports;
        Self {
            accounts,
            accounts_query,
            login,
            timeouts,
        }
    }
}
