//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use idp::Trace;
#[cfg(debug_assertions)]
use idp::doc::ApiDoc;
use idp::inbound::http::health::{HealthState, live, ready};
use idp::inbound::http::state::HttpState;
use idp::inbound::http::{configure, unmatched_route};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(unmatched_route))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Signal handling is done by [`run_until_shutdown`] so liveness can drop
/// before the listener drains.
///
/// # Errors
/// Propagates [`std::io::Error`] when building state or binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .disable_signals()
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    info!(addr = %config.bind_addr(), "listening");
    Ok(server)
}

/// Drive `server` until SIGINT or SIGTERM, then drain gracefully.
pub async fn run_until_shutdown(
    server: Server,
    health_state: web::Data<HealthState>,
) -> std::io::Result<()> {
    let handle = server.handle();
    let shutdown = async move {
        shutdown_signal().await;
        info!("shutdown requested; draining connections");
        health_state.mark_unhealthy();
        handle.stop(true).await;
    };
    actix_web::rt::spawn(shutdown);
    server.await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(error) => warn!(%error, "SIGTERM handler unavailable; waiting for SIGINT"),
        }
    }
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "SIGINT handler unavailable");
        std::future::pending::<()>().await;
    }
}
