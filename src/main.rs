//! Main binary for VCS Update

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vcs_update::adapters::ci::{InMemoryCiServer, TeamCityClient};
use vcs_update::adapters::http::{self, TriggerAppState};
use vcs_update::application::TriggerUpdateHandler;
use vcs_update::config::{AppConfig, CiBackend};
use vcs_update::ports::{BuildTypeStore, VcsRootStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config);

    config.validate()?;
    info!(
        environment = ?config.server.environment,
        backend = ?config.ci.backend,
        "Configuration loaded successfully"
    );

    // Wire the CI server ports
    let (roots, build_types) = ci_ports(&config)?;
    let handler = Arc::new(TriggerUpdateHandler::new(
        roots,
        build_types,
        config.trigger.settings(),
    ));
    let state = TriggerAppState::new(handler, config.trigger.views());
    let app = http::router(&config.trigger.path, state, config.server.request_timeout());

    // Start HTTP server
    let addr = config.server.socket_addr()?;
    info!(path = %config.trigger.path, "Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!("HTTP server error: {}", e);
        return Err(e.into());
    }

    info!("Shutdown completed");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

type CiPorts = (Arc<dyn VcsRootStore>, Arc<dyn BuildTypeStore>);

fn ci_ports(config: &AppConfig) -> Result<CiPorts, Box<dyn std::error::Error>> {
    match config.ci.backend {
        CiBackend::Memory => {
            let server = Arc::new(InMemoryCiServer::new());
            Ok((server.clone(), server))
        }
        CiBackend::TeamCity => {
            let client = Arc::new(TeamCityClient::new(config.ci.teamcity_config()?)?);
            Ok((client.clone(), client))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, shutting down");
        }
        _ = terminate => {
            info!("SIGTERM received, shutting down");
        }
    }

    info!("Shutdown signal received");
}
