//! ZT Admin - Lightweight ZeroTier Network Controller Gateway
//! Mission: Single-binary admin UI an operator can trust on a router

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ztadmin_backend::{
    auth::{Authenticator, BcryptScheme, CredentialStore, SessionStore, SESSION_LIMIT},
    config::Config,
    controller::ControllerClient,
    web::{build_router, AppState},
};

const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("🚀 ZT Admin Gateway Starting");

    let config = Config::from_env().context("Configuration validation failed")?;
    config.log_summary();

    // Outbound controller client; startup fails if the controller service
    // is unreachable, matching the operator expectation that a gateway
    // without a controller is useless.
    let controller = ControllerClient::new(&config.zt_address, &config.zt_home)
        .context("Failed to initialize controller API client")?;
    if !controller.check_connection().await {
        anyhow::bail!("Cannot connect to controller at {}", config.zt_address);
    }
    info!("✅ Controller reachable at {}", config.zt_address);

    // Credential document, seeded with a default admin on first boot
    let credentials = CredentialStore::new(config.users_file(), Box::new(BcryptScheme::new()));
    if credentials
        .seed_default(DEFAULT_ADMIN_USER, DEFAULT_ADMIN_PASSWORD)
        .context("Failed to seed credential document")?
    {
        info!(
            "Default credentials: {}/{} (change after first login)",
            DEFAULT_ADMIN_USER, DEFAULT_ADMIN_PASSWORD
        );
    }

    let state = AppState {
        auth: Arc::new(Authenticator::new(
            credentials,
            SessionStore::new(SESSION_LIMIT, config.session_timeout_secs),
        )),
        controller: Arc::new(controller),
    };

    spawn_controller_watchdog(state.controller.clone(), config.zt_address.clone());

    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🌐 HTTP interface: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("ZT Admin Gateway stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ztadmin_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Once a minute, probe the controller and complain if it went away.
fn spawn_controller_watchdog(controller: Arc<ControllerClient>, zt_address: String) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        ticker.tick().await; // first tick fires immediately; skip it
        loop {
            ticker.tick().await;
            if !controller.check_connection().await {
                warn!("⚠️  Lost connection to controller at {}", zt_address);
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install ctrl-c handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
