use axum::http::HeaderValue;
use common::env::ensure_db_dir;
use configs::AppConfig;
use models::db::{connect_with_config, ensure_schema};
use service::bootstrap::{seed_owner, OwnerSeed};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::routes::{self, auth::{ServerAuthConfig, ServerState}};

/// `*` allows any origin; anything else must be a single valid origin.
pub fn build_cors(origin: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin.trim() == "*" {
        return base.allow_origin(Any);
    }
    match HeaderValue::from_str(origin.trim()) {
        Ok(value) => base.allow_origin(value),
        Err(_) => {
            warn!(origin, "ORIGIN is not a valid header value; allowing any origin");
            base.allow_origin(Any)
        }
    }
}

/// Open the store, make sure the schema and owner exist, and assemble the state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    ensure_db_dir(&cfg.database.path).await?;
    let db = connect_with_config(&cfg.database).await?;
    ensure_schema(&db).await?;

    if cfg.auth.uses_default_owner_password() {
        warn!("owner account uses the default password; set OWNER_PASSWORD");
    }
    let seed = OwnerSeed {
        name: cfg.auth.owner_name.clone(),
        username: cfg.auth.owner_username.clone(),
        email: cfg.auth.owner_email.clone(),
        password: cfg.auth.owner_password.clone(),
    };
    seed_owner(&db, &seed).await?;

    Ok(ServerState::new(
        db,
        ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone(), token_ttl_secs: cfg.auth.token_ttl_secs },
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}

/// Public entry: build the app and serve until a shutdown signal arrives.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    if cfg.auth.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the built-in development secret");
    }
    let state = build_state(&cfg).await?;
    let db = state.db.clone();
    let app = routes::build_router(state, build_cors(&cfg.server.cors_origin));

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "server running on http://{addr}/api/v1");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    db.close().await?;
    info!("database pool closed");
    Ok(())
}
