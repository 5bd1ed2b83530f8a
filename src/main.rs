// Main entry point for the attendee authentication service

use attendee_auth::api::{create_router, AppState, CredentialStore};
use attendee_auth::auth::audit_logger::AuditLogger;
use attendee_auth::auth::credential_store::{DbCredentialStore, YamlCredentialStore};
use attendee_auth::auth::login::LoginService;
use attendee_auth::auth::verifier::CredentialVerifier;
use attendee_auth::config::Config;
use attendee_auth::core::crypto::TokenIssuer;
use attendee_auth::loader::attendee_loader::AttendeeLoader;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber (init panics if called twice)
    init_tracing(&config);

    info!("Starting attendee auth service");
    info!(
        bind_address = %config.bind_address,
        port = config.port,
        "Configuration loaded"
    );

    // 3. Initialize database pool (if configured)
    let db_pool: Option<Arc<sqlx::PgPool>> = match config.database_url {
        Some(ref database_url) => Some(Arc::new(
            sqlx::PgPool::connect(database_url).await.map_err(|e| {
                error!(error = %e, "Failed to connect to database");
                e
            })?,
        )),
        None => None,
    };

    // 4. Initialize credential store (DB or YAML)
    let credential_store: Arc<dyn CredentialStore + Send + Sync> = if let Some(ref pool) = db_pool {
        info!("Using database credential store");
        Arc::new(DbCredentialStore::new((**pool).clone()))
    } else if let Some(ref path) = config.attendees_yaml_path {
        let loader = AttendeeLoader::from_file(path).map_err(|e| {
            error!(error = %e, path = ?path, "Failed to load attendees");
            e
        })?;
        let store = YamlCredentialStore::new(loader);
        info!(attendees = store.len(), "Using YAML credential store");
        Arc::new(store)
    } else {
        return Err("Either DATABASE_URL or ATTENDEES_YAML_PATH must be set".into());
    };

    // 5. Initialize the signing key exactly once, before the listener exists
    let token_issuer = match config.load_signing_key() {
        Ok(Some(key)) => TokenIssuer::new(key),
        Ok(None) => {
            warn!("No SIGNING_KEY or SIGNING_KEY_PATH configured; generating an ephemeral key. Issued tokens will not verify after a restart");
            TokenIssuer::ephemeral()?
        }
        Err(e) => {
            error!(error = %e, "Failed to load signing key");
            return Err(e.into());
        }
    };
    info!(key_source = token_issuer.key_source().as_str(), "Token issuer initialized");

    // 6. Wire verifier and login flow
    let audit_logger = Arc::new(AuditLogger::new(db_pool.clone()));
    let verifier = CredentialVerifier::new(credential_store, audit_logger);
    let login = LoginService::new(verifier, Arc::new(token_issuer));

    let app_state = AppState {
        login,
        config: Arc::new(config.clone()),
    };

    // 7. Create router
    let router = create_router(&app_state).with_state(app_state);

    // 8. Start HTTP server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind to address");
        e
    })?;

    info!(addr = %addr, "Server listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "Server error");
            e
        })?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
///
/// RUST_LOG takes precedence over LOG_LEVEL.
fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}
