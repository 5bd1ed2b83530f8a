// Axum web server layer

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;

pub mod handlers;
pub mod middleware;
pub mod responses;

use crate::auth::login::LoginService;
use crate::core::errors::AuthError;
use crate::core::models::AttendeeRecord;

pub use crate::config::Config;

/// Application state containing all shared dependencies
///
/// The signing key inside `login` is created once before the router is built
/// and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub login: LoginService,
    pub config: Arc<Config>,
}

/// Read-only lookup the authentication core needs from attendee storage
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the single record whose username and password both match
    async fn find_by_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AttendeeRecord>, AuthError>;
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Request timeout (tower::timeout) - configurable global timeout
/// - Tracing (tower-http::trace)
/// - Body size limit (tower-http::limit)
pub fn create_router(app_state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/attendees/login", axum::routing::post(handlers::login_handler))
        .route("/health", axum::routing::get(handlers::health_handler));

    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout_secs = app_state.config.request_timeout_secs;

    let router = router
        .layer(middleware::body_size_limit_layer(body_limit))
        .layer(middleware::tracing_layer());

    // HandleErrorLayer must come before the timeout to turn Elapsed into a response
    let timeout_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e: BoxError| async move {
            let status = if e.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string())
        }))
        .layer(middleware::timeout_layer(Duration::from_secs(timeout_secs)))
        .into_inner();

    router.layer(timeout_stack)
}
