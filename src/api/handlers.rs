// Request handlers for API endpoints

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use serde::Deserialize;
use std::net::IpAddr;
use tracing::{debug, error, info};

use crate::api::responses::{ApiError, HealthResponse};
use crate::api::AppState;
use crate::auth::audit_logger::RequestContext;
use crate::core::errors::AuthError;
use crate::core::models::Credential;

/// Form body of a login attempt
///
/// Missing fields default to empty strings, which never match a record.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login handler
///
/// POST /attendees/login (application/x-www-form-urlencoded)
///
/// - 200 with `Authorization: Bearer <token>` and no body on success
/// - 401 with no body when the credential is rejected or the form cannot be parsed
/// - 500 with an error body when signing fails
///
/// Content-type and body-size rejections keep their own status.
pub async fn login_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let context = request_context(&headers);
    let request_id = context.request_id.clone().unwrap_or_default();

    let form = match form {
        Ok(Form(form)) => form,
        Err(
            rejection @ (FormRejection::FailedToDeserializeForm(_)
            | FormRejection::FailedToDeserializeFormBody(_)),
        ) => {
            debug!(error = %rejection, request_id = %request_id, "Unparseable login form");
            return Err(ApiError::from(AuthError::Unauthenticated));
        }
        Err(rejection) => return Ok(rejection.into_response()),
    };

    info!(
        username = %form.username,
        request_id = %request_id,
        "Received login attempt"
    );

    let credential = Credential::new(form.username, form.password);

    let token = app_state
        .login
        .login(&credential, &context)
        .await
        .map_err(|e| ApiError::from_auth_error_with_id(e, request_id.clone()))?;

    let bearer = HeaderValue::from_str(&token.bearer()).map_err(|e| {
        error!(error = %e, request_id = %request_id, "Token is not a valid header value");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })?;

    Ok((StatusCode::OK, [(header::AUTHORIZATION, bearer)]).into_response())
}

/// Health check handler
///
/// GET /health
pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        signing_key: app_state.login.issuer().key_source().as_str().to_string(),
    })
}

/// Build audit metadata from request headers
///
/// Reuses `x-request-id` when the client sent one, otherwise generates a UUID.
/// Checks `X-Forwarded-For` first (for proxied requests), then `X-Real-IP`.
/// Only the first forwarded hop is kept, and only when it is a valid IP address.
fn request_context(headers: &HeaderMap) -> RequestContext {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };

    RequestContext {
        request_id: Some(
            header_str("x-request-id").unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        ),
        ip_address: header_str("x-forwarded-for")
            .or_else(|| header_str("x-real-ip"))
            .and_then(|value| client_ip(&value)),
        user_agent: header_str("user-agent"),
    }
}

/// First hop of a forwarded-for list, if it parses as an IP address
fn client_ip(value: &str) -> Option<String> {
    let first_hop = value.split(',').next()?.trim();
    first_hop.parse::<IpAddr>().ok().map(|ip| ip.to_string())
}
