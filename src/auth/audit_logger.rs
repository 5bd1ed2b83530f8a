// Security event logging

use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

/// Internal reason a login was rejected
///
/// Only ever written to the audit trail. Callers see a single `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// No record matched the username/password pair
    InvalidCredentials,
    /// The credential store returned an error
    StoreUnavailable,
}

impl FailureCause {
    pub fn code(&self) -> &'static str {
        match self {
            FailureCause::InvalidCredentials => "INVALID_CREDENTIALS",
            FailureCause::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }
}

/// Authentication event type
#[derive(Debug, Clone)]
pub enum AuthEvent {
    AuthSuccess,
    AuthFailure { cause: FailureCause, detail: Option<String> },
}

impl AuthEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AuthEvent::AuthSuccess => "AUTH_SUCCESS",
            AuthEvent::AuthFailure { .. } => "AUTH_FAILURE",
        }
    }
}

/// Request metadata attached to audit events
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Audit logger for security events
pub struct AuditLogger {
    db_pool: Option<Arc<PgPool>>,
}

impl AuditLogger {
    /// Create a new audit logger
    ///
    /// If `db_pool` is `None`, only structured logging will be used (no database persistence).
    pub fn new(db_pool: Option<Arc<PgPool>>) -> Self {
        Self { db_pool }
    }

    /// Log an authentication event
    ///
    /// The structured log line is written inline. The database insert, when a
    /// pool is configured, runs on a spawned task and never blocks the request.
    pub fn log_auth_event(&self, event: AuthEvent, username: &str, context: &RequestContext) {
        match &event {
            AuthEvent::AuthSuccess => {
                info!(
                    username = %username,
                    request_id = ?context.request_id,
                    ip_address = ?context.ip_address,
                    user_agent = ?context.user_agent,
                    "Authentication successful"
                );
            }
            AuthEvent::AuthFailure { cause, detail } => {
                warn!(
                    username = %username,
                    cause = cause.code(),
                    detail = ?detail,
                    request_id = ?context.request_id,
                    ip_address = ?context.ip_address,
                    user_agent = ?context.user_agent,
                    "Authentication failed"
                );
            }
        }

        let Some(pool) = self.db_pool.clone() else {
            return;
        };

        let row = AuditRow::new(&event, username, context);

        // Fire-and-forget: errors are logged but don't affect the request flow
        tokio::spawn(async move {
            if let Err(e) = sqlx::query(
                "INSERT INTO auth_audit_log (username, event_type, cause, request_id, ip_address, user_agent, created_at)
                 VALUES ($1, $2, $3, $4, $5::inet, $6, NOW())",
            )
            .bind(&row.username)
            .bind(row.event_type)
            .bind(row.cause)
            .bind(&row.request_id)
            .bind(&row.ip_address)
            .bind(&row.user_agent)
            .execute(pool.as_ref())
            .await
            {
                warn!(error = %e, request_id = ?row.request_id, "Failed to write audit log to database");
            }
        });
    }
}

/// Values persisted to `auth_audit_log` for one event
#[derive(Debug, Clone, PartialEq, Eq)]
struct AuditRow {
    username: String,
    event_type: &'static str,
    cause: Option<&'static str>,
    request_id: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl AuditRow {
    fn new(event: &AuthEvent, username: &str, context: &RequestContext) -> Self {
        let cause = match event {
            AuthEvent::AuthSuccess => None,
            AuthEvent::AuthFailure { cause, .. } => Some(cause.code()),
        };
        Self {
            username: username.to_string(),
            event_type: event.event_type(),
            cause,
            request_id: context.request_id.clone(),
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
        }
    }
}
