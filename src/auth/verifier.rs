// Credential verification against the configured store

use crate::api::CredentialStore;
use crate::auth::audit_logger::{AuditLogger, AuthEvent, FailureCause, RequestContext};
use crate::core::errors::AuthError;
use crate::core::models::{Credential, VerifiedIdentity};
use std::sync::Arc;

/// Checks submitted credentials against a `CredentialStore`
///
/// Unknown usernames, wrong passwords and store failures all come back as
/// `AuthError::Unauthenticated`. The distinguishing cause goes to the audit log.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore + Send + Sync>,
    audit_logger: Arc<AuditLogger>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore + Send + Sync>, audit_logger: Arc<AuditLogger>) -> Self {
        Self { store, audit_logger }
    }

    /// Verify a credential with no request metadata
    pub async fn verify(&self, credential: &Credential) -> Result<VerifiedIdentity, AuthError> {
        self.verify_with_context(credential, &RequestContext::default())
            .await
    }

    /// Verify a credential, attaching request metadata to the audit event
    pub async fn verify_with_context(
        &self,
        credential: &Credential,
        context: &RequestContext,
    ) -> Result<VerifiedIdentity, AuthError> {
        match self.check(credential).await {
            Ok(identity) => {
                self.audit_logger
                    .log_auth_event(AuthEvent::AuthSuccess, credential.username(), context);
                Ok(identity)
            }
            Err((cause, detail)) => {
                self.audit_logger.log_auth_event(
                    AuthEvent::AuthFailure { cause, detail },
                    credential.username(),
                    context,
                );
                Err(AuthError::Unauthenticated)
            }
        }
    }

    /// Lookup with the internal failure cause preserved
    pub(crate) async fn check(
        &self,
        credential: &Credential,
    ) -> Result<VerifiedIdentity, (FailureCause, Option<String>)> {
        match self
            .store
            .find_by_credential(credential.username(), credential.expose_password())
            .await
        {
            Ok(Some(record)) => Ok(VerifiedIdentity::from_record(&record)),
            Ok(None) => Err((FailureCause::InvalidCredentials, None)),
            Err(e) => Err((FailureCause::StoreUnavailable, Some(e.to_string()))),
        }
    }
}
