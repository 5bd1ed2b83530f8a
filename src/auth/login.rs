// Login flow: verify credentials, then mint a bearer token

use crate::auth::audit_logger::RequestContext;
use crate::auth::verifier::CredentialVerifier;
use crate::core::crypto::TokenIssuer;
use crate::core::errors::AuthError;
use crate::core::models::{Credential, Token};
use std::sync::Arc;
use tracing::error;

/// Composes the verifier and the issuer into one login attempt
#[derive(Clone)]
pub struct LoginService {
    verifier: CredentialVerifier,
    issuer: Arc<TokenIssuer>,
}

impl LoginService {
    pub fn new(verifier: CredentialVerifier, issuer: Arc<TokenIssuer>) -> Self {
        Self { verifier, issuer }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Run one login attempt
    ///
    /// Returns `AuthError::Unauthenticated` when the credential is rejected and
    /// `AuthError::Crypto` when signing fails. A token is only minted after
    /// the verifier accepted the credential.
    pub async fn login(
        &self,
        credential: &Credential,
        context: &RequestContext,
    ) -> Result<Token, AuthError> {
        let identity = self.verifier.verify_with_context(credential, context).await?;

        self.issuer.issue(&identity).map_err(|e| {
            error!(
                error = %e,
                username = %identity.username(),
                request_id = ?context.request_id,
                "Token signing failed"
            );
            AuthError::Crypto(e)
        })
    }
}
