// Unit tests for token issuance and verification

use attendee_auth::auth::audit_logger::AuditLogger;
use attendee_auth::auth::credential_store::InMemoryCredentialStore;
use attendee_auth::auth::verifier::CredentialVerifier;
use attendee_auth::core::crypto::{KeySource, SigningKey, TokenIssuer, SIGNING_KEY_LENGTH};
use attendee_auth::core::errors::CryptoError;
use attendee_auth::core::models::{Credential, VerifiedIdentity};
use base64::{engine::general_purpose::STANDARD, Engine};
use static_assertions::assert_impl_all;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

assert_impl_all!(TokenIssuer: Send, Sync);
assert_impl_all!(SigningKey: Send, Sync);

/// Identities can only come out of the verifier
async fn verified(username: &str) -> VerifiedIdentity {
    let store = InMemoryCredentialStore::default().with_attendee("1", username, "pw");
    let verifier = CredentialVerifier::new(Arc::new(store), Arc::new(AuditLogger::new(None)));
    verifier.verify(&Credential::new(username, "pw")).await.unwrap()
}

#[tokio::test]
async fn test_same_identity_same_key_same_subject() {
    let issuer = TokenIssuer::ephemeral().unwrap();
    let alice = verified("alice").await;

    let first = issuer.issue(&alice).unwrap();
    let second = issuer.issue(&alice).unwrap();

    assert_eq!(issuer.verify(first.as_str()).unwrap().sub, "alice");
    assert_eq!(issuer.verify(second.as_str()).unwrap().sub, "alice");
    // HS512 over identical claims is deterministic
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_token_from_other_key_fails_verification() {
    let k1 = TokenIssuer::ephemeral().unwrap();
    let k2 = TokenIssuer::ephemeral().unwrap();

    let token = k1.issue(&verified("alice").await).unwrap();

    assert!(k1.verify(token.as_str()).is_ok());
    assert!(matches!(
        k2.verify(token.as_str()),
        Err(CryptoError::VerificationError(_))
    ));
}

#[tokio::test]
async fn test_configured_key_survives_reload() {
    let secret = STANDARD.encode([9u8; SIGNING_KEY_LENGTH]);
    let before_restart = TokenIssuer::new(SigningKey::from_base64(&secret).unwrap());
    let after_restart = TokenIssuer::new(SigningKey::from_base64(&secret).unwrap());

    assert_eq!(before_restart.key_source(), KeySource::Configured);

    let token = before_restart.issue(&verified("alice").await).unwrap();
    assert_eq!(after_restart.verify(token.as_str()).unwrap().sub, "alice");
}

#[tokio::test]
async fn test_key_from_file() {
    let mut key_file = NamedTempFile::new().unwrap();
    writeln!(key_file, "{}", STANDARD.encode([4u8; 96])).unwrap();

    let issuer = TokenIssuer::new(SigningKey::from_file(key_file.path()).unwrap());
    let token = issuer.issue(&verified("bob").await).unwrap();
    assert_eq!(issuer.verify(token.as_str()).unwrap().sub, "bob");
}

#[test]
fn test_key_file_missing() {
    let result = SigningKey::from_file(std::path::Path::new("/nonexistent/signing.key"));
    assert!(matches!(result, Err(CryptoError::KeyLoadError(_))));
}

#[test]
fn test_invalid_base64_key() {
    assert!(matches!(
        SigningKey::from_base64("@@@not-base64@@@"),
        Err(CryptoError::KeyLoadError(_))
    ));
}

#[tokio::test]
async fn test_claims_hold_only_subject() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let issuer = TokenIssuer::ephemeral().unwrap();
    let token = issuer.issue(&verified("alice").await).unwrap();
    let claims_b64 = token.as_str().split('.').nth(1).unwrap();
    let claims: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(claims_b64).unwrap()).unwrap();

    assert_eq!(claims, serde_json::json!({"sub": "alice"}));
}

#[tokio::test]
async fn test_algorithm_swap_rejected() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let issuer = TokenIssuer::ephemeral().unwrap();
    let token = issuer.issue(&verified("alice").await).unwrap();
    let parts: Vec<&str> = token.as_str().split('.').collect();
    let none_header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);

    let forged = format!("{}.{}.{}", none_header, parts[1], parts[2]);
    assert!(issuer.verify(&forged).is_err());

    let unsigned = format!("{}.{}.", none_header, parts[1]);
    assert!(issuer.verify(&unsigned).is_err());
}
