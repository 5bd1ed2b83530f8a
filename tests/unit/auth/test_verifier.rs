// Unit tests for credential verification

use crate::common::*;
use attendee_auth::core::errors::AuthError;
use attendee_auth::core::models::Credential;
use std::sync::Arc;

#[tokio::test]
async fn test_unmatched_pairs_are_unauthenticated() {
    let store = Arc::new(MockCredentialStore::default().with_attendee("1", "alice", "secret"));
    let verifier = create_verifier(store);

    let pairs = [
        ("alice", "wrong"),
        ("bob", "secret"),
        ("", ""),
        ("alice", ""),
        ("", "secret"),
        ("ALICE", "secret"),
    ];
    for (username, password) in pairs {
        let result = verifier.verify(&Credential::new(username, password)).await;
        assert!(
            matches!(result, Err(AuthError::Unauthenticated)),
            "({:?}, {:?}) should be rejected",
            username,
            password
        );
    }
}

#[tokio::test]
async fn test_matching_pair_yields_identity() {
    let store = Arc::new(MockCredentialStore::default().with_attendee("1", "alice", "secret"));
    let verifier = create_verifier(store);

    let identity = verifier
        .verify(&Credential::new("alice", "secret"))
        .await
        .unwrap();
    assert_eq!(identity.username(), "alice");

    assert!(verifier.verify(&Credential::new("alice", "wrong")).await.is_err());
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
    let store = Arc::new(MockCredentialStore::default().with_attendee("1", "alice", "secret"));
    let verifier = create_verifier(store);

    let unknown_user = verifier
        .verify(&Credential::new("mallory", "secret"))
        .await
        .unwrap_err();
    let wrong_password = verifier
        .verify(&Credential::new("alice", "guess"))
        .await
        .unwrap_err();

    assert!(matches!(unknown_user, AuthError::Unauthenticated));
    assert!(matches!(wrong_password, AuthError::Unauthenticated));
    assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    assert_eq!(unknown_user.status_code(), wrong_password.status_code());
    assert_eq!(unknown_user.user_message(), wrong_password.user_message());
}

#[tokio::test]
async fn test_store_failure_collapses_to_unauthenticated() {
    let store = Arc::new(MockCredentialStore::failing());
    let verifier = create_verifier(store.clone());

    let err = verifier
        .verify(&Credential::new("alice", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unauthenticated));
    assert!(!err.user_message().contains("Database"));
    assert_eq!(store.lookup_count(), 1);
}

#[tokio::test]
async fn test_verify_reads_store_exactly_once() {
    let store = Arc::new(MockCredentialStore::default().with_attendee("1", "alice", "secret"));
    let verifier = create_verifier(store.clone());

    verifier.verify(&Credential::new("alice", "secret")).await.unwrap();
    assert_eq!(store.lookup_count(), 1);
}
