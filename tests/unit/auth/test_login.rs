// Unit tests for the login flow

use crate::common::*;
use attendee_auth::auth::audit_logger::RequestContext;
use attendee_auth::core::crypto::TokenIssuer;
use attendee_auth::core::errors::AuthError;
use attendee_auth::core::models::Credential;
use std::sync::Arc;

#[tokio::test]
async fn test_login_returns_bearer_token_for_valid_credentials() {
    let app_state = create_test_app_state(&[("1", "bob", "pw1")]);

    let token = app_state
        .login
        .login(&Credential::new("bob", "pw1"), &RequestContext::default())
        .await
        .unwrap();

    assert!(!token.as_str().is_empty());
    assert!(token.bearer().starts_with("Bearer "));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app_state = create_test_app_state(&[("1", "bob", "pw1")]);

    let result = app_state
        .login
        .login(&Credential::new("bob", "pw2"), &RequestContext::default())
        .await;

    assert!(matches!(result, Err(AuthError::Unauthenticated)));
}

#[tokio::test]
async fn test_store_outage_rejects_without_token() {
    let app_state = create_app_state(
        Arc::new(MockCredentialStore::failing()),
        Arc::new(TokenIssuer::ephemeral().unwrap()),
    );

    let result = app_state
        .login
        .login(&Credential::new("bob", "pw1"), &RequestContext::default())
        .await;

    assert!(matches!(result, Err(AuthError::Unauthenticated)));
}

#[tokio::test]
async fn test_concurrent_logins_share_one_key() {
    let app_state = create_test_app_state(&[("1", "alice", "secret"), ("2", "bob", "pw1")]);

    let mut handles = Vec::new();
    for i in 0..16 {
        let login = app_state.login.clone();
        let (username, password) = if i % 2 == 0 { ("alice", "secret") } else { ("bob", "pw1") };
        handles.push(tokio::spawn(async move {
            login
                .login(&Credential::new(username, password), &RequestContext::default())
                .await
                .map(|token| (username, token))
        }));
    }

    for handle in handles {
        let (username, token) = handle.await.unwrap().unwrap();
        let claims = app_state.login.issuer().verify(token.as_str()).unwrap();
        assert_eq!(claims.sub, username);
    }
}
