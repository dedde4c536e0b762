// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for login, logout, and session validation.

use tradepost_domain::AccountRole;
use tradepost_persistence::SqlitePersistence;

use crate::tests::helpers::{create_test_cause, signup_test_account};
use crate::{
    ApiError, AuthenticationService, LoginRequest, LoginResponse, login, logout,
    purge_expired_sessions,
};

#[test]
fn test_login_with_correct_credentials() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    signup_test_account(&mut persistence);

    let request = LoginRequest {
        username: String::from("testuser"),
        password: String::from("testpassword"),
    };
    let response: LoginResponse = login(&mut persistence, &request, create_test_cause()).unwrap();

    assert_eq!(response.username, "testuser");
    assert_eq!(response.role, "distributor");
    assert!(!response.session_token.is_empty());

    // The session is valid
    let (authenticated, account) =
        AuthenticationService::validate_session(&mut persistence, &response.session_token)
            .unwrap();
    assert_eq!(authenticated.username, "testuser");
    assert_eq!(authenticated.role, AccountRole::Distributor);
    assert!(account.last_login_at.is_some());
}

#[test]
fn test_login_with_wrong_password() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    signup_test_account(&mut persistence);

    let request = LoginRequest {
        username: String::from("testuser"),
        password: String::from("wrongpassword"),
    };
    let result = login(&mut persistence, &request, create_test_cause());

    assert!(matches!(
        result.unwrap_err(),
        ApiError::AuthenticationFailed { .. }
    ));
}

#[test]
fn test_login_with_unknown_username() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let request = LoginRequest {
        username: String::from("nobody"),
        password: String::from("testpassword"),
    };
    let result = login(&mut persistence, &request, create_test_cause());

    assert!(matches!(
        result.unwrap_err(),
        ApiError::AuthenticationFailed { .. }
    ));
}

#[test]
fn test_login_fails_for_deactivated_account() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    persistence.deactivate_account(account.account_id).unwrap();

    let request = LoginRequest {
        username: String::from("testuser"),
        password: String::from("testpassword"),
    };
    let result = login(&mut persistence, &request, create_test_cause());

    assert!(matches!(
        result.unwrap_err(),
        ApiError::AuthenticationFailed { .. }
    ));
}

#[test]
fn test_login_records_audit_event() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    let request = LoginRequest {
        username: String::from("testuser"),
        password: String::from("testpassword"),
    };
    login(&mut persistence, &request, create_test_cause()).unwrap();

    let events = persistence
        .get_audit_events_for_account(account.account_id)
        .unwrap();
    let actions: Vec<&str> = events.iter().map(|e| e.action.name.as_str()).collect();
    assert_eq!(actions, vec!["Signup", "Login"]);
}

#[test]
fn test_logout_invalidates_session() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    let request = LoginRequest {
        username: String::from("testuser"),
        password: String::from("testpassword"),
    };
    let response = login(&mut persistence, &request, create_test_cause()).unwrap();

    logout(
        &mut persistence,
        &response.session_token,
        &account,
        create_test_cause(),
    )
    .unwrap();

    let result =
        AuthenticationService::validate_session(&mut persistence, &response.session_token);
    assert!(result.is_err());
}

#[test]
fn test_validate_session_rejects_unknown_token() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let result = AuthenticationService::validate_session(&mut persistence, "no-such-token");

    assert!(result.is_err());
}

#[test]
fn test_validate_session_rejects_expired_session() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    persistence
        .create_session("stale-token", account.account_id, "2020-01-01T00:00:00Z")
        .unwrap();

    let result = AuthenticationService::validate_session(&mut persistence, "stale-token");

    assert!(result.is_err());
}

#[test]
fn test_purge_expired_sessions() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    persistence
        .create_session("stale-token", account.account_id, "2020-01-01T00:00:00Z")
        .unwrap();
    persistence
        .create_session("live-token", account.account_id, "2099-01-01T00:00:00Z")
        .unwrap();

    let purged = purge_expired_sessions(&mut persistence).unwrap();

    assert_eq!(purged, 1);
    assert!(
        persistence
            .get_session_by_token("live-token")
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_generated_tokens_are_unique() {
    let first: String = AuthenticationService::generate_token();
    let second: String = AuthenticationService::generate_token();

    assert_eq!(first.len(), 64);
    assert_ne!(first, second);
}
