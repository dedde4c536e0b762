// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for password management functionality.

use tradepost_persistence::SqlitePersistence;

use crate::tests::helpers::{create_test_cause, signup_test_account};
use crate::{ApiError, ChangePasswordRequest, LoginRequest, change_password, login};

#[test]
fn test_account_can_change_own_password() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    let request = ChangePasswordRequest {
        new_password: String::from("newpassword"),
        new_password_confirmation: String::from("newpassword"),
    };

    let response = change_password(
        &mut persistence,
        &request,
        &account,
        "current-session-token",
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(
        response.message,
        "Your password has been successfully changed."
    );

    // The stored credential was updated
    let updated = persistence
        .get_account_by_id(account.account_id)
        .unwrap()
        .unwrap();
    assert!(
        persistence
            .verify_password("newpassword", &updated.password_hash)
            .unwrap()
    );
    assert!(
        !persistence
            .verify_password("testpassword", &updated.password_hash)
            .unwrap()
    );
}

#[test]
fn test_change_password_enforces_policy() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    // Confirmation mismatch
    let request = ChangePasswordRequest {
        new_password: String::from("newpassword"),
        new_password_confirmation: String::from("wrongpassword"),
    };
    let result = change_password(
        &mut persistence,
        &request,
        &account,
        "current-session-token",
        create_test_cause(),
    );
    assert!(matches!(
        result.unwrap_err(),
        ApiError::PasswordPolicyViolation { .. }
    ));

    // Too short
    let request = ChangePasswordRequest {
        new_password: String::from("short"),
        new_password_confirmation: String::from("short"),
    };
    let result = change_password(
        &mut persistence,
        &request,
        &account,
        "current-session-token",
        create_test_cause(),
    );
    assert!(matches!(
        result.unwrap_err(),
        ApiError::PasswordPolicyViolation { .. }
    ));

    // The stored credential is unchanged
    let unchanged = persistence
        .get_account_by_id(account.account_id)
        .unwrap()
        .unwrap();
    assert!(
        persistence
            .verify_password("testpassword", &unchanged.password_hash)
            .unwrap()
    );
}

#[test]
fn test_change_password_revokes_other_sessions() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    // Two live sessions: this device and another one
    let current = login(
        &mut persistence,
        &LoginRequest {
            username: String::from("testuser"),
            password: String::from("testpassword"),
        },
        create_test_cause(),
    )
    .unwrap();
    let other = login(
        &mut persistence,
        &LoginRequest {
            username: String::from("testuser"),
            password: String::from("testpassword"),
        },
        create_test_cause(),
    )
    .unwrap();

    let request = ChangePasswordRequest {
        new_password: String::from("newpassword"),
        new_password_confirmation: String::from("newpassword"),
    };
    let response = change_password(
        &mut persistence,
        &request,
        &account,
        &current.session_token,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.revoked_sessions, 1);
    assert!(
        persistence
            .get_session_by_token(&current.session_token)
            .unwrap()
            .is_some()
    );
    assert!(
        persistence
            .get_session_by_token(&other.session_token)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_change_password_records_audit_event() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let account = signup_test_account(&mut persistence);

    let request = ChangePasswordRequest {
        new_password: String::from("newpassword"),
        new_password_confirmation: String::from("newpassword"),
    };
    let response = change_password(
        &mut persistence,
        &request,
        &account,
        "current-session-token",
        create_test_cause(),
    )
    .unwrap();

    let event = persistence.get_audit_event(response.event_id).unwrap();
    assert_eq!(event.action.name, "ChangePassword");
    assert_eq!(event.actor.account_id, Some(account.account_id));
}
