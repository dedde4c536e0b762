// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the account operations.

use std::str::FromStr;

use time::OffsetDateTime;
use tracing::info;
use tradepost_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use tradepost_domain::{AccountRole, DomainError, validate_email, validate_username};
use tradepost_persistence::{AccountData, PersistenceError, SqlitePersistence};

use crate::auth::AuthenticationService;
use crate::error::{ApiError, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ChangePasswordRequest, ChangePasswordResponse, LoginRequest, LoginResponse,
    PasswordResetRequest, PasswordResetResponse, SignupRequest, SignupResponse,
};

/// Creates a new account.
///
/// Validates the username, email, role, and password policy, creates the
/// account, and emits a `Signup` audit event attributed to the new account.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The signup request
/// * `cause` - The cause for this action
///
/// # Errors
///
/// Returns an error if:
/// - The username or email is malformed
/// - The role is not one of the enumerated values
/// - The password violates policy or the confirmation does not match
/// - The username is already taken
/// - Database operations fail
pub fn signup(
    persistence: &mut SqlitePersistence,
    request: &SignupRequest,
    cause: Cause,
) -> Result<SignupResponse, ApiError> {
    // Validate field shapes
    validate_username(&request.username).map_err(translate_domain_error)?;
    validate_email(&request.email).map_err(translate_domain_error)?;

    let role: AccountRole =
        AccountRole::from_str(&request.role).map_err(translate_domain_error)?;

    // Validate password policy
    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.password,
        &request.password_confirmation,
        &request.username,
        &request.email,
    )?;

    // Create account with validated fields
    let account_id: i64 = match persistence.create_account(
        &request.username,
        &request.email,
        &request.password,
        role.as_str(),
    ) {
        Ok(account_id) => account_id,
        Err(PersistenceError::DuplicateUsername(username)) => {
            return Err(translate_domain_error(DomainError::DuplicateUsername {
                username,
            }));
        }
        Err(e) => {
            return Err(ApiError::Internal {
                message: format!("Failed to create account: {e}"),
            });
        }
    };

    // Create audit event for account creation
    let actor: Actor = Actor::with_account(account_id, request.username.clone());
    let action: Action = Action::new(
        String::from("Signup"),
        Some(format!(
            "Created account {} with role {}",
            request.username, role
        )),
    );
    let before: StateSnapshot = StateSnapshot::new(String::from("account_does_not_exist"));
    let after: StateSnapshot = StateSnapshot::new(format!(
        "account_id={account_id},username={},role={role}",
        request.username
    ));
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

    let event_id: i64 =
        persistence
            .persist_audit_event(&audit_event)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to persist audit event: {e}"),
            })?;

    info!(
        account_id,
        username = %request.username,
        role = %role,
        "Account created"
    );

    Ok(SignupResponse {
        account_id,
        username: request.username.clone(),
        email: request.email.clone(),
        role: role.as_str().to_string(),
        message: format!("Created account {}", request.username),
        event_id,
    })
}

/// Authenticates an account and starts a session.
///
/// Emits a `Login` audit event on success. Failed attempts emit nothing:
/// there is no authenticated actor to attribute them to.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The login request
/// * `cause` - The cause for this action
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` on any credential mismatch.
/// The reason never distinguishes unknown-user from wrong-password.
pub fn login(
    persistence: &mut SqlitePersistence,
    request: &LoginRequest,
    cause: Cause,
) -> Result<LoginResponse, ApiError> {
    let (session_token, authenticated, account) =
        AuthenticationService::login(persistence, &request.username, &request.password)?;

    // Get session expiration from the session we just created
    let session = persistence
        .get_session_by_token(&session_token)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to retrieve session: {e}"),
        })?;

    let expires_at: String = session
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    // Create audit event for the login
    let actor: Actor = Actor::with_account(account.account_id, account.username.clone());
    let action: Action = Action::new(String::from("Login"), None);
    let before: StateSnapshot = StateSnapshot::new(String::from("logged_out"));
    let after: StateSnapshot = StateSnapshot::new(format!(
        "account_id={},session_established",
        account.account_id
    ));
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

    persistence
        .persist_audit_event(&audit_event)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to persist audit event: {e}"),
        })?;

    info!(
        account_id = account.account_id,
        username = %account.username,
        "Login succeeded"
    );

    Ok(LoginResponse {
        session_token,
        account_id: account.account_id,
        username: account.username,
        role: authenticated.role.as_str().to_string(),
        expires_at,
    })
}

/// Logs out by deleting the session.
///
/// Emits a `Logout` audit event attributed to the account.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `session_token` - The session token to delete
/// * `account` - The account data from the validated session
/// * `cause` - The cause for this action
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(
    persistence: &mut SqlitePersistence,
    session_token: &str,
    account: &AccountData,
    cause: Cause,
) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;

    let actor: Actor = Actor::with_account(account.account_id, account.username.clone());
    let action: Action = Action::new(String::from("Logout"), None);
    let before: StateSnapshot = StateSnapshot::new(format!(
        "account_id={},session_established",
        account.account_id
    ));
    let after: StateSnapshot = StateSnapshot::new(String::from("logged_out"));
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

    persistence
        .persist_audit_event(&audit_event)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to persist audit event: {e}"),
        })?;

    info!(account_id = account.account_id, "Logout succeeded");

    Ok(())
}

/// Changes the authenticated account's password.
///
/// Validates the new password against policy, replaces the stored hash,
/// revokes every other session for the account (the session performing the
/// change stays valid), and emits a `ChangePassword` audit event.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The change password request
/// * `account` - The account data from the validated session
/// * `session_token` - The session performing the change (kept alive)
/// * `cause` - The cause for this action
///
/// # Errors
///
/// Returns an error if:
/// - The new password violates policy or the confirmation does not match
/// - Database operations fail
pub fn change_password(
    persistence: &mut SqlitePersistence,
    request: &ChangePasswordRequest,
    account: &AccountData,
    session_token: &str,
    cause: Cause,
) -> Result<ChangePasswordResponse, ApiError> {
    // Validate new password policy
    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.new_password,
        &request.new_password_confirmation,
        &account.username,
        &account.email,
    )?;

    // Update password
    persistence
        .update_password(account.account_id, &request.new_password)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to update password: {e}"),
        })?;

    // Revoke every other session for this account
    let revoked_sessions: usize = persistence
        .delete_other_sessions_for_account(account.account_id, session_token)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to revoke sessions: {e}"),
        })?;

    // Create audit event for password change
    let actor: Actor = Actor::with_account(account.account_id, account.username.clone());
    let action: Action = Action::new(
        String::from("ChangePassword"),
        Some(format!(
            "Account {} changed its own password",
            account.username
        )),
    );
    let account_id = account.account_id;
    let before: StateSnapshot = StateSnapshot::new(format!("account_id={account_id}"));
    let after: StateSnapshot =
        StateSnapshot::new(format!("account_id={account_id},password_changed"));
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

    let event_id: i64 =
        persistence
            .persist_audit_event(&audit_event)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to persist audit event: {e}"),
            })?;

    info!(
        account_id,
        revoked_sessions, "Password changed successfully"
    );

    Ok(ChangePasswordResponse {
        message: String::from("Your password has been successfully changed."),
        revoked_sessions,
        event_id,
    })
}

/// Issues a password reset for the authenticated account.
///
/// The submitted address must be the one on file. The reset token is
/// returned to the caller for hand-off to the delivery pipeline; this
/// layer never sends mail itself.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The reset request
/// * `account` - The account data from the validated session
/// * `cause` - The cause for this action
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the address is not the one on
/// file, or another error if database operations fail.
pub fn request_password_reset(
    persistence: &mut SqlitePersistence,
    request: &PasswordResetRequest,
    account: &AccountData,
    cause: Cause,
) -> Result<PasswordResetResponse, ApiError> {
    // Only the address on file may request a reset for this account
    if !request.email.eq_ignore_ascii_case(&account.email) {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: String::from("Address does not match the account"),
        });
    }

    // Generate reset token
    let reset_token: String = AuthenticationService::generate_token();

    let expires_at: OffsetDateTime =
        OffsetDateTime::now_utc() + AuthenticationService::RESET_EXPIRATION;
    let expires_at_str: String = AuthenticationService::format_timestamp(expires_at)
        .map_err(ApiError::from)?;

    persistence
        .create_password_reset(&reset_token, account.account_id, &expires_at_str)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to create password reset: {e}"),
        })?;

    // Create audit event for the reset request
    let actor: Actor = Actor::with_account(account.account_id, account.username.clone());
    let action: Action = Action::new(
        String::from("RequestPasswordReset"),
        Some(format!("Reset instructions requested for {}", account.email)),
    );
    let account_id = account.account_id;
    let before: StateSnapshot = StateSnapshot::new(format!("account_id={account_id}"));
    let after: StateSnapshot =
        StateSnapshot::new(format!("account_id={account_id},reset_pending"));
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

    let event_id: i64 =
        persistence
            .persist_audit_event(&audit_event)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to persist audit event: {e}"),
            })?;

    info!(account_id, "Password reset issued");

    Ok(PasswordResetResponse {
        reset_token,
        expires_at: expires_at_str,
        event_id,
    })
}

/// Deletes all expired sessions.
///
/// This is a maintenance operation, run at server startup.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
///
/// # Returns
///
/// The number of sessions removed.
///
/// # Errors
///
/// Returns an error if the cleanup fails.
pub fn purge_expired_sessions(persistence: &mut SqlitePersistence) -> Result<usize, ApiError> {
    let now: String = AuthenticationService::format_timestamp(OffsetDateTime::now_utc())
        .map_err(ApiError::from)?;

    let purged: usize = persistence
        .delete_expired_sessions(&now)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to purge expired sessions: {e}"),
        })?;

    if purged > 0 {
        info!(purged, "Purged expired sessions");
    }

    Ok(purged)
}
