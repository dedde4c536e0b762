// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

/// API request to create a new account.
///
/// This DTO is distinct from domain types and represents the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    /// The requested username.
    pub username: String,
    /// The contact email address.
    pub email: String,
    /// The password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
    /// The account role (wire representation, e.g. "distributor").
    pub role: String,
}

/// API response for a successful signup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignupResponse {
    /// The canonical numeric identifier of the new account.
    pub account_id: i64,
    /// The account username.
    pub username: String,
    /// The contact email address.
    pub email: String,
    /// The account role (wire representation).
    pub role: String,
    /// A success message.
    pub message: String,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
}

/// API request to authenticate an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// The submitted username.
    pub username: String,
    /// The submitted password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The session token to carry in the session cookie.
    pub session_token: String,
    /// The canonical numeric identifier of the account.
    pub account_id: i64,
    /// The account username.
    pub username: String,
    /// The account role (wire representation).
    pub role: String,
    /// The session expiration timestamp (ISO 8601).
    pub expires_at: String,
}

/// API request to change the authenticated account's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePasswordRequest {
    /// The new password.
    pub new_password: String,
    /// The new password confirmation.
    pub new_password_confirmation: String,
}

/// API response for a successful password change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChangePasswordResponse {
    /// A success message.
    pub message: String,
    /// The number of other sessions that were revoked.
    pub revoked_sessions: usize,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
}

/// API request for password-reset instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
    /// The submitted email address. Must be the address on file for the
    /// authenticated account.
    pub email: String,
}

/// API response for an issued password reset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PasswordResetResponse {
    /// The reset token handed to the delivery pipeline.
    pub reset_token: String,
    /// The reset expiration timestamp (ISO 8601).
    pub expires_at: String,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
}
