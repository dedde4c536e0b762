// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Tradepost account system.
//!
//! This crate sits between the HTTP server and the persistence layer. It
//! owns authentication (session issuance and validation), the password
//! policy, and the account operations. Every successful mutation emits
//! exactly one audit event.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedAccount, AuthenticationService};
pub use error::{ApiError, AuthError, translate_domain_error};
pub use handlers::{
    change_password, login, logout, purge_expired_sessions, request_password_reset, signup,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ChangePasswordRequest, ChangePasswordResponse, LoginRequest, LoginResponse,
    PasswordResetRequest, PasswordResetResponse, SignupRequest, SignupResponse,
};
