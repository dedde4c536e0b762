// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication for the server.
//!
//! This module provides Axum extractors for validating the session cookie
//! and enforcing authentication at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use tradepost_api::{AuthenticatedAccount, AuthenticationService};
use tradepost_persistence::AccountData;

use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sessionid";

/// Extractor for authenticated accounts.
///
/// This extractor validates the session token from the session cookie and
/// returns the authenticated account context along with the token itself
/// (needed by logout and change-password, which operate on the session).
///
/// # Authentication Flow
///
/// 1. Extract the `sessionid` value from the `Cookie` header
/// 2. Validate the token via `AuthenticationService::validate_session`
/// 3. Check session expiration
/// 4. Check account disabled status
/// 5. Return `AuthenticatedAccount`, `AccountData`, and the token
///
/// # Errors
///
/// Rejects with a 302 redirect to `/login` if:
/// - The cookie is missing
/// - The session token is invalid or expired
/// - The account is disabled
pub struct SessionAccount(pub AuthenticatedAccount, pub AccountData, pub String);

impl FromRequestParts<AppState> for SessionAccount {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract session token from the Cookie header
        let token: String = session_token_from_parts(parts).ok_or_else(|| {
            debug!("No session cookie on request");
            SessionError::MissingSession
        })?;

        // Validate session
        let mut persistence = state.persistence.lock().await;
        let (account, data) = AuthenticationService::validate_session(&mut persistence, &token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;

        debug!(
            username = %data.username,
            role = %account.role,
            "Session validated successfully"
        );

        Ok(Self(account, data, token))
    }
}

/// Extractor for pages that render differently for signed-in visitors but
/// do not require authentication (the homepage).
pub struct MaybeSessionAccount(pub Option<SessionAccount>);

impl FromRequestParts<AppState> for MaybeSessionAccount {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(
            SessionAccount::from_request_parts(parts, state).await.ok(),
        ))
    }
}

/// Reads the session token out of the `Cookie` header, if present.
fn session_token_from_parts(parts: &Parts) -> Option<String> {
    let header_value: &str = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    header_value.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Session extraction errors.
///
/// For a browser-facing application an unauthenticated request is not an
/// error page: the visitor is redirected to the login form.
#[derive(Debug)]
pub enum SessionError {
    /// No session cookie was presented.
    MissingSession,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingSession | Self::InvalidSession(_) => (
                StatusCode::FOUND,
                [(header::LOCATION, "/login")],
            )
                .into_response(),
        }
    }
}
