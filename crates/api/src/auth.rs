// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication types and the session service.

use std::str::FromStr;

use time::{Duration, OffsetDateTime};
use tradepost_domain::AccountRole;
use tradepost_persistence::{AccountData, PersistenceError, SessionData, SqlitePersistence};

use crate::error::AuthError;

/// A known-good bcrypt hash that matches no password in use.
///
/// When a login names an unknown account, the submitted password is
/// verified against this hash so the unknown-user and wrong-password
/// paths cost the same amount of work.
const DUMMY_PASSWORD_HASH: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// An authenticated account attached to a validated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    /// The canonical numeric identifier.
    pub account_id: i64,
    /// The account username.
    pub username: String,
    /// The account role.
    pub role: AccountRole,
}

impl AuthenticatedAccount {
    /// Creates a new authenticated account.
    ///
    /// # Arguments
    ///
    /// * `account_id` - The canonical numeric identifier
    /// * `username` - The account username
    /// * `role` - The account role
    #[must_use]
    pub const fn new(account_id: i64, username: String, role: AccountRole) -> Self {
        Self {
            account_id,
            username,
            role,
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (14 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(14);

    /// Password reset token expiration duration (1 hour).
    pub const RESET_EXPIRATION: Duration = Duration::hours(1);

    /// Authenticates an account by username and password and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `username` - The submitted username
    /// * `password` - The submitted password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_account`, `account_data`)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the username is
    /// unknown, the password does not match, or the account is disabled.
    /// The reasons differ for logging; callers presenting the failure to a
    /// user must collapse them into one generic message.
    pub fn login(
        persistence: &mut SqlitePersistence,
        username: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedAccount, AccountData), AuthError> {
        // Retrieve account by username
        let account: Option<AccountData> = persistence
            .get_account_by_username(username)
            .map_err(Self::map_persistence_error)?;

        let Some(account) = account else {
            // Burn a verification against the dummy hash so this path is
            // not observably faster than a wrong password.
            let _ = persistence.verify_password(password, DUMMY_PASSWORD_HASH);
            return Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown account: {username}"),
            });
        };

        // Verify password before any other checks
        let password_valid: bool = persistence
            .verify_password(password, &account.password_hash)
            .map_err(Self::map_persistence_error)?;

        if !password_valid {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Password mismatch"),
            });
        }

        // Check if account is disabled
        if !account.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let authenticated: AuthenticatedAccount = Self::to_authenticated(&account)?;

        // Generate session token
        let session_token: String = Self::generate_token();

        // Calculate expiration time
        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = Self::format_timestamp(expires_at)?;

        // Create session
        persistence
            .create_session(&session_token, account.account_id, &expires_at_str)
            .map_err(Self::map_persistence_error)?;

        // Update last login timestamp
        persistence
            .update_last_login(account.account_id)
            .map_err(Self::map_persistence_error)?;

        Ok((session_token, authenticated, account))
    }

    /// Validates a session token and returns the authenticated account.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_account`, `account_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or the
    /// account is disabled.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(AuthenticatedAccount, AccountData), AuthError> {
        // Retrieve session
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        // Check if session is expired
        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        // Retrieve account
        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        // Check if account is disabled
        if !account.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let authenticated: AuthenticatedAccount = Self::to_authenticated(&account)?;

        // Update session activity
        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((authenticated, account))
    }

    /// Logs out by deleting the session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to delete
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates an opaque session or reset token.
    ///
    /// Tokens are 256 bits of OS-provided randomness rendered as hex.
    #[must_use]
    pub fn generate_token() -> String {
        let parts: [u64; 4] = [
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
        ];
        format!(
            "{:016x}{:016x}{:016x}{:016x}",
            parts[0], parts[1], parts[2], parts[3]
        )
    }

    /// Formats a timestamp in the ISO 8601 layout used across the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, AuthError> {
        timestamp
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format timestamp: {e}"),
            })
    }

    /// Builds the authenticated view of an account record.
    fn to_authenticated(account: &AccountData) -> Result<AuthenticatedAccount, AuthError> {
        let role: AccountRole =
            AccountRole::from_str(&account.role).map_err(|_| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {}", account.role),
            })?;

        Ok(AuthenticatedAccount::new(
            account.account_id,
            account.username.clone(),
            role,
        ))
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionExpired(msg) | PersistenceError::SessionNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}
