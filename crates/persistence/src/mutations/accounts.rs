// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account, session, and password-reset mutations.
//!
//! This module contains backend-agnostic mutations for persisting accounts,
//! sessions, and password resets. Most mutations use Diesel DSL, with minimal
//! backend-specific helpers abstracted via the `PersistenceBackend` trait.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{accounts, password_resets, sessions};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new account.
///
/// The password is hashed with bcrypt before it reaches the database;
/// the clear text value is never stored.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The unique username
/// * `email` - The contact email address
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The account role (storage representation)
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateUsername` if the username is taken,
/// or another error if hashing or the insert fails.
pub fn create_account(
    conn: &mut _,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating account with username: {}, role: {}",
        username, role
    );

    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let insert_result: Result<usize, diesel::result::Error> =
        diesel::insert_into(accounts::table)
            .values((
                accounts::username.eq(username),
                accounts::email.eq(email),
                accounts::password_hash.eq(&password_hash),
                accounts::role.eq(role),
            ))
            .execute(conn);

    match insert_result {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(PersistenceError::DuplicateUsername(username.to_string()));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    }

    let account_id: i64 = conn.get_last_insert_rowid()?;

    info!(account_id, "Account created successfully");

    Ok(account_id)
}
}

backend_fn! {
/// Updates the last login timestamp for an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut _, account_id: i64) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for account ID: {}", account_id);

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Updates an account's password.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID
/// * `new_password` - The new password (will be hashed)
///
/// # Errors
///
/// Returns an error if the password cannot be hashed or the update fails.
pub fn update_password(
    conn: &mut _,
    account_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for account ID: {}", account_id);

    // Hash the new password using bcrypt
    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::password_hash.eq(&password_hash))
        .execute(conn)?;

    info!("Password updated for account ID: {}", account_id);
    Ok(())
}
}

backend_fn! {
/// Deactivates an account.
///
/// Deactivated accounts fail authentication and session validation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn deactivate_account(conn: &mut _, account_id: i64) -> Result<(), PersistenceError> {
    info!("Deactivating account ID: {}", account_id);

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::is_active.eq(0))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Reactivates a deactivated account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn reactivate_account(conn: &mut _, account_id: i64) -> Result<(), PersistenceError> {
    info!("Reactivating account ID: {}", account_id);

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::is_active.eq(1))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Creates a new session for an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `account_id` - The account ID
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    account_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for account ID: {} with expiration: {}",
        account_id, expires_at
    );

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;

    debug!(session_id, account_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Updates the last activity timestamp for a session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_id` - The session ID
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    debug!("Updating last_activity_at for session ID: {}", session_id);

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes a session by token.
///
/// This is used for logout operations.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The session token to delete
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes all sessions for a specific account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID whose sessions should be deleted
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_sessions_for_account(
    conn: &mut _,
    account_id: i64,
) -> Result<usize, PersistenceError> {
    info!("Deleting all sessions for account ID: {}", account_id);

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::account_id.eq(account_id))
        .execute(conn)?;

    info!(
        "Deleted {} sessions for account ID: {}",
        rows_affected, account_id
    );
    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes all sessions for an account except the one with the given token.
///
/// This is used when a password is changed: every other device is signed
/// out while the session that performed the change stays valid.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID whose sessions should be deleted
/// * `keep_token` - The session token to leave in place
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_other_sessions_for_account(
    conn: &mut _,
    account_id: i64,
    keep_token: &str,
) -> Result<usize, PersistenceError> {
    info!("Deleting other sessions for account ID: {}", account_id);

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::account_id.eq(account_id))
        .filter(sessions::session_token.ne(keep_token))
        .execute(conn)?;

    info!(
        "Deleted {} other sessions for account ID: {}",
        rows_affected, account_id
    );
    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes all sessions that expired before the given instant.
///
/// This is a cleanup operation that should be run periodically. The
/// caller supplies `now` formatted the same way as `expires_at` so the
/// comparison stays well-defined across backends.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The current instant (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    debug!("Deleting expired sessions");

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
}

backend_fn! {
/// Creates a new password reset for an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `reset_token` - The unique reset token
/// * `account_id` - The account ID
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the reset cannot be created.
pub fn create_password_reset(
    conn: &mut _,
    reset_token: &str,
    account_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating password reset for account ID: {} with expiration: {}",
        account_id, expires_at
    );

    diesel::insert_into(password_resets::table)
        .values((
            password_resets::reset_token.eq(reset_token),
            password_resets::account_id.eq(account_id),
            password_resets::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let reset_id: i64 = conn.get_last_insert_rowid()?;

    debug!(reset_id, account_id, "Password reset created");
    Ok(reset_id)
}
}
