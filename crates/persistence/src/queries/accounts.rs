// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account, session, and password-reset queries.
//!
//! This module contains backend-agnostic queries for retrieving accounts,
//! sessions, and password resets. All queries use Diesel DSL and work
//! across all supported database backends.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{AccountData, PasswordResetData, SessionData};
use crate::diesel_schema::{accounts, password_resets, sessions};
use crate::error::PersistenceError;

/// Diesel Queryable struct for account rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = accounts)]
struct AccountRow {
    account_id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: i32,
    created_at: String,
    last_login_at: Option<String>,
}

impl AccountRow {
    fn into_data(self) -> AccountData {
        AccountData {
            account_id: self.account_id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            is_active: self.is_active != 0,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        }
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    account_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl SessionRow {
    fn into_data(self) -> SessionData {
        SessionData {
            session_id: self.session_id,
            session_token: self.session_token,
            account_id: self.account_id,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
            expires_at: self.expires_at,
        }
    }
}

/// Diesel Queryable struct for password-reset rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = password_resets)]
struct PasswordResetRow {
    reset_id: i64,
    reset_token: String,
    account_id: i64,
    created_at: String,
    expires_at: String,
    consumed_at: Option<String>,
}

impl PasswordResetRow {
    fn into_data(self) -> PasswordResetData {
        PasswordResetData {
            reset_id: self.reset_id,
            reset_token: self.reset_token,
            account_id: self.account_id,
            created_at: self.created_at,
            expires_at: self.expires_at,
            consumed_at: self.consumed_at,
        }
    }
}

backend_fn! {
/// Retrieves an account by username.
///
/// The lookup is an exact match: usernames are stored as submitted.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The username to search for
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_username(
    conn: &mut _,
    username: &str,
) -> Result<Option<AccountData>, PersistenceError> {
    debug!("Looking up account by username: {}", username);

    let result: Result<AccountRow, diesel::result::Error> = accounts::table
        .filter(accounts::username.eq(username))
        .select(AccountRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves an account by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_id(
    conn: &mut _,
    account_id: i64,
) -> Result<Option<AccountData>, PersistenceError> {
    debug!("Looking up account by ID: {}", account_id);

    let result: Result<AccountRow, diesel::result::Error> = accounts::table
        .filter(accounts::account_id.eq(account_id))
        .select(AccountRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves a session by token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The session token
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut _,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let result: Result<SessionRow, diesel::result::Error> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves a password reset by token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `reset_token` - The reset token
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the reset is not found.
pub fn get_password_reset_by_token(
    conn: &mut _,
    reset_token: &str,
) -> Result<Option<PasswordResetData>, PersistenceError> {
    debug!("Looking up password reset by token");

    let result: Result<PasswordResetRow, diesel::result::Error> = password_resets::table
        .filter(password_resets::reset_token.eq(reset_token))
        .select(PasswordResetRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Counts the total number of accounts.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_accounts(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    debug!("Counting accounts");

    let count: i64 = accounts::table
        .select(count(accounts::account_id))
        .first(conn)?;

    debug!("Total accounts: {}", count);
    Ok(count)
}
}

/// Verifies a password against a stored hash.
///
/// This is a backend-agnostic utility function that uses bcrypt.
///
/// # Arguments
///
/// * `password` - The plain text password to verify
/// * `password_hash` - The stored bcrypt hash
///
/// # Errors
///
/// Returns an error if password verification fails.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
