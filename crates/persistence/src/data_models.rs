// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A persisted account record.
///
/// The password is present only as a bcrypt hash; the clear text value is
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    /// The canonical numeric identifier.
    pub account_id: i64,
    /// The unique username.
    pub username: String,
    /// The contact email address.
    pub email: String,
    /// The bcrypt hash of the password.
    pub password_hash: String,
    /// The account role (storage representation).
    pub role: String,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Timestamp of the most recent successful login.
    pub last_login_at: Option<String>,
}

/// A persisted session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// The canonical numeric identifier.
    pub session_id: i64,
    /// The opaque session token carried by the client.
    pub session_token: String,
    /// The account this session belongs to.
    pub account_id: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Timestamp of the most recent validated request.
    pub last_activity_at: String,
    /// Expiration timestamp (ISO 8601).
    pub expires_at: String,
}

/// A persisted password-reset record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetData {
    /// The canonical numeric identifier.
    pub reset_id: i64,
    /// The opaque reset token delivered out of band.
    pub reset_token: String,
    /// The account this reset belongs to.
    pub account_id: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiration timestamp (ISO 8601).
    pub expires_at: String,
    /// Timestamp at which the token was used, if it has been.
    pub consumed_at: Option<String>,
}

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
    pub account_id: Option<i64>,
    pub username: Option<String>,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}
