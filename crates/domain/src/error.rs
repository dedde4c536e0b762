// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Username is empty, too long, or contains forbidden characters.
    InvalidUsername(String),
    /// Email address is not a plausible `local@domain` value.
    InvalidEmail(String),
    /// Account role is not one of the enumerated values.
    InvalidRole(String),
    /// An account with this username already exists.
    DuplicateUsername {
        /// The username that collided.
        username: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername(msg) => write!(f, "Invalid username: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email address: {msg}"),
            Self::InvalidRole(value) => write!(f, "Invalid account role: {value}"),
            Self::DuplicateUsername { username } => {
                write!(f, "An account with username '{username}' already exists")
            }
        }
    }
}

impl std::error::Error for DomainError {}
