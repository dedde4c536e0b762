// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{validate_email, validate_username};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents an account username.
///
/// The username is the sole login identifier for an account and must be
/// unique across the system. Uniqueness is enforced by the persistence
/// layer; this type guarantees only that the value is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username {
    /// The username value (1-150 chars, letters/digits/`@.+-_`).
    value: String,
}

impl Username {
    /// Creates a new `Username` from a raw string.
    ///
    /// Leading and trailing whitespace is stripped before validation.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw username value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUsername` if the value is empty,
    /// longer than 150 characters, or contains forbidden characters.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        validate_username(trimmed)?;
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the username value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents an account email address.
///
/// Only a plausibility check is performed; deliverability is the concern
/// of the mail pipeline, not the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    /// The address value (`local@domain`).
    value: String,
}

impl EmailAddress {
    /// Creates a new `EmailAddress` from a raw string.
    ///
    /// Leading and trailing whitespace is stripped before validation.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw address value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` if the value does not look like
    /// a `local@domain` address with a dotted domain part.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        validate_email(trimmed)?;
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the address value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// The enumerated account types of the portal.
///
/// Roles classify what kind of counterparty an account represents. They
/// carry no authorization semantics: every authenticated operation in the
/// account surface is self-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountRole {
    /// A distributor buying wholesale and reselling downstream.
    Distributor,
    /// A retailer buying through distributors.
    Retailer,
    /// A supplier listing goods on the portal.
    Supplier,
}

impl AccountRole {
    /// Converts this role to its wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Distributor => "distributor",
            Self::Retailer => "retailer",
            Self::Supplier => "supplier",
        }
    }
}

impl FromStr for AccountRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distributor" => Ok(Self::Distributor),
            "retailer" => Ok(Self::Retailer),
            "supplier" => Ok(Self::Supplier),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
