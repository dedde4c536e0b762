// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The signup form.

use serde::Deserialize;
use std::str::FromStr;

use tradepost_domain::{
    AccountRole, DomainError, EmailAddress, Username, validate_email, validate_username,
};

use crate::errors::{
    FormErrors, INVALID_EMAIL, INVALID_USERNAME, PASSWORD_MISMATCH, REQUIRED_FIELD,
};
use crate::present;

/// Raw signup submission, as received from the form-encoded request body.
///
/// Every field is optional so a partially filled form deserializes
/// cleanly; validation decides what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    /// The requested username.
    pub username: Option<String>,
    /// The password.
    pub password1: Option<String>,
    /// The password confirmation.
    pub password2: Option<String>,
    /// The contact email address.
    pub email: Option<String>,
    /// The account type.
    #[serde(rename = "type")]
    pub role: Option<String>,
}

/// Validated signup data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupData {
    /// The requested username.
    pub username: Username,
    /// The plain-text password (hashed by the persistence layer).
    pub password: String,
    /// The contact email address.
    pub email: EmailAddress,
    /// The account type.
    pub role: AccountRole,
}

impl SignupForm {
    /// Validates the submission.
    ///
    /// Field errors are collected in form-field order so the page can
    /// render every problem at once rather than one per round trip.
    /// An unrecognized `type` value is reported as missing input: the
    /// select element only offers the enumerated roles, so anything else
    /// did not come from the form.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` with one message per invalid field.
    pub fn validate(&self) -> Result<SignupData, FormErrors> {
        let mut errors: FormErrors = FormErrors::new();

        let username: Option<Username> = match present(self.username.as_ref()) {
            None => {
                errors.add("username", REQUIRED_FIELD);
                None
            }
            Some(value) => match validate_username(value) {
                Ok(()) => Username::new(value).ok(),
                Err(DomainError::InvalidUsername(_)) => {
                    errors.add("username", INVALID_USERNAME);
                    None
                }
                Err(_) => None,
            },
        };

        let password: Option<&str> = present(self.password1.as_ref());
        if password.is_none() {
            errors.add("password1", REQUIRED_FIELD);
        }

        match present(self.password2.as_ref()) {
            None => errors.add("password2", REQUIRED_FIELD),
            Some(confirmation) => {
                if let Some(password) = password
                    && password != confirmation
                {
                    errors.add("password2", PASSWORD_MISMATCH);
                }
            }
        }

        let email: Option<EmailAddress> = match present(self.email.as_ref()) {
            None => {
                errors.add("email", REQUIRED_FIELD);
                None
            }
            Some(value) => match validate_email(value) {
                Ok(()) => EmailAddress::new(value).ok(),
                Err(_) => {
                    errors.add("email", INVALID_EMAIL);
                    None
                }
            },
        };

        let role: Option<AccountRole> = match present(self.role.as_ref()) {
            None => {
                errors.add("type", REQUIRED_FIELD);
                None
            }
            Some(value) => match AccountRole::from_str(value) {
                Ok(role) => Some(role),
                Err(_) => {
                    errors.add("type", REQUIRED_FIELD);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        match (username, password, email, role) {
            (Some(username), Some(password), Some(email), Some(role)) => Ok(SignupData {
                username,
                password: password.to_string(),
                email,
                role,
            }),
            // Every None above recorded an error, so this arm cannot be
            // reached when errors is empty.
            _ => Err(errors),
        }
    }
}
