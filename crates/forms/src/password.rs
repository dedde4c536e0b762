// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The change-password and reset-request forms.

use serde::Deserialize;

use tradepost_domain::{EmailAddress, validate_email};

use crate::errors::{FormErrors, INVALID_EMAIL, PASSWORD_MISMATCH, REQUIRED_FIELD};
use crate::present;

/// Raw change-password submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangePasswordForm {
    /// The new password.
    pub new_password1: Option<String>,
    /// The new password confirmation.
    pub new_password2: Option<String>,
}

/// Validated change-password data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePasswordData {
    /// The new plain-text password (hashed by the persistence layer).
    pub new_password: String,
}

impl ChangePasswordForm {
    /// Validates the submission.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` when a field is missing or the confirmation
    /// does not match.
    pub fn validate(&self) -> Result<ChangePasswordData, FormErrors> {
        let mut errors: FormErrors = FormErrors::new();

        let password: Option<&str> = present(self.new_password1.as_ref());
        if password.is_none() {
            errors.add("new_password1", REQUIRED_FIELD);
        }

        match present(self.new_password2.as_ref()) {
            None => errors.add("new_password2", REQUIRED_FIELD),
            Some(confirmation) => {
                if let Some(password) = password
                    && password != confirmation
                {
                    errors.add("new_password2", PASSWORD_MISMATCH);
                }
            }
        }

        match (password, errors.is_empty()) {
            (Some(password), true) => Ok(ChangePasswordData {
                new_password: password.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Raw password-reset request submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordResetForm {
    /// The email address to send reset instructions to.
    pub email: Option<String>,
}

/// Validated password-reset request data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetData {
    /// The address to send reset instructions to.
    pub email: EmailAddress,
}

impl PasswordResetForm {
    /// Validates the submission.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` when the email is missing or implausible.
    pub fn validate(&self) -> Result<PasswordResetData, FormErrors> {
        let mut errors: FormErrors = FormErrors::new();

        match present(self.email.as_ref()) {
            None => {
                errors.add("email", REQUIRED_FIELD);
                Err(errors)
            }
            Some(value) => match validate_email(value) {
                Ok(()) => match EmailAddress::new(value) {
                    Ok(email) => Ok(PasswordResetData { email }),
                    Err(_) => {
                        errors.add("email", INVALID_EMAIL);
                        Err(errors)
                    }
                },
                Err(_) => {
                    errors.add("email", INVALID_EMAIL);
                    Err(errors)
                }
            },
        }
    }
}
