// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The login form.

use serde::Deserialize;

use crate::errors::{FormErrors, REQUIRED_FIELD};
use crate::present;

/// Raw login submission, as received from the form-encoded request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    /// The username.
    pub username: Option<String>,
    /// The password.
    pub password: Option<String>,
}

/// Validated login data.
///
/// The username is deliberately kept as a plain string: credential lookups
/// must not reveal whether a value was rejected for shape or for absence,
/// so no well-formedness check happens before authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginData {
    /// The username as submitted.
    pub username: String,
    /// The password as submitted.
    pub password: String,
}

impl LoginForm {
    /// Validates the submission.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` when either field is missing or blank.
    pub fn validate(&self) -> Result<LoginData, FormErrors> {
        let mut errors: FormErrors = FormErrors::new();

        let username: Option<&str> = present(self.username.as_ref());
        if username.is_none() {
            errors.add("username", REQUIRED_FIELD);
        }

        let password: Option<&str> = present(self.password.as_ref());
        if password.is_none() {
            errors.add("password", REQUIRED_FIELD);
        }

        match (username, password) {
            (Some(username), Some(password)) => Ok(LoginData {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(errors),
        }
    }
}
