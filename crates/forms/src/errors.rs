// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level form errors and the user-facing message strings.

/// Message shown when a required field is missing or blank.
pub const REQUIRED_FIELD: &str = "This field is required.";

/// Message shown when the two password fields differ.
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

/// Message shown when a username contains forbidden characters.
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

/// Message shown when an email address is not plausible.
pub const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Message shown when the chosen username is already taken.
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Generic message shown for any failed login attempt.
///
/// The same text is used whether the username is unknown or the password
/// is wrong, so responses do not reveal which accounts exist.
pub const LOGIN_FAILED: &str = "Please enter a correct username and password.";

/// An ordered collection of per-field validation errors.
///
/// Errors are kept in insertion order so pages render them in the same
/// order as the form fields they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    /// `(field, message)` pairs in insertion order.
    errors: Vec<(String, String)>,
}

impl FormErrors {
    /// Creates an empty error collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records an error message against a field.
    ///
    /// # Arguments
    ///
    /// * `field` - The form field name
    /// * `message` - The user-facing message
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.push((field.to_string(), message.to_string()));
    }

    /// Returns true if no errors have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the messages recorded against a field, in insertion order.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(f, _)| f == field)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// Returns true if any error has been recorded against a field.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|(f, _)| f == field)
    }

    /// Iterates over all `(field, message)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first: bool = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
