// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Form validation for the account pages.
//!
//! Each HTML form has a raw submission type (every field optional, as it
//! arrives from a form-encoded request body) and a `validate` method that
//! either produces validated data or an ordered collection of per-field
//! error messages. The error messages in this crate are the exact strings
//! rendered inline on the pages.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod errors;
mod login;
mod password;
mod signup;

#[cfg(test)]
mod tests;

pub use errors::{
    FormErrors, INVALID_EMAIL, INVALID_USERNAME, LOGIN_FAILED, PASSWORD_MISMATCH, REQUIRED_FIELD,
    USERNAME_TAKEN,
};
pub use login::{LoginData, LoginForm};
pub use password::{
    ChangePasswordData, ChangePasswordForm, PasswordResetData, PasswordResetForm,
};
pub use signup::{SignupData, SignupForm};

/// Returns the trimmed value of an optional form field, or `None` when the
/// field is absent or blank.
///
/// Browsers submit empty inputs as empty strings, so absence and blankness
/// are treated identically.
fn present(field: Option<&String>) -> Option<&str> {
    field.map(|value| value.trim()).filter(|v| !v.is_empty())
}
