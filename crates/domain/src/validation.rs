// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Validates that a username is well-formed.
///
/// Usernames may contain letters, digits, and the characters `@ . + - _`.
/// This function is pure, deterministic, and has no side effects.
///
/// # Arguments
///
/// * `username` - The username to validate
///
/// # Returns
///
/// * `Ok(())` if the username is well-formed
/// * `Err(DomainError::InvalidUsername)` otherwise
///
/// # Errors
///
/// Returns an error if the username is empty, longer than
/// [`MAX_USERNAME_LENGTH`] characters, or contains forbidden characters.
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    // Rule: username must not be empty
    if username.is_empty() {
        return Err(DomainError::InvalidUsername(String::from(
            "Username cannot be empty",
        )));
    }

    // Rule: username must not exceed the maximum length
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(DomainError::InvalidUsername(format!(
            "Username cannot be longer than {MAX_USERNAME_LENGTH} characters"
        )));
    }

    // Rule: only letters, digits and @/./+/-/_ are allowed
    let all_valid: bool = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !all_valid {
        return Err(DomainError::InvalidUsername(String::from(
            "Username may contain only letters, numbers, and @/./+/-/_ characters",
        )));
    }

    Ok(())
}

/// Validates that an email address is plausible.
///
/// The check is intentionally shallow: a non-empty local part, a single
/// `@` separator, and a dotted domain part that does not begin or end
/// with a separator. Deliverability is out of scope.
///
/// # Arguments
///
/// * `email` - The address to validate
///
/// # Returns
///
/// * `Ok(())` if the address is plausible
/// * `Err(DomainError::InvalidEmail)` otherwise
///
/// # Errors
///
/// Returns an error if the address is empty, contains whitespace, or does
/// not split into `local@domain` with a dotted domain.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email address cannot be empty",
        )));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(String::from(
            "Email address cannot contain whitespace",
        )));
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err(DomainError::InvalidEmail(String::from(
            "Email address must contain '@'",
        )));
    };

    if local.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email address is missing the part before '@'",
        )));
    }

    // Rule: the domain must contain a dot and must not begin or end with
    // a separator character
    if !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(DomainError::InvalidEmail(format!(
            "'{domain}' is not a valid email domain"
        )));
    }

    Ok(())
}
