// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::{AccountRole, DomainError, EmailAddress, Username};

#[test]
fn test_username_creation() {
    let username: Username = Username::new("testuser").unwrap();
    assert_eq!(username.value(), "testuser");
}

#[test]
fn test_username_trims_whitespace() {
    let username: Username = Username::new("  testuser  ").unwrap();
    assert_eq!(username.value(), "testuser");
}

#[test]
fn test_username_allows_special_characters() {
    let username: Username = Username::new("user.name+tag@host-1_x").unwrap();
    assert_eq!(username.value(), "user.name+tag@host-1_x");
}

#[test]
fn test_username_rejects_forbidden_characters() {
    let result: Result<Username, DomainError> = Username::new("test user!");
    assert!(matches!(result, Err(DomainError::InvalidUsername(_))));
}

#[test]
fn test_username_rejects_empty() {
    let result: Result<Username, DomainError> = Username::new("   ");
    assert!(matches!(result, Err(DomainError::InvalidUsername(_))));
}

#[test]
fn test_email_creation() {
    let email: EmailAddress = EmailAddress::new("test@example.com").unwrap();
    assert_eq!(email.value(), "test@example.com");
}

#[test]
fn test_email_rejects_missing_at() {
    let result: Result<EmailAddress, DomainError> = EmailAddress::new("example.com");
    assert!(matches!(result, Err(DomainError::InvalidEmail(_))));
}

#[test]
fn test_account_role_round_trip() {
    for role in [
        AccountRole::Distributor,
        AccountRole::Retailer,
        AccountRole::Supplier,
    ] {
        let parsed: AccountRole = AccountRole::from_str(role.as_str()).unwrap();
        assert_eq!(parsed, role);
    }
}

#[test]
fn test_account_role_rejects_unknown_value() {
    let result: Result<AccountRole, DomainError> = AccountRole::from_str("invalid_type");
    assert_eq!(
        result,
        Err(DomainError::InvalidRole(String::from("invalid_type")))
    );
}

#[test]
fn test_account_role_is_case_sensitive() {
    let result: Result<AccountRole, DomainError> = AccountRole::from_str("Distributor");
    assert!(result.is_err());
}
