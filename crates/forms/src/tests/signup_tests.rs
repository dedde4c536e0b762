// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tradepost_domain::AccountRole;

use crate::{
    FormErrors, INVALID_EMAIL, INVALID_USERNAME, PASSWORD_MISMATCH, REQUIRED_FIELD, SignupData,
    SignupForm,
};

fn valid_form() -> SignupForm {
    SignupForm {
        username: Some(String::from("testuser")),
        password1: Some(String::from("testpassword")),
        password2: Some(String::from("testpassword")),
        email: Some(String::from("test@example.com")),
        role: Some(String::from("distributor")),
    }
}

#[test]
fn test_valid_signup() {
    let data: SignupData = valid_form().validate().unwrap();

    assert_eq!(data.username.value(), "testuser");
    assert_eq!(data.password, "testpassword");
    assert_eq!(data.email.value(), "test@example.com");
    assert_eq!(data.role, AccountRole::Distributor);
}

#[test]
fn test_all_fields_missing() {
    let form: SignupForm = SignupForm::default();
    let errors: FormErrors = form.validate().unwrap_err();

    for field in ["username", "password1", "password2", "email", "type"] {
        assert_eq!(errors.messages_for(field), vec![REQUIRED_FIELD]);
    }
}

#[test]
fn test_blank_fields_are_missing() {
    let form: SignupForm = SignupForm {
        username: Some(String::from("   ")),
        ..valid_form()
    };
    let errors: FormErrors = form.validate().unwrap_err();

    assert_eq!(errors.messages_for("username"), vec![REQUIRED_FIELD]);
}

#[test]
fn test_unknown_role_reported_as_required() {
    let form: SignupForm = SignupForm {
        role: Some(String::from("invalid_type")),
        ..valid_form()
    };
    let errors: FormErrors = form.validate().unwrap_err();

    assert_eq!(errors.messages_for("type"), vec![REQUIRED_FIELD]);
    assert!(!errors.has_field("username"));
}

#[test]
fn test_all_enumerated_roles_accepted() {
    for (value, role) in [
        ("distributor", AccountRole::Distributor),
        ("retailer", AccountRole::Retailer),
        ("supplier", AccountRole::Supplier),
    ] {
        let form: SignupForm = SignupForm {
            role: Some(String::from(value)),
            ..valid_form()
        };
        let data: SignupData = form.validate().unwrap();
        assert_eq!(data.role, role);
    }
}

#[test]
fn test_password_mismatch() {
    let form: SignupForm = SignupForm {
        password2: Some(String::from("otherpassword")),
        ..valid_form()
    };
    let errors: FormErrors = form.validate().unwrap_err();

    assert_eq!(errors.messages_for("password2"), vec![PASSWORD_MISMATCH]);
}

#[test]
fn test_invalid_username_message() {
    let form: SignupForm = SignupForm {
        username: Some(String::from("bad name!")),
        ..valid_form()
    };
    let errors: FormErrors = form.validate().unwrap_err();

    assert_eq!(errors.messages_for("username"), vec![INVALID_USERNAME]);
}

#[test]
fn test_invalid_email_message() {
    let form: SignupForm = SignupForm {
        email: Some(String::from("not-an-address")),
        ..valid_form()
    };
    let errors: FormErrors = form.validate().unwrap_err();

    assert_eq!(errors.messages_for("email"), vec![INVALID_EMAIL]);
}

#[test]
fn test_errors_collected_in_field_order() {
    let form: SignupForm = SignupForm {
        username: None,
        password1: Some(String::from("testpassword")),
        password2: Some(String::from("otherpassword")),
        email: None,
        role: Some(String::from("invalid_type")),
    };
    let errors: FormErrors = form.validate().unwrap_err();

    let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
    assert_eq!(fields, vec!["username", "password2", "email", "type"]);
}
