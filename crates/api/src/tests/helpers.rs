// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use tradepost_audit::Cause;
use tradepost_persistence::{AccountData, SqlitePersistence};

use crate::{SignupRequest, signup};

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_valid_signup_request() -> SignupRequest {
    SignupRequest {
        username: String::from("testuser"),
        email: String::from("test@example.com"),
        password: String::from("testpassword"),
        password_confirmation: String::from("testpassword"),
        role: String::from("distributor"),
    }
}

/// Signs up the standard test account and returns its record.
pub fn signup_test_account(persistence: &mut SqlitePersistence) -> AccountData {
    let request = create_valid_signup_request();
    signup(persistence, &request, create_test_cause()).unwrap();
    persistence
        .get_account_by_username("testuser")
        .unwrap()
        .unwrap()
}
