// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use tradepost_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

/// Creates a test audit event attributed to the given account.
pub fn create_test_event(account_id: i64, username: &str, action_name: &str) -> AuditEvent {
    AuditEvent::new(
        Actor::with_account(account_id, String::from(username)),
        Cause::new(String::from("test-cause"), String::from("Test operation")),
        Action::new(String::from(action_name), None),
        StateSnapshot::new(String::from("before")),
        StateSnapshot::new(String::from("after")),
    )
}
