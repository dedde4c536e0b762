// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `accounts` — Account, session, and password-reset queries
//! - `audit` — Audit event queries
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`
//!
//! The `Persistence` adapter in `lib.rs` dispatches to the appropriate version
//! based on the active backend connection.

pub mod accounts;
pub mod audit;

// Re-export the bcrypt verification helper (not backend-specific)
pub use accounts::verify_password;

// Re-export backend-specific query functions used by lib.rs
pub use accounts::{
    count_accounts_mysql, count_accounts_sqlite, get_account_by_id_mysql,
    get_account_by_id_sqlite, get_account_by_username_mysql, get_account_by_username_sqlite,
    get_password_reset_by_token_mysql, get_password_reset_by_token_sqlite,
    get_session_by_token_mysql, get_session_by_token_sqlite,
};
pub use audit::{
    count_audit_events_mysql, count_audit_events_sqlite, get_audit_event_mysql,
    get_audit_event_sqlite, get_audit_events_for_account_mysql,
    get_audit_events_for_account_sqlite,
};
