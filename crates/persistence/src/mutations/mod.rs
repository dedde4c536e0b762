// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Most mutations use Diesel DSL and are backend-agnostic, with minimal use of
//! backend-specific helpers (e.g., `last_insert_rowid()` for `SQLite`).
//!
//! ## Module Organization
//!
//! - `accounts` — Account, session, and password-reset mutations
//! - `audit` — Audit event persistence
//!
//! ## Backend-Specific Code
//!
//! Backend-specific helpers (e.g., `get_last_insert_rowid()`) are imported from
//! the `backend` module. All other code uses Diesel DSL exclusively.

pub mod accounts;
pub mod audit;

// Re-export backend-specific mutation functions used by lib.rs
pub use accounts::{
    create_account_mysql, create_account_sqlite, create_password_reset_mysql,
    create_password_reset_sqlite, create_session_mysql, create_session_sqlite,
    deactivate_account_mysql, deactivate_account_sqlite, delete_expired_sessions_mysql,
    delete_expired_sessions_sqlite, delete_other_sessions_for_account_mysql,
    delete_other_sessions_for_account_sqlite, delete_session_mysql, delete_session_sqlite,
    delete_sessions_for_account_mysql, delete_sessions_for_account_sqlite,
    reactivate_account_mysql, reactivate_account_sqlite, update_last_login_mysql,
    update_last_login_sqlite, update_password_mysql, update_password_sqlite,
    update_session_activity_mysql, update_session_activity_sqlite,
};
pub use audit::{persist_audit_event_mysql, persist_audit_event_sqlite};
