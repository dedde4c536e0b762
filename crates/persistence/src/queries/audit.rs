// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.
//!
//! Audit events are stored with their structured parts serialized as JSON
//! columns plus denormalized actor attribution columns for indexing.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;
use tradepost_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    #[allow(dead_code)]
    actor_account_id: Option<i64>,
    #[allow(dead_code)]
    actor_username: Option<String>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    #[allow(dead_code)]
    created_at: Option<String>,
}

impl AuditEventRow {
    /// Rebuilds the structured event from the serialized columns.
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let actor: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause: CauseData = serde_json::from_str(&self.cause_json)?;
        let action: ActionData = serde_json::from_str(&self.action_json)?;
        let before: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let mut event: AuditEvent = AuditEvent::new(
            Actor {
                id: actor.id,
                actor_type: actor.actor_type,
                account_id: actor.account_id,
                username: actor.username,
            },
            Cause::new(cause.id, cause.description),
            Action::new(action.name, action.details),
            StateSnapshot::new(before.data),
            StateSnapshot::new(after.data),
        );
        event.event_id = Some(self.event_id);
        Ok(event)
    }
}

backend_fn! {
/// Retrieves an audit event by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event_id` - The event ID
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no event has this ID, or
/// another error if the query or deserialization fails.
pub fn get_audit_event(conn: &mut _, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    debug!("Looking up audit event by ID: {}", event_id);

    let result: Result<AuditEventRow, diesel::result::Error> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_event(),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::EventNotFound(event_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves all audit events attributed to an account, oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID
///
/// # Errors
///
/// Returns an error if the query or deserialization fails.
pub fn get_audit_events_for_account(
    conn: &mut _,
    account_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    debug!("Loading audit events for account ID: {}", account_id);

    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::actor_account_id.eq(account_id))
        .order_by(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_event).collect()
}
}

backend_fn! {
/// Counts the total number of audit events.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_audit_events(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    debug!("Counting audit events");

    let count: i64 = audit_events::table
        .select(count(audit_events::event_id))
        .first(conn)?;

    Ok(count)
}
}
