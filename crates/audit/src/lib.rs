// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change.
/// For account events this is almost always the account itself; the
/// `system` actor type covers maintenance operations such as expired
/// session cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "account", "system").
    pub actor_type: String,
    /// The account ID for attribution, when the actor is an account.
    pub account_id: Option<i64>,
    /// The username snapshot at the time of the event.
    pub username: Option<String>,
}

impl Actor {
    /// Creates a new Actor without account attribution.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            account_id: None,
            username: None,
        }
    }

    /// Creates a new Actor attributed to an account.
    ///
    /// The username is captured as a stable snapshot so the event remains
    /// meaningful even if the account is later renamed or removed.
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account's canonical identifier
    /// * `username` - The account's username at event time
    #[must_use]
    pub fn with_account(account_id: i64, username: String) -> Self {
        Self {
            id: account_id.to_string(),
            actor_type: String::from("account"),
            account_id: Some(account_id),
            username: Some(username),
        }
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
///
/// An action describes what state change occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`Signup`", "`ChangePassword`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of account state at a point in time.
///
/// The snapshot is a compact string representation, never the full
/// record: it must not contain credentials or other secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event representing an account state transition.
///
/// Every successful account mutation must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before the transition (before)
/// - The state after the transition (after)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The event ID assigned by the database, if persisted.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("system"), String::from("system"));

        assert_eq!(actor.id, "system");
        assert_eq!(actor.actor_type, "system");
        assert_eq!(actor.account_id, None);
        assert_eq!(actor.username, None);
    }

    #[test]
    fn test_actor_with_account_attribution() {
        let actor: Actor = Actor::with_account(42, String::from("testuser"));

        assert_eq!(actor.id, "42");
        assert_eq!(actor.actor_type, "account");
        assert_eq!(actor.account_id, Some(42));
        assert_eq!(actor.username, Some(String::from("testuser")));
    }

    #[test]
    fn test_cause_creation_requires_all_fields() {
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Signup request"));

        assert_eq!(cause.id, "req-456");
        assert_eq!(cause.description, "Signup request");
    }

    #[test]
    fn test_action_creation_requires_name() {
        let action: Action = Action::new(String::from("Signup"), None);

        assert_eq!(action.name, "Signup");
        assert_eq!(action.details, None);
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("ChangePassword"),
            Some(String::from("Self-service password change")),
        );

        assert_eq!(action.name, "ChangePassword");
        assert_eq!(
            action.details,
            Some(String::from("Self-service password change"))
        );
    }

    #[test]
    fn test_audit_event_creation_requires_all_fields() {
        let actor: Actor = Actor::with_account(1, String::from("testuser"));
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Signup request"));
        let action: Action = Action::new(String::from("Signup"), None);
        let before: StateSnapshot = StateSnapshot::new(String::from("account_does_not_exist"));
        let after: StateSnapshot = StateSnapshot::new(String::from("account_id=1"));

        let event: AuditEvent = AuditEvent::new(
            actor.clone(),
            cause.clone(),
            action.clone(),
            before.clone(),
            after.clone(),
        );

        assert_eq!(event.event_id, None);
        assert_eq!(event.actor, actor);
        assert_eq!(event.cause, cause);
        assert_eq!(event.action, action);
        assert_eq!(event.before, before);
        assert_eq!(event.after, after);
    }

    #[test]
    fn test_audit_event_equality() {
        let actor: Actor = Actor::with_account(1, String::from("testuser"));
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Login request"));
        let action: Action = Action::new(String::from("Login"), None);
        let before: StateSnapshot = StateSnapshot::new(String::from("logged_out"));
        let after: StateSnapshot = StateSnapshot::new(String::from("logged_in"));

        let event1: AuditEvent = AuditEvent::new(
            actor.clone(),
            cause.clone(),
            action.clone(),
            before.clone(),
            after.clone(),
        );

        let event2: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

        assert_eq!(event1, event2);
    }
}
