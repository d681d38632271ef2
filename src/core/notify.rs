//! Outbound candidate notifications.
//!
//! State changes are committed first and notifications dispatched after;
//! delivery failure never rolls back enrollment state. The sink is a trait so
//! tests can capture events and deployments can plug in a real mail gateway.

use crate::errors::Result;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::entities::{CandidateModel, CourseModel};

/// The lifecycle moments that produce a candidate-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    /// Enrollment submitted; carries the self-service access link.
    Registered,
    /// Enrollment approved by an administrator.
    Approved,
    /// Enrollment rejected; the context relays the rejection reason.
    Rejected,
    /// Administrative password reset for the candidate-facing portal.
    PasswordReset,
}

/// A single notification to be delivered to one recipient.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub kind: EventKind,
    /// Candidate email address.
    pub recipient: String,
    /// Template context for the delivery layer (names, course, access hash).
    pub context: serde_json::Value,
}

impl NotificationEvent {
    pub fn registered(candidate: &CandidateModel, course: &CourseModel, access_hash: &str) -> Self {
        Self {
            kind: EventKind::Registered,
            recipient: candidate.email.clone(),
            context: json!({
                "name": candidate.full_name,
                "course": course.name,
                "access_hash": access_hash,
            }),
        }
    }

    pub fn approved(candidate: &CandidateModel, course: &CourseModel) -> Self {
        Self {
            kind: EventKind::Approved,
            recipient: candidate.email.clone(),
            context: json!({
                "name": candidate.full_name,
                "course": course.name,
            }),
        }
    }

    pub fn rejected(candidate: &CandidateModel, course: &CourseModel, reason: &str) -> Self {
        Self {
            kind: EventKind::Rejected,
            recipient: candidate.email.clone(),
            context: json!({
                "name": candidate.full_name,
                "course": course.name,
                "reason": reason,
            }),
        }
    }

    pub fn password_reset(recipient: &str, new_password: &str) -> Self {
        Self {
            kind: EventKind::PasswordReset,
            recipient: recipient.to_string(),
            context: json!({ "new_password": new_password }),
        }
    }
}

/// Delivery seam for candidate notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &NotificationEvent) -> Result<()>;
}

/// Dispatches an event, logging (but swallowing) delivery failures. The
/// enrollment state that triggered the event is already committed by the time
/// this runs.
pub fn dispatch(sink: &dyn NotificationSink, event: &NotificationEvent) {
    if let Err(error) = sink.notify(event) {
        warn!(
            kind = ?event.kind,
            recipient = %event.recipient,
            %error,
            "notification delivery failed; enrollment state is unaffected"
        );
    }
}

/// Sink that records events to the structured log. The default when no mail
/// gateway is configured, and the reference implementation for real sinks.
#[derive(Debug, Clone)]
pub struct LogSink {
    front_end_url: String,
}

impl LogSink {
    #[must_use]
    pub fn new(front_end_url: String) -> Self {
        Self { front_end_url }
    }
}

impl NotificationSink for LogSink {
    fn notify(&self, event: &NotificationEvent) -> Result<()> {
        let access_link = event
            .context
            .get("access_hash")
            .and_then(serde_json::Value::as_str)
            .map(|hash| format!("{}/enrollment/{hash}", self.front_end_url));
        info!(
            kind = ?event.kind,
            recipient = %event.recipient,
            context = %event.context,
            access_link = access_link.as_deref().unwrap_or(""),
            "candidate notification"
        );
        Ok(())
    }
}
