use std::sync::Arc;

use chrono::{DateTime, Utc};
use tourguard_core::Identity;
use tourguard_domain::{AuditAction, AuditStatus};
use tracing::warn;

use crate::{AuditEvent, AuditRepository};

/// Best-effort writer in front of the audit repository.
///
/// Append failures are logged and swallowed so they never fail the mutation
/// that triggered them.
#[derive(Clone)]
pub struct AuditTrail {
    repository: Arc<dyn AuditRepository>,
}

impl AuditTrail {
    /// Creates an audit trail writer.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditRepository>) -> Self {
        Self { repository }
    }

    /// Appends an event, logging instead of failing on error.
    pub async fn record(&self, event: AuditEvent) {
        let action = event.action;
        let resource = event.resource.clone();
        if let Err(error) = self.repository.append_event(event).await {
            warn!(
                action = action.as_str(),
                resource = %resource,
                error = %error,
                "audit append failed"
            );
        }
    }

    /// Appends a completed event performed by an identity.
    pub async fn record_action(
        &self,
        actor: &Identity,
        action: AuditAction,
        resource: impl Into<String>,
        resource_id: Option<String>,
        occurred_at: DateTime<Utc>,
    ) {
        self.record(AuditEvent {
            action,
            actor: actor.display_name().to_owned(),
            actor_role: actor.role(),
            resource: resource.into(),
            resource_id,
            outcome: AuditStatus::Completed,
            detail: None,
            occurred_at,
        })
        .await;
    }
}
