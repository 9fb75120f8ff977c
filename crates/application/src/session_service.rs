use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use tourguard_core::{AppResult, Identity};
use tourguard_domain::{AuditAction, SystemUser};

use crate::{AuditTrail, CredentialDirectory, Credentials, RecordService, Session};

/// Login and logout with audit trail and user bookkeeping.
#[derive(Clone)]
pub struct SessionService {
    directory: Arc<dyn CredentialDirectory>,
    audit_trail: AuditTrail,
    users: RecordService<SystemUser>,
}

impl SessionService {
    /// Creates a session service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn CredentialDirectory>,
        audit_trail: AuditTrail,
        users: RecordService<SystemUser>,
    ) -> Self {
        Self {
            directory,
            audit_trail,
            users,
        }
    }

    /// Authenticates the session and records the login.
    pub async fn login(
        &self,
        session: &mut Session,
        credentials: &Credentials,
    ) -> AppResult<Identity> {
        if let Some(identity) = session.current_identity() {
            return Ok(identity.clone());
        }

        let identity = session.login(self.directory.as_ref(), credentials)?;
        let now = Utc::now();
        self.audit_trail
            .record_action(&identity, AuditAction::Login, "Authentication System", None, now)
            .await;
        if let Err(error) = self.users.record_login(&identity).await {
            warn!(subject = %identity.id(), error = %error, "failed to stamp last login");
        }

        Ok(identity)
    }

    /// Ends the session and records the logout. Idempotent.
    pub async fn logout(&self, session: &mut Session) -> Option<Identity> {
        let identity = session.logout()?;
        self.audit_trail
            .record_action(
                &identity,
                AuditAction::Logout,
                "Authentication System",
                None,
                Utc::now(),
            )
            .await;
        Some(identity)
    }
}
