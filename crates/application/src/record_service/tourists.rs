use tourguard_domain::{AuditAction, Capability, Tourist, TouristDraft};

use super::*;

impl RecordService<Tourist> {
    /// Registers a tourist after validating the required fields.
    pub async fn register(
        &self,
        session: &Session,
        draft: TouristDraft,
    ) -> AppResult<Arc<Vec<Tourist>>> {
        self.create(session, draft).await
    }

    /// Returns a tourist profile and records the PII access.
    pub async fn view_profile(&self, session: &Session, id: &RecordId) -> AppResult<Tourist> {
        let identity = self
            .authorization_service
            .require_permission(session, Capability::TouristRead)?;
        let tourist = self.find(session, id).await?;

        self.audit_trail
            .record_action(
                identity,
                AuditAction::PiiAccess,
                tourist.name.clone(),
                Some(id.to_string()),
                Utc::now(),
            )
            .await;
        Ok(tourist)
    }

    /// Verifies a tourist digital id against the ledger.
    pub async fn verify_digital_id(
        &self,
        session: &Session,
        id: &RecordId,
    ) -> AppResult<Arc<Vec<Tourist>>> {
        let identity = self
            .authorization_service
            .require_permission(session, Capability::DigitalIdVerify)?;

        let transaction = self.data_generator.transaction_hash();
        let verified_at = Utc::now();
        let (replaced, verified) = self
            .modify_record(id, |tourist| {
                tourist.mark_verified(transaction.clone(), verified_at);
            })
            .await?;

        info!(
            record_id = %id,
            transaction = %transaction,
            actor = %identity.id(),
            "digital id verified"
        );
        self.audit_trail
            .record_action(
                identity,
                AuditAction::BlockchainVerify,
                verified.name,
                Some(id.to_string()),
                verified_at,
            )
            .await;

        Ok(self.refreshed(replaced).await)
    }
}
