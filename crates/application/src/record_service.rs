//! Authorization-gated mutations over in-memory record collections.
//!
//! One generic service covers zones, users, audit entries and tourists.
//! Every successful mutation replaces the collection snapshot and appends one
//! audit entry through the [`AuditTrail`]. Collection-specific operations
//! live in the child modules as inherent impls on concrete record types.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use tourguard_core::{AppError, AppResult, Identity, RecordId};
use tourguard_domain::{DraftContext, ManagedRecord, MutationKind};

use crate::{AuditTrail, AuthorizationService, DataGenerator, IdGenerator, RecordStore, Session};

mod audit_logs;
mod tourists;
mod users;

#[cfg(test)]
mod tests;

pub use audit_logs::AuditExport;

/// Attempts made to mint an identifier not already present in the collection.
const MAX_ID_ATTEMPTS: usize = 8;

/// Application service for one record collection.
pub struct RecordService<R: ManagedRecord> {
    authorization_service: AuthorizationService,
    store: Arc<dyn RecordStore<R>>,
    audit_trail: AuditTrail,
    id_generator: Arc<dyn IdGenerator>,
    data_generator: Arc<dyn DataGenerator>,
}

impl<R: ManagedRecord> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            authorization_service: self.authorization_service,
            store: self.store.clone(),
            audit_trail: self.audit_trail.clone(),
            id_generator: self.id_generator.clone(),
            data_generator: self.data_generator.clone(),
        }
    }
}

impl<R: ManagedRecord> RecordService<R> {
    /// Creates a record service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        store: Arc<dyn RecordStore<R>>,
        audit_trail: AuditTrail,
        id_generator: Arc<dyn IdGenerator>,
        data_generator: Arc<dyn DataGenerator>,
    ) -> Self {
        Self {
            authorization_service,
            store,
            audit_trail,
            id_generator,
            data_generator,
        }
    }

    /// Returns the current collection snapshot.
    pub async fn list(&self, session: &Session) -> AppResult<Arc<Vec<R>>> {
        self.authorization_service.require_authenticated(session)?;
        self.store.snapshot().await
    }

    /// Returns one record by identifier.
    pub async fn find(&self, session: &Session, id: &RecordId) -> AppResult<R> {
        self.authorization_service.require_authenticated(session)?;
        let records = self.store.snapshot().await?;
        records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| not_found::<R>(id))
    }

    /// Validates a draft and prepends the new record.
    pub async fn create(&self, session: &Session, draft: R::Draft) -> AppResult<Arc<Vec<R>>> {
        let identity = self
            .authorization_service
            .require_permission(session, R::RESOURCE.write_capability())?;

        let current = self.store.snapshot().await?;
        let id = self.unused_id(current.as_slice())?;
        let context = DraftContext {
            created_at: Utc::now(),
            actor_name: identity.display_name().to_owned(),
            actor_role: identity.role(),
        };
        let record = R::from_draft(id, draft, &context)?;
        let label = record.label().to_owned();
        let record_id = record.id().clone();

        let mut records = Vec::with_capacity(current.len() + 1);
        records.push(record);
        records.extend(current.iter().cloned());
        let replaced = self.store.replace(records).await?;

        info!(
            resource = R::RESOURCE.as_str(),
            record_id = %record_id,
            actor = %identity.id(),
            "record created"
        );
        self.audit_mutation(identity, MutationKind::Create, label, record_id)
            .await;
        Ok(self.refreshed(replaced).await)
    }

    /// Replaces the status of one record and refreshes its timestamp.
    pub async fn update_status(
        &self,
        session: &Session,
        id: &RecordId,
        status: R::Status,
    ) -> AppResult<Arc<Vec<R>>> {
        let identity = self
            .authorization_service
            .require_permission(session, R::RESOURCE.write_capability())?;

        let (replaced, updated) = self
            .modify_record(id, |record| record.apply_status(status, Utc::now()))
            .await?;

        info!(
            resource = R::RESOURCE.as_str(),
            record_id = %id,
            status = R::status_str(status),
            actor = %identity.id(),
            "record status updated"
        );
        self.audit_mutation(
            identity,
            MutationKind::UpdateStatus,
            updated.label().to_owned(),
            id.clone(),
        )
        .await;
        Ok(self.refreshed(replaced).await)
    }

    /// Removes one record. An unknown id leaves the collection untouched.
    pub async fn delete(&self, session: &Session, id: &RecordId) -> AppResult<Arc<Vec<R>>> {
        let identity = self
            .authorization_service
            .require_permission(session, R::RESOURCE.write_capability())?;

        let current = self.store.snapshot().await?;
        let Some(removed) = current.iter().find(|record| record.id() == id) else {
            debug!(
                resource = R::RESOURCE.as_str(),
                record_id = %id,
                "delete skipped: record not present"
            );
            return Ok(current);
        };
        let label = removed.label().to_owned();

        let records = current
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        let replaced = self.store.replace(records).await?;

        info!(
            resource = R::RESOURCE.as_str(),
            record_id = %id,
            actor = %identity.id(),
            "record deleted"
        );
        self.audit_mutation(identity, MutationKind::Delete, label, id.clone())
            .await;
        Ok(self.refreshed(replaced).await)
    }

    /// Applies an in-place change to one record and stores the new collection.
    ///
    /// Callers are responsible for the authorization check.
    pub(crate) async fn modify_record<F>(
        &self,
        id: &RecordId,
        apply: F,
    ) -> AppResult<(Arc<Vec<R>>, R)>
    where
        F: FnOnce(&mut R),
    {
        let current = self.store.snapshot().await?;
        let position = current
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;

        let mut records = current.as_ref().clone();
        apply(&mut records[position]);
        let updated = records[position].clone();
        let replaced = self.store.replace(records).await?;
        Ok((replaced, updated))
    }

    fn unused_id(&self, records: &[R]) -> AppResult<RecordId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.id_generator.next_id(R::ID_PREFIX)?;
            if !records.iter().any(|record| record.id() == &candidate) {
                return Ok(candidate);
            }

            debug!(
                resource = R::RESOURCE.as_str(),
                candidate = %candidate,
                "generated id already in use"
            );
        }

        Err(AppError::Conflict(format!(
            "could not allocate a unique {} id after {MAX_ID_ATTEMPTS} attempts",
            R::ID_PREFIX
        )))
    }

    async fn audit_mutation(
        &self,
        identity: &Identity,
        mutation: MutationKind,
        label: String,
        record_id: RecordId,
    ) {
        self.audit_trail
            .record_action(
                identity,
                R::RESOURCE.audit_action(mutation),
                label,
                Some(record_id.into()),
                Utc::now(),
            )
            .await;
    }

    /// Re-reads the collection so audit entries appended into the same store
    /// are visible; falls back to the replaced snapshot.
    async fn refreshed(&self, replaced: Arc<Vec<R>>) -> Arc<Vec<R>> {
        self.store.snapshot().await.unwrap_or(replaced)
    }
}

fn not_found<R: ManagedRecord>(id: &RecordId) -> AppError {
    AppError::NotFound(format!("{} record '{id}' does not exist", R::RESOURCE.as_str()))
}
