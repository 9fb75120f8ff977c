use std::sync::Arc;

use async_trait::async_trait;

use tourguard_application::{AuditEvent, AuditRepository, IdGenerator, RecordStore};
use tourguard_core::{AppError, AppResult};
use tourguard_domain::{AuditLogEntry, ManagedRecord};

const MAX_ID_ATTEMPTS: usize = 8;

/// Audit repository that prepends entries to the audit log collection.
#[derive(Clone)]
pub struct InMemoryAuditRepository {
    store: Arc<dyn RecordStore<AuditLogEntry>>,
    id_generator: Arc<dyn IdGenerator>,
}

impl InMemoryAuditRepository {
    /// Creates a repository writing into the given audit store.
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore<AuditLogEntry>>,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            id_generator,
        }
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let current = self.store.snapshot().await?;

        let mut id = None;
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.id_generator.next_id(AuditLogEntry::ID_PREFIX)?;
            if !current.iter().any(|entry| entry.id == candidate) {
                id = Some(candidate);
                break;
            }
        }
        let id = id.ok_or_else(|| {
            AppError::Conflict("could not allocate a unique audit entry id".to_owned())
        })?;

        let mut entry = AuditLogEntry::new(
            id,
            event.action,
            event.actor,
            event.actor_role,
            event.resource,
            event.occurred_at,
        )
        .with_status(event.outcome);
        entry.resource_id = event.resource_id;
        if let Some(detail) = event.detail {
            entry.details = detail;
        }

        let mut entries = Vec::with_capacity(current.len() + 1);
        entries.push(entry);
        entries.extend(current.iter().cloned());
        self.store.replace(entries).await?;
        Ok(())
    }
}
