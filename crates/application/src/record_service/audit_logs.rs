use tourguard_domain::{
    AUDIT_CSV_HEADER, AuditAction, AuditLogEntry, AuditStatus, Capability, RecordQuery,
    audit_csv_row, filter_records,
};

use crate::AuditEvent;

use super::*;

/// Rendered audit export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditExport {
    /// CSV document: header row followed by one row per entry.
    pub csv: String,
    /// Number of exported entries.
    pub row_count: usize,
}

impl RecordService<AuditLogEntry> {
    /// Renders the entries matching a query as CSV.
    pub async fn export(&self, session: &Session, query: &RecordQuery) -> AppResult<AuditExport> {
        let identity = self
            .authorization_service
            .require_permission(session, Capability::AuditRead)?;

        let entries = self.store.snapshot().await?;
        let rows: Vec<String> = filter_records(entries.as_slice(), query)
            .map(audit_csv_row)
            .collect();
        let row_count = rows.len();
        let csv = std::iter::once(AUDIT_CSV_HEADER.to_owned())
            .chain(rows)
            .collect::<Vec<_>>()
            .join("\n");

        info!(rows = row_count, actor = %identity.id(), "audit log exported");
        self.audit_trail
            .record(AuditEvent {
                action: AuditAction::ExportData,
                actor: identity.display_name().to_owned(),
                actor_role: identity.role(),
                resource: format!("Audit Logs ({row_count} entries)"),
                resource_id: None,
                outcome: AuditStatus::Completed,
                detail: Some(format!("Exported {row_count} audit log entries")),
                occurred_at: Utc::now(),
            })
            .await;

        Ok(AuditExport { csv, row_count })
    }

    /// Anchors one entry to the ledger with a content digest.
    pub async fn anchor(
        &self,
        session: &Session,
        id: &RecordId,
    ) -> AppResult<Arc<Vec<AuditLogEntry>>> {
        let identity = self
            .authorization_service
            .require_permission(session, Capability::AuditManage)?;

        let transaction = self.data_generator.transaction_hash();
        let anchored_at = Utc::now();
        let (replaced, anchored) = self
            .modify_record(id, |entry| {
                entry.anchor_digest = Some(entry.content_digest());
                entry.blockchain_tx = Some(transaction.clone());
                entry.status = AuditStatus::Completed;
                entry.last_updated = anchored_at;
            })
            .await?;

        info!(
            record_id = %id,
            transaction = %transaction,
            actor = %identity.id(),
            "audit entry anchored"
        );
        self.audit_trail
            .record(AuditEvent {
                action: AuditAction::BlockchainAnchor,
                actor: identity.display_name().to_owned(),
                actor_role: identity.role(),
                resource: id.to_string(),
                resource_id: Some(id.to_string()),
                outcome: AuditStatus::Completed,
                detail: anchored
                    .anchor_digest
                    .map(|digest| format!("Anchored in {transaction} with digest {digest}")),
                occurred_at: anchored_at,
            })
            .await;

        Ok(self.refreshed(replaced).await)
    }
}
