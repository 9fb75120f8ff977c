use std::fmt::Write;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tourguard_core::{AppError, AppResult, NonEmptyString, RecordId, Role};

use crate::{AuditAction, DraftContext, Filterable, ManagedRecord, Resource, RiskLevel};

/// Review status of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// Approved by a reviewer.
    Approved,
    /// Action finished.
    Completed,
    /// Action was denied.
    Denied,
    /// Awaiting review.
    Pending,
}

impl AuditStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Denied => "denied",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for AuditStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "approved" => Ok(Self::Approved),
            "completed" => Ok(Self::Completed),
            "denied" => Ok(Self::Denied),
            "pending" => Ok(Self::Pending),
            _ => Err(AppError::Validation(format!(
                "unknown audit status '{value}'"
            ))),
        }
    }
}

/// Manually recorded audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntryDraft {
    /// Action being recorded.
    pub action: AuditAction,
    /// Resource label.
    pub resource: String,
    /// Identifier of the affected record, when there is one.
    pub resource_id: Option<String>,
    /// Initial review status.
    pub status: AuditStatus,
    /// Optional detail text; derived from the action when absent.
    pub details: Option<String>,
}

/// One entry of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Record identifier.
    pub id: RecordId,
    /// Action performed.
    pub action: AuditAction,
    /// Display name of the actor.
    pub actor: String,
    /// Role of the actor.
    pub actor_role: Role,
    /// Resource label (denormalized display string).
    pub resource: String,
    /// Identifier of the affected record, when there is one.
    pub resource_id: Option<String>,
    /// Time the action happened.
    pub timestamp: DateTime<Utc>,
    /// Review status / outcome.
    pub status: AuditStatus,
    /// Sensitivity of the action.
    pub risk_level: RiskLevel,
    /// Human readable detail.
    pub details: String,
    /// Reviewer that approved the entry.
    pub approved_by: Option<String>,
    /// Client address, when known.
    pub ip_address: Option<String>,
    /// Ledger transaction the entry was anchored in.
    pub blockchain_tx: Option<String>,
    /// SHA-256 digest of the anchored content.
    pub anchor_digest: Option<String>,
    /// Last status change.
    pub last_updated: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Creates a completed entry with defaults derived from the action.
    #[must_use]
    pub fn new(
        id: RecordId,
        action: AuditAction,
        actor: impl Into<String>,
        actor_role: Role,
        resource: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let resource = resource.into();
        Self {
            id,
            action,
            actor: actor.into(),
            actor_role,
            details: action.describe(resource.as_str()),
            resource,
            resource_id: None,
            timestamp,
            status: AuditStatus::Completed,
            risk_level: action.default_risk(),
            approved_by: None,
            ip_address: None,
            blockchain_tx: None,
            anchor_digest: None,
            last_updated: timestamp,
        }
    }

    /// Attaches the affected record identifier.
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Replaces the outcome status.
    #[must_use]
    pub fn with_status(mut self, status: AuditStatus) -> Self {
        self.status = status;
        self
    }

    /// Replaces the detail text.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Returns the SHA-256 digest of the entry content, hex encoded.
    ///
    /// Anchoring fields and the last-updated timestamp are excluded so the
    /// digest stays stable across anchoring.
    #[must_use]
    pub fn content_digest(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            self.id.as_str(),
            self.action.as_str(),
            self.actor.as_str(),
            self.actor_role.as_str(),
            self.resource.as_str(),
            self.resource_id.as_deref().unwrap_or_default(),
            self.details.as_str(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update(self.timestamp.to_rfc3339().as_bytes());

        hasher
            .finalize()
            .iter()
            .fold(String::with_capacity(64), |mut acc, byte| {
                let _ = write!(acc, "{byte:02x}");
                acc
            })
    }
}

/// Header row of the audit CSV export.
pub const AUDIT_CSV_HEADER: &str =
    "Timestamp,Action,User,Role,Resource,Status,Risk Level,IP Address,Details";

/// Renders one entry as a CSV row matching [`AUDIT_CSV_HEADER`].
#[must_use]
pub fn audit_csv_row(entry: &AuditLogEntry) -> String {
    [
        entry.timestamp.to_rfc3339(),
        entry.action.as_str().to_owned(),
        entry.actor.clone(),
        entry.actor_role.as_str().to_owned(),
        entry.resource.clone(),
        entry.status.as_str().to_owned(),
        entry.risk_level.as_str().to_owned(),
        entry.ip_address.clone().unwrap_or_default(),
        entry.details.clone(),
    ]
    .iter()
    .map(|cell| csv_cell(cell))
    .collect::<Vec<_>>()
    .join(",")
}

fn csv_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

impl Filterable for AuditLogEntry {
    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.actor.as_str(),
            self.resource.as_str(),
            self.action.as_str(),
        ]
    }

    fn categorical_value(&self, field: &str) -> Option<&str> {
        match field {
            "action" => Some(self.action.as_str()),
            "status" => Some(self.status.as_str()),
            "risk_level" => Some(self.risk_level.as_str()),
            _ => None,
        }
    }
}

impl ManagedRecord for AuditLogEntry {
    type Status = AuditStatus;
    type Draft = AuditEntryDraft;

    const RESOURCE: Resource = Resource::AuditLogs;
    const ID_PREFIX: &'static str = "audit";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        self.resource.as_str()
    }

    fn status(&self) -> AuditStatus {
        self.status
    }

    fn status_str(status: AuditStatus) -> &'static str {
        status.as_str()
    }

    fn apply_status(&mut self, status: AuditStatus, updated_at: DateTime<Utc>) {
        self.status = status;
        self.last_updated = updated_at;
    }

    fn from_draft(
        id: RecordId,
        draft: AuditEntryDraft,
        context: &DraftContext,
    ) -> AppResult<Self> {
        let resource = NonEmptyString::new(draft.resource.trim())?;
        let mut entry = Self::new(
            id,
            draft.action,
            context.actor_name.clone(),
            context.actor_role,
            resource,
            context.created_at,
        )
        .with_status(draft.status);
        entry.resource_id = draft.resource_id;
        if let Some(details) = draft.details {
            entry.details = details;
        }

        Ok(entry)
    }
}
