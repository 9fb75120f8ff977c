use std::fmt::Debug;

use chrono::{DateTime, Utc};
use tourguard_core::{AppResult, RecordId, Role};

use crate::{Filterable, Resource};

/// Context captured when a draft becomes a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftContext {
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Display name of the acting identity.
    pub actor_name: String,
    /// Role of the acting identity.
    pub actor_role: Role,
}

/// Flat, independently keyed record held in an in-memory collection.
///
/// Implementations carry a status enumeration and a "last updated" timestamp
/// that status changes must refresh.
pub trait ManagedRecord: Filterable + Clone + Debug + Send + Sync + 'static {
    /// Status enumeration replaced by status updates.
    type Status: Copy + Eq + Debug + Send + Sync + 'static;

    /// Input accepted by create operations.
    type Draft: Send + 'static;

    /// Collection this record type belongs to.
    const RESOURCE: Resource;

    /// Prefix used when minting identifiers for new records.
    const ID_PREFIX: &'static str;

    /// Returns the record identifier.
    fn id(&self) -> &RecordId;

    /// Returns a short human label used in notifications and audit entries.
    fn label(&self) -> &str;

    /// Returns the current status.
    fn status(&self) -> Self::Status;

    /// Returns a stable storage value for a status.
    fn status_str(status: Self::Status) -> &'static str;

    /// Replaces the status and refreshes the last-updated timestamp.
    fn apply_status(&mut self, status: Self::Status, updated_at: DateTime<Utc>);

    /// Validates a draft and builds the stored record.
    fn from_draft(id: RecordId, draft: Self::Draft, context: &DraftContext) -> AppResult<Self>;
}
