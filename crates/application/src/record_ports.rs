//! Ports for record collections and the data they are seeded from.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tourguard_core::{AppResult, RecordId, Role};
use tourguard_domain::{AuditAction, AuditStatus};

/// Copy-on-write store for one record collection.
///
/// Readers receive immutable snapshots; writers replace the whole collection.
#[async_trait]
pub trait RecordStore<R: Send + Sync + 'static>: Send + Sync {
    /// Returns the current collection snapshot.
    async fn snapshot(&self) -> AppResult<Arc<Vec<R>>>;

    /// Replaces the collection and returns the new snapshot.
    async fn replace(&self, records: Vec<R>) -> AppResult<Arc<Vec<R>>>;
}

/// Mints identifiers for new records.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier with the given prefix.
    fn next_id(&self, prefix: &str) -> AppResult<RecordId>;
}

/// Source of simulated values (risk scores, ledger hashes, demo counters).
///
/// Injected so tests can supply deterministic fixtures.
pub trait DataGenerator: Send + Sync {
    /// Returns a ledger transaction hash (`0x` followed by 40 hex digits).
    fn transaction_hash(&self) -> String;

    /// Returns a value in `min..=max`.
    fn count_between(&self, min: u32, max: u32) -> u32;

    /// Returns a risk score on a 0-10 scale.
    fn risk_score(&self) -> f64;

    /// Picks an index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Whether data operations should simulate latency and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// Simulated data service behaviour.
    Mock,
    /// Immediate, failure-free responses.
    Live,
}

/// Envelope returned by data sources.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse<R> {
    /// Whether the source produced data.
    pub success: bool,
    /// Returned records; ignored when `success` is false.
    pub data: Vec<R>,
}

impl<R> FetchResponse<R> {
    /// Successful response carrying records.
    #[must_use]
    pub fn ok(data: Vec<R>) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// Failed response.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            success: false,
            data: Vec::new(),
        }
    }
}

/// Opaque upstream provider of one record collection.
#[async_trait]
pub trait DataSource<R: Send + 'static>: Send + Sync {
    /// Fetches the full collection.
    async fn fetch(&self, mode: DataMode) -> AppResult<FetchResponse<R>>;
}

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Display name of the actor.
    pub actor: String,
    /// Role of the actor.
    pub actor_role: Role,
    /// Resource label.
    pub resource: String,
    /// Resource identifier.
    pub resource_id: Option<String>,
    /// Outcome of the action.
    pub outcome: AuditStatus,
    /// Optional audit detail payload.
    pub detail: Option<String>,
    /// Time the action happened.
    pub occurred_at: DateTime<Utc>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
