use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use tourguard_core::{AppError, AppResult, Identity, RecordId, Role};
use tourguard_domain::{
    AuditAction, AuditLogEntry, AuditStatus, CheckInStatus, DigitalIdStatus, DraftContext,
    ManagedRecord, RecordQuery, SystemUser, SystemUserDraft, Tourist, TouristDraft, Zone,
    ZoneDraft, ZoneStatus, filter_records,
};

use crate::{
    AuditEvent, AuditRepository, AuditTrail, AuthorizationService, CredentialDirectory,
    CredentialRecord, Credentials, DataGenerator, IdGenerator, RecordStore, Session,
};

use super::RecordService;

struct FakeStore<R> {
    records: RwLock<Arc<Vec<R>>>,
}

impl<R> FakeStore<R> {
    fn with(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(Arc::new(records)),
        }
    }
}

#[async_trait]
impl<R: Send + Sync + 'static> RecordStore<R> for FakeStore<R> {
    async fn snapshot(&self) -> AppResult<Arc<Vec<R>>> {
        Ok(self.records.read().await.clone())
    }

    async fn replace(&self, records: Vec<R>) -> AppResult<Arc<Vec<R>>> {
        let snapshot = Arc::new(records);
        *self.records.write().await = snapshot.clone();
        Ok(snapshot)
    }
}

/// Hands out scripted ids, then falls back to a counter.
struct ScriptedIds {
    script: Vec<&'static str>,
    issued: AtomicUsize,
}

impl ScriptedIds {
    fn new(script: Vec<&'static str>) -> Self {
        Self {
            script,
            issued: AtomicUsize::new(0),
        }
    }
}

impl IdGenerator for ScriptedIds {
    fn next_id(&self, prefix: &str) -> AppResult<RecordId> {
        let index = self.issued.fetch_add(1, Ordering::SeqCst);
        match self.script.get(index) {
            Some(value) => RecordId::new(*value),
            None => RecordId::new(format!("{prefix}-auto-{index}")),
        }
    }
}

struct FixedLedger;

impl DataGenerator for FixedLedger {
    fn transaction_hash(&self) -> String {
        format!("0x{}", "ab".repeat(20))
    }

    fn count_between(&self, min: u32, _max: u32) -> u32 {
        min
    }

    fn risk_score(&self) -> f64 {
        5.0
    }

    fn pick_index(&self, _len: usize) -> usize {
        0
    }
}

#[derive(Default)]
struct RecordingAudit {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for RecordingAudit {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct OfflineAudit;

#[async_trait]
impl AuditRepository for OfflineAudit {
    async fn append_event(&self, _event: AuditEvent) -> AppResult<()> {
        Err(AppError::Internal("audit store offline".to_owned()))
    }
}

struct RoleDirectory(Role);

impl CredentialDirectory for RoleDirectory {
    fn find_by_email(&self, email: &str) -> Option<CredentialRecord> {
        let name = match self.0 {
            Role::Admin => "Admin User",
            Role::Police => "Officer Sarah Chen",
            Role::Tourism => "Tourism Officer Raj Patel",
            Role::Operator112 => "112 Operator Maria Santos",
            Role::Hotel => "Hotel Manager John Smith",
            Role::Tourist => "Tourist Alex Kumar",
        };
        Some(CredentialRecord {
            email: email.to_owned(),
            password: "demo123".to_owned(),
            identity: Identity::new(format!("{}-id", self.0), name, self.0, email),
        })
    }
}

fn session_for(role: Role) -> Session {
    let mut session = Session::new();
    let email = format!("{}@demo.local", role.as_str());
    let result = session.login(&RoleDirectory(role), &Credentials::new(email, "demo123"));
    assert!(result.is_ok());
    session
}

fn record_id(value: &str) -> RecordId {
    RecordId::new(value).unwrap_or_else(|_| panic!("valid id"))
}

fn context() -> DraftContext {
    DraftContext {
        created_at: Utc::now(),
        actor_name: "Seed".to_owned(),
        actor_role: Role::Admin,
    }
}

fn seed_zone(id: &str, name: &str) -> Zone {
    Zone::from_draft(record_id(id), ZoneDraft::named(name), &context())
        .unwrap_or_else(|error| panic!("seed zone should build: {error}"))
}

fn seed_tourist(id: &str, name: &str, status: CheckInStatus) -> Tourist {
    let draft = TouristDraft {
        name: name.to_owned(),
        passport: format!("P{id}"),
        phone: "+1-555-0100".to_owned(),
        ..TouristDraft::default()
    };
    let mut tourist = Tourist::from_draft(record_id(id), draft, &context())
        .unwrap_or_else(|error| panic!("seed tourist should build: {error}"));
    tourist.check_in_status = status;
    tourist
}

struct Fixture<R: ManagedRecord> {
    service: RecordService<R>,
    store: Arc<FakeStore<R>>,
    audit: Arc<RecordingAudit>,
}

fn fixture<R: ManagedRecord>(records: Vec<R>, ids: Vec<&'static str>) -> Fixture<R> {
    let store = Arc::new(FakeStore::with(records));
    let audit = Arc::new(RecordingAudit::default());
    let service = RecordService::new(
        AuthorizationService::new(),
        store.clone(),
        AuditTrail::new(audit.clone()),
        Arc::new(ScriptedIds::new(ids)),
        Arc::new(FixedLedger),
    );
    Fixture {
        service,
        store,
        audit,
    }
}

#[tokio::test]
async fn police_cannot_update_zone_status() {
    let fixture = fixture(vec![seed_zone("zone-1", "Red Fort Area")], Vec::new());
    let before = fixture.store.snapshot().await;
    let Ok(before) = before else {
        panic!("snapshot should load");
    };

    let result = fixture
        .service
        .update_status(
            &session_for(Role::Police),
            &record_id("zone-1"),
            ZoneStatus::Unsafe,
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(ref value)) if value == "zones.write"));
    let Ok(after) = fixture.store.snapshot().await else {
        panic!("snapshot should load");
    };
    assert!(Arc::ptr_eq(&before, &after));
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn anonymous_session_cannot_list() {
    let fixture = fixture(vec![seed_zone("zone-1", "Red Fort Area")], Vec::new());
    let result = fixture.service.list(&Session::new()).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn admin_creates_zone_at_head_with_defaults() {
    let fixture = fixture(vec![seed_zone("zone-1", "Red Fort Area")], vec!["zone-9"]);
    let started = Utc::now();

    let result = fixture
        .service
        .create(&session_for(Role::Admin), ZoneDraft::named("Test Zone"))
        .await;

    let Ok(zones) = result else {
        panic!("admin should create zones");
    };
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].name, "Test Zone");
    assert_eq!(zones[0].status, ZoneStatus::Moderate);
    assert_eq!(zones[0].id.as_str(), "zone-9");
    assert!(zones[0].created_at >= started);
    assert_eq!(zones[1].name, "Red Fort Area");

    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::ZoneCreate);
    assert_eq!(events[0].actor, "Admin User");
    assert_eq!(events[0].resource_id.as_deref(), Some("zone-9"));
}

#[tokio::test]
async fn invalid_draft_leaves_collection_untouched() {
    let fixture = fixture(vec![seed_zone("zone-1", "Red Fort Area")], Vec::new());
    let result = fixture
        .service
        .create(&session_for(Role::Admin), ZoneDraft::named("   "))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let Ok(zones) = fixture.store.snapshot().await else {
        panic!("snapshot should load");
    };
    assert_eq!(zones.len(), 1);
}

#[tokio::test]
async fn rapid_creates_never_share_an_id() {
    let fixture = fixture(Vec::<Zone>::new(), vec!["zone-1", "zone-1", "zone-2"]);
    let session = session_for(Role::Admin);

    let first = fixture
        .service
        .create(&session, ZoneDraft::named("First"))
        .await;
    let second = fixture
        .service
        .create(&session, ZoneDraft::named("Second"))
        .await;

    assert!(first.is_ok());
    let Ok(zones) = second else {
        panic!("second create should retry past the duplicate id");
    };
    assert_eq!(zones.len(), 2);
    assert_ne!(zones[0].id, zones[1].id);
    assert_eq!(zones[0].id.as_str(), "zone-2");
}

#[tokio::test]
async fn exhausted_id_attempts_report_conflict() {
    let fixture = fixture(
        vec![seed_zone("zone-1", "Red Fort Area")],
        vec!["zone-1"; 8],
    );
    let result = fixture
        .service
        .create(&session_for(Role::Admin), ZoneDraft::named("Test Zone"))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_status_replaces_status_and_timestamp_only() {
    let seeded = seed_zone("zone-1", "Red Fort Area");
    let fixture = fixture(vec![seeded.clone()], Vec::new());

    let result = fixture
        .service
        .update_status(
            &session_for(Role::Admin),
            &record_id("zone-1"),
            ZoneStatus::Restricted,
        )
        .await;

    let Ok(zones) = result else {
        panic!("admin should update zones");
    };
    let updated = &zones[0];
    assert_eq!(updated.status, ZoneStatus::Restricted);
    assert!(updated.last_updated >= seeded.last_updated);
    assert_eq!(updated.name, seeded.name);
    assert_eq!(updated.created_at, seeded.created_at);
    assert_eq!(updated.polygon, seeded.polygon);
}

#[tokio::test]
async fn update_status_of_unknown_record_is_not_found() {
    let fixture = fixture(vec![seed_zone("zone-1", "Red Fort Area")], Vec::new());
    let result = fixture
        .service
        .update_status(
            &session_for(Role::Admin),
            &record_id("zone-404"),
            ZoneStatus::Safe,
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn deleting_unknown_id_returns_same_snapshot() {
    let fixture = fixture(vec![seed_zone("zone-1", "Red Fort Area")], Vec::new());
    let Ok(before) = fixture.store.snapshot().await else {
        panic!("snapshot should load");
    };

    let result = fixture
        .service
        .delete(&session_for(Role::Admin), &record_id("zone-404"))
        .await;

    let Ok(after) = result else {
        panic!("delete of unknown id should succeed");
    };
    assert!(Arc::ptr_eq(&before, &after));
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn delete_removes_record_and_audits() {
    let fixture = fixture(
        vec![
            seed_zone("zone-1", "Red Fort Area"),
            seed_zone("zone-2", "Connaught Place"),
        ],
        Vec::new(),
    );

    let result = fixture
        .service
        .delete(&session_for(Role::Admin), &record_id("zone-1"))
        .await;

    let Ok(zones) = result else {
        panic!("admin should delete zones");
    };
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].name, "Connaught Place");
    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::DeleteRecord);
}

#[tokio::test]
async fn audit_failure_does_not_fail_mutation() {
    let store = Arc::new(FakeStore::with(Vec::<Zone>::new()));
    let service = RecordService::new(
        AuthorizationService::new(),
        store.clone(),
        AuditTrail::new(Arc::new(OfflineAudit)),
        Arc::new(ScriptedIds::new(vec!["zone-1"])),
        Arc::new(FixedLedger),
    );

    let result = service
        .create(&session_for(Role::Admin), ZoneDraft::named("Test Zone"))
        .await;

    assert!(matches!(result, Ok(ref zones) if zones.len() == 1));
}

#[tokio::test]
async fn overdue_search_finds_only_overdue_tourists() {
    let fixture = fixture(
        vec![
            seed_tourist("T001", "Sarah Johnson", CheckInStatus::Safe),
            seed_tourist("T002", "Hans Mueller", CheckInStatus::Overdue),
            seed_tourist("T003", "Akiko Tanaka", CheckInStatus::Emergency),
        ],
        Vec::new(),
    );

    let Ok(tourists) = fixture.service.list(&session_for(Role::Tourism)).await else {
        panic!("tourism officer should list tourists");
    };
    let query = RecordQuery::new().with_text("overdue");
    let names: Vec<&str> = filter_records(tourists.as_slice(), &query)
        .map(|tourist| tourist.name.as_str())
        .collect();
    assert_eq!(names, vec!["Hans Mueller"]);
}

#[tokio::test]
async fn register_rejects_missing_passport() {
    let fixture = fixture(Vec::<Tourist>::new(), Vec::new());
    let draft = TouristDraft {
        name: "Sarah Johnson".to_owned(),
        phone: "+1-555-0123".to_owned(),
        ..TouristDraft::default()
    };

    let result = fixture
        .service
        .register(&session_for(Role::Tourism), draft)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn verify_digital_id_marks_tourist_active() {
    let fixture = fixture(
        vec![seed_tourist("T002", "Hans Mueller", CheckInStatus::Overdue)],
        Vec::new(),
    );

    let result = fixture
        .service
        .verify_digital_id(&session_for(Role::Hotel), &record_id("T002"))
        .await;

    let Ok(tourists) = result else {
        panic!("hotel staff can verify digital ids");
    };
    assert_eq!(tourists[0].digital_id_status, DigitalIdStatus::Active);
    assert_eq!(tourists[0].check_in_status, CheckInStatus::Overdue);
    assert!(
        tourists[0]
            .verification_tx
            .as_deref()
            .is_some_and(|tx| tx.starts_with("0x") && tx.len() == 42)
    );
    let events = fixture.audit.events.lock().await;
    assert_eq!(events[0].action, AuditAction::BlockchainVerify);
}

#[tokio::test]
async fn tourist_role_cannot_verify_digital_ids() {
    let fixture = fixture(
        vec![seed_tourist("T001", "Sarah Johnson", CheckInStatus::Safe)],
        Vec::new(),
    );
    let result = fixture
        .service
        .verify_digital_id(&session_for(Role::Tourist), &record_id("T001"))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn viewing_profile_records_pii_access() {
    let fixture = fixture(
        vec![seed_tourist("T001", "Sarah Johnson", CheckInStatus::Safe)],
        Vec::new(),
    );

    let result = fixture
        .service
        .view_profile(&session_for(Role::Tourism), &record_id("T001"))
        .await;

    assert!(matches!(result, Ok(ref tourist) if tourist.name == "Sarah Johnson"));
    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::PiiAccess);
    assert_eq!(events[0].actor_role, Role::Tourism);
}

fn seed_entry(id: &str, action: AuditAction, actor: &str) -> AuditLogEntry {
    AuditLogEntry::new(
        record_id(id),
        action,
        actor,
        Role::Police,
        "Tourist: Hans Mueller",
        Utc::now(),
    )
}

#[tokio::test]
async fn export_renders_filtered_rows_for_admin() {
    let fixture = fixture(
        vec![
            seed_entry("audit-1", AuditAction::PiiAccess, "Officer Sarah Chen"),
            seed_entry("audit-2", AuditAction::Login, "Officer Sarah Chen"),
        ],
        Vec::new(),
    );

    let query = RecordQuery::new().with_filter("action", "PII_ACCESS");
    let result = fixture
        .service
        .export(&session_for(Role::Admin), &query)
        .await;

    let Ok(export) = result else {
        panic!("admin should export audit logs");
    };
    assert_eq!(export.row_count, 1);
    assert_eq!(export.csv.lines().count(), 2);
    assert!(export.csv.starts_with("Timestamp,Action"));
    let events = fixture.audit.events.lock().await;
    assert_eq!(events[0].action, AuditAction::ExportData);
    assert_eq!(events[0].resource, "Audit Logs (1 entries)");
}

#[tokio::test]
async fn export_requires_audit_read() {
    let fixture = fixture(
        vec![seed_entry("audit-1", AuditAction::Login, "Officer Sarah Chen")],
        Vec::new(),
    );
    let result = fixture
        .service
        .export(&session_for(Role::Police), &RecordQuery::new())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(ref value)) if value == "audit.read"));
}

#[tokio::test]
async fn anchor_stamps_transaction_and_digest() {
    let entry = seed_entry("audit-1", AuditAction::PiiAccess, "Officer Sarah Chen")
        .with_status(AuditStatus::Pending);
    let digest = entry.content_digest();
    let fixture = fixture(vec![entry], Vec::new());

    let result = fixture
        .service
        .anchor(&session_for(Role::Admin), &record_id("audit-1"))
        .await;

    let Ok(entries) = result else {
        panic!("admin should anchor entries");
    };
    assert_eq!(entries[0].status, AuditStatus::Completed);
    assert_eq!(entries[0].anchor_digest.as_deref(), Some(digest.as_str()));
    assert!(entries[0].blockchain_tx.is_some());
    let events = fixture.audit.events.lock().await;
    assert_eq!(events[0].action, AuditAction::BlockchainAnchor);
}

#[tokio::test]
async fn anchor_of_unknown_entry_is_not_found() {
    let fixture = fixture(Vec::<AuditLogEntry>::new(), Vec::new());
    let result = fixture
        .service
        .anchor(&session_for(Role::Admin), &record_id("audit-404"))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn record_login_stamps_matching_user() {
    let draft = SystemUserDraft {
        name: "Officer Sarah Chen".to_owned(),
        email: "police@demo.local".to_owned(),
        role: Role::Police,
        badge: None,
        unit: None,
        phone: None,
        location: None,
    };
    let user = SystemUser::from_draft(record_id("user-2"), draft, &context())
        .unwrap_or_else(|error| panic!("seed user should build: {error}"));
    let fixture = fixture(vec![user], Vec::new());
    let session = session_for(Role::Police);
    let Some(identity) = session.current_identity() else {
        panic!("session should be authenticated");
    };

    let result = fixture.service.record_login(identity).await;

    assert!(result.is_ok());
    let Ok(users) = fixture.store.snapshot().await else {
        panic!("snapshot should load");
    };
    assert!(users[0].last_login.is_some());
}
