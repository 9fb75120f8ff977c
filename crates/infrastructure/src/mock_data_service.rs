//! Simulated data service seeding the portal collections.
//!
//! In mock mode every request sleeps for the configured latency and, when
//! `fail_every` is non-zero, every Nth request reports `success: false`.
//! Live mode answers immediately and never fails.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use tourguard_application::{DataGenerator, DataMode, DataSource, FetchResponse};
use tourguard_core::{AppResult, RecordId, Role};
use tourguard_domain::{
    AuditAction, AuditLogEntry, AuditStatus, CheckInStatus, DigitalIdStatus, GeoPoint,
    SystemUser, Tourist, UserStatus, Zone, ZoneStatus, permission_labels,
};

/// Behaviour of the simulated data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDataConfig {
    /// Delay applied to every mock-mode request.
    pub latency: Duration,
    /// Fail every Nth mock-mode request; zero never fails.
    pub fail_every: u32,
}

impl Default for MockDataConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(300),
            fail_every: 0,
        }
    }
}

/// Seeded data source for zones, users, audit entries and tourists.
pub struct MockDataService {
    config: MockDataConfig,
    generator: Arc<dyn DataGenerator>,
    requests: AtomicU64,
}

impl MockDataService {
    /// Creates a mock data service.
    #[must_use]
    pub fn new(config: MockDataConfig, generator: Arc<dyn DataGenerator>) -> Self {
        Self {
            config,
            generator,
            requests: AtomicU64::new(0),
        }
    }

    /// Applies latency and failure injection. Returns false for a failed request.
    async fn simulate(&self, mode: DataMode, collection: &'static str) -> bool {
        if mode == DataMode::Live {
            return true;
        }

        tokio::time::sleep(self.config.latency).await;
        let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        if self.config.fail_every > 0 && request % u64::from(self.config.fail_every) == 0 {
            warn!(collection, request, "simulated data service failure");
            return false;
        }

        debug!(collection, request, "simulated data service response");
        true
    }

    fn pick<'a>(&self, values: &[&'a str]) -> &'a str {
        values
            .get(self.generator.pick_index(values.len()))
            .copied()
            .unwrap_or_default()
    }

    fn zones(&self, now: DateTime<Utc>) -> AppResult<Vec<Zone>> {
        let seeds = [
            ("ZONE-001", "Connaught Place", ZoneStatus::Safe, 2.5, (28.6315, 77.2167)),
            ("ZONE-002", "Red Fort Area", ZoneStatus::Moderate, 5.5, (28.6562, 77.2410)),
            ("ZONE-003", "Chandni Chowk", ZoneStatus::Unsafe, 7.8, (28.6506, 77.2303)),
            ("ZONE-004", "India Gate", ZoneStatus::Safe, 3.1, (28.6129, 77.2295)),
            ("ZONE-005", "Parliament Complex", ZoneStatus::Restricted, 8.9, (28.6172, 77.2080)),
        ];

        seeds
            .into_iter()
            .enumerate()
            .map(|(index, (id, name, status, risk_score, (lat, lng)))| {
                let restrictions = if status == ZoneStatus::Restricted {
                    vec!["No photography".to_owned(), "Escort required".to_owned()]
                } else {
                    Vec::new()
                };
                let updated = minutes_ago(now, 15 * (index as i64 + 1));
                Ok(Zone {
                    id: RecordId::new(id)?,
                    name: name.to_owned(),
                    status,
                    risk_score,
                    polygon: square_around(lat, lng),
                    incident_count: self.generator.count_between(1, 20),
                    tourist_count: self.generator.count_between(50, 549),
                    responsible_officer: self
                        .pick(&["Officer Chen", "Officer Patel", "Officer Kumar"])
                        .to_owned(),
                    patrol_schedule: self
                        .pick(&["Every 2 hours", "24/7 Coverage", "Peak hours only"])
                        .to_owned(),
                    emergency_contacts: vec![
                        "112".to_owned(),
                        "100".to_owned(),
                        "Tourist Helpline".to_owned(),
                    ],
                    restrictions,
                    description: format!(
                        "Security zone covering {name} area with {} risk level.",
                        status.as_str()
                    ),
                    created_at: minutes_ago(now, 60 * 24 * 30),
                    last_updated: updated,
                })
            })
            .collect()
    }

    fn users(now: DateTime<Utc>) -> AppResult<Vec<SystemUser>> {
        let seeds = [
            ("user-1", "Admin User", "admin@demo.local", Role::Admin, UserStatus::Active, "ADM001", "Central Command", "Delhi HQ"),
            ("user-2", "Officer Sarah Chen", "police1@demo.local", Role::Police, UserStatus::Active, "POL001", "District 1", "Connaught Place"),
            ("user-3", "Tourism Officer Raj Patel", "tourism1@demo.local", Role::Tourism, UserStatus::Active, "TOU001", "Tourism Board", "India Gate"),
            ("user-4", "112 Operator Maya Singh", "operator112@demo.local", Role::Operator112, UserStatus::Active, "OPR001", "Emergency Response", "112 Command Center"),
            ("user-5", "Hotel Manager Kumar", "hotel1@demo.local", Role::Hotel, UserStatus::Active, "HTL001", "Grand Palace Hotel", "Karol Bagh"),
            ("user-6", "Officer Inactive", "inactive@demo.local", Role::Police, UserStatus::Inactive, "POL002", "District 2", "Offline"),
        ];

        seeds
            .into_iter()
            .enumerate()
            .map(|(index, (id, name, email, role, status, badge, unit, location))| {
                let last_login =
                    (status == UserStatus::Active).then(|| minutes_ago(now, 30 * (index as i64 + 1)));
                Ok(SystemUser {
                    id: RecordId::new(id)?,
                    name: name.to_owned(),
                    email: email.to_owned(),
                    role,
                    status,
                    badge: Some(badge.to_owned()),
                    unit: Some(unit.to_owned()),
                    phone: Some(format!("+91 98765 4321{index}")),
                    location: Some(location.to_owned()),
                    permissions: permission_labels(role),
                    last_login,
                    created_at: minutes_ago(now, 60 * 24 * 90),
                    last_updated: minutes_ago(now, 60 * 24),
                })
            })
            .collect()
    }

    fn audit_logs(&self, now: DateTime<Utc>) -> AppResult<Vec<AuditLogEntry>> {
        let seeds = [
            ("AUD-001", AuditAction::Login, "Officer Sarah Chen", Role::Police, "Authority Portal", AuditStatus::Completed, 2),
            ("AUD-002", AuditAction::PiiAccess, "Officer Sarah Chen", Role::Police, "Tourist: Hans Mueller", AuditStatus::Approved, 12),
            ("AUD-003", AuditAction::ZoneUpdate, "Admin User", Role::Admin, "Zone: Connaught Place", AuditStatus::Completed, 25),
            ("AUD-004", AuditAction::IncidentAssign, "112 Operator Maya Singh", Role::Operator112, "Incident INC-2024-0042", AuditStatus::Completed, 48),
            ("AUD-005", AuditAction::ExportData, "Tourism Officer Raj Patel", Role::Tourism, "Tourist Registry", AuditStatus::Pending, 90),
            ("AUD-006", AuditAction::DeleteRecord, "Officer Sarah Chen", Role::Police, "Incident INC-2024-0017", AuditStatus::Denied, 180),
            ("AUD-007", AuditAction::BlockchainVerify, "Hotel Manager Kumar", Role::Hotel, "Tourist: Akiko Tanaka", AuditStatus::Completed, 240),
        ];

        seeds
            .into_iter()
            .enumerate()
            .map(|(index, (id, action, actor, role, resource, status, age))| {
                let mut entry = AuditLogEntry::new(
                    RecordId::new(id)?,
                    action,
                    actor,
                    role,
                    resource,
                    minutes_ago(now, age),
                )
                .with_status(status);
                entry.ip_address = Some(format!("192.168.1.{}", 100 + index));
                if status == AuditStatus::Approved {
                    entry.approved_by = Some("Admin User".to_owned());
                }
                if action == AuditAction::PiiAccess {
                    entry.anchor_digest = Some(entry.content_digest());
                    entry.blockchain_tx = Some(self.generator.transaction_hash());
                }
                Ok(entry)
            })
            .collect()
    }

    fn tourists(&self, now: DateTime<Utc>) -> AppResult<Vec<Tourist>> {
        let seeds = [
            ("T001", "Sarah Johnson", "US123456789", "+1-555-0123", "sarah.j@email.com", "+1-555-0456", "English", true, CheckInStatus::Safe, "Red Fort, Delhi"),
            ("T002", "Hans Mueller", "DE987654321", "+49-555-0789", "h.mueller@email.com", "+49-555-0012", "German", false, CheckInStatus::Overdue, "India Gate, Delhi"),
            ("T003", "Akiko Tanaka", "JP456789123", "+81-555-0345", "a.tanaka@email.com", "+81-555-0678", "Japanese", true, CheckInStatus::Emergency, "Chandni Chowk, Delhi"),
        ];

        seeds
            .into_iter()
            .map(
                |(id, name, passport, phone, email, emergency, language, sharing, status, location)| {
                    Ok(Tourist {
                        id: RecordId::new(id)?,
                        name: name.to_owned(),
                        passport: passport.to_owned(),
                        phone: phone.to_owned(),
                        email: Some(email.to_owned()),
                        emergency_contact: Some(emergency.to_owned()),
                        language: language.to_owned(),
                        location_sharing: sharing,
                        check_in_status: status,
                        last_location: location.to_owned(),
                        digital_id_status: DigitalIdStatus::Active,
                        verification_tx: Some(self.generator.transaction_hash()),
                        created_at: minutes_ago(now, 60 * 24 * 3),
                        last_updated: minutes_ago(now, 20),
                    })
                },
            )
            .collect()
    }
}

fn minutes_ago(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    now - TimeDelta::minutes(minutes)
}

fn square_around(lat: f64, lng: f64) -> Vec<GeoPoint> {
    const HALF: f64 = 0.002;
    vec![
        GeoPoint::new(lat - HALF, lng - HALF),
        GeoPoint::new(lat - HALF, lng + HALF),
        GeoPoint::new(lat + HALF, lng + HALF),
        GeoPoint::new(lat + HALF, lng - HALF),
    ]
}

#[async_trait]
impl DataSource<Zone> for MockDataService {
    async fn fetch(&self, mode: DataMode) -> AppResult<FetchResponse<Zone>> {
        if !self.simulate(mode, "zones").await {
            return Ok(FetchResponse::failed());
        }
        Ok(FetchResponse::ok(self.zones(Utc::now())?))
    }
}

#[async_trait]
impl DataSource<SystemUser> for MockDataService {
    async fn fetch(&self, mode: DataMode) -> AppResult<FetchResponse<SystemUser>> {
        if !self.simulate(mode, "users").await {
            return Ok(FetchResponse::failed());
        }
        Ok(FetchResponse::ok(Self::users(Utc::now())?))
    }
}

#[async_trait]
impl DataSource<AuditLogEntry> for MockDataService {
    async fn fetch(&self, mode: DataMode) -> AppResult<FetchResponse<AuditLogEntry>> {
        if !self.simulate(mode, "audit_logs").await {
            return Ok(FetchResponse::failed());
        }
        Ok(FetchResponse::ok(self.audit_logs(Utc::now())?))
    }
}

#[async_trait]
impl DataSource<Tourist> for MockDataService {
    async fn fetch(&self, mode: DataMode) -> AppResult<FetchResponse<Tourist>> {
        if !self.simulate(mode, "tourists").await {
            return Ok(FetchResponse::failed());
        }
        Ok(FetchResponse::ok(self.tourists(Utc::now())?))
    }
}
