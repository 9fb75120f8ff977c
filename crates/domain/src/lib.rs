//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit_log;
mod record;
mod security;
mod settings;
mod tourist;
mod user;
mod view;
mod zone;

pub use audit_log::{
    AUDIT_CSV_HEADER, AuditEntryDraft, AuditLogEntry, AuditStatus, audit_csv_row,
};
pub use record::{DraftContext, ManagedRecord};
pub use security::{
    AuditAction, Capability, MutationKind, Resource, RiskLevel, capabilities_for,
    capabilities_for_role_name,
};
pub use settings::{
    ApiSettings, AuthoritySettings, NotificationSettings, SETTINGS_STORAGE_KEY, SecuritySettings,
    Theme,
};
pub use tourist::{CheckInStatus, DigitalIdStatus, Tourist, TouristDraft};
pub use user::{EmailAddress, SystemUser, SystemUserDraft, UserStatus, permission_labels};
pub use view::{ALL_FILTER_VALUE, Filterable, RecordQuery, filter_records};
pub use zone::{DEFAULT_ZONE_RISK_SCORE, GeoPoint, Zone, ZoneDraft, ZoneStatus};
