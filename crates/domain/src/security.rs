use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tourguard_core::{AppError, Role};

/// Capabilities enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// Allows reading incidents.
    #[serde(rename = "incidents.read")]
    IncidentsRead,
    /// Allows raising incidents.
    #[serde(rename = "incidents.create")]
    IncidentsCreate,
    /// Allows assigning incidents to responders.
    #[serde(rename = "incidents.assign")]
    IncidentsAssign,
    /// Allows verifying tourist digital ids.
    #[serde(rename = "digital_id.verify")]
    DigitalIdVerify,
    /// Allows reading security zones.
    #[serde(rename = "zones.read")]
    ZonesRead,
    /// Allows creating, updating and deleting security zones.
    #[serde(rename = "zones.write")]
    ZonesWrite,
    /// Allows reading portal users.
    #[serde(rename = "users.read")]
    UsersRead,
    /// Allows creating, updating and deleting portal users.
    #[serde(rename = "users.write")]
    UsersWrite,
    /// Allows reading and exporting audit entries.
    #[serde(rename = "audit.read")]
    AuditRead,
    /// Allows reviewing, anchoring and purging audit entries.
    #[serde(rename = "audit.manage")]
    AuditManage,
    /// Allows reading tourist profiles.
    #[serde(rename = "tourist.read")]
    TouristRead,
    /// Allows registering and updating tourist profiles.
    #[serde(rename = "tourist.write")]
    TouristWrite,
    /// Allows handling emergency calls.
    #[serde(rename = "calls.handle")]
    CallsHandle,
    /// Allows dispatching emergency units.
    #[serde(rename = "emergency.dispatch")]
    EmergencyDispatch,
}

impl Capability {
    /// Returns a stable storage value for this capability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncidentsRead => "incidents.read",
            Self::IncidentsCreate => "incidents.create",
            Self::IncidentsAssign => "incidents.assign",
            Self::DigitalIdVerify => "digital_id.verify",
            Self::ZonesRead => "zones.read",
            Self::ZonesWrite => "zones.write",
            Self::UsersRead => "users.read",
            Self::UsersWrite => "users.write",
            Self::AuditRead => "audit.read",
            Self::AuditManage => "audit.manage",
            Self::TouristRead => "tourist.read",
            Self::TouristWrite => "tourist.write",
            Self::CallsHandle => "calls.handle",
            Self::EmergencyDispatch => "emergency.dispatch",
        }
    }

    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::IncidentsRead,
            Capability::IncidentsCreate,
            Capability::IncidentsAssign,
            Capability::DigitalIdVerify,
            Capability::ZonesRead,
            Capability::ZonesWrite,
            Capability::UsersRead,
            Capability::UsersWrite,
            Capability::AuditRead,
            Capability::AuditManage,
            Capability::TouristRead,
            Capability::TouristWrite,
            Capability::CallsHandle,
            Capability::EmergencyDispatch,
        ];

        ALL
    }
}

impl Display for Capability {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown capability value '{value}'")))
    }
}

/// Returns the capability set granted to a role.
///
/// Administrators receive every known capability; authorization checks
/// additionally treat them as a wildcard.
#[must_use]
pub fn capabilities_for(role: Role) -> BTreeSet<Capability> {
    use Capability::*;

    let granted: &[Capability] = match role {
        Role::Admin => Capability::all(),
        Role::Police => &[IncidentsRead, IncidentsAssign, DigitalIdVerify, ZonesRead],
        Role::Tourism => &[
            IncidentsRead,
            DigitalIdVerify,
            ZonesRead,
            TouristRead,
            TouristWrite,
        ],
        Role::Operator112 => &[
            IncidentsCreate,
            IncidentsAssign,
            CallsHandle,
            EmergencyDispatch,
        ],
        Role::Hotel => &[IncidentsRead, DigitalIdVerify],
        Role::Tourist => &[IncidentsCreate],
    };

    granted.iter().copied().collect()
}

/// Returns the capability set for a role storage value.
///
/// Unknown role values yield the empty set.
#[must_use]
pub fn capabilities_for_role_name(role: &str) -> BTreeSet<Capability> {
    Role::from_str(role)
        .map(capabilities_for)
        .unwrap_or_default()
}

/// Record collections managed by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Security zones.
    Zones,
    /// Portal users.
    Users,
    /// Audit trail entries.
    AuditLogs,
    /// Registered tourists.
    Tourists,
}

impl Resource {
    /// Returns a stable storage value for this resource.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zones => "zones",
            Self::Users => "users",
            Self::AuditLogs => "audit_logs",
            Self::Tourists => "tourists",
        }
    }

    /// Capability required for every mutation of this collection.
    #[must_use]
    pub fn write_capability(&self) -> Capability {
        match self {
            Self::Zones => Capability::ZonesWrite,
            Self::Users => Capability::UsersWrite,
            Self::AuditLogs => Capability::AuditManage,
            Self::Tourists => Capability::TouristWrite,
        }
    }

    /// Audit action recorded for a mutation of this collection.
    #[must_use]
    pub fn audit_action(&self, mutation: MutationKind) -> AuditAction {
        match (self, mutation) {
            (_, MutationKind::Delete) => AuditAction::DeleteRecord,
            (Self::Zones, MutationKind::Create) => AuditAction::ZoneCreate,
            (Self::Zones, MutationKind::UpdateStatus) => AuditAction::ZoneUpdate,
            (Self::Users, MutationKind::Create) => AuditAction::UserCreate,
            (Self::Users, MutationKind::UpdateStatus) => AuditAction::UserUpdate,
            (Self::AuditLogs, MutationKind::Create) => AuditAction::AuditEntryCreate,
            (Self::AuditLogs, MutationKind::UpdateStatus) => AuditAction::AuditReview,
            (Self::Tourists, MutationKind::Create) => AuditAction::TouristRegister,
            (Self::Tourists, MutationKind::UpdateStatus) => AuditAction::TouristUpdate,
        }
    }
}

/// Mutation shapes shared by every record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// A new record was prepended.
    Create,
    /// A record status was replaced.
    UpdateStatus,
    /// A record was removed.
    Delete,
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Personally identifiable information was accessed.
    PiiAccess,
    /// An incident was assigned to a responder.
    IncidentAssign,
    /// A security zone was created.
    ZoneCreate,
    /// A security zone was updated.
    ZoneUpdate,
    /// A portal user was created.
    UserCreate,
    /// A portal user was updated.
    UserUpdate,
    /// A tourist was registered.
    TouristRegister,
    /// A tourist profile was updated.
    TouristUpdate,
    /// An audit entry was recorded manually.
    AuditEntryCreate,
    /// An audit entry was reviewed.
    AuditReview,
    /// An identity logged in.
    Login,
    /// An identity logged out.
    Logout,
    /// Records were exported.
    ExportData,
    /// A record was deleted.
    DeleteRecord,
    /// A digital id was verified against the ledger.
    BlockchainVerify,
    /// An audit entry was anchored to the ledger.
    BlockchainAnchor,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PiiAccess => "PII_ACCESS",
            Self::IncidentAssign => "INCIDENT_ASSIGN",
            Self::ZoneCreate => "ZONE_CREATE",
            Self::ZoneUpdate => "ZONE_UPDATE",
            Self::UserCreate => "USER_CREATE",
            Self::UserUpdate => "USER_UPDATE",
            Self::TouristRegister => "TOURIST_REGISTER",
            Self::TouristUpdate => "TOURIST_UPDATE",
            Self::AuditEntryCreate => "AUDIT_ENTRY_CREATE",
            Self::AuditReview => "AUDIT_REVIEW",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::ExportData => "EXPORT_DATA",
            Self::DeleteRecord => "DELETE_RECORD",
            Self::BlockchainVerify => "BLOCKCHAIN_VERIFY",
            Self::BlockchainAnchor => "BLOCKCHAIN_ANCHOR",
        }
    }

    /// Returns the risk level an entry for this action starts with.
    #[must_use]
    pub fn default_risk(&self) -> RiskLevel {
        match self {
            Self::PiiAccess | Self::DeleteRecord => RiskLevel::High,
            Self::Login | Self::Logout | Self::BlockchainVerify | Self::BlockchainAnchor => {
                RiskLevel::Low
            }
            _ => RiskLevel::Medium,
        }
    }

    /// Returns a human readable description for an action on a resource.
    #[must_use]
    pub fn describe(&self, resource: &str) -> String {
        match self {
            Self::PiiAccess => {
                format!("Accessed personally identifiable information for {resource}")
            }
            Self::IncidentAssign => format!("Assigned incident {resource} to responding officer"),
            Self::ZoneCreate => format!("Created security zone {resource}"),
            Self::ZoneUpdate => format!("Updated security zone configuration for {resource}"),
            Self::Login => "User authenticated and logged into the system".to_owned(),
            Self::Logout => "User logged out of the system".to_owned(),
            Self::ExportData => format!("Exported sensitive data: {resource}"),
            Self::DeleteRecord => format!("Deleted record: {resource}"),
            Self::BlockchainVerify => format!("Verified blockchain transaction for {resource}"),
            Self::BlockchainAnchor => format!("Anchored audit entry {resource} to the ledger"),
            _ => format!("Performed {} on {resource}", self.as_str()),
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PII_ACCESS" => Ok(Self::PiiAccess),
            "INCIDENT_ASSIGN" => Ok(Self::IncidentAssign),
            "ZONE_CREATE" => Ok(Self::ZoneCreate),
            "ZONE_UPDATE" => Ok(Self::ZoneUpdate),
            "USER_CREATE" => Ok(Self::UserCreate),
            "USER_UPDATE" => Ok(Self::UserUpdate),
            "TOURIST_REGISTER" => Ok(Self::TouristRegister),
            "TOURIST_UPDATE" => Ok(Self::TouristUpdate),
            "AUDIT_ENTRY_CREATE" => Ok(Self::AuditEntryCreate),
            "AUDIT_REVIEW" => Ok(Self::AuditReview),
            "LOGIN" => Ok(Self::Login),
            "LOGOUT" => Ok(Self::Logout),
            "EXPORT_DATA" => Ok(Self::ExportData),
            "DELETE_RECORD" => Ok(Self::DeleteRecord),
            "BLOCKCHAIN_VERIFY" => Ok(Self::BlockchainVerify),
            "BLOCKCHAIN_ANCHOR" => Ok(Self::BlockchainAnchor),
            _ => Err(AppError::Validation(format!(
                "unknown audit action value '{value}'"
            ))),
        }
    }
}

/// Risk level attached to audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine activity.
    Low,
    /// Activity worth reviewing.
    Medium,
    /// Sensitive activity.
    High,
}

impl RiskLevel {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
