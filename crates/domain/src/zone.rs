use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourguard_core::{AppError, AppResult, NonEmptyString, RecordId};

use crate::{DraftContext, Filterable, ManagedRecord, Resource, RiskLevel};

/// Risk score assigned to zones created without an explicit score.
pub const DEFAULT_ZONE_RISK_SCORE: f64 = 5.0;

/// Safety status of a security zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    /// No known risk.
    Safe,
    /// Elevated caution.
    Moderate,
    /// Tourists should avoid the area.
    Unsafe,
    /// Access is restricted.
    Restricted,
}

impl ZoneStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Moderate => "moderate",
            Self::Unsafe => "unsafe",
            Self::Restricted => "restricted",
        }
    }
}

impl FromStr for ZoneStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "safe" => Ok(Self::Safe),
            "moderate" => Ok(Self::Moderate),
            "unsafe" => Ok(Self::Unsafe),
            "restricted" => Ok(Self::Restricted),
            _ => Err(AppError::Validation(format!(
                "unknown zone status '{value}'"
            ))),
        }
    }
}

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a coordinate pair.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Input payload for creating zones.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDraft {
    /// Zone name.
    pub name: String,
    /// Initial status; defaults to moderate.
    pub status: Option<ZoneStatus>,
    /// Initial risk score on a 0-10 scale.
    pub risk_score: Option<f64>,
    /// Boundary polygon. A small default square is used when empty.
    pub polygon: Vec<GeoPoint>,
    /// Optional free-form description.
    pub description: Option<String>,
}

impl ZoneDraft {
    /// Creates a draft with defaults for everything but the name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
            risk_score: None,
            polygon: Vec::new(),
            description: None,
        }
    }
}

/// Monitored security zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Record identifier.
    pub id: RecordId,
    /// Zone name.
    pub name: String,
    /// Current status.
    pub status: ZoneStatus,
    /// Risk score on a 0-10 scale.
    pub risk_score: f64,
    /// Boundary polygon.
    pub polygon: Vec<GeoPoint>,
    /// Incidents reported inside the zone.
    pub incident_count: u32,
    /// Tourists currently inside the zone.
    pub tourist_count: u32,
    /// Officer accountable for the zone (display string).
    pub responsible_officer: String,
    /// Patrol coverage description.
    pub patrol_schedule: String,
    /// Emergency contact numbers.
    pub emergency_contacts: Vec<String>,
    /// Access restrictions in force.
    pub restrictions: Vec<String>,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub last_updated: DateTime<Utc>,
}

impl Zone {
    /// Buckets the risk score into a risk level.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        if self.risk_score >= 7.0 {
            RiskLevel::High
        } else if self.risk_score >= 4.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

fn default_polygon() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(28.6000, 77.2000),
        GeoPoint::new(28.6010, 77.2010),
        GeoPoint::new(28.6000, 77.2020),
        GeoPoint::new(28.5990, 77.2010),
    ]
}

impl Filterable for Zone {
    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn categorical_value(&self, field: &str) -> Option<&str> {
        match field {
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl ManagedRecord for Zone {
    type Status = ZoneStatus;
    type Draft = ZoneDraft;

    const RESOURCE: Resource = Resource::Zones;
    const ID_PREFIX: &'static str = "zone";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        self.name.as_str()
    }

    fn status(&self) -> ZoneStatus {
        self.status
    }

    fn status_str(status: ZoneStatus) -> &'static str {
        status.as_str()
    }

    fn apply_status(&mut self, status: ZoneStatus, updated_at: DateTime<Utc>) {
        self.status = status;
        self.last_updated = updated_at;
    }

    fn from_draft(id: RecordId, draft: ZoneDraft, context: &DraftContext) -> AppResult<Self> {
        let name = NonEmptyString::new(draft.name.trim())?;
        let risk_score = draft.risk_score.unwrap_or(DEFAULT_ZONE_RISK_SCORE);
        if !(0.0..=10.0).contains(&risk_score) {
            return Err(AppError::Validation(format!(
                "zone risk score must be between 0 and 10, got {risk_score}"
            )));
        }

        let status = draft.status.unwrap_or(ZoneStatus::Moderate);
        let polygon = if draft.polygon.is_empty() {
            default_polygon()
        } else if draft.polygon.len() < 3 {
            return Err(AppError::Validation(
                "zone polygon must have at least three points".to_owned(),
            ));
        } else {
            draft.polygon
        };

        Ok(Self {
            id,
            name: name.into(),
            status,
            risk_score,
            polygon,
            incident_count: 0,
            tourist_count: 0,
            responsible_officer: context.actor_name.clone(),
            patrol_schedule: "To be defined".to_owned(),
            emergency_contacts: vec!["112".to_owned()],
            restrictions: Vec::new(),
            description: draft
                .description
                .unwrap_or_else(|| "New zone created for monitoring".to_owned()),
            created_at: context.created_at,
            last_updated: context.created_at,
        })
    }
}
