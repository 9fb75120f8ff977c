use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourguard_core::{AppError, AppResult, RecordId};

use crate::{DraftContext, Filterable, ManagedRecord, Resource};

/// Safety check-in state of a tourist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckInStatus {
    /// Checked in at the expected time.
    CheckedIn,
    /// Missed the expected check-in.
    Overdue,
    /// Raised an emergency.
    Emergency,
    /// Confirmed safe.
    Safe,
}

impl CheckInStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckedIn => "checked-in",
            Self::Overdue => "overdue",
            Self::Emergency => "emergency",
            Self::Safe => "safe",
        }
    }
}

impl FromStr for CheckInStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "checked-in" => Ok(Self::CheckedIn),
            "overdue" => Ok(Self::Overdue),
            "emergency" => Ok(Self::Emergency),
            "safe" => Ok(Self::Safe),
            _ => Err(AppError::Validation(format!(
                "unknown check-in status '{value}'"
            ))),
        }
    }
}

/// Lifecycle of a tourist digital id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitalIdStatus {
    /// Verified and valid.
    Active,
    /// Past its validity window.
    Expired,
    /// Issued but not yet verified.
    Pending,
}

impl DigitalIdStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Pending => "pending",
        }
    }
}

/// Registration form for a tourist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouristDraft {
    /// Full name. Required.
    pub name: String,
    /// Passport number. Required.
    pub passport: String,
    /// Contact phone. Required.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// Emergency contact number.
    pub emergency_contact: Option<String>,
    /// Preferred language.
    pub language: Option<String>,
    /// Whether live location sharing is enabled.
    pub location_sharing: bool,
}

/// Registered tourist profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tourist {
    /// Record identifier.
    pub id: RecordId,
    /// Full name.
    pub name: String,
    /// Passport number.
    pub passport: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// Emergency contact number.
    pub emergency_contact: Option<String>,
    /// Preferred language.
    pub language: String,
    /// Whether live location sharing is enabled.
    pub location_sharing: bool,
    /// Safety check-in state.
    pub check_in_status: CheckInStatus,
    /// Last reported location (display string).
    pub last_location: String,
    /// Digital id lifecycle state.
    pub digital_id_status: DigitalIdStatus,
    /// Ledger transaction of the last successful verification.
    pub verification_tx: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub last_updated: DateTime<Utc>,
}

impl Tourist {
    /// Marks the digital id verified by a ledger transaction.
    pub fn mark_verified(&mut self, transaction: impl Into<String>, verified_at: DateTime<Utc>) {
        self.digital_id_status = DigitalIdStatus::Active;
        self.verification_tx = Some(transaction.into());
        self.last_updated = verified_at;
    }
}

impl Filterable for Tourist {
    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.passport.as_str(),
            self.last_location.as_str(),
            self.check_in_status.as_str(),
        ]
    }

    fn categorical_value(&self, field: &str) -> Option<&str> {
        match field {
            "status" => Some(self.check_in_status.as_str()),
            "digital_id" => Some(self.digital_id_status.as_str()),
            _ => None,
        }
    }
}

impl ManagedRecord for Tourist {
    type Status = CheckInStatus;
    type Draft = TouristDraft;

    const RESOURCE: Resource = Resource::Tourists;
    const ID_PREFIX: &'static str = "tourist";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        self.name.as_str()
    }

    fn status(&self) -> CheckInStatus {
        self.check_in_status
    }

    fn status_str(status: CheckInStatus) -> &'static str {
        status.as_str()
    }

    fn apply_status(&mut self, status: CheckInStatus, updated_at: DateTime<Utc>) {
        self.check_in_status = status;
        self.last_updated = updated_at;
    }

    fn from_draft(id: RecordId, draft: TouristDraft, context: &DraftContext) -> AppResult<Self> {
        let missing: Vec<&str> = [
            ("name", draft.name.as_str()),
            ("passport", draft.passport.as_str()),
            ("phone", draft.phone.as_str()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.trim().is_empty().then_some(field))
        .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "missing required tourist fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            id,
            name: draft.name.trim().to_owned(),
            passport: draft.passport.trim().to_uppercase(),
            phone: draft.phone.trim().to_owned(),
            email: draft.email,
            emergency_contact: draft.emergency_contact,
            language: draft.language.unwrap_or_else(|| "en".to_owned()),
            location_sharing: draft.location_sharing,
            check_in_status: CheckInStatus::CheckedIn,
            last_location: "Registration desk".to_owned(),
            digital_id_status: DigitalIdStatus::Pending,
            verification_tx: None,
            created_at: context.created_at,
            last_updated: context.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tourguard_core::{AppError, RecordId, Role};

    use super::{CheckInStatus, DigitalIdStatus, Tourist, TouristDraft};
    use crate::{DraftContext, ManagedRecord};

    fn context() -> DraftContext {
        DraftContext {
            created_at: Utc::now(),
            actor_name: "Tourism Officer Raj Patel".to_owned(),
            actor_role: Role::Tourism,
        }
    }

    fn id() -> RecordId {
        RecordId::new("tourist-1").unwrap_or_else(|_| panic!("valid id"))
    }

    #[test]
    fn registration_requires_name_passport_and_phone() {
        let draft = TouristDraft {
            name: "Sarah Johnson".to_owned(),
            ..TouristDraft::default()
        };
        let result = Tourist::from_draft(id(), draft, &context());
        assert!(
            matches!(result, Err(AppError::Validation(message)) if message.contains("passport, phone"))
        );
    }

    #[test]
    fn registered_tourist_starts_checked_in_with_pending_id() {
        let draft = TouristDraft {
            name: "Sarah Johnson".to_owned(),
            passport: "us123456789".to_owned(),
            phone: "+1-555-0123".to_owned(),
            location_sharing: true,
            ..TouristDraft::default()
        };
        let Ok(mut tourist) = Tourist::from_draft(id(), draft, &context()) else {
            panic!("registration should succeed");
        };
        assert_eq!(tourist.check_in_status, CheckInStatus::CheckedIn);
        assert_eq!(tourist.digital_id_status, DigitalIdStatus::Pending);
        assert_eq!(tourist.passport, "US123456789");

        tourist.mark_verified("0xfeed", Utc::now());
        assert_eq!(tourist.digital_id_status, DigitalIdStatus::Active);
    }
}
