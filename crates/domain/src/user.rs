//! Portal user records and email validation.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourguard_core::{AppError, AppResult, NonEmptyString, RecordId, Role};

use crate::{DraftContext, Filterable, ManagedRecord, Resource, capabilities_for};

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated, lowercased email address.
    ///
    /// Performs basic structural validation: exactly one `@`, non-empty local
    /// part, and a domain containing at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Account status of a portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account may log in.
    Active,
    /// Account is dormant.
    Inactive,
    /// Account was suspended by an administrator.
    Suspended,
}

impl UserStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            _ => Err(AppError::Validation(format!(
                "unknown user status '{value}'"
            ))),
        }
    }
}

/// Input payload for creating portal users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemUserDraft {
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// Badge or staff number.
    pub badge: Option<String>,
    /// Organisational unit.
    pub unit: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Duty location.
    pub location: Option<String>,
}

/// Portal user managed from the users page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUser {
    /// Record identifier.
    pub id: RecordId,
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// Account status.
    pub status: UserStatus,
    /// Badge or staff number.
    pub badge: Option<String>,
    /// Organisational unit.
    pub unit: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Duty location.
    pub location: Option<String>,
    /// Capability storage values granted at creation; `*` for administrators.
    pub permissions: Vec<String>,
    /// Most recent login, if any.
    pub last_login: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub last_updated: DateTime<Utc>,
}

/// Returns the permission strings displayed for a role.
#[must_use]
pub fn permission_labels(role: Role) -> Vec<String> {
    if role == Role::Admin {
        return vec!["*".to_owned()];
    }

    capabilities_for(role)
        .into_iter()
        .map(|capability| capability.as_str().to_owned())
        .collect()
}

impl Filterable for SystemUser {
    fn searchable_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.badge.as_deref());
        fields.extend(self.unit.as_deref());
        fields
    }

    fn categorical_value(&self, field: &str) -> Option<&str> {
        match field {
            "role" => Some(self.role.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl ManagedRecord for SystemUser {
    type Status = UserStatus;
    type Draft = SystemUserDraft;

    const RESOURCE: Resource = Resource::Users;
    const ID_PREFIX: &'static str = "user";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        self.name.as_str()
    }

    fn status(&self) -> UserStatus {
        self.status
    }

    fn status_str(status: UserStatus) -> &'static str {
        status.as_str()
    }

    fn apply_status(&mut self, status: UserStatus, updated_at: DateTime<Utc>) {
        self.status = status;
        self.last_updated = updated_at;
    }

    fn from_draft(
        id: RecordId,
        draft: SystemUserDraft,
        context: &DraftContext,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(draft.name.trim())?;
        let email = EmailAddress::new(draft.email)?;

        Ok(Self {
            id,
            name: name.into(),
            email: email.into(),
            role: draft.role,
            status: UserStatus::Active,
            badge: non_blank(draft.badge),
            unit: non_blank(draft.unit),
            phone: non_blank(draft.phone),
            location: non_blank(draft.location),
            permissions: permission_labels(draft.role),
            last_login: None,
            created_at: context.created_at,
            last_updated: context.created_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim().to_owned();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}
