use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Closed set of roles an authority portal identity can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Central command administrator. Holds every capability.
    Admin,
    /// Police officer.
    Police,
    /// Tourism board officer.
    Tourism,
    /// Emergency (112) call operator.
    #[serde(rename = "operator_112")]
    Operator112,
    /// Hotel staff member.
    Hotel,
    /// Registered tourist.
    Tourist,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Police => "police",
            Self::Tourism => "tourism",
            Self::Operator112 => "operator_112",
            Self::Hotel => "hotel",
            Self::Tourist => "tourist",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Admin,
            Role::Police,
            Role::Tourism,
            Role::Operator112,
            Role::Hotel,
            Role::Tourist,
        ];

        ALL
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "police" => Ok(Self::Police),
            "tourism" => Ok(Self::Tourism),
            "operator_112" => Ok(Self::Operator112),
            "hotel" => Ok(Self::Hotel),
            "tourist" => Ok(Self::Tourist),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Authenticated actor held by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: String,
    display_name: String,
    role: Role,
    email: String,
    badge: Option<String>,
    unit: Option<String>,
    phone: Option<String>,
}

impl Identity {
    /// Creates an identity from a credential directory entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
            email: email.into(),
            badge: None,
            unit: None,
            phone: None,
        }
    }

    /// Attaches badge and unit identifiers.
    #[must_use]
    pub fn with_assignment(mut self, badge: Option<String>, unit: Option<String>) -> Self {
        self.badge = badge;
        self.unit = unit;
        self
    }

    /// Attaches a contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Returns the stable identity id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name for the current actor.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the role of the identity.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the badge number, if assigned.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    /// Returns the organisational unit, if assigned.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns the contact phone, if known.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}
