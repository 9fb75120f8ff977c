use serde::{Deserialize, Serialize};

/// Storage key of the persisted settings blob.
pub const SETTINGS_STORAGE_KEY: &str = "authority_settings";

/// Colour theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

/// Notification channel preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Email notifications.
    pub email: bool,
    /// Push notifications.
    pub push: bool,
    /// Audible alerts.
    pub sound: bool,
    /// Emergency broadcast alerts.
    pub emergency: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sound: true,
            emergency: true,
        }
    }
}

/// Privacy and security preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    /// Two-factor authentication toggle.
    pub two_factor: bool,
    /// Session timeout in hours.
    pub session_timeout: u32,
    /// Whether audit logging is enabled.
    pub audit_logging: bool,
    /// Data retention in days.
    pub data_retention: u32,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor: false,
            session_timeout: 8,
            audit_logging: true,
            data_retention: 90,
        }
    }
}

/// API and integration preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    /// Live update streaming.
    pub real_time_updates: bool,
    /// Request timeout in seconds.
    pub timeout: u32,
    /// Maximum request retries.
    pub max_retries: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            real_time_updates: true,
            timeout: 30,
            max_retries: 3,
        }
    }
}

/// Settings blob persisted as a single JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthoritySettings {
    /// Colour theme.
    pub theme: Theme,
    /// UI language code.
    pub language: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Notification preferences.
    pub notifications: NotificationSettings,
    /// Security preferences.
    pub security: SecuritySettings,
    /// API preferences.
    pub api: ApiSettings,
}

impl Default for AuthoritySettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            language: "en".to_owned(),
            timezone: "Asia/Kolkata".to_owned(),
            notifications: NotificationSettings::default(),
            security: SecuritySettings::default(),
            api: ApiSettings::default(),
        }
    }
}
