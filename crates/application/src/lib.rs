//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_trail;
mod authorization_service;
mod collection_loader;
mod delayed_reset;
mod list_page;
mod notifications;
mod record_ports;
mod record_service;
mod session;
mod session_service;
mod settings_service;

pub use audit_trail::AuditTrail;
pub use authorization_service::{AuthorizationService, VisibleActions, has_permission};
pub use collection_loader::{CollectionLoader, LoadMerge, PageScope};
pub use delayed_reset::DelayedReset;
pub use list_page::{ListPage, notification_for_error};
pub use notifications::{Notification, NotificationLevel, Notifier};
pub use record_ports::{
    AuditEvent, AuditRepository, DataGenerator, DataMode, DataSource, FetchResponse, IdGenerator,
    RecordStore,
};
pub use record_service::{AuditExport, RecordService};
pub use session::{CredentialDirectory, CredentialRecord, Credentials, Session};
pub use session_service::SessionService;
pub use settings_service::{SettingsService, SettingsStore};
