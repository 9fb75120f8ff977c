//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod demo_credential_directory;
mod id_generators;
mod in_memory_audit_repository;
mod in_memory_record_store;
mod mock_data_service;
mod random_data_generator;
mod settings_stores;
mod tracing_notifier;

pub use demo_credential_directory::{DEMO_PASSWORD, DemoCredentialDirectory};
pub use id_generators::{SequentialIdGenerator, UuidIdGenerator};
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_record_store::InMemoryRecordStore;
pub use mock_data_service::{MockDataConfig, MockDataService};
pub use random_data_generator::RandomDataGenerator;
pub use settings_stores::{InMemorySettingsStore, JsonFileSettingsStore};
pub use tracing_notifier::TracingNotifier;
