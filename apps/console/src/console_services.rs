use std::sync::Arc;

use tourguard_application::{
    AuditTrail, AuthorizationService, CollectionLoader, DataGenerator, DataMode, DataSource,
    IdGenerator, LoadMerge, Notifier, RecordService, RecordStore, SessionService,
    SettingsService, SettingsStore,
};
use tourguard_core::AppError;
use tourguard_domain::{AuditLogEntry, ManagedRecord, SystemUser, Tourist, Zone};
use tourguard_infrastructure::{
    DemoCredentialDirectory, InMemoryAuditRepository, InMemoryRecordStore, JsonFileSettingsStore,
    MockDataConfig, MockDataService, RandomDataGenerator, SequentialIdGenerator, TracingNotifier,
    UuidIdGenerator,
};
use tracing::warn;

use crate::console_config::{ConsoleConfig, IdStrategy};


/// One record collection: its mutation service and its loader.
pub struct Collection<R: ManagedRecord> {
    pub service: RecordService<R>,
    pub loader: CollectionLoader<R>,
}

pub struct ConsoleServices {
    pub session_service: SessionService,
    pub settings_service: SettingsService,
    pub notifier: Arc<dyn Notifier>,
    pub zones: Collection<Zone>,
    pub users: Collection<SystemUser>,
    pub audit_logs: Collection<AuditLogEntry>,
    pub tourists: Collection<Tourist>,
}

struct Shared {
    authorization_service: AuthorizationService,
    audit_trail: AuditTrail,
    id_generator: Arc<dyn IdGenerator>,
    data_generator: Arc<dyn DataGenerator>,
    data_service: Arc<MockDataService>,
    config: ConsoleConfig,
}

impl Shared {
    fn collection<R>(&self, store: Arc<dyn RecordStore<R>>, merge: LoadMerge) -> Collection<R>
    where
        R: ManagedRecord,
        MockDataService: DataSource<R>,
    {
        let source: Arc<dyn DataSource<R>> = self.data_service.clone();
        Collection {
            service: RecordService::new(
                self.authorization_service,
                store.clone(),
                self.audit_trail.clone(),
                self.id_generator.clone(),
                self.data_generator.clone(),
            ),
            loader: CollectionLoader::new(self.authorization_service, source, store)
                .with_timeout(self.config.fetch_timeout)
                .with_merge(merge),
        }
    }
}

fn in_memory_store<R: ManagedRecord>() -> Arc<dyn RecordStore<R>> {
    Arc::new(InMemoryRecordStore::new())
}

impl ConsoleServices {
    pub fn build(config: &ConsoleConfig) -> Self {
        let settings_store = Arc::new(JsonFileSettingsStore::new(config.settings_path.clone()));
        Self::build_with_settings_store(config, settings_store)
    }

    pub fn build_with_settings_store(
        config: &ConsoleConfig,
        settings_store: Arc<dyn SettingsStore>,
    ) -> Self {
        let authorization_service = AuthorizationService::new();
        let id_generator: Arc<dyn IdGenerator> = match config.id_strategy {
            IdStrategy::Uuid => Arc::new(UuidIdGenerator),
            IdStrategy::Sequential => Arc::new(SequentialIdGenerator::default()),
        };
        let data_generator: Arc<dyn DataGenerator> = Arc::new(RandomDataGenerator);
        let data_service = Arc::new(MockDataService::new(
            MockDataConfig {
                latency: config.mock_latency,
                fail_every: config.mock_fail_every,
            },
            data_generator.clone(),
        ));

        let audit_store = in_memory_store::<AuditLogEntry>();
        let audit_trail = AuditTrail::new(Arc::new(InMemoryAuditRepository::new(
            audit_store.clone(),
            id_generator.clone(),
        )));

        let shared = Shared {
            authorization_service,
            audit_trail: audit_trail.clone(),
            id_generator,
            data_generator,
            data_service,
            config: config.clone(),
        };
        let zones = shared.collection(in_memory_store::<Zone>(), LoadMerge::Replace);
        let users = shared.collection(in_memory_store::<SystemUser>(), LoadMerge::KeepLocal);
        let audit_logs = shared.collection(audit_store, LoadMerge::KeepLocal);
        let tourists = shared.collection(in_memory_store::<Tourist>(), LoadMerge::Replace);

        let session_service = SessionService::new(
            Arc::new(DemoCredentialDirectory::new()),
            audit_trail,
            users.service.clone(),
        );

        Self {
            session_service,
            settings_service: SettingsService::new(authorization_service, settings_store),
            notifier: Arc::new(TracingNotifier),
            zones,
            users,
            audit_logs,
            tourists,
        }
    }

    /// Fills every store from the data source before anyone signs in, so
    /// login bookkeeping lands on seeded users and audit entries.
    ///
    /// A collection that fails to seed stays empty until its page loads.
    pub async fn seed(&self, mode: DataMode) {
        log_seed_failure("zones", self.zones.loader.seed(mode).await.err());
        log_seed_failure("users", self.users.loader.seed(mode).await.err());
        log_seed_failure("audit_logs", self.audit_logs.loader.seed(mode).await.err());
        log_seed_failure("tourists", self.tourists.loader.seed(mode).await.err());
    }
}

fn log_seed_failure(collection: &str, error: Option<AppError>) {
    if let Some(error) = error {
        warn!(collection, error = %error, "seeding failed");
    }
}
