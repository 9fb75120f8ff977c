//! Loads record collections from a data source into their store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use tourguard_core::{AppError, AppResult};
use tourguard_domain::ManagedRecord;

use crate::{AuthorizationService, DataMode, DataSource, RecordStore, Session};

/// Lifetime of the page that requested a load.
///
/// Clones share state; unmounting any clone unmounts them all.
#[derive(Debug, Clone)]
pub struct PageScope {
    unmounted: Arc<watch::Sender<bool>>,
}

impl Default for PageScope {
    fn default() -> Self {
        Self::new()
    }
}

impl PageScope {
    /// Creates a mounted scope.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self {
            unmounted: Arc::new(sender),
        }
    }

    /// Marks the page as gone. Outstanding scoped loads are discarded.
    pub fn unmount(&self) {
        self.unmounted.send_replace(true);
    }

    /// Returns whether the page is still mounted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !*self.unmounted.borrow()
    }

    /// Resolves once the page is unmounted.
    pub async fn unmounted(&self) {
        let mut receiver = self.unmounted.subscribe();
        let _ = receiver.wait_for(|unmounted| *unmounted).await;
    }
}

/// How a fetched snapshot is combined with the records already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMerge {
    /// The fetched snapshot replaces the store.
    #[default]
    Replace,
    /// Stored records win; fetched records the store lacks are appended.
    ///
    /// For collections that receive local writes the source never sees,
    /// such as audit entries appended by services.
    KeepLocal,
}

/// Fetches a collection and stores it on success.
pub struct CollectionLoader<R: ManagedRecord> {
    authorization_service: AuthorizationService,
    source: Arc<dyn DataSource<R>>,
    store: Arc<dyn RecordStore<R>>,
    timeout: Option<Duration>,
    merge: LoadMerge,
}

impl<R: ManagedRecord> CollectionLoader<R> {
    /// Creates a loader without a fetch timeout.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        source: Arc<dyn DataSource<R>>,
        store: Arc<dyn RecordStore<R>>,
    ) -> Self {
        Self {
            authorization_service,
            source,
            store,
            timeout: None,
            merge: LoadMerge::Replace,
        }
    }

    /// Selects how fetched records are combined with stored ones.
    #[must_use]
    pub fn with_merge(mut self, merge: LoadMerge) -> Self {
        self.merge = merge;
        self
    }

    /// Bounds every fetch by a timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches the collection and stores it.
    ///
    /// Failed fetches leave the store untouched.
    pub async fn load(&self, session: &Session) -> AppResult<Arc<Vec<R>>> {
        self.authorization_service.require_authenticated(session)?;
        let records = self.fetch(session.data_mode()).await?;
        self.store_fetched(records).await
    }

    /// Populates the store before any session exists.
    ///
    /// For composition roots only; reads still go through authenticated
    /// services.
    pub async fn seed(&self, mode: DataMode) -> AppResult<Arc<Vec<R>>> {
        let records = self.fetch(mode).await?;
        self.store_fetched(records).await
    }

    /// Like [`CollectionLoader::load`], but yields `Ok(None)` without touching
    /// the store when the scope is unmounted before the fetch completes.
    pub async fn load_scoped(
        &self,
        session: &Session,
        scope: &PageScope,
    ) -> AppResult<Option<Arc<Vec<R>>>> {
        self.authorization_service.require_authenticated(session)?;

        let records = tokio::select! {
            biased;

            () = scope.unmounted() => None,
            fetched = self.fetch(session.data_mode()) => Some(fetched?),
        };

        let Some(records) = records.filter(|_| scope.is_active()) else {
            debug!(
                resource = R::RESOURCE.as_str(),
                "load discarded: page unmounted"
            );
            return Ok(None);
        };

        self.store_fetched(records).await.map(Some)
    }

    async fn store_fetched(&self, records: Vec<R>) -> AppResult<Arc<Vec<R>>> {
        match self.merge {
            LoadMerge::Replace => self.store.replace(records).await,
            LoadMerge::KeepLocal => {
                let current = self.store.snapshot().await?;
                let stored: HashSet<_> = current.iter().map(ManagedRecord::id).collect();
                let fetched: Vec<R> = records
                    .into_iter()
                    .filter(|record| !stored.contains(record.id()))
                    .collect();
                debug!(
                    resource = R::RESOURCE.as_str(),
                    kept = current.len(),
                    added = fetched.len(),
                    "fetched records merged behind local records"
                );

                let mut merged = Vec::with_capacity(current.len() + fetched.len());
                merged.extend(current.iter().cloned());
                merged.extend(fetched);
                self.store.replace(merged).await
            }
        }
    }

    async fn fetch(&self, mode: DataMode) -> AppResult<Vec<R>> {
        let request = self.source.fetch(mode);
        let response = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, request)
                .await
                .map_err(|_| {
                    AppError::DataSourceFailure(format!(
                        "{} fetch timed out after {}ms",
                        R::RESOURCE.as_str(),
                        timeout.as_millis()
                    ))
                })?,
            None => request.await,
        };

        let response = response.map_err(|error| {
            warn!(
                resource = R::RESOURCE.as_str(),
                error = %error,
                "data source fetch failed"
            );
            match error {
                AppError::DataSourceFailure(message) => AppError::DataSourceFailure(message),
                other => AppError::DataSourceFailure(other.to_string()),
            }
        })?;

        if !response.success {
            warn!(
                resource = R::RESOURCE.as_str(),
                "data source reported an unsuccessful response"
            );
            return Err(AppError::DataSourceFailure(format!(
                "failed to load {}",
                R::RESOURCE.as_str()
            )));
        }

        debug!(
            resource = R::RESOURCE.as_str(),
            records = response.data.len(),
            "collection fetched"
        );
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::RwLock;

    use tourguard_core::{AppError, AppResult, Identity, RecordId, Role};
    use tourguard_domain::{DraftContext, ManagedRecord, Zone, ZoneDraft};

    use super::{CollectionLoader, LoadMerge, PageScope};
    use crate::{
        AuthorizationService, CredentialDirectory, CredentialRecord, Credentials, DataMode,
        DataSource, FetchResponse, RecordStore, Session,
    };

    struct MemoryStore {
        records: RwLock<Arc<Vec<Zone>>>,
    }

    #[async_trait]
    impl RecordStore<Zone> for MemoryStore {
        async fn snapshot(&self) -> AppResult<Arc<Vec<Zone>>> {
            Ok(self.records.read().await.clone())
        }

        async fn replace(&self, records: Vec<Zone>) -> AppResult<Arc<Vec<Zone>>> {
            let snapshot = Arc::new(records);
            *self.records.write().await = snapshot.clone();
            Ok(snapshot)
        }
    }

    struct SlowSource {
        delay: Duration,
        succeed: bool,
        saw_live_mode: AtomicBool,
    }

    #[async_trait]
    impl DataSource<Zone> for SlowSource {
        async fn fetch(&self, mode: DataMode) -> AppResult<FetchResponse<Zone>> {
            self.saw_live_mode
                .store(mode == DataMode::Live, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if !self.succeed {
                return Ok(FetchResponse::failed());
            }

            let context = DraftContext {
                created_at: Utc::now(),
                actor_name: "Seed".to_owned(),
                actor_role: Role::Admin,
            };
            let id = RecordId::new("zone-1")?;
            let zone = Zone::from_draft(id, ZoneDraft::named("Red Fort Area"), &context)?;
            Ok(FetchResponse::ok(vec![zone]))
        }
    }

    struct Directory;

    impl CredentialDirectory for Directory {
        fn find_by_email(&self, email: &str) -> Option<CredentialRecord> {
            Some(CredentialRecord {
                email: email.to_owned(),
                password: "demo123".to_owned(),
                identity: Identity::new("user-2", "Officer Sarah Chen", Role::Police, email),
            })
        }
    }

    fn session() -> Session {
        let mut session = Session::new();
        let result = session.login(&Directory, &Credentials::new("police1@demo.local", "demo123"));
        assert!(result.is_ok());
        session
    }

    fn loader(
        delay: Duration,
        succeed: bool,
    ) -> (CollectionLoader<Zone>, Arc<MemoryStore>, Arc<SlowSource>) {
        let store = Arc::new(MemoryStore {
            records: RwLock::new(Arc::new(Vec::new())),
        });
        let source = Arc::new(SlowSource {
            delay,
            succeed,
            saw_live_mode: AtomicBool::new(false),
        });
        let loader = CollectionLoader::new(
            AuthorizationService::new(),
            source.clone(),
            store.clone(),
        );
        (loader, store, source)
    }

    #[tokio::test(start_paused = true)]
    async fn successful_load_replaces_store() {
        let (loader, store, _) = loader(Duration::from_millis(300), true);
        let result = loader.load(&session()).await;
        assert!(matches!(result, Ok(ref zones) if zones.len() == 1));
        let Ok(zones) = store.snapshot().await else {
            panic!("snapshot should load");
        };
        assert_eq!(zones.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unsuccessful_response_leaves_store_untouched() {
        let (loader, store, _) = loader(Duration::from_millis(300), false);
        let Ok(before) = store.snapshot().await else {
            panic!("snapshot should load");
        };

        let result = loader.load(&session()).await;

        assert!(matches!(result, Err(AppError::DataSourceFailure(_))));
        let Ok(after) = store.snapshot().await else {
            panic!("snapshot should load");
        };
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reports_data_source_failure() {
        let (loader, _, _) = loader(Duration::from_secs(10), true);
        let loader = loader.with_timeout(Some(Duration::from_millis(500)));
        let result = loader.load(&session()).await;
        assert!(matches!(result, Err(AppError::DataSourceFailure(ref message)) if message.contains("timed out")));
    }

    #[tokio::test(start_paused = true)]
    async fn unmounted_scope_discards_result() {
        let (loader, store, _) = loader(Duration::from_millis(300), true);
        let scope = PageScope::new();
        let unmount = scope.clone();
        let session = session();

        let (result, ()) = tokio::join!(loader.load_scoped(&session, &scope), async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            unmount.unmount();
        });

        assert!(matches!(result, Ok(None)));
        let Ok(zones) = store.snapshot().await else {
            panic!("snapshot should load");
        };
        assert!(zones.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn mounted_scope_keeps_result() {
        let (loader, _, _) = loader(Duration::from_millis(300), true);
        let result = loader.load_scoped(&session(), &PageScope::new()).await;
        assert!(matches!(result, Ok(Some(ref zones)) if zones.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn keep_local_merge_preserves_stored_records() {
        let (loader, store, _) = loader(Duration::from_millis(300), true);
        let loader = loader.with_merge(LoadMerge::KeepLocal);
        let context = DraftContext {
            created_at: Utc::now(),
            actor_name: "Admin User".to_owned(),
            actor_role: Role::Admin,
        };
        let local = |id: &str, name: &str| {
            let id = RecordId::new(id).unwrap_or_else(|_| panic!("valid id"));
            Zone::from_draft(id, ZoneDraft::named(name), &context)
                .unwrap_or_else(|_| panic!("valid zone"))
        };
        let stored = store
            .replace(vec![local("zone-9", "Test Zone"), local("zone-1", "Renamed Locally")])
            .await;
        assert!(stored.is_ok());

        let Ok(zones) = loader.load(&session()).await else {
            panic!("load should succeed");
        };
        let names: Vec<&str> = zones.iter().map(|zone| zone.name.as_str()).collect();
        assert_eq!(names, vec!["Test Zone", "Renamed Locally"]);
    }

    #[tokio::test(start_paused = true)]
    async fn seed_fills_store_without_a_session() {
        let (loader, store, source) = loader(Duration::from_millis(300), true);
        let result = loader.seed(DataMode::Live).await;
        assert!(matches!(result, Ok(ref zones) if zones.len() == 1));
        assert!(source.saw_live_mode.load(Ordering::SeqCst));
        let Ok(zones) = store.snapshot().await else {
            panic!("snapshot should load");
        };
        assert_eq!(zones.len(), 1);
    }

    #[tokio::test]
    async fn anonymous_session_cannot_load() {
        let (loader, _, _) = loader(Duration::ZERO, true);
        let result = loader.load(&Session::new()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn mock_mode_toggle_reaches_data_source() {
        let (loader, _, source) = loader(Duration::ZERO, true);
        let mut session = session();
        session.set_mock_mode(false);
        let result = loader.load(&session).await;
        assert!(result.is_ok());
        assert!(source.saw_live_mode.load(Ordering::SeqCst));
    }
}
