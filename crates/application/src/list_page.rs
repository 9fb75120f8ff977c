//! State shared by every admin list page.

use std::sync::Arc;

use tracing::debug;

use tourguard_core::{AppError, AppResult};
use tourguard_domain::{ManagedRecord, RecordQuery, filter_records};

use crate::{Notification, Notifier};

/// Maps an operation error to the notification a page raises for it.
#[must_use]
pub fn notification_for_error(error: &AppError) -> Notification {
    match error {
        AppError::Forbidden(capability) => Notification::destructive(
            "Permission Denied",
            format!("You don't have permission to perform this action ({capability})"),
        ),
        AppError::Unauthorized(_) => {
            Notification::destructive("Authentication Required", "Please sign in to continue")
        }
        AppError::InvalidCredentials => {
            Notification::destructive("Login Failed", "Invalid email or password")
        }
        AppError::NotFound(message) => Notification::destructive("Not Found", message.clone()),
        AppError::Validation(message) => {
            Notification::destructive("Invalid Input", message.clone())
        }
        AppError::DataSourceFailure(message) => {
            Notification::destructive("Error Loading Data", message.clone())
        }
        AppError::Conflict(_) | AppError::Internal(_) => {
            Notification::destructive("Operation Failed", error.to_string())
        }
    }
}

/// Displayed snapshot, query and loading flag of one list page.
pub struct ListPage<R: ManagedRecord> {
    records: Arc<Vec<R>>,
    query: RecordQuery,
    loading: bool,
    notifier: Arc<dyn Notifier>,
}

impl<R: ManagedRecord> ListPage<R> {
    /// Creates an empty page.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            records: Arc::new(Vec::new()),
            query: RecordQuery::new(),
            loading: false,
            notifier,
        }
    }

    /// Returns the displayed snapshot.
    #[must_use]
    pub fn records(&self) -> &Arc<Vec<R>> {
        &self.records
    }

    /// Returns the active query.
    #[must_use]
    pub fn query(&self) -> &RecordQuery {
        &self.query
    }

    /// Replaces the whole query.
    pub fn set_query(&mut self, query: RecordQuery) {
        self.query = query;
    }

    /// Replaces the search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.set_text(text);
    }

    /// Sets one categorical filter; `all` disables it.
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.query.set_filter(field, value);
    }

    /// Returns whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Marks a load as started.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Applies a load result. Failures keep the previous snapshot.
    pub fn apply_load(&mut self, result: AppResult<Arc<Vec<R>>>) -> bool {
        self.loading = false;
        match result {
            Ok(records) => {
                debug!(
                    resource = R::RESOURCE.as_str(),
                    records = records.len(),
                    "page snapshot loaded"
                );
                self.records = records;
                true
            }
            Err(error) => {
                self.notifier.notify(notification_for_error(&error));
                false
            }
        }
    }

    /// Applies a mutation result, raising exactly one notification.
    pub fn apply_mutation(
        &mut self,
        result: AppResult<Arc<Vec<R>>>,
        success: Notification,
    ) -> bool {
        match result {
            Ok(records) => {
                self.records = records;
                self.notifier.notify(success);
                true
            }
            Err(error) => {
                self.notifier.notify(notification_for_error(&error));
                false
            }
        }
    }

    /// Records of the snapshot matching the active query, in order.
    pub fn visible(&self) -> impl Iterator<Item = &R> + Clone + '_ {
        filter_records(self.records.as_slice(), &self.query)
    }
}
