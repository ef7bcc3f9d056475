//! BucketManager - the list, upload, filter and delete operations
//!
//! The manager owns one storage client and the resolved settings. Each
//! operation issues at most one listing call and awaits every backend call
//! in sequence.

use std::path::Path;

use serde::Serialize;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::listing::{FilterPattern, ObjectListing};
use crate::traits::ObjectStore;

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    /// Full key written, prefix included
    pub key: String,
    pub size_bytes: u64,
}

/// Objects of one listing page that matched a pattern
#[derive(Debug, Clone)]
pub struct Selection {
    /// Number of objects in the listing before filtering
    pub listed: usize,
    pub matched: ObjectListing,
}

impl Selection {
    fn new(listing: ObjectListing, pattern: &FilterPattern) -> Self {
        Self {
            listed: listing.len(),
            matched: listing.filter(pattern),
        }
    }

    pub fn listing_was_empty(&self) -> bool {
        self.listed == 0
    }

    /// The backend had more objects than the page that was matched against
    pub fn truncated(&self) -> bool {
        self.matched.truncated
    }
}

/// Per-key outcome of a delete run
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl DeleteReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}

/// Wraps a storage client scoped to one bucket and prefix
pub struct BucketManager<S> {
    store: S,
    settings: Settings,
}

impl<S: ObjectStore> BucketManager<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// List every object under the prefix (first page only)
    pub async fn list(&self) -> Result<ObjectListing> {
        tracing::debug!(bucket = %self.settings.bucket, prefix = %self.settings.prefix, "listing objects");
        let listing = self
            .store
            .list_objects(&self.settings.bucket, &self.settings.prefix)
            .await?;
        if listing.truncated {
            tracing::warn!(returned = listing.len(), "listing truncated; only the first page was read");
        }
        Ok(listing)
    }

    /// Upload a local file to `prefix + remote_name`, overwriting any existing object
    pub async fn upload(
        &self,
        local_path: &Path,
        remote_name: &str,
        content_type: Option<String>,
    ) -> Result<UploadReceipt> {
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|e| Error::from_local_io(e, local_path))?;
        let size_bytes = data.len() as u64;
        let key = self.settings.key_for(remote_name);

        tracing::debug!(bucket = %self.settings.bucket, %key, size_bytes, "uploading object");
        self.store
            .put_object(&self.settings.bucket, &key, data, content_type)
            .await?;

        Ok(UploadReceipt { key, size_bytes })
    }

    /// List, then keep only keys where `pattern` matches anywhere
    pub async fn filter(&self, pattern: &FilterPattern) -> Result<Selection> {
        let listing = self.list().await?;
        Ok(Selection::new(listing, pattern))
    }

    /// List and select the keys a delete run would remove
    pub async fn plan_delete(&self, pattern: &FilterPattern) -> Result<Selection> {
        self.filter(pattern).await
    }

    /// Delete every planned key in listing order
    ///
    /// A failed key is recorded and the remaining keys are still attempted.
    /// `on_result` is called after each attempt with the error, if any.
    pub async fn execute_delete<F>(&self, plan: &Selection, mut on_result: F) -> DeleteReport
    where
        F: FnMut(&str, Option<&Error>),
    {
        let mut report = DeleteReport::default();

        for item in &plan.matched.items {
            match self
                .store
                .delete_object(&self.settings.bucket, &item.key)
                .await
            {
                Ok(()) => {
                    tracing::debug!(key = %item.key, "deleted object");
                    on_result(&item.key, None);
                    report.deleted.push(item.key.clone());
                }
                Err(e) => {
                    tracing::warn!(key = %item.key, error = %e, "failed to delete object");
                    on_result(&item.key, Some(&e));
                    report.failed.push((item.key.clone(), e));
                }
            }
        }

        report
    }
}
