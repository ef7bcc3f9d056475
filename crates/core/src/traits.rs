//! ObjectStore trait definition
//!
//! This trait defines the three storage primitives the manager needs.
//! It keeps the CLI decoupled from the specific S3 SDK implementation.

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::listing::ObjectListing;

/// Metadata for a listed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Full object key, prefix included
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for a file
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size.max(0) as u64, humansize::BINARY)),
            last_modified: None,
        }
    }

    /// Create an ObjectInfo that only carries a key
    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            size_human: None,
            last_modified: None,
        }
    }
}

/// Trait for the storage backend
///
/// Implemented by the S3 adapter and mocked in tests.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects under a prefix
    ///
    /// Only the first page returned by the backend is read.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ObjectListing>;

    /// Store `data` at `key`, overwriting any existing object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<()>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
