//! bm-core: Core library for the bucket-manager CLI
//!
//! This crate provides:
//! - Credential and settings resolution
//! - The ObjectStore trait for the three storage primitives
//! - Object listings and regex filtering
//! - BucketManager, which implements list, upload, filter and delete
//!
//! It does not depend on any storage SDK, so the operations can be tested
//! against a mocked store.

pub mod config;
pub mod error;
pub mod listing;
pub mod manager;
pub mod traits;

pub use config::{ConfigFile, ConfigManager, Credentials, Overrides, Settings};
pub use error::{Error, Result};
pub use listing::{FilterPattern, ObjectListing};
pub use manager::{BucketManager, DeleteReport, Selection, UploadReceipt};
pub use traits::{ObjectInfo, ObjectStore};

#[cfg(any(test, feature = "mock"))]
pub use traits::MockObjectStore;
