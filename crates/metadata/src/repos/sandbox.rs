//! Sandbox (content store) repository trait.

use crate::error::MetadataResult;
use crate::models::SandboxFileRow;
use async_trait::async_trait;
use larder_core::Checksum;

/// Repository for staged file bodies.
#[async_trait]
pub trait SandboxRepo: Send + Sync {
    /// Register a checksum as pending upload. Existing entries are returned unchanged.
    async fn record_file(&self, checksum: &Checksum) -> MetadataResult<SandboxFileRow>;

    /// Mark a recorded checksum as uploaded.
    async fn mark_uploaded(&self, checksum: &Checksum) -> MetadataResult<()>;

    /// Look up a blob by checksum.
    async fn lookup_by_checksum(&self, checksum: &Checksum)
    -> MetadataResult<Option<SandboxFileRow>>;
}
