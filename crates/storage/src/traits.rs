//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use larder_core::Checksum;
use std::pin::Pin;

/// A boxed stream of bytes for streaming reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Metadata about a stored blob.
#[derive(Clone, Debug)]
pub struct BlobMeta {
    /// Blob size in bytes.
    pub size: u64,
    /// Last modification time (if available).
    pub last_modified: Option<time::OffsetDateTime>,
}

/// Content-addressed store for sandbox file bodies.
///
/// Blobs are immutable once written and shared by every cookbook version
/// that references their checksum.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Get a blob's size without fetching content.
    async fn head(&self, checksum: &Checksum) -> StorageResult<BlobMeta>;

    /// Get a blob as a byte stream.
    async fn get_stream(&self, checksum: &Checksum) -> StorageResult<ByteStream>;

    /// Store a blob atomically, replacing any previous body.
    async fn put(&self, checksum: &Checksum, data: Bytes) -> StorageResult<()>;

    /// Static identifier of the backend, used in logs.
    fn backend_name(&self) -> &'static str;

    /// Check that the backend is reachable and writable.
    async fn health_check(&self) -> StorageResult<()>;
}
