//! Local filesystem blob backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::{BlobMeta, BlobStore, ByteStream};
use async_trait::async_trait;
use bytes::Bytes;
use larder_core::Checksum;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Default chunk size for streaming reads (64 KiB).
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Blob store rooted at a local directory.
///
/// A blob lives at `<root>/sandbox/<first two hex digits>/<checksum>`.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Resolve the on-disk path of a blob.
    ///
    /// Checksums are plain hex so the key itself cannot traverse, but a
    /// symlinked shard directory could still point outside the root. The
    /// check touches the filesystem, so it runs on the blocking pool.
    async fn blob_path(&self, checksum: &Checksum) -> StorageResult<PathBuf> {
        let root = self.root.clone();
        let path = self.root.join(checksum.blob_key());
        tokio::task::spawn_blocking(move || Self::check_within_root(&root, path))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}")))
            })?
    }

    fn check_within_root(root: &Path, path: PathBuf) -> StorageResult<PathBuf> {
        let root_canonical = root.canonicalize().map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize root: {e}"),
            ))
        })?;

        // Nearest existing ancestor (or the blob itself) must resolve inside the root.
        let mut candidate = Some(path.as_path());
        while let Some(current) = candidate {
            match std::fs::symlink_metadata(current) {
                Ok(_) => {
                    let canonical = current.canonicalize().map_err(|_| {
                        StorageError::InvalidPath(format!(
                            "dangling symlink in blob path: {}",
                            current.display()
                        ))
                    })?;
                    if !canonical.starts_with(&root_canonical) {
                        return Err(StorageError::InvalidPath(format!(
                            "blob path escapes storage root: {}",
                            path.display()
                        )));
                    }
                    return Ok(path);
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    candidate = current.parent();
                }
                Err(err) => return Err(StorageError::Io(err)),
            }
        }

        Err(StorageError::InvalidPath(format!(
            "no existing ancestor for {}",
            path.display()
        )))
    }

    fn not_found(checksum: &Checksum, e: std::io::Error) -> StorageError {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(checksum.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

#[async_trait]
impl BlobStore for FilesystemBackend {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn head(&self, checksum: &Checksum) -> StorageResult<BlobMeta> {
        let path = self.blob_path(checksum).await?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| Self::not_found(checksum, e))?;

        Ok(BlobMeta {
            size: metadata.len(),
            last_modified: metadata.modified().ok().map(|t| t.into()),
        })
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get_stream(&self, checksum: &Checksum) -> StorageResult<ByteStream> {
        use tokio::io::AsyncReadExt;

        let path = self.blob_path(checksum).await?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| Self::not_found(checksum, e))?;

        let stream = async_stream::try_stream! {
            let mut file = file;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        };

        Ok(Box::pin(stream))
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn put(&self, checksum: &Checksum, data: Bytes) -> StorageResult<()> {
        let path = self.blob_path(checksum).await?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Unique temp name so concurrent writers of one blob never share a file.
        let temp_path = path.with_file_name(format!("{checksum}.tmp.{}", Uuid::new_v4()));
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &path).await?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("storage root not accessible: {}", e),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("storage root is not a directory: {:?}", self.root),
            )));
        }

        Ok(())
    }
}
