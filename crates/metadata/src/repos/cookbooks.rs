//! Cookbook repository trait.

use crate::error::MetadataResult;
use async_trait::async_trait;
use larder_core::{Checksum, Cookbook, CookbookManifest, CookbookSummary};

/// Repository for cookbook versions and their dependencies, recipes and files.
#[async_trait]
pub trait CookbookRepo: Send + Sync {
    /// Merge a manifest into the cookbook version it names, creating the
    /// version if needed.
    ///
    /// Runs in a single transaction. Dependencies and recipes are replaced by
    /// the manifest's sets; files are matched on
    /// `(kind, name, path, specificity, checksum)` and never removed. Every
    /// new file must reference an uploaded sandbox blob, otherwise the merge
    /// fails with `ChecksumNotFound` or `ChecksumNotUploaded` and nothing is
    /// written.
    async fn upsert_from_manifest(&self, manifest: &CookbookManifest) -> MetadataResult<Cookbook>;

    /// Get a fully assembled cookbook version.
    async fn get_cookbook(&self, name: &str, version: &str) -> MetadataResult<Option<Cookbook>>;

    /// List every cookbook with its versions, ordered by name.
    async fn list_cookbooks(&self) -> MetadataResult<Vec<CookbookSummary>>;

    /// List the versions of one cookbook.
    async fn list_versions(&self, name: &str) -> MetadataResult<Vec<String>>;

    /// Delete a cookbook version and return its last state.
    async fn delete_cookbook(&self, name: &str, version: &str) -> MetadataResult<Cookbook>;

    /// Whether a cookbook version has a file bound to `checksum`.
    async fn cookbook_references_checksum(
        &self,
        name: &str,
        version: &str,
        checksum: &Checksum,
    ) -> MetadataResult<bool>;
}
