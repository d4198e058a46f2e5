//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Sandbox (content store)
// =============================================================================

/// A file body staged in the sandbox, addressed by checksum.
#[derive(Debug, Clone, FromRow)]
pub struct SandboxFileRow {
    pub checksum: String,
    /// Set once the client has confirmed the upload.
    pub uploaded: bool,
    pub created_at: OffsetDateTime,
}

// =============================================================================
// Cookbooks
// =============================================================================

/// Cookbook version record, unique on `(name, version)`.
#[derive(Debug, Clone, FromRow)]
pub struct CookbookRow {
    pub cookbook_id: Uuid,
    pub name: String,
    pub version: String,
    pub maintainer: String,
    pub maintainer_email: String,
    pub description: String,
    pub long_description: String,
    pub license: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct CookbookDependencyRow {
    pub dependency_id: Uuid,
    pub cookbook_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CookbookRecipeRow {
    pub recipe_id: Uuid,
    pub cookbook_id: Uuid,
    pub name: String,
    pub description: String,
}

/// File attached to a cookbook version. `checksum` references `sandbox_files`.
#[derive(Debug, Clone, FromRow)]
pub struct CookbookFileRow {
    pub file_id: Uuid,
    pub cookbook_id: Uuid,
    pub kind: String,
    pub name: String,
    pub path: String,
    pub specificity: String,
    pub checksum: String,
}

// =============================================================================
// Data bags
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct DataBagRow {
    pub bag_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// Data bag item; `raw_data` is the JSON document exactly as stored.
#[derive(Debug, Clone, FromRow)]
pub struct DataBagItemRow {
    pub item_id: Uuid,
    pub bag_id: Uuid,
    pub name: String,
    pub raw_data: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
