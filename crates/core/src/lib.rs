//! Core domain types and shared logic for Larder.
//!
//! This crate defines the data model used across all other crates:
//! - Content checksums addressing sandbox uploads
//! - Cookbook read model and the closed set of file kinds
//! - The cookbook manifest wire format
//! - Manifest rendering and grouped views of stored cookbooks
//! - Data bag naming rules
//! - Configuration

pub mod checksum;
pub mod config;
pub mod cookbook;
pub mod data_bag;
pub mod error;
pub mod manifest;
pub mod presentation;

pub use checksum::Checksum;
pub use cookbook::{
    Cookbook, CookbookDependency, CookbookFile, CookbookRecipe, CookbookSummary, FileKind,
};
pub use error::{Error, Result};
pub use manifest::{CookbookManifest, ManifestFile, ManifestMetadata};
pub use presentation::{CookbookPart, FileUrlBuilder, parts_by_type, to_manifest};
