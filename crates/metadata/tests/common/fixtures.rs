//! Test fixtures for manifests and sandbox blobs.

use larder_core::manifest::{CookbookManifest, ManifestFile, ManifestMetadata};
use larder_core::{Checksum, FileKind};
use larder_metadata::SqliteStore;
use larder_metadata::repos::SandboxRepo;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data as hex string.
#[allow(dead_code)]
pub fn sha256_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Deterministic checksum for a seed string.
#[allow(dead_code)]
pub fn checksum(seed: &str) -> Checksum {
    Checksum::parse(&sha256_hash(seed.as_bytes())).expect("sha256 hex is a valid checksum")
}

/// Record a blob in the sandbox and mark it uploaded.
#[allow(dead_code)]
pub async fn uploaded_blob(store: &SqliteStore, seed: &str) -> Checksum {
    let checksum = checksum(seed);
    store
        .record_file(&checksum)
        .await
        .expect("Failed to record sandbox file");
    store
        .mark_uploaded(&checksum)
        .await
        .expect("Failed to mark sandbox file uploaded");
    checksum
}

/// Record a blob in the sandbox without confirming the upload.
#[allow(dead_code)]
pub async fn pending_blob(store: &SqliteStore, seed: &str) -> Checksum {
    let checksum = checksum(seed);
    store
        .record_file(&checksum)
        .await
        .expect("Failed to record sandbox file");
    checksum
}

/// A file descriptor with `default` specificity.
#[allow(dead_code)]
pub fn manifest_file(name: &str, path: &str, checksum: &Checksum) -> ManifestFile {
    ManifestFile {
        name: name.to_string(),
        path: path.to_string(),
        checksum: checksum.to_string(),
        specificity: "default".to_string(),
        url: None,
    }
}

/// A manifest with metadata, the given recipes, and no dependencies or files.
#[allow(dead_code)]
pub fn manifest(name: &str, version: &str, recipes: &[(&str, &str)]) -> CookbookManifest {
    CookbookManifest {
        name: format!("{name}-{version}"),
        cookbook_name: name.to_string(),
        version: version.to_string(),
        metadata: Some(ManifestMetadata {
            name: name.to_string(),
            version: version.to_string(),
            maintainer: "Ops Team".to_string(),
            maintainer_email: "ops@example.com".to_string(),
            description: format!("Installs {name}"),
            license: "Apache-2.0".to_string(),
            recipes: recipes
                .iter()
                .map(|(n, d)| (n.to_string(), d.to_string()))
                .collect(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Push a file descriptor of `kind` onto a manifest.
#[allow(dead_code)]
pub fn with_file(
    mut manifest: CookbookManifest,
    kind: FileKind,
    file: ManifestFile,
) -> CookbookManifest {
    manifest.files_mut(kind).push(file);
    manifest
}
