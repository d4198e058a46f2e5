//! Test fixtures for manifests and file bodies.

use larder_core::Checksum;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data as hex string.
#[allow(dead_code)]
pub fn sha256_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Checksum of a file body.
#[allow(dead_code)]
pub fn checksum_of(data: &[u8]) -> Checksum {
    Checksum::parse(&sha256_hash(data)).expect("sha256 hex is a valid checksum")
}

/// A file descriptor as a client sends it.
#[allow(dead_code)]
pub fn file_json(name: &str, path: &str, checksum: &Checksum) -> Value {
    json!({
        "name": name,
        "path": path,
        "checksum": checksum.to_string(),
        "specificity": "default",
    })
}

/// A manifest document for `name`/`version` with the given recipes.
#[allow(dead_code)]
pub fn manifest_json(name: &str, version: &str, recipes: Value) -> Value {
    json!({
        "name": format!("{name}-{version}"),
        "cookbook_name": name,
        "version": version,
        "json_class": "Chef::CookbookVersion",
        "chef_type": "cookbook_version",
        "metadata": {
            "name": name,
            "version": version,
            "maintainer": "Ops Team",
            "maintainer_email": "ops@example.com",
            "description": format!("Installs {name}"),
            "long_description": "",
            "license": "Apache-2.0",
            "dependencies": {},
            "recipes": recipes,
        },
    })
}
