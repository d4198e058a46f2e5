//! Cookbook manifest wire format.
//!
//! The same structures are used for manifests submitted by clients and for
//! manifests rendered back from stored cookbooks. Everything is optional on
//! input; [`CookbookManifest::validate`] performs the checks a merge needs.

use crate::checksum::Checksum;
use crate::cookbook::FileKind;
use crate::data_bag::validate_name;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// `json_class` value of a cookbook version document.
pub const JSON_CLASS: &str = "Chef::CookbookVersion";

/// `chef_type` value of a cookbook version document.
pub const CHEF_TYPE: &str = "cookbook_version";

/// Open-ended metadata map whose values are passed through untouched.
pub type OpaqueMap = BTreeMap<String, serde_json::Value>;

/// A cookbook version document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CookbookManifest {
    /// Combined `"{cookbook_name}-{version}"` identifier.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cookbook_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub json_class: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chef_type: String,
    #[serde(default)]
    pub metadata: Option<ManifestMetadata>,
    #[serde(default)]
    pub definitions: Vec<ManifestFile>,
    #[serde(default)]
    pub attributes: Vec<ManifestFile>,
    #[serde(default)]
    pub files: Vec<ManifestFile>,
    #[serde(default)]
    pub libraries: Vec<ManifestFile>,
    #[serde(default)]
    pub templates: Vec<ManifestFile>,
    #[serde(default)]
    pub providers: Vec<ManifestFile>,
    #[serde(default)]
    pub resources: Vec<ManifestFile>,
    #[serde(default)]
    pub recipes: Vec<ManifestFile>,
    #[serde(default)]
    pub root_files: Vec<ManifestFile>,
}

/// The `metadata` block of a cookbook version document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub maintainer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub maintainer_email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub long_description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub license: String,
    /// Dependency name to version constraint. Constraints are accepted but
    /// not stored; rendered manifests always carry an empty list.
    #[serde(default)]
    pub dependencies: OpaqueMap,
    /// Recipe name to description.
    #[serde(default)]
    pub recipes: BTreeMap<String, String>,
    #[serde(default)]
    pub attributes: OpaqueMap,
    #[serde(default)]
    pub suggestions: OpaqueMap,
    #[serde(default)]
    pub platforms: OpaqueMap,
    #[serde(default)]
    pub recommendations: OpaqueMap,
    #[serde(default)]
    pub conflicting: OpaqueMap,
    #[serde(default)]
    pub groupings: OpaqueMap,
    #[serde(default)]
    pub replacing: OpaqueMap,
    #[serde(default)]
    pub providing: OpaqueMap,
}

/// A file descriptor inside a manifest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub checksum: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub specificity: String,
    /// Download location, only present on rendered manifests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ManifestFile {
    /// Parse the descriptor's checksum.
    pub fn checksum(&self) -> crate::Result<Checksum> {
        Checksum::parse(&self.checksum)
    }
}

impl CookbookManifest {
    /// File descriptors of one kind.
    pub fn files(&self, kind: FileKind) -> &[ManifestFile] {
        match kind {
            FileKind::Definitions => &self.definitions,
            FileKind::Attributes => &self.attributes,
            FileKind::Files => &self.files,
            FileKind::Libraries => &self.libraries,
            FileKind::Templates => &self.templates,
            FileKind::Providers => &self.providers,
            FileKind::Resources => &self.resources,
            FileKind::Recipes => &self.recipes,
            FileKind::RootFiles => &self.root_files,
        }
    }

    /// Mutable access to the file descriptors of one kind.
    pub fn files_mut(&mut self, kind: FileKind) -> &mut Vec<ManifestFile> {
        match kind {
            FileKind::Definitions => &mut self.definitions,
            FileKind::Attributes => &mut self.attributes,
            FileKind::Files => &mut self.files,
            FileKind::Libraries => &mut self.libraries,
            FileKind::Templates => &mut self.templates,
            FileKind::Providers => &mut self.providers,
            FileKind::Resources => &mut self.resources,
            FileKind::Recipes => &mut self.recipes,
            FileKind::RootFiles => &mut self.root_files,
        }
    }

    /// Checks on the fields a merge depends on.
    ///
    /// `cookbook_name` and `version` become URL path segments, so both follow
    /// the same character rules as data bag names.
    pub fn validate(&self) -> crate::Result<()> {
        if self.cookbook_name.is_empty() {
            return Err(crate::Error::InvalidManifest(
                "missing cookbook_name".to_string(),
            ));
        }
        if self.version.is_empty() {
            return Err(crate::Error::InvalidManifest("missing version".to_string()));
        }
        validate_name(&self.cookbook_name)
            .map_err(|e| crate::Error::InvalidManifest(format!("cookbook_name: {e}")))?;
        validate_name(&self.version)
            .map_err(|e| crate::Error::InvalidManifest(format!("version: {e}")))?;
        for kind in FileKind::ALL {
            for (i, file) in self.files(kind).iter().enumerate() {
                if file.name.is_empty() || file.path.is_empty() {
                    return Err(crate::Error::InvalidManifest(format!(
                        "{kind}[{i}] requires name and path"
                    )));
                }
                file.checksum().map_err(|e| {
                    crate::Error::InvalidManifest(format!("{kind}[{i}] ({}): {e}", file.name))
                })?;
            }
        }
        Ok(())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
