//! Read-side rendering of stored cookbooks.

use crate::checksum::Checksum;
use crate::cookbook::{Cookbook, CookbookFile, FileKind};
use crate::manifest::{CHEF_TYPE, CookbookManifest, JSON_CLASS, ManifestFile, ManifestMetadata};

/// Builds download URLs for cookbook files.
pub trait FileUrlBuilder: Send + Sync {
    /// URL from which the file body with `checksum` can be fetched.
    fn file_url(&self, cookbook_name: &str, version: &str, checksum: &Checksum) -> String;
}

/// Render a stored cookbook as a manifest document.
///
/// File lists are ordered by name. `url` entries are only emitted when a
/// builder is supplied.
pub fn to_manifest(cookbook: &Cookbook, urls: Option<&dyn FileUrlBuilder>) -> CookbookManifest {
    let metadata = ManifestMetadata {
        name: cookbook.name.clone(),
        version: cookbook.version.clone(),
        maintainer: cookbook.maintainer.clone(),
        maintainer_email: cookbook.maintainer_email.clone(),
        description: cookbook.description.clone(),
        long_description: cookbook.long_description.clone(),
        license: cookbook.license.clone(),
        dependencies: cookbook
            .dependencies
            .iter()
            .map(|d| (d.name.clone(), serde_json::Value::Array(Vec::new())))
            .collect(),
        recipes: cookbook
            .recipes
            .iter()
            .map(|r| (r.name.clone(), r.description.clone()))
            .collect(),
        ..Default::default()
    };

    let mut manifest = CookbookManifest {
        name: format!("{}-{}", cookbook.name, cookbook.version),
        cookbook_name: cookbook.name.clone(),
        version: cookbook.version.clone(),
        json_class: JSON_CLASS.to_string(),
        chef_type: CHEF_TYPE.to_string(),
        metadata: Some(metadata),
        ..Default::default()
    };

    for kind in FileKind::ALL {
        *manifest.files_mut(kind) = cookbook
            .files_of(kind)
            .into_iter()
            .map(|file| ManifestFile {
                name: file.name.clone(),
                path: file.path.clone(),
                checksum: file.checksum.to_string(),
                specificity: file.specificity.clone(),
                url: urls.map(|u| u.file_url(&cookbook.name, &cookbook.version, &file.checksum)),
            })
            .collect();
    }

    manifest
}

/// Files of one kind, as produced by [`parts_by_type`].
#[derive(Clone, Debug)]
pub struct CookbookPart<'a> {
    pub kind: FileKind,
    pub files: Vec<&'a CookbookFile>,
}

impl CookbookPart<'_> {
    pub fn count(&self) -> usize {
        self.files.len()
    }

    /// English label, pluralised on the file count.
    pub fn label(&self) -> &'static str {
        labels::label(self.kind, self.count())
    }
}

/// Group a cookbook's files by kind.
///
/// Kinds come in declaration order and kinds without files are skipped.
pub fn parts_by_type(cookbook: &Cookbook) -> impl Iterator<Item = CookbookPart<'_>> {
    FileKind::ALL.into_iter().filter_map(move |kind| {
        let files = cookbook.files_of(kind);
        (!files.is_empty()).then_some(CookbookPart { kind, files })
    })
}

/// Display labels for file kinds.
pub mod labels {
    use crate::cookbook::FileKind;

    pub(super) const LABELS: [(FileKind, &str, &str); 9] = [
        (FileKind::Definitions, "Definition", "Definitions"),
        (FileKind::Attributes, "Attribute", "Attributes"),
        (FileKind::Files, "File", "Files"),
        (FileKind::Libraries, "Library", "Libraries"),
        (FileKind::Templates, "Template", "Templates"),
        (FileKind::Providers, "Provider", "Providers"),
        (FileKind::Resources, "Resource", "Resources"),
        (FileKind::Recipes, "Recipe", "Recipes"),
        (FileKind::RootFiles, "Root File", "Root Files"),
    ];

    /// Singular label for exactly one item, plural otherwise.
    pub fn label(kind: FileKind, count: usize) -> &'static str {
        let (_, singular, plural) = LABELS[kind as usize];
        if count == 1 { singular } else { plural }
    }
}
