//! Cookbook read model and file classification.

use crate::checksum::Checksum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Category of a file inside a cookbook version.
///
/// The set is closed and its declaration order is the order used by every
/// listing (manifest output and grouped views).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Definitions,
    Attributes,
    Files,
    Libraries,
    Templates,
    Providers,
    Resources,
    Recipes,
    RootFiles,
}

impl FileKind {
    /// All kinds in declaration order.
    pub const ALL: [FileKind; 9] = [
        FileKind::Definitions,
        FileKind::Attributes,
        FileKind::Files,
        FileKind::Libraries,
        FileKind::Templates,
        FileKind::Providers,
        FileKind::Resources,
        FileKind::Recipes,
        FileKind::RootFiles,
    ];

    /// Wire and database name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Definitions => "definitions",
            Self::Attributes => "attributes",
            Self::Files => "files",
            Self::Libraries => "libraries",
            Self::Templates => "templates",
            Self::Providers => "providers",
            Self::Resources => "resources",
            Self::Recipes => "recipes",
            Self::RootFiles => "root_files",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidFileKind(s.to_string()))
    }
}

/// A dependency on another cookbook. The version constraint is not tracked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookbookDependency {
    pub name: String,
}

/// A recipe exposed by a cookbook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookbookRecipe {
    pub name: String,
    pub description: String,
}

/// A file attached to a cookbook version, bound to a sandbox blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookbookFile {
    pub kind: FileKind,
    pub name: String,
    pub path: String,
    pub specificity: String,
    pub checksum: Checksum,
}

impl CookbookFile {
    /// Ordering used for every file listing: name first, then the rest of the
    /// identity tuple so output is deterministic.
    pub fn sort_key(&self) -> (&str, &str, &str, &str) {
        (
            &self.name,
            &self.path,
            &self.specificity,
            self.checksum.as_str(),
        )
    }
}

/// A fully assembled cookbook version.
#[derive(Clone, Debug)]
pub struct Cookbook {
    pub cookbook_id: Uuid,
    pub name: String,
    pub version: String,
    pub maintainer: String,
    pub maintainer_email: String,
    pub description: String,
    pub long_description: String,
    pub license: String,
    /// Dependencies ordered by name.
    pub dependencies: Vec<CookbookDependency>,
    /// Recipes ordered by name.
    pub recipes: Vec<CookbookRecipe>,
    pub files: Vec<CookbookFile>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Cookbook {
    /// Files of one kind, ordered by [`CookbookFile::sort_key`].
    pub fn files_of(&self, kind: FileKind) -> Vec<&CookbookFile> {
        let mut files: Vec<&CookbookFile> = self.files.iter().filter(|f| f.kind == kind).collect();
        files.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        files
    }
}

/// A cookbook name with all of its stored versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookbookSummary {
    pub name: String,
    pub versions: Vec<String>,
}
