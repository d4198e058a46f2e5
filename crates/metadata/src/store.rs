//! Metadata store trait and implementations.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{CookbookRepo, DataBagRepo, SandboxRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: CookbookRepo + SandboxRepo + DataBagRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    query_timeout_secs: u64,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();
        let query_timeout_secs = query_timeout_secs.unwrap_or(30);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // One connection means one writer: a cookbook merge holds it for
            // the whole transaction, so merges of the same version serialize.
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(query_timeout_secs))
            .connect_with(opts)
            .await?;

        let store = Self {
            pool,
            query_timeout_secs,
        };
        store.migrate().await?;

        tracing::debug!(
            path = %path.display(),
            query_timeout_secs = store.query_timeout_secs,
            "SQLite metadata store ready"
        );

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use larder_core::{
        Checksum, Cookbook, CookbookDependency, CookbookFile, CookbookManifest, CookbookRecipe,
        CookbookSummary, FileKind,
    };
    use sqlx::SqliteConnection;
    use std::collections::{BTreeMap, BTreeSet};
    use time::OffsetDateTime;
    use uuid::Uuid;

    /// Load children of a cookbook row and assemble the read model.
    async fn assemble_cookbook(
        conn: &mut SqliteConnection,
        row: CookbookRow,
    ) -> MetadataResult<Cookbook> {
        let dependencies = sqlx::query_as::<_, CookbookDependencyRow>(
            "SELECT * FROM cookbook_dependencies WHERE cookbook_id = ? ORDER BY name",
        )
        .bind(row.cookbook_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|d| CookbookDependency { name: d.name })
        .collect();

        let recipes = sqlx::query_as::<_, CookbookRecipeRow>(
            "SELECT * FROM cookbook_recipes WHERE cookbook_id = ? ORDER BY name",
        )
        .bind(row.cookbook_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|r| CookbookRecipe {
            name: r.name,
            description: r.description,
        })
        .collect();

        let files = sqlx::query_as::<_, CookbookFileRow>(
            "SELECT * FROM cookbook_files WHERE cookbook_id = ? ORDER BY kind, name, path, specificity, checksum",
        )
        .bind(row.cookbook_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(file_from_row)
        .collect::<MetadataResult<Vec<_>>>()?;

        Ok(Cookbook {
            cookbook_id: row.cookbook_id,
            name: row.name,
            version: row.version,
            maintainer: row.maintainer,
            maintainer_email: row.maintainer_email,
            description: row.description,
            long_description: row.long_description,
            license: row.license,
            dependencies,
            recipes,
            files,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn file_from_row(row: CookbookFileRow) -> MetadataResult<CookbookFile> {
        let kind = FileKind::from_str(&row.kind).map_err(|e| {
            MetadataError::Internal(format!("cookbook file {}: {e}", row.file_id))
        })?;
        let checksum = Checksum::parse(&row.checksum).map_err(|e| {
            MetadataError::Internal(format!("cookbook file {}: {e}", row.file_id))
        })?;
        Ok(CookbookFile {
            kind,
            name: row.name,
            path: row.path,
            specificity: row.specificity,
            checksum,
        })
    }

    async fn find_cookbook_row(
        conn: &mut SqliteConnection,
        name: &str,
        version: &str,
    ) -> MetadataResult<Option<CookbookRow>> {
        let row = sqlx::query_as::<_, CookbookRow>(
            "SELECT * FROM cookbooks WHERE name = ? AND version = ?",
        )
        .bind(name)
        .bind(version)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Replace the dependency set of a cookbook with `incoming`.
    async fn sync_dependencies(
        conn: &mut SqliteConnection,
        cookbook_id: Uuid,
        incoming: &BTreeSet<&str>,
    ) -> MetadataResult<()> {
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT name FROM cookbook_dependencies WHERE cookbook_id = ?")
                .bind(cookbook_id)
                .fetch_all(&mut *conn)
                .await?;

        for name in existing.iter().filter(|n| !incoming.contains(n.as_str())) {
            sqlx::query("DELETE FROM cookbook_dependencies WHERE cookbook_id = ? AND name = ?")
                .bind(cookbook_id)
                .bind(name)
                .execute(&mut *conn)
                .await?;
        }

        for name in incoming {
            sqlx::query(
                "INSERT INTO cookbook_dependencies (dependency_id, cookbook_id, name) VALUES (?, ?, ?) \
                 ON CONFLICT(cookbook_id, name) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(cookbook_id)
            .bind(*name)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Replace the recipe set of a cookbook with `incoming`, updating
    /// descriptions of recipes that survive.
    async fn sync_recipes(
        conn: &mut SqliteConnection,
        cookbook_id: Uuid,
        incoming: &BTreeMap<String, String>,
    ) -> MetadataResult<()> {
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT name FROM cookbook_recipes WHERE cookbook_id = ?")
                .bind(cookbook_id)
                .fetch_all(&mut *conn)
                .await?;

        for name in existing.iter().filter(|n| !incoming.contains_key(n.as_str())) {
            sqlx::query("DELETE FROM cookbook_recipes WHERE cookbook_id = ? AND name = ?")
                .bind(cookbook_id)
                .bind(name)
                .execute(&mut *conn)
                .await?;
        }

        for (name, description) in incoming {
            sqlx::query(
                "INSERT INTO cookbook_recipes (recipe_id, cookbook_id, name, description) VALUES (?, ?, ?, ?) \
                 ON CONFLICT(cookbook_id, name) DO UPDATE SET description = excluded.description",
            )
            .bind(Uuid::new_v4())
            .bind(cookbook_id)
            .bind(name)
            .bind(description)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Attach every file descriptor of the manifest, creating entries that do
    /// not match an existing `(kind, name, path, specificity, checksum)`.
    async fn sync_files(
        conn: &mut SqliteConnection,
        cookbook_id: Uuid,
        manifest: &CookbookManifest,
    ) -> MetadataResult<()> {
        for kind in FileKind::ALL {
            for file in manifest.files(kind) {
                let checksum = file.checksum()?;

                let existing: Option<Uuid> = sqlx::query_scalar(
                    "SELECT file_id FROM cookbook_files \
                     WHERE cookbook_id = ? AND kind = ? AND name = ? AND path = ? AND specificity = ? AND checksum = ?",
                )
                .bind(cookbook_id)
                .bind(kind.as_str())
                .bind(&file.name)
                .bind(&file.path)
                .bind(&file.specificity)
                .bind(checksum.as_str())
                .fetch_optional(&mut *conn)
                .await?;

                if let Some(file_id) = existing {
                    sqlx::query(
                        "UPDATE cookbook_files SET name = ?, path = ?, specificity = ? WHERE file_id = ?",
                    )
                    .bind(&file.name)
                    .bind(&file.path)
                    .bind(&file.specificity)
                    .bind(file_id)
                    .execute(&mut *conn)
                    .await?;
                    continue;
                }

                let blob = sqlx::query_as::<_, SandboxFileRow>(
                    "SELECT * FROM sandbox_files WHERE checksum = ?",
                )
                .bind(checksum.as_str())
                .fetch_optional(&mut *conn)
                .await?;

                match blob {
                    None => return Err(MetadataError::ChecksumNotFound(checksum.to_string())),
                    Some(blob) if !blob.uploaded => {
                        return Err(MetadataError::ChecksumNotUploaded(checksum.to_string()));
                    }
                    Some(_) => {}
                }

                sqlx::query(
                    "INSERT INTO cookbook_files (file_id, cookbook_id, kind, name, path, specificity, checksum) \
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4())
                .bind(cookbook_id)
                .bind(kind.as_str())
                .bind(&file.name)
                .bind(&file.path)
                .bind(&file.specificity)
                .bind(checksum.as_str())
                .execute(&mut *conn)
                .await?;
            }
        }
        Ok(())
    }

    #[async_trait]
    impl CookbookRepo for SqliteStore {
        async fn upsert_from_manifest(
            &self,
            manifest: &CookbookManifest,
        ) -> MetadataResult<Cookbook> {
            manifest.validate()?;
            let now = OffsetDateTime::now_utc();

            let mut tx = self.pool.begin().await?;

            sqlx::query(
                "INSERT INTO cookbooks (cookbook_id, name, version, created_at, updated_at) VALUES (?, ?, ?, ?, ?) \
                 ON CONFLICT(name, version) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(&manifest.cookbook_name)
            .bind(&manifest.version)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            let mut row = find_cookbook_row(&mut *tx, &manifest.cookbook_name, &manifest.version)
                .await?
                .ok_or_else(|| {
                    MetadataError::Internal(format!(
                        "cookbook {}-{} missing after insert",
                        manifest.cookbook_name, manifest.version
                    ))
                })?;

            // Without a metadata block the scalar fields stay as they are,
            // while dependencies and recipes are still replaced (by nothing).
            let empty_recipes = BTreeMap::new();
            let (dependencies, recipes) = match &manifest.metadata {
                Some(metadata) => {
                    row.maintainer = metadata.maintainer.clone();
                    row.maintainer_email = metadata.maintainer_email.clone();
                    row.description = metadata.description.clone();
                    row.long_description = metadata.long_description.clone();
                    row.license = metadata.license.clone();
                    (
                        metadata.dependencies.keys().map(String::as_str).collect(),
                        &metadata.recipes,
                    )
                }
                None => (BTreeSet::new(), &empty_recipes),
            };

            sync_dependencies(&mut *tx, row.cookbook_id, &dependencies).await?;
            sync_recipes(&mut *tx, row.cookbook_id, recipes).await?;
            sync_files(&mut *tx, row.cookbook_id, manifest).await?;

            row.updated_at = now;
            sqlx::query(
                "UPDATE cookbooks SET maintainer = ?, maintainer_email = ?, description = ?, \
                 long_description = ?, license = ?, updated_at = ? WHERE cookbook_id = ?",
            )
            .bind(&row.maintainer)
            .bind(&row.maintainer_email)
            .bind(&row.description)
            .bind(&row.long_description)
            .bind(&row.license)
            .bind(row.updated_at)
            .bind(row.cookbook_id)
            .execute(&mut *tx)
            .await?;

            let cookbook = assemble_cookbook(&mut *tx, row).await?;
            tx.commit().await?;

            tracing::debug!(
                cookbook = %cookbook.name,
                version = %cookbook.version,
                recipes = cookbook.recipes.len(),
                files = cookbook.files.len(),
                "Merged cookbook manifest"
            );

            Ok(cookbook)
        }

        async fn get_cookbook(
            &self,
            name: &str,
            version: &str,
        ) -> MetadataResult<Option<Cookbook>> {
            let mut conn = self.pool.acquire().await?;
            match find_cookbook_row(&mut *conn, name, version).await? {
                Some(row) => Ok(Some(assemble_cookbook(&mut *conn, row).await?)),
                None => Ok(None),
            }
        }

        async fn list_cookbooks(&self) -> MetadataResult<Vec<CookbookSummary>> {
            let rows: Vec<(String, String)> =
                sqlx::query_as("SELECT name, version FROM cookbooks ORDER BY name, version")
                    .fetch_all(&self.pool)
                    .await?;

            let mut summaries: Vec<CookbookSummary> = Vec::new();
            for (name, version) in rows {
                match summaries.last_mut() {
                    Some(last) if last.name == name => last.versions.push(version),
                    _ => summaries.push(CookbookSummary {
                        name,
                        versions: vec![version],
                    }),
                }
            }
            Ok(summaries)
        }

        async fn list_versions(&self, name: &str) -> MetadataResult<Vec<String>> {
            let versions =
                sqlx::query_scalar("SELECT version FROM cookbooks WHERE name = ? ORDER BY version")
                    .bind(name)
                    .fetch_all(&self.pool)
                    .await?;
            Ok(versions)
        }

        async fn delete_cookbook(&self, name: &str, version: &str) -> MetadataResult<Cookbook> {
            let mut tx = self.pool.begin().await?;

            let row = find_cookbook_row(&mut *tx, name, version)
                .await?
                .ok_or_else(|| MetadataError::NotFound(format!("cookbook {name}-{version}")))?;
            let cookbook = assemble_cookbook(&mut *tx, row).await?;

            sqlx::query("DELETE FROM cookbooks WHERE cookbook_id = ?")
                .bind(cookbook.cookbook_id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(cookbook)
        }

        async fn cookbook_references_checksum(
            &self,
            name: &str,
            version: &str,
            checksum: &Checksum,
        ) -> MetadataResult<bool> {
            let found: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM cookbook_files f \
                 JOIN cookbooks c ON c.cookbook_id = f.cookbook_id \
                 WHERE c.name = ? AND c.version = ? AND f.checksum = ?)",
            )
            .bind(name)
            .bind(version)
            .bind(checksum.as_str())
            .fetch_one(&self.pool)
            .await?;
            Ok(found)
        }
    }

    #[async_trait]
    impl SandboxRepo for SqliteStore {
        async fn record_file(&self, checksum: &Checksum) -> MetadataResult<SandboxFileRow> {
            sqlx::query(
                "INSERT INTO sandbox_files (checksum, uploaded, created_at) VALUES (?, 0, ?) \
                 ON CONFLICT(checksum) DO NOTHING",
            )
            .bind(checksum.as_str())
            .bind(OffsetDateTime::now_utc())
            .execute(&self.pool)
            .await?;

            self.lookup_by_checksum(checksum).await?.ok_or_else(|| {
                MetadataError::Internal(format!("sandbox file {checksum} missing after insert"))
            })
        }

        async fn mark_uploaded(&self, checksum: &Checksum) -> MetadataResult<()> {
            let result = sqlx::query("UPDATE sandbox_files SET uploaded = 1 WHERE checksum = ?")
                .bind(checksum.as_str())
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "sandbox file {checksum}"
                )));
            }
            Ok(())
        }

        async fn lookup_by_checksum(
            &self,
            checksum: &Checksum,
        ) -> MetadataResult<Option<SandboxFileRow>> {
            let row =
                sqlx::query_as::<_, SandboxFileRow>("SELECT * FROM sandbox_files WHERE checksum = ?")
                    .bind(checksum.as_str())
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }
    }

    impl SqliteStore {
        async fn require_bag(&self, name: &str) -> MetadataResult<DataBagRow> {
            self.get_bag(name)
                .await?
                .ok_or_else(|| MetadataError::NotFound(format!("data bag {name}")))
        }
    }

    #[async_trait]
    impl DataBagRepo for SqliteStore {
        async fn create_bag(&self, name: &str) -> MetadataResult<DataBagRow> {
            let row = DataBagRow {
                bag_id: Uuid::new_v4(),
                name: name.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };

            let result = sqlx::query(
                "INSERT INTO data_bags (bag_id, name, created_at) VALUES (?, ?, ?) \
                 ON CONFLICT(name) DO NOTHING",
            )
            .bind(row.bag_id)
            .bind(&row.name)
            .bind(row.created_at)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::AlreadyExists(format!("data bag {name}")));
            }
            Ok(row)
        }

        async fn get_bag(&self, name: &str) -> MetadataResult<Option<DataBagRow>> {
            let row = sqlx::query_as::<_, DataBagRow>("SELECT * FROM data_bags WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_bags(&self) -> MetadataResult<Vec<DataBagRow>> {
            let rows = sqlx::query_as::<_, DataBagRow>("SELECT * FROM data_bags ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn delete_bag(&self, name: &str) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM data_bags WHERE name = ?")
                .bind(name)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!("data bag {name}")));
            }
            Ok(())
        }

        async fn list_items(&self, bag: &str) -> MetadataResult<Vec<String>> {
            let bag = self.require_bag(bag).await?;
            let names = sqlx::query_scalar(
                "SELECT name FROM data_bag_items WHERE bag_id = ? ORDER BY name",
            )
            .bind(bag.bag_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(names)
        }

        async fn create_item(
            &self,
            bag: &str,
            item: &str,
            raw: &str,
        ) -> MetadataResult<DataBagItemRow> {
            let bag_row = self.require_bag(bag).await?;
            let now = OffsetDateTime::now_utc();
            let row = DataBagItemRow {
                item_id: Uuid::new_v4(),
                bag_id: bag_row.bag_id,
                name: item.to_string(),
                raw_data: raw.to_string(),
                created_at: now,
                updated_at: now,
            };

            let result = sqlx::query(
                "INSERT INTO data_bag_items (item_id, bag_id, name, raw_data, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?) ON CONFLICT(bag_id, name) DO NOTHING",
            )
            .bind(row.item_id)
            .bind(row.bag_id)
            .bind(&row.name)
            .bind(&row.raw_data)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::AlreadyExists(format!(
                    "data bag item {bag}::{item}"
                )));
            }
            Ok(row)
        }

        async fn get_item(
            &self,
            bag: &str,
            item: &str,
        ) -> MetadataResult<Option<DataBagItemRow>> {
            let row = sqlx::query_as::<_, DataBagItemRow>(
                "SELECT i.* FROM data_bag_items i JOIN data_bags b ON b.bag_id = i.bag_id \
                 WHERE b.name = ? AND i.name = ?",
            )
            .bind(bag)
            .bind(item)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn update_item(
            &self,
            bag: &str,
            item: &str,
            raw: &str,
        ) -> MetadataResult<DataBagItemRow> {
            let mut row = self.get_item(bag, item).await?.ok_or_else(|| {
                MetadataError::NotFound(format!("data bag item {bag}::{item}"))
            })?;
            row.raw_data = raw.to_string();
            row.updated_at = OffsetDateTime::now_utc();

            sqlx::query("UPDATE data_bag_items SET raw_data = ?, updated_at = ? WHERE item_id = ?")
                .bind(&row.raw_data)
                .bind(row.updated_at)
                .bind(row.item_id)
                .execute(&self.pool)
                .await?;
            Ok(row)
        }

        async fn delete_item(&self, bag: &str, item: &str) -> MetadataResult<DataBagItemRow> {
            let row = self.get_item(bag, item).await?.ok_or_else(|| {
                MetadataError::NotFound(format!("data bag item {bag}::{item}"))
            })?;

            sqlx::query("DELETE FROM data_bag_items WHERE item_id = ?")
                .bind(row.item_id)
                .execute(&self.pool)
                .await?;
            Ok(row)
        }
    }
}

impl std::convert::From<std::io::Error> for crate::MetadataError {
    fn from(e: std::io::Error) -> Self {
        crate::MetadataError::Config(e.to_string())
    }
}

/// SQL schema for SQLite.
const SCHEMA_SQL: &str = r#"
-- Sandbox: uploaded file bodies addressed by checksum
CREATE TABLE IF NOT EXISTS sandbox_files (
    checksum TEXT PRIMARY KEY,
    uploaded INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Cookbook versions
CREATE TABLE IF NOT EXISTS cookbooks (
    cookbook_id BLOB PRIMARY KEY,
    name TEXT NOT NULL,
    version TEXT NOT NULL,
    maintainer TEXT NOT NULL DEFAULT '',
    maintainer_email TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    long_description TEXT NOT NULL DEFAULT '',
    license TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_cookbooks_name_version ON cookbooks(name, version);

CREATE TABLE IF NOT EXISTS cookbook_dependencies (
    dependency_id BLOB PRIMARY KEY,
    cookbook_id BLOB NOT NULL REFERENCES cookbooks(cookbook_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    UNIQUE(cookbook_id, name)
);

CREATE TABLE IF NOT EXISTS cookbook_recipes (
    recipe_id BLOB PRIMARY KEY,
    cookbook_id BLOB NOT NULL REFERENCES cookbooks(cookbook_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    UNIQUE(cookbook_id, name)
);

-- Files are shared references to sandbox blobs; blobs outlive cookbooks
CREATE TABLE IF NOT EXISTS cookbook_files (
    file_id BLOB PRIMARY KEY,
    cookbook_id BLOB NOT NULL REFERENCES cookbooks(cookbook_id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    specificity TEXT NOT NULL DEFAULT '',
    checksum TEXT NOT NULL REFERENCES sandbox_files(checksum)
);
CREATE INDEX IF NOT EXISTS idx_cookbook_files_cookbook ON cookbook_files(cookbook_id);
CREATE INDEX IF NOT EXISTS idx_cookbook_files_checksum ON cookbook_files(checksum);

-- Data bags
CREATE TABLE IF NOT EXISTS data_bags (
    bag_id BLOB PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS data_bag_items (
    item_id BLOB PRIMARY KEY,
    bag_id BLOB NOT NULL REFERENCES data_bags(bag_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    raw_data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(bag_id, name)
);
"#;
