//! Integration tests for cookbook manifest merging.

mod common;

use common::*;
use larder_core::manifest::ManifestMetadata;
use larder_core::{FileKind, to_manifest};
use larder_metadata::MetadataError;
use larder_metadata::repos::{CookbookRepo, SandboxRepo};
use std::collections::BTreeMap;

fn recipe_names(cookbook: &larder_core::Cookbook) -> Vec<&str> {
    cookbook.recipes.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_nginx_default_recipe_then_removed() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let cookbook = store
        .upsert_from_manifest(&manifest("nginx", "1.0.0", &[("default", "Installs nginx")]))
        .await
        .expect("Failed to merge manifest");
    assert_eq!(cookbook.name, "nginx");
    assert_eq!(cookbook.version, "1.0.0");
    assert_eq!(recipe_names(&cookbook), vec!["default"]);

    let cookbook = store
        .upsert_from_manifest(&manifest("nginx", "1.0.0", &[]))
        .await
        .expect("Failed to merge manifest");
    assert!(cookbook.recipes.is_empty());

    let stored = store
        .get_cookbook("nginx", "1.0.0")
        .await
        .expect("Failed to get cookbook")
        .expect("cookbook should exist");
    assert!(stored.recipes.is_empty());
}

#[tokio::test]
async fn test_merge_is_idempotent() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;
    let template = uploaded_blob(store, "nginx.conf").await;

    let mut m = manifest("nginx", "1.0.0", &[("default", "Installs nginx")]);
    if let Some(meta) = m.metadata.as_mut() {
        meta.dependencies
            .insert("build-essential".to_string(), serde_json::json!(">= 1.0"));
    }
    let m = with_file(
        m,
        FileKind::Templates,
        manifest_file("nginx.conf.erb", "templates/default/nginx.conf.erb", &template),
    );

    let first = store.upsert_from_manifest(&m).await.expect("first merge");
    let second = store.upsert_from_manifest(&m).await.expect("second merge");

    assert_eq!(first.cookbook_id, second.cookbook_id);
    assert_eq!(to_manifest(&first, None), to_manifest(&second, None));
    assert_eq!(second.files.len(), 1);
    assert_eq!(second.dependencies.len(), 1);
}

#[tokio::test]
async fn test_upsert_by_key_updates_same_row() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let first = store
        .upsert_from_manifest(&manifest("apache2", "2.0.0", &[]))
        .await
        .expect("first merge");

    let mut changed = manifest("apache2", "2.0.0", &[]);
    if let Some(meta) = changed.metadata.as_mut() {
        meta.maintainer = "Someone Else".to_string();
        meta.license = "MIT".to_string();
    }
    let second = store
        .upsert_from_manifest(&changed)
        .await
        .expect("second merge");

    assert_eq!(first.cookbook_id, second.cookbook_id);
    assert_eq!(second.maintainer, "Someone Else");
    assert_eq!(second.license, "MIT");
    assert_eq!(
        store.list_versions("apache2").await.expect("list versions"),
        vec!["2.0.0"]
    );
}

#[tokio::test]
async fn test_missing_metadata_fields_become_empty() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    store
        .upsert_from_manifest(&manifest("ntp", "1.0.0", &[]))
        .await
        .expect("first merge");

    let mut sparse = manifest("ntp", "1.0.0", &[]);
    sparse.metadata = Some(ManifestMetadata {
        maintainer: "Only Maintainer".to_string(),
        ..Default::default()
    });
    let cookbook = store.upsert_from_manifest(&sparse).await.expect("merge");

    assert_eq!(cookbook.maintainer, "Only Maintainer");
    assert_eq!(cookbook.maintainer_email, "");
    assert_eq!(cookbook.description, "");
    assert_eq!(cookbook.license, "");
}

#[tokio::test]
async fn test_recipes_and_dependencies_are_pruned() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let mut m = manifest("app", "0.1.0", &[("a", "first"), ("b", "second")]);
    if let Some(meta) = m.metadata.as_mut() {
        meta.dependencies = BTreeMap::from([
            ("x".to_string(), serde_json::json!("~> 1.0")),
            ("y".to_string(), serde_json::json!(">= 0.0.0")),
        ]);
    }
    store.upsert_from_manifest(&m).await.expect("first merge");

    let mut m = manifest("app", "0.1.0", &[("b", "second, revised"), ("c", "third")]);
    if let Some(meta) = m.metadata.as_mut() {
        meta.dependencies = BTreeMap::from([
            ("y".to_string(), serde_json::json!(">= 0.0.0")),
            ("z".to_string(), serde_json::json!("= 2.1.0")),
        ]);
    }
    let cookbook = store.upsert_from_manifest(&m).await.expect("second merge");

    assert_eq!(recipe_names(&cookbook), vec!["b", "c"]);
    assert_eq!(cookbook.recipes[0].description, "second, revised");
    let deps: Vec<_> = cookbook.dependencies.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(deps, vec!["y", "z"]);
}

#[tokio::test]
async fn test_missing_metadata_block_prunes_children_keeps_scalars() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let mut m = manifest("app", "0.1.0", &[("a", "first")]);
    if let Some(meta) = m.metadata.as_mut() {
        meta.dependencies
            .insert("x".to_string(), serde_json::json!("~> 1.0"));
    }
    store.upsert_from_manifest(&m).await.expect("first merge");

    let mut bare = manifest("app", "0.1.0", &[]);
    bare.metadata = None;
    let cookbook = store.upsert_from_manifest(&bare).await.expect("second merge");

    assert!(cookbook.recipes.is_empty());
    assert!(cookbook.dependencies.is_empty());
    assert_eq!(cookbook.maintainer, "Ops Team");
    assert_eq!(cookbook.license, "Apache-2.0");
}

#[tokio::test]
async fn test_unknown_checksum_rolls_back_new_cookbook() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let m = with_file(
        manifest("nginx", "1.0.0", &[("default", "")]),
        FileKind::Recipes,
        manifest_file("default.rb", "recipes/default.rb", &checksum("never-uploaded")),
    );

    let err = store.upsert_from_manifest(&m).await.unwrap_err();
    assert!(
        matches!(err, MetadataError::ChecksumNotFound(ref c) if *c == checksum("never-uploaded").to_string()),
        "unexpected error: {err}"
    );
    assert!(
        store
            .get_cookbook("nginx", "1.0.0")
            .await
            .expect("get cookbook")
            .is_none()
    );
}

#[tokio::test]
async fn test_pending_checksum_leaves_prior_state_unchanged() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let before = store
        .upsert_from_manifest(&manifest("nginx", "1.0.0", &[("default", "v1")]))
        .await
        .expect("first merge");

    let pending = pending_blob(store, "still-uploading").await;
    let mut m = manifest("nginx", "1.0.0", &[("other", "v2")]);
    if let Some(meta) = m.metadata.as_mut() {
        meta.maintainer = "Changed".to_string();
    }
    let m = with_file(
        m,
        FileKind::Files,
        manifest_file("motd", "files/default/motd", &pending),
    );

    let err = store.upsert_from_manifest(&m).await.unwrap_err();
    assert!(matches!(err, MetadataError::ChecksumNotUploaded(_)), "unexpected error: {err}");

    let after = store
        .get_cookbook("nginx", "1.0.0")
        .await
        .expect("get cookbook")
        .expect("cookbook should still exist");
    assert_eq!(after.cookbook_id, before.cookbook_id);
    assert_eq!(after.maintainer, "Ops Team");
    assert_eq!(recipe_names(&after), vec!["default"]);
    assert!(after.files.is_empty());

    // Once the upload is confirmed the same manifest merges.
    store.mark_uploaded(&pending).await.expect("mark uploaded");
    let merged = store.upsert_from_manifest(&m).await.expect("merge after upload");
    assert_eq!(merged.files.len(), 1);
    assert_eq!(merged.maintainer, "Changed");
}

#[tokio::test]
async fn test_invalid_manifest_is_validation_error() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let mut m = manifest("nginx", "1.0.0", &[]);
    m.version.clear();
    let err = store.upsert_from_manifest(&m).await.unwrap_err();
    assert!(matches!(err, MetadataError::Validation(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn test_stale_files_are_not_pruned() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;
    let v1 = uploaded_blob(store, "default.rb v1").await;
    let v2 = uploaded_blob(store, "default.rb v2").await;

    let m1 = with_file(
        manifest("nginx", "1.0.0", &[]),
        FileKind::Recipes,
        manifest_file("default.rb", "recipes/default.rb", &v1),
    );
    store.upsert_from_manifest(&m1).await.expect("first merge");

    let m2 = with_file(
        manifest("nginx", "1.0.0", &[]),
        FileKind::Recipes,
        manifest_file("default.rb", "recipes/default.rb", &v2),
    );
    let cookbook = store.upsert_from_manifest(&m2).await.expect("second merge");

    let checksums: Vec<_> = cookbook.files.iter().map(|f| f.checksum.clone()).collect();
    assert_eq!(checksums.len(), 2);
    assert!(checksums.contains(&v1));
    assert!(checksums.contains(&v2));
}

#[tokio::test]
async fn test_same_blob_shared_across_versions() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;
    let blob = uploaded_blob(store, "shared").await;

    for version in ["1.0.0", "1.1.0"] {
        let m = with_file(
            manifest("nginx", version, &[]),
            FileKind::RootFiles,
            manifest_file("README.md", "README.md", &blob),
        );
        store.upsert_from_manifest(&m).await.expect("merge");
    }

    store
        .delete_cookbook("nginx", "1.0.0")
        .await
        .expect("delete cookbook");
    assert!(
        store
            .cookbook_references_checksum("nginx", "1.1.0", &blob)
            .await
            .expect("reference check")
    );
    assert!(
        !store
            .cookbook_references_checksum("nginx", "1.0.0", &blob)
            .await
            .expect("reference check")
    );
    assert!(
        store
            .lookup_by_checksum(&blob)
            .await
            .expect("lookup")
            .is_some()
    );
}

#[tokio::test]
async fn test_round_trip_through_to_manifest() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    let mut m = manifest("nginx", "1.0.0", &[("nginx::default", "Installs nginx")]);
    for (kind, name) in [
        (FileKind::Templates, "site.erb"),
        (FileKind::Templates, "nginx.conf.erb"),
        (FileKind::Attributes, "default.rb"),
        (FileKind::RootFiles, "metadata.rb"),
    ] {
        let blob = uploaded_blob(store, &format!("{kind}/{name}")).await;
        m.files_mut(kind)
            .push(manifest_file(name, &format!("{kind}/{name}"), &blob));
    }

    let cookbook = store.upsert_from_manifest(&m).await.expect("merge");
    let rendered = to_manifest(&cookbook, None);

    assert_eq!(rendered.name, "nginx-1.0.0");
    let rendered_meta = rendered.metadata.as_ref().expect("metadata");
    let input_meta = m.metadata.as_ref().expect("metadata");
    assert_eq!(rendered_meta.maintainer, input_meta.maintainer);
    assert_eq!(rendered_meta.description, input_meta.description);
    assert_eq!(rendered_meta.recipes, input_meta.recipes);

    for kind in FileKind::ALL {
        let mut expected = m.files(kind).to_vec();
        expected.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(rendered.files(kind), expected.as_slice(), "{kind}");
    }
    let names: Vec<_> = rendered.templates.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["nginx.conf.erb", "site.erb"]);
}

#[tokio::test]
async fn test_concurrent_merges_create_one_row() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = metadata.store.clone();

    let merges = (0..8).map(|i| {
        let store = store.clone();
        tokio::spawn(async move {
            let recipe = format!("r{i}");
            store
                .upsert_from_manifest(&manifest("race", "1.0.0", &[(recipe.as_str(), "")]))
                .await
        })
    });

    let results = futures::future::join_all(merges).await;
    let ids: Vec<_> = results
        .into_iter()
        .map(|r| r.expect("task panicked").expect("merge failed").cookbook_id)
        .collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));

    let summaries = store.list_cookbooks().await.expect("list cookbooks");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].versions, vec!["1.0.0"]);

    let cookbook = store
        .get_cookbook("race", "1.0.0")
        .await
        .expect("get cookbook")
        .expect("cookbook should exist");
    assert_eq!(cookbook.recipes.len(), 1);
}

#[tokio::test]
async fn test_list_and_delete_cookbooks() {
    let metadata = TestMetadata::new().await.expect("Failed to create metadata");
    let store = &metadata.store;

    for (name, version) in [("nginx", "1.0.0"), ("apache2", "2.0.0"), ("nginx", "1.1.0")] {
        store
            .upsert_from_manifest(&manifest(name, version, &[]))
            .await
            .expect("merge");
    }

    let summaries = store.list_cookbooks().await.expect("list cookbooks");
    let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["apache2", "nginx"]);
    assert_eq!(summaries[1].versions, vec!["1.0.0", "1.1.0"]);

    let deleted = store
        .delete_cookbook("nginx", "1.0.0")
        .await
        .expect("delete cookbook");
    assert_eq!(deleted.version, "1.0.0");
    assert_eq!(
        store.list_versions("nginx").await.expect("list versions"),
        vec!["1.1.0"]
    );

    let err = store.delete_cookbook("nginx", "1.0.0").await.unwrap_err();
    assert!(matches!(err, MetadataError::NotFound(_)));
}
