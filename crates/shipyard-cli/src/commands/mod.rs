//! CLI command implementations.

use anyhow::{Context, Result};
use serde::Serialize;
use shipyard_config::load_manifest;
use shipyard_core::Resource;
use shipyard_maven::{LocalRepositoryResolver, MavenCoordinates, MavenResource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Serialize)]
struct CoordinatesView<'a> {
    group_id: &'a str,
    artifact_id: &'a str,
    extension: &'a str,
    classifier: &'a str,
    version: &'a str,
    canonical: String,
}

impl<'a> From<&'a MavenCoordinates> for CoordinatesView<'a> {
    fn from(c: &'a MavenCoordinates) -> Self {
        Self {
            group_id: c.group_id(),
            artifact_id: c.artifact_id(),
            extension: c.extension(),
            classifier: c.classifier(),
            version: c.version(),
            canonical: c.to_string(),
        }
    }
}

pub fn coords(text: &str, json: bool) -> Result<()> {
    let coordinates = MavenCoordinates::parse(text)?;
    let view = CoordinatesView::from(&coordinates);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("groupId:    {}", view.group_id);
    println!("artifactId: {}", view.artifact_id);
    println!("extension:  {}", view.extension);
    println!("classifier: {}", view.classifier);
    println!("version:    {}", view.version);
    println!("canonical:  {}", view.canonical);
    Ok(())
}

pub async fn resolve(text: &str, local_repo: Option<PathBuf>) -> Result<()> {
    let resolver = match local_repo {
        Some(root) => LocalRepositoryResolver::new(root),
        None => LocalRepositoryResolver::with_default_location()?,
    };
    info!(root = %resolver.root().display(), "Using local repository");

    let resource = MavenResource::parse(text, Arc::new(resolver))?;
    let file = resource
        .file()
        .await
        .with_context(|| format!("Failed to resolve {}", resource.description()))?;

    println!("{}", file.display());
    Ok(())
}

pub fn validate(path: &Path, json: bool) -> Result<()> {
    let manifest = load_manifest(path)
        .with_context(|| format!("Failed to load manifest: {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    if let Some(local) = &manifest.repository.local {
        println!("Repository: {}", local.display());
    }
    println!("Apps: {}", manifest.apps.len());
    for app in &manifest.apps {
        println!("  {} -> {}", app.id, app.resource);
    }
    println!("Manifest is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_view() {
        let c = MavenCoordinates::parse("g:a:jar:exec:1.0").unwrap();
        let view = CoordinatesView::from(&c);
        assert_eq!(view.classifier, "exec");
        assert_eq!(view.canonical, "g:a:jar:exec:1.0");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["group_id"], "g");
    }

    #[test]
    fn test_coords_rejects_bad_input() {
        assert!(coords("g:a", false).is_err());
        assert!(coords("g:a:1.0", true).is_ok());
    }

    #[tokio::test]
    async fn test_resolve_against_local_repo() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("g/a/1.0/a-1.0.jar");
        std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        std::fs::write(&artifact, b"jar").unwrap();

        resolve("g:a:1.0", Some(dir.path().to_path_buf())).await.unwrap();

        let err = resolve("g:missing:1.0", Some(dir.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("g:missing:jar:1.0"));
    }

    #[test]
    fn test_validate_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipyard.kdl");
        std::fs::write(
            &path,
            "app \"time\" group=\"ticktock\" {\n    resource \"g:a:1.0\"\n}\n",
        )
        .unwrap();

        assert!(validate(&path, false).is_ok());
        assert!(validate(&path, true).is_ok());
        assert!(validate(&dir.path().join("missing.kdl"), false).is_err());
    }
}
