//! Deployment manifest parsing.
//!
//! ```kdl
//! repository {
//!     local "/opt/shipyard/repository"
//! }
//!
//! app "time" group="ticktock" {
//!     resource "org.example:time-source:jar:exec:1.0.0"
//!     properties {
//!         "server.port" "8080"
//!     }
//!     deployment {
//!         "count" 2
//!     }
//!     args "--verbose"
//! }
//! ```

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode, KdlValue};
use serde::Serialize;
use shipyard_core::{AppDefinition, AppDeploymentId, AppDeploymentRequest};
use shipyard_maven::{
    ArtifactResolver, LocalRepositoryResolver, MavenCoordinates, MavenResource, ResolveError,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A parsed deployment manifest.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentManifest {
    pub repository: RepositoryConfig,
    pub apps: Vec<AppManifest>,
}

/// Where artifacts are resolved from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepositoryConfig {
    /// Local repository root. Defaults to `~/.m2/repository`.
    pub local: Option<PathBuf>,
}

impl RepositoryConfig {
    pub fn resolver(&self) -> Result<LocalRepositoryResolver, ResolveError> {
        match &self.local {
            Some(root) => Ok(LocalRepositoryResolver::new(root)),
            None => LocalRepositoryResolver::with_default_location(),
        }
    }
}

/// One app entry of a manifest.
#[derive(Debug, Clone, Serialize)]
pub struct AppManifest {
    /// Key the app will be deployed under.
    pub id: AppDeploymentId,
    pub definition: AppDefinition,
    pub resource: MavenCoordinates,
    pub deployment_properties: HashMap<String, String>,
    pub args: Vec<String>,
}

impl AppManifest {
    /// Build a deployment request resolving the artifact through `resolver`.
    pub fn to_request(&self, resolver: Arc<dyn ArtifactResolver>) -> AppDeploymentRequest {
        let resource = MavenResource::new(self.resource.clone(), resolver);
        let mut request = AppDeploymentRequest::new(self.definition.clone(), Arc::new(resource))
            .with_args(self.args.iter().cloned());
        request.deployment_properties = self.deployment_properties.clone();
        request
    }
}

/// Read and parse a manifest file.
pub fn load_manifest(path: impl AsRef<Path>) -> ConfigResult<DeploymentManifest> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading deployment manifest");
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse a manifest from KDL text.
pub fn parse_manifest(kdl: &str) -> ConfigResult<DeploymentManifest> {
    let doc: KdlDocument = kdl.parse()?;

    let mut repository = RepositoryConfig::default();
    let mut apps: Vec<AppManifest> = Vec::new();
    let mut seen = HashSet::new();

    for node in doc.nodes() {
        match node.name().value() {
            "repository" => {
                repository = parse_repository(node);
            }
            "app" => {
                let app = parse_app(node)?;
                if !seen.insert(app.id.clone()) {
                    return Err(ConfigError::Duplicate(format!("app '{}'", app.id)));
                }
                apps.push(app);
            }
            other => debug!(node = other, "Ignoring unknown manifest node"),
        }
    }

    debug!(apps = apps.len(), "Parsed deployment manifest");
    Ok(DeploymentManifest { repository, apps })
}

fn parse_repository(node: &KdlNode) -> RepositoryConfig {
    let mut config = RepositoryConfig::default();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            if child.name().value() == "local" {
                config.local = get_first_string_arg(child).map(PathBuf::from);
            }
        }
    }
    config
}

fn parse_app(node: &KdlNode) -> ConfigResult<AppManifest> {
    let name = get_first_string_arg(node)
        .ok_or_else(|| ConfigError::MissingField("app name".to_string()))?;
    let group = get_string_prop(node, "group");

    let id = AppDeploymentId::new(group.as_deref(), &name).map_err(|e| {
        ConfigError::InvalidValue {
            field: format!("app '{}'", name),
            message: e.to_string(),
        }
    })?;

    let mut resource = None;
    let mut properties = HashMap::new();
    let mut deployment_properties = HashMap::new();
    let mut args = Vec::new();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "resource" => {
                    let text = get_first_string_arg(child).unwrap_or_default();
                    let coordinates = MavenCoordinates::parse(&text).map_err(|e| {
                        ConfigError::InvalidValue {
                            field: format!("resource for app '{}'", id),
                            message: e.to_string(),
                        }
                    })?;
                    resource = Some(coordinates);
                }
                "properties" => properties = get_entry_map(child),
                "deployment" => deployment_properties = get_entry_map(child),
                "args" => args = get_all_string_args(child),
                _ => {}
            }
        }
    }

    let resource =
        resource.ok_or_else(|| ConfigError::MissingField(format!("resource for app '{}'", id)))?;

    Ok(AppManifest {
        id,
        definition: AppDefinition::new(name, group, properties),
        resource,
        deployment_properties,
        args,
    })
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

/// Collect `key value` children into a map. Scalars other than strings are
/// rendered as text, so `"count" 2` and `"count" "2"` are equivalent.
fn get_entry_map(node: &KdlNode) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            let key = child.name().value().to_string();
            let value = child
                .entries()
                .iter()
                .find(|e| e.name().is_none())
                .and_then(|e| scalar_to_string(e.value()));
            if let Some(value) = value {
                map.insert(key, value);
            }
        }
    }
    map
}

fn scalar_to_string(value: &KdlValue) -> Option<String> {
    if let Some(s) = value.as_string() {
        return Some(s.to_string());
    }
    if let Some(i) = value.as_integer() {
        return Some(i.to_string());
    }
    if let Some(f) = value.as_float() {
        return Some(f.to_string());
    }
    value.as_bool().map(|b| b.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipyard_core::Resource;

    #[test]
    fn test_parse_full_manifest() {
        let kdl = r#"
            repository {
                local "/opt/shipyard/repository"
            }

            app "time" group="ticktock" {
                resource "org.example:time-source:jar:exec:1.0.0"
                properties {
                    "server.port" "8080"
                    "trigger.fixed-delay" 5
                }
                deployment {
                    "count" 2
                    "memory" "512m"
                }
                args "--verbose" "--trace"
            }

            app "log" {
                resource "org.example:log-sink:1.0.0"
            }
        "#;

        let manifest = parse_manifest(kdl).unwrap();
        assert_eq!(
            manifest.repository.local,
            Some(PathBuf::from("/opt/shipyard/repository"))
        );
        assert_eq!(manifest.apps.len(), 2);

        let time = &manifest.apps[0];
        assert_eq!(time.id.to_string(), "ticktock.time");
        assert_eq!(time.definition.name(), "time");
        assert_eq!(time.definition.group(), Some("ticktock"));
        assert_eq!(time.definition.properties()["server.port"], "8080");
        assert_eq!(time.definition.properties()["trigger.fixed-delay"], "5");
        assert_eq!(time.resource.classifier(), "exec");
        assert_eq!(time.deployment_properties["count"], "2");
        assert_eq!(time.deployment_properties["memory"], "512m");
        assert_eq!(time.args, vec!["--verbose", "--trace"]);

        let log = &manifest.apps[1];
        assert_eq!(log.id.to_string(), "log");
        assert_eq!(log.resource.to_string(), "org.example:log-sink:jar:1.0.0");
        assert!(log.definition.properties().is_empty());
    }

    #[test]
    fn test_missing_resource() {
        let kdl = r#"
            app "time" {
                properties {
                    "a" "b"
                }
            }
        "#;

        assert!(matches!(
            parse_manifest(kdl).unwrap_err(),
            ConfigError::MissingField(_)
        ));
    }

    #[test]
    fn test_missing_app_name() {
        let kdl = r#"
            app {
                resource "g:a:1.0"
            }
        "#;

        assert!(matches!(
            parse_manifest(kdl).unwrap_err(),
            ConfigError::MissingField(_)
        ));
    }

    #[test]
    fn test_bad_coordinates() {
        let kdl = r#"
            app "time" {
                resource "g:a"
            }
        "#;

        match parse_manifest(kdl).unwrap_err() {
            ConfigError::InvalidValue { field, message } => {
                assert!(field.contains("time"));
                assert!(message.contains("g:a"));
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn test_dotted_group_rejected() {
        let kdl = r#"
            app "time" group="tick.tock" {
                resource "g:a:1.0"
            }
        "#;

        assert!(matches!(
            parse_manifest(kdl).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_duplicate_app() {
        let kdl = r#"
            app "time" group="ticktock" {
                resource "g:a:1.0"
            }
            app "time" group="ticktock" {
                resource "g:b:1.0"
            }
        "#;

        assert!(matches!(
            parse_manifest(kdl).unwrap_err(),
            ConfigError::Duplicate(_)
        ));
    }

    #[test]
    fn test_same_name_in_other_group_allowed() {
        let kdl = r#"
            app "time" group="a" {
                resource "g:a:1.0"
            }
            app "time" group="b" {
                resource "g:a:1.0"
            }
        "#;

        assert_eq!(parse_manifest(kdl).unwrap().apps.len(), 2);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            parse_manifest("app \"time\" {").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn test_default_repository() {
        let manifest = parse_manifest(r#"app "x" { resource "g:a:1.0"; }"#).unwrap();
        assert_eq!(manifest.repository.local, None);
    }

    #[test]
    fn test_to_request() {
        let manifest = parse_manifest(
            r#"
            app "time" group="ticktock" {
                resource "g:a:1.0"
                deployment {
                    "count" 3
                }
                args "--debug"
            }
            "#,
        )
        .unwrap();

        let resolver = Arc::new(LocalRepositoryResolver::new("/nonexistent"));
        let request = manifest.apps[0].to_request(resolver);
        assert_eq!(request.resource.description(), "g:a:jar:1.0");
        assert_eq!(request.deployment_properties["count"], "3");
        assert_eq!(request.command_line_args, vec!["--debug"]);
        assert_eq!(request.deployment_id().unwrap(), manifest.apps[0].id);
    }

    #[test]
    fn test_load_manifest_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipyard.kdl");
        std::fs::write(&path, "app \"log\" {\n    resource \"g:a:1.0\"\n}\n").unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.apps[0].id.to_string(), "log");

        assert!(matches!(
            load_manifest(dir.path().join("missing.kdl")).unwrap_err(),
            ConfigError::Io(_)
        ));
    }
}
