//! Deployment identity, requests and the deployer trait.
//!
//! Deployers turn an [`AppDeploymentRequest`] into a running app and hand back
//! an [`AppDeploymentId`]. The id is the only thing callers keep; status and
//! undeploy calls look the deployment up by it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::app::AppDefinition;
use crate::resource::Resource;
use crate::{Error, Result};

/// Separator between group and name in the rendered id.
pub const ID_DELIMITER: char = '.';

/// Key of a deployment made by a deployer.
///
/// Equality and hashing consider only the group and name. The properties are
/// bookkeeping private to the deployer that created the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawDeploymentId")]
pub struct AppDeploymentId {
    group: Option<String>,
    name: String,
    properties: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawDeploymentId {
    group: Option<String>,
    name: String,
    #[serde(default)]
    properties: HashMap<String, String>,
}

impl TryFrom<RawDeploymentId> for AppDeploymentId {
    type Error = Error;

    fn try_from(raw: RawDeploymentId) -> Result<Self> {
        Self::with_properties(raw.group.as_deref(), &raw.name, raw.properties)
    }
}

impl AppDeploymentId {
    /// Create an id with no deployer properties.
    pub fn new(group: Option<&str>, name: &str) -> Result<Self> {
        Self::with_properties(group, name, HashMap::new())
    }

    /// Create an id for an app that belongs to no group.
    pub fn ungrouped(name: &str) -> Result<Self> {
        Self::new(None, name)
    }

    /// Create an id carrying deployer properties.
    ///
    /// Group (when present) and name must be non-blank and must not contain
    /// [`ID_DELIMITER`], so the rendered form splits back unambiguously.
    pub fn with_properties(
        group: Option<&str>,
        name: &str,
        properties: HashMap<String, String>,
    ) -> Result<Self> {
        if let Some(group) = group {
            validate_part(group, "group")?;
        }
        validate_part(name, "name")?;
        Ok(Self {
            group: group.map(str::to_string),
            name: name.to_string(),
            properties,
        })
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

fn validate_part(value: &str, field: &str) -> Result<()> {
    Error::require_text(value, field)?;
    if value.contains(ID_DELIMITER) {
        return Err(Error::InvalidArgument(format!(
            "'{field}' must not contain '{ID_DELIMITER}': {value}"
        )));
    }
    Ok(())
}

impl PartialEq for AppDeploymentId {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.name == other.name
    }
}

impl Eq for AppDeploymentId {}

impl Hash for AppDeploymentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.hash(state);
        self.name.hash(state);
    }
}

/// Renders `group.name`, or the bare name when there is no group.
impl fmt::Display for AppDeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{group}{ID_DELIMITER}{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl std::str::FromStr for AppDeploymentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(ID_DELIMITER) {
            Some((group, name)) => Self::new(Some(group), name),
            None => Self::ungrouped(s),
        }
    }
}

/// Everything a deployer needs to launch an app.
#[derive(Clone)]
pub struct AppDeploymentRequest {
    pub definition: AppDefinition,
    /// Artifact to launch.
    pub resource: Arc<dyn Resource>,
    /// Properties for the deployer itself, such as instance count.
    pub deployment_properties: HashMap<String, String>,
    /// Arguments appended to the launch command.
    pub command_line_args: Vec<String>,
}

impl AppDeploymentRequest {
    pub fn new(definition: AppDefinition, resource: Arc<dyn Resource>) -> Self {
        Self {
            definition,
            resource,
            deployment_properties: HashMap::new(),
            command_line_args: Vec::new(),
        }
    }

    pub fn with_deployment_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.deployment_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.command_line_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Default id for this request: the definition's group and name.
    pub fn deployment_id(&self) -> Result<AppDeploymentId> {
        AppDeploymentId::new(self.definition.group(), self.definition.name())
    }
}

impl fmt::Debug for AppDeploymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppDeploymentRequest")
            .field("definition", &self.definition)
            .field("resource", &self.resource.description())
            .field("deployment_properties", &self.deployment_properties)
            .field("command_line_args", &self.command_line_args)
            .finish()
    }
}

/// State of a deployment as reported by a deployer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    /// Deployment is in progress.
    Deploying,
    /// All instances are running.
    Deployed,
    /// Deployment was removed.
    Undeployed,
    /// Some instances are running.
    Partial,
    /// Deployment failed to start.
    Failed,
    /// Deployer could not determine the state.
    Error,
    /// No deployment known for the id.
    Unknown,
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentState::Deploying => write!(f, "deploying"),
            DeploymentState::Deployed => write!(f, "deployed"),
            DeploymentState::Undeployed => write!(f, "undeployed"),
            DeploymentState::Partial => write!(f, "partial"),
            DeploymentState::Failed => write!(f, "failed"),
            DeploymentState::Error => write!(f, "error"),
            DeploymentState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Trait for deployers.
#[async_trait]
pub trait AppDeployer: Send + Sync {
    /// Name of this deployer.
    fn name(&self) -> &'static str;

    /// Launch the app described by the request.
    async fn deploy(&self, request: AppDeploymentRequest) -> Result<AppDeploymentId>;

    /// Remove a deployment made earlier by this deployer.
    async fn undeploy(&self, id: &AppDeploymentId) -> Result<()>;

    /// Current state of a deployment.
    async fn status(&self, id: &AppDeploymentId) -> Result<DeploymentState>;
}
