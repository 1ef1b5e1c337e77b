//! KDL deployment manifests for Shipyard.
//!
//! A manifest names the apps to deploy, the artifact each one runs, its app
//! and deployment properties, and where the local artifact repository lives.

pub mod error;
pub mod manifest;

pub use error::{ConfigError, ConfigResult};
pub use manifest::{
    AppManifest, DeploymentManifest, RepositoryConfig, load_manifest, parse_manifest,
};
