//! Core deployment types and traits for Shipyard.
//!
//! This crate contains:
//! - Error types shared by all Shipyard crates
//! - The resource capability deployers consume
//! - App definitions
//! - Deployment ids, requests and the deployer trait

pub mod app;
pub mod deployment;
pub mod error;
pub mod resource;

pub use app::AppDefinition;
pub use deployment::{AppDeployer, AppDeploymentId, AppDeploymentRequest, DeploymentState};
pub use error::{Error, Result};
pub use resource::{ByteStream, Resource};
