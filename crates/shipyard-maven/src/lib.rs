//! Maven coordinate resources for Shipyard.
//!
//! Provides:
//! - Coordinate parsing and canonical rendering
//! - [`MavenResource`], a [`shipyard_core::Resource`] backed by a resolver
//! - The resolver trait and a local repository resolver

pub mod coordinates;
pub mod resolver;
pub mod resource;

pub use coordinates::{
    DEFAULT_EXTENSION, EMPTY_CLASSIFIER, MavenCoordinates, MavenCoordinatesBuilder,
};
pub use resolver::{ArtifactResolver, LocalRepositoryResolver, ResolveError, ResolvedArtifact};
pub use resource::MavenResource;
