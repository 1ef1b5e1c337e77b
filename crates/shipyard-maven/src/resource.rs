//! Resources addressed by Maven coordinates.

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use shipyard_core::{ByteStream, Error, Resource, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use crate::coordinates::MavenCoordinates;
use crate::resolver::{ArtifactResolver, ResolvedArtifact};

/// An app or library artifact addressed by coordinates.
///
/// Creating one never touches the network. Every call to
/// [`Resource::input_stream`] or [`Resource::file`] asks the resolver again;
/// nothing is cached here.
#[derive(Clone)]
pub struct MavenResource {
    coordinates: MavenCoordinates,
    resolver: Arc<dyn ArtifactResolver>,
}

impl MavenResource {
    pub fn new(coordinates: MavenCoordinates, resolver: Arc<dyn ArtifactResolver>) -> Self {
        Self {
            coordinates,
            resolver,
        }
    }

    /// Parse coordinates and bind them to a resolver.
    pub fn parse(coordinates: &str, resolver: Arc<dyn ArtifactResolver>) -> Result<Self> {
        Ok(Self::new(MavenCoordinates::parse(coordinates)?, resolver))
    }

    pub fn coordinates(&self) -> &MavenCoordinates {
        &self.coordinates
    }

    pub fn group_id(&self) -> &str {
        self.coordinates.group_id()
    }

    pub fn artifact_id(&self) -> &str {
        self.coordinates.artifact_id()
    }

    pub fn extension(&self) -> &str {
        self.coordinates.extension()
    }

    pub fn classifier(&self) -> &str {
        self.coordinates.classifier()
    }

    pub fn version(&self) -> &str {
        self.coordinates.version()
    }

    /// Read the whole artifact into memory.
    pub async fn read_to_bytes(&self) -> Result<Bytes> {
        let chunks: Vec<Bytes> = self
            .input_stream()
            .await?
            .try_collect()
            .await
            .map_err(|e| Error::io(self.to_string(), e))?;
        Ok(chunks.concat().into())
    }

    async fn resolve(&self) -> Result<ResolvedArtifact> {
        self.resolver
            .resolve(&self.coordinates)
            .await
            .map_err(|e| Error::io(self.to_string(), e))
    }
}

#[async_trait]
impl Resource for MavenResource {
    async fn input_stream(&self) -> Result<ByteStream> {
        let artifact = self.resolve().await?;
        artifact
            .open()
            .await
            .map_err(|e| Error::io(self.to_string(), e))
    }

    async fn file(&self) -> Result<PathBuf> {
        Ok(self.resolve().await?.into_file())
    }
}

impl PartialEq for MavenResource {
    fn eq(&self, other: &Self) -> bool {
        self.coordinates == other.coordinates
    }
}

impl Eq for MavenResource {}

impl Hash for MavenResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinates.hash(state);
    }
}

impl fmt::Display for MavenResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.coordinates, f)
    }
}

impl fmt::Debug for MavenResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MavenResource")
            .field("coordinates", &self.coordinates.to_string())
            .field("resolver", &self.resolver.name())
            .finish()
    }
}
