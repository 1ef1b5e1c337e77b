//! Artifact resolution.
//!
//! Resolvers turn coordinates into a file on local disk. Fetching from remote
//! repositories, retries and caching all live behind [`ArtifactResolver`];
//! this crate only ships a read-only resolver for an existing local repository.

use async_trait::async_trait;
use bytes::BytesMut;
use futures::StreamExt;
use shipyard_core::ByteStream;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::coordinates::MavenCoordinates;

const READ_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("artifact {artifact} not found in {repository}")]
    NotFound { artifact: String, repository: String },

    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An artifact materialized on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    file: PathBuf,
}

impl ResolvedArtifact {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn into_file(self) -> PathBuf {
        self.file
    }

    /// Open the artifact as a stream of chunks.
    pub async fn open(&self) -> std::io::Result<ByteStream> {
        let file = tokio::fs::File::open(&self.file).await?;
        let stream = futures::stream::try_unfold(file, |mut file| async move {
            let mut buf = BytesMut::with_capacity(READ_CHUNK_SIZE);
            if file.read_buf(&mut buf).await? == 0 {
                return Ok(None);
            }
            Ok::<_, std::io::Error>(Some((buf.freeze(), file)))
        });
        Ok(stream.boxed())
    }
}

/// Trait for artifact resolvers.
#[async_trait]
pub trait ArtifactResolver: Send + Sync {
    /// Name of this resolver.
    fn name(&self) -> &'static str;

    /// Locate the artifact, downloading it first if the resolver is remote.
    async fn resolve(
        &self,
        coordinates: &MavenCoordinates,
    ) -> std::result::Result<ResolvedArtifact, ResolveError>;
}

/// Resolves artifacts from a local repository in the standard layout:
/// `<root>/<group path>/<artifactId>/<version>/<file name>`.
#[derive(Debug, Clone)]
pub struct LocalRepositoryResolver {
    root: PathBuf,
}

impl LocalRepositoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolver for `~/.m2/repository`.
    pub fn with_default_location() -> std::result::Result<Self, ResolveError> {
        Self::default_location().map(Self::new)
    }

    /// Default local repository, `~/.m2/repository`.
    pub fn default_location() -> std::result::Result<PathBuf, ResolveError> {
        dirs::home_dir()
            .map(|home| home.join(".m2").join("repository"))
            .ok_or_else(|| ResolveError::Unavailable("home directory not found".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the artifact lives under this repository, whether or not it exists.
    pub fn path_for(&self, coordinates: &MavenCoordinates) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(coordinates.group_id().split('.'));
        path.push(coordinates.artifact_id());
        path.push(coordinates.version());
        path.push(coordinates.file_name());
        path
    }

    fn not_found(&self, coordinates: &MavenCoordinates) -> ResolveError {
        ResolveError::NotFound {
            artifact: coordinates.to_string(),
            repository: self.root.display().to_string(),
        }
    }
}

#[async_trait]
impl ArtifactResolver for LocalRepositoryResolver {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn resolve(
        &self,
        coordinates: &MavenCoordinates,
    ) -> std::result::Result<ResolvedArtifact, ResolveError> {
        let path = self.path_for(coordinates);
        debug!(artifact = %coordinates, path = %path.display(), "Resolving from local repository");

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(ResolvedArtifact::new(path)),
            Ok(_) => {
                warn!(path = %path.display(), "Artifact path is not a regular file");
                Err(self.not_found(coordinates))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(self.not_found(coordinates)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn install(root: &Path, coordinates: &MavenCoordinates, content: &[u8]) -> PathBuf {
        let path = LocalRepositoryResolver::new(root).path_for(coordinates);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_path_layout() {
        let resolver = LocalRepositoryResolver::new("/repo");
        let c = MavenCoordinates::parse("org.example.apps:time:jar:exec:1.2.0").unwrap();
        assert_eq!(
            resolver.path_for(&c),
            PathBuf::from("/repo/org/example/apps/time/1.2.0/time-1.2.0-exec.jar")
        );

        let c = MavenCoordinates::parse("org.example:bom:pom:1.0").unwrap();
        assert_eq!(
            resolver.path_for(&c),
            PathBuf::from("/repo/org/example/bom/1.0/bom-1.0.pom")
        );
    }

    #[test]
    fn test_default_location_under_home() {
        if let Ok(location) = LocalRepositoryResolver::default_location() {
            assert!(location.ends_with(".m2/repository"));
        }
    }

    #[tokio::test]
    async fn test_resolve_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let c = MavenCoordinates::parse("g:a:1.0").unwrap();
        let installed = install(dir.path(), &c, b"jar bytes");

        let resolver = LocalRepositoryResolver::new(dir.path());
        let artifact = resolver.resolve(&c).await.unwrap();
        assert_eq!(artifact.file(), installed.as_path());
    }

    #[tokio::test]
    async fn test_resolve_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = LocalRepositoryResolver::new(dir.path());
        let c = MavenCoordinates::parse("g:a:1.0").unwrap();

        match resolver.resolve(&c).await {
            Err(ResolveError::NotFound { artifact, .. }) => assert_eq!(artifact, "g:a:jar:1.0"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = LocalRepositoryResolver::new(dir.path());
        let c = MavenCoordinates::parse("g:a:1.0").unwrap();
        std::fs::create_dir_all(resolver.path_for(&c)).unwrap();

        assert!(matches!(
            resolver.resolve(&c).await,
            Err(ResolveError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_streams_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let content: Vec<u8> = (0..READ_CHUNK_SIZE * 2 + 17).map(|i| i as u8).collect();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, &content).unwrap();

        let chunks: Vec<_> = ResolvedArtifact::new(&path)
            .open()
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert!(chunks.len() >= 3);
        let read: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(read, content);
    }
}
