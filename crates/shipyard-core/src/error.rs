//! Error types for Shipyard.

use thiserror::Error;

/// Shape accepted by coordinate parsers, quoted in format errors.
pub const COORDINATES_FORMAT: &str =
    "<groupId>:<artifactId>[:<extension>[:<classifier>]]:<version>";

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("bad artifact coordinates {input}, expected format is {}", COORDINATES_FORMAT)]
    InvalidFormat { input: String },

    #[error("failed to access {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("deployment failed: {0}")]
    DeploymentFailed(String),
}

impl Error {
    /// Fails with [`Error::InvalidArgument`] unless `value` holds a non-whitespace character.
    pub fn require_text(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Error::InvalidArgument(format!("'{field}' cannot be blank")));
        }
        Ok(())
    }

    /// Wraps a resolver failure for the resource described by `resource`.
    pub fn io(
        resource: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Io {
            resource: resource.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
