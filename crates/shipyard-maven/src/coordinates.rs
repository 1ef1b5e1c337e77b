//! Maven coordinates.
//!
//! Coordinates address an artifact as
//! `<groupId>:<artifactId>[:<extension>[:<classifier>]]:<version>`, the
//! Aether convention. The optional middle segment is disambiguated by a single
//! anchored pattern, never by counting colons.

use regex::Regex;
use serde::{Deserialize, Serialize};
use shipyard_core::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Extension used when none is given.
pub const DEFAULT_EXTENSION: &str = "jar";

/// An empty classifier means "no classifier".
pub const EMPTY_CLASSIFIER: &str = "";

// group:artifact[:extension[:classifier]]:version
static COORDINATES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:\s]+):([^:\s]+)(:([^:\s]*)(:([^:\s]+))?)?:([^:\s]+)$").unwrap()
});

/// Parsed, validated artifact coordinates.
///
/// Group, artifact, extension and version are never blank. The classifier
/// may be empty. No field contains `:` or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MavenCoordinates {
    group_id: String,
    artifact_id: String,
    extension: String,
    classifier: String,
    version: String,
}

impl MavenCoordinates {
    /// Create coordinates from individual fields.
    ///
    /// A `None` classifier is stored as [`EMPTY_CLASSIFIER`].
    pub fn new(
        group_id: &str,
        artifact_id: &str,
        extension: &str,
        classifier: Option<&str>,
        version: &str,
    ) -> Result<Self> {
        require_field(group_id, "groupId")?;
        require_field(artifact_id, "artifactId")?;
        require_field(extension, "extension")?;
        require_field(version, "version")?;

        let classifier = classifier.unwrap_or(EMPTY_CLASSIFIER);
        if !classifier.is_empty() {
            require_field(classifier, "classifier")?;
        }

        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            extension: extension.to_string(),
            classifier: classifier.to_string(),
            version: version.to_string(),
        })
    }

    pub fn builder() -> MavenCoordinatesBuilder {
        MavenCoordinatesBuilder::new()
    }

    /// Parse coordinates given as a colon delimited string.
    pub fn parse(coordinates: &str) -> Result<Self> {
        Error::require_text(coordinates, "coordinates")?;
        let caps = COORDINATES_REGEX
            .captures(coordinates)
            .ok_or_else(|| Error::InvalidFormat {
                input: coordinates.to_string(),
            })?;

        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
        let extension = match group(4) {
            "" => DEFAULT_EXTENSION,
            ext => ext,
        };

        Self::new(group(1), group(2), extension, Some(group(6)), group(7))
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn has_classifier(&self) -> bool {
        !self.classifier.is_empty()
    }

    /// File name of the artifact in a repository, e.g. `app-1.0-exec.jar`.
    pub fn file_name(&self) -> String {
        if self.has_classifier() {
            format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, self.classifier, self.extension
            )
        } else {
            format!("{}-{}.{}", self.artifact_id, self.version, self.extension)
        }
    }
}

/// Non-blank, with no `:` or whitespace so the canonical form parses back.
fn require_field(value: &str, field: &str) -> Result<()> {
    Error::require_text(value, field)?;
    if value.contains(|c: char| c == ':' || c.is_whitespace()) {
        return Err(Error::InvalidArgument(format!(
            "'{field}' cannot contain ':' or whitespace"
        )));
    }
    Ok(())
}

// Empty classifiers stay out of the hash; equality still compares them.
impl Hash for MavenCoordinates {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.artifact_id.hash(state);
        self.extension.hash(state);
        if self.has_classifier() {
            self.classifier.hash(state);
        }
        self.version.hash(state);
    }
}

/// Canonical form: `group:artifact:extension[:classifier]:version`.
impl fmt::Display for MavenCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_classifier() {
            write!(
                f,
                "{}:{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, self.classifier, self.version
            )
        } else {
            write!(
                f,
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, self.version
            )
        }
    }
}

impl std::str::FromStr for MavenCoordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MavenCoordinates {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<MavenCoordinates> for String {
    fn from(coordinates: MavenCoordinates) -> Self {
        coordinates.to_string()
    }
}

/// Builder for [`MavenCoordinates`].
#[derive(Debug, Clone)]
pub struct MavenCoordinatesBuilder {
    group_id: String,
    artifact_id: String,
    extension: String,
    classifier: String,
    version: String,
}

impl MavenCoordinatesBuilder {
    pub fn new() -> Self {
        Self {
            group_id: String::new(),
            artifact_id: String::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            classifier: EMPTY_CLASSIFIER.to_string(),
            version: String::new(),
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn with_artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = artifact_id.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Validate and build the coordinates.
    pub fn build(self) -> Result<MavenCoordinates> {
        MavenCoordinates::new(
            &self.group_id,
            &self.artifact_id,
            &self.extension,
            Some(self.classifier.as_str()),
            &self.version,
        )
    }
}

impl Default for MavenCoordinatesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
