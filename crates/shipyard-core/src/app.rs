//! App definitions.
//!
//! An [`AppDefinition`] describes the app itself: its name, the group it
//! belongs to and the properties handed to the running process. Deployers
//! pass the properties through to the runtime as-is and never modify them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Immutable description of an app instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinition {
    name: String,
    group: Option<String>,
    #[serde(default)]
    properties: HashMap<String, String>,
}

impl AppDefinition {
    /// Create a definition from a name, optional group and properties.
    ///
    /// The properties are copied, so later changes to the caller's map are
    /// not observed by the definition.
    pub fn new<I, K, V>(name: impl Into<String>, group: Option<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            group,
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Create a definition with no group and no properties.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
            properties: HashMap::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Name of the app.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group this app instance belongs to, if any.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Properties passed into the running app.
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

impl fmt::Display for AppDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorted: BTreeMap<_, _> = self.properties.iter().collect();
        write!(
            f,
            "AppDefinition[name={}, group={}, properties={:?}]",
            self.name,
            self.group.as_deref().unwrap_or("null"),
            sorted
        )
    }
}
