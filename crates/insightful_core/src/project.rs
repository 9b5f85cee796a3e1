//! Project identifiers and their display names.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A project the export runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_more::Display)]
#[display("{} ({})", name, id)]
pub struct Project {
    id: String,
    name: String,
}

impl Project {
    /// Create a project from its identifier and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Mapping from project identifiers to human-readable names.
///
/// The mapping is supplied externally (configuration); lookups for unknown
/// identifiers fall back to the identifier itself.
///
/// # Examples
///
/// ```
/// use insightful_core::ProjectDirectory;
///
/// let directory = ProjectDirectory::from_iter([("p-1", "Guppy"), ("p-2", "Delta")]);
///
/// assert_eq!(directory.name_for("p-1"), "Guppy");
/// assert_eq!(directory.name_for("p-9"), "p-9");
/// assert_eq!(directory.find_by_name("delta").unwrap().id(), "p-2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectDirectory {
    names: BTreeMap<String, String>,
}

impl ProjectDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name for `id`, or `id` itself when it is not mapped.
    pub fn name_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Whether `id` has a mapped name.
    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    /// Look up a project by display name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<Project> {
        let wanted = name.to_lowercase();
        self.names
            .iter()
            .find(|(_, n)| n.to_lowercase() == wanted)
            .map(|(id, n)| Project::new(id.clone(), n.clone()))
    }

    /// Build a [`Project`] for `id`, naming it through the directory.
    pub fn resolve(&self, id: &str) -> Project {
        Project::new(id, self.name_for(id))
    }

    /// All mapped projects, sorted by display name.
    pub fn projects(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .names
            .iter()
            .map(|(id, name)| Project::new(id.clone(), name.clone()))
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        projects
    }

    /// Number of mapped projects.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no projects are mapped.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ProjectDirectory
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
