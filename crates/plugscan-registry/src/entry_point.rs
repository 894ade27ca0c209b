//! Entry descriptors and the grouped entry point registry

use crate::errors::RegistryError;
use crate::types::PluginSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry point registry: group -> ordered `"name=module:attr"` strings
///
/// Groups are kept sorted so rendered registries are stable across runs;
/// entries within a group keep discovery order.
pub type EntryPointDict = BTreeMap<String, Vec<String>>;

/// A single entry point before grouping
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPoint {
    pub name: String,
    /// Locator in `module:attr` form
    pub value: String,
    pub group: String,
}

impl EntryPoint {
    /// Formatted `name=value` registry line
    pub fn line(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Group entry points by their group, preserving relative order
pub fn to_entry_point_dict(entry_points: &[EntryPoint]) -> EntryPointDict {
    let mut result = EntryPointDict::new();
    for ep in entry_points {
        result.entry(ep.group.clone()).or_default().push(ep.line());
    }
    result
}

/// Convert a plugin specification into an entry point
///
/// Fails when the factory cannot be addressed by a downstream loader.
pub fn spec_to_entry_point(spec: &PluginSpec) -> Result<EntryPoint, RegistryError> {
    let value = spec.factory.locator();
    if !spec.factory.is_resolvable() {
        return Err(RegistryError::UnresolvableFactory {
            namespace: spec.namespace.clone(),
            name: spec.name.clone(),
            locator: value,
        });
    }

    Ok(EntryPoint {
        name: spec.name.clone(),
        value,
        group: spec.namespace.clone(),
    })
}
