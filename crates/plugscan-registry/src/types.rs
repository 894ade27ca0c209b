//! Plugin specification types
//!
//! A [`PluginSpec`] is the canonical description of one discovered plugin:
//! the namespace (entry point group) it registers under, its name within that
//! namespace and a reference to the factory that creates it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of Python object a factory reference points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactoryKind {
    Class,
    Function,
    /// Imported from outside the scanned tree; its shape is unknown
    #[default]
    Other,
}

/// Reference to a factory by declaring module and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactoryRef {
    /// Dotted module path (e.g., "my_pkg.plugins")
    pub module: String,
    /// Name of the class or function inside `module`
    pub name: String,
    #[serde(default)]
    pub kind: FactoryKind,
}

impl FactoryRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>, kind: FactoryKind) -> Self {
        FactoryRef {
            module: module.into(),
            name: name.into(),
            kind,
        }
    }

    /// Locator string `module:name`
    pub fn locator(&self) -> String {
        format!("{}:{}", self.module, self.name)
    }

    /// Whether a downstream loader can import this reference again
    ///
    /// The module must be a dotted path of identifiers and the name a single
    /// identifier; anonymous factories such as `<lambda>` fail this check.
    pub fn is_resolvable(&self) -> bool {
        !self.module.is_empty()
            && self.module.split('.').all(is_identifier)
            && is_identifier(&self.name)
    }
}

impl fmt::Display for FactoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.name)
    }
}

/// Check whether `s` is a Python identifier
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// A resolved plugin specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginSpec {
    pub namespace: String,
    pub name: String,
    pub factory: FactoryRef,
}

impl PluginSpec {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, factory: FactoryRef) -> Self {
        PluginSpec {
            namespace: namespace.into(),
            name: name.into(),
            factory,
        }
    }
}

impl fmt::Display for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} -> {}", self.namespace, self.name, self.factory)
    }
}
