//! Module-scanning plugin collector

use crate::module::{PythonModule, Value};
use crate::resolver::{PluginSpecResolver, ResolveError, SpecResolver};
use plugscan_registry::{PluginCollector, PluginSpec};
use std::sync::Arc;

/// A top-level member considered for resolution
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'m> {
    pub module: &'m PythonModule,
    pub name: &'m str,
    pub value: &'m Value,
}

/// Collects plugin specifications from the members of loaded modules
///
/// Every top-level member is offered to the resolver. Members the resolver
/// rejects are skipped without logging; use [`resolutions`](Self::resolutions)
/// to see why a member was not collected.
#[derive(Debug)]
pub struct ModuleScanningCollector<R = PluginSpecResolver> {
    modules: Vec<Arc<PythonModule>>,
    resolver: R,
}

impl ModuleScanningCollector {
    pub fn new(modules: Vec<Arc<PythonModule>>) -> Self {
        Self::with_resolver(modules, PluginSpecResolver::default())
    }
}

impl<R: SpecResolver> ModuleScanningCollector<R> {
    pub fn with_resolver(modules: Vec<Arc<PythonModule>>, resolver: R) -> Self {
        ModuleScanningCollector { modules, resolver }
    }

    pub fn modules(&self) -> &[Arc<PythonModule>] {
        &self.modules
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Members in module order, then alphabetical by name within a module
    pub fn candidates(&self) -> Vec<Candidate<'_>> {
        self.modules
            .iter()
            .flat_map(|module| {
                module.members().map(move |(name, value)| Candidate {
                    module: module.as_ref(),
                    name,
                    value,
                })
            })
            .collect()
    }

    pub fn try_resolve(&self, candidate: &Candidate<'_>) -> Result<PluginSpec, ResolveError> {
        self.resolver.resolve(candidate.value)
    }

    /// Every candidate together with its resolution outcome
    pub fn resolutions(&self) -> Vec<(Candidate<'_>, Result<PluginSpec, ResolveError>)> {
        self.candidates()
            .into_iter()
            .map(|candidate| {
                let result = self.try_resolve(&candidate);
                (candidate, result)
            })
            .collect()
    }
}

impl<R: SpecResolver> PluginCollector for ModuleScanningCollector<R> {
    fn collect_plugins(&self) -> Vec<PluginSpec> {
        self.candidates()
            .iter()
            .filter_map(|candidate| self.try_resolve(candidate).ok())
            .collect()
    }
}
