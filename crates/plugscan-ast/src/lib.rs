//! Static plugin discovery for Python package trees
//!
//! Python modules are never executed. They are parsed with ast-grep and their
//! top-level bindings are materialized as [`Value`]s by the [`ModuleLoader`],
//! which follows `from ... import` re-exports inside the search root. The
//! collectors then offer each member to a [`SpecResolver`]:
//!
//! - [`ModuleScanningCollector`] scans modules supplied by the caller
//! - [`PackageFinderCollector`] finds and imports every package under a root
//!   directory first
//!
//! Both implement [`PluginCollector`], so the entry point registry is one
//! call away.

pub mod extractor;
pub mod loader;
pub mod module;
pub mod package_finder;
pub mod resolver;
pub mod scanner;

pub use loader::{ImportError, ModuleLoader};
pub use module::{Call, ClassDef, Expr, FunctionDef, PythonModule, Symbol, Value};
pub use package_finder::{find_packages, PackageFinderCollector};
pub use resolver::{PluginSpecResolver, ResolveError, SpecResolver};
pub use scanner::{Candidate, ModuleScanningCollector};

use plugscan_registry::{EntryPointDict, PluginCollector, RegistryError};
use std::path::Path;

/// Entry point registry for every plugin in the packages under `root`
pub fn find_plugins(
    root: &Path,
    exclude: &[String],
    include: &[String],
) -> Result<EntryPointDict, RegistryError> {
    PackageFinderCollector::new(root, exclude.to_vec(), include.to_vec()).get_entry_points()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_plugins_groups_packages() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let files = [
            (
                "mod1/__init__.py",
                "def make_thing():\n    pass\n\nthing1 = PluginSpec('demo', 'thing1', make_thing)\n",
            ),
            (
                "mod2/__init__.py",
                "@plugin(namespace='demo', name='thing2')\ndef make_other():\n    pass\n",
            ),
            ("tests/__init__.py", "thing3 = PluginSpec('demo', 'thing3', make_thing)\n"),
        ];
        for (path, content) in files {
            let full = dir.path().join(path);
            let _ = fs::create_dir_all(full.parent().unwrap_or(dir.path()));
            let _ = fs::write(full, content);
        }

        let dict = find_plugins(
            dir.path(),
            &["tests".to_string()],
            &["*".to_string()],
        )
        .unwrap_or_default();
        assert_eq!(dict.len(), 1);
        assert_eq!(
            dict["demo"],
            vec!["thing1=mod1:make_thing", "thing2=mod2:make_other"]
        );
    }
}
