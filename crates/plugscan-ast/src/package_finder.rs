//! Package discovery and the package-finder collector
//!
//! [`find_packages`] follows setuptools' `find_packages` rules: a package is a
//! directory without a `.` in its name that holds an `__init__.py`, names are
//! dotted paths relative to the root, and `include`/`exclude` are
//! fnmatch-style patterns over those dotted names.

use crate::loader::{ImportError, ModuleLoader};
use crate::resolver::{PluginSpecResolver, SpecResolver};
use crate::scanner::ModuleScanningCollector;
use plugscan_registry::{PluginCollector, PluginSpec};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};
use wildmatch::WildMatch;

/// Patterns that are never reported as packages
pub const ALWAYS_EXCLUDE: &[&str] = &["ez_setup", "*__pycache__"];

fn is_package_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && !entry.file_name().to_string_lossy().contains('.')
        && entry.path().join("__init__.py").is_file()
}

fn package_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("."))
}

/// Dotted names of all packages under `root`
///
/// Packages are reported depth-first with siblings in file-name order. A
/// package excluded by `pkg*` or `pkg.*` is not descended into; packages
/// excluded by any other pattern still have their subpackages considered.
pub fn find_packages(root: &Path, exclude: &[String], include: &[String]) -> Vec<String> {
    let include_patterns: Vec<WildMatch> = include.iter().map(|p| WildMatch::new(p)).collect();
    let exclude_patterns: Vec<WildMatch> = exclude
        .iter()
        .map(String::as_str)
        .chain(ALWAYS_EXCLUDE.iter().copied())
        .map(WildMatch::new)
        .collect();

    let mut packages = Vec::new();
    let mut walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || is_package_dir(entry));

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let Some(package) = package_name(root, entry.path()) else {
            continue;
        };

        let included = include_patterns.iter().any(|p| p.matches(&package));
        let excluded = exclude_patterns.iter().any(|p| p.matches(&package));
        if included && !excluded {
            packages.push(package.clone());
        }

        let prune = [format!("{}*", package), format!("{}.*", package)];
        if exclude.iter().any(|pattern| prune.contains(pattern)) {
            debug!("Not descending into excluded package {}", package);
            walker.skip_current_dir();
        }
    }

    packages
}

/// Collects plugins from every package found under a root directory
///
/// Packages are imported once, at construction. Packages that fail to import
/// are logged, recorded in [`import_errors`](Self::import_errors) and skipped.
/// Only package initializers are scanned; plugins in sibling modules are
/// found when the package re-exports them.
#[derive(Debug)]
pub struct PackageFinderCollector<R = PluginSpecResolver> {
    root: PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
    packages: Vec<String>,
    import_errors: Vec<(String, ImportError)>,
    scanner: ModuleScanningCollector<R>,
}

impl PackageFinderCollector {
    pub fn new(root: impl Into<PathBuf>, exclude: Vec<String>, include: Vec<String>) -> Self {
        Self::with_resolver(root, exclude, include, PluginSpecResolver::default())
    }
}

impl<R: SpecResolver> PackageFinderCollector<R> {
    pub fn with_resolver(
        root: impl Into<PathBuf>,
        exclude: Vec<String>,
        include: Vec<String>,
        resolver: R,
    ) -> Self {
        let root = root.into();
        let packages = find_packages(&root, &exclude, &include);
        info!(
            "Found {} package(s) under {}",
            packages.len(),
            root.display()
        );

        let mut loader = ModuleLoader::new(&root);
        let mut modules = Vec::new();
        let mut import_errors = Vec::new();
        for package in &packages {
            match loader.import_module(package) {
                Ok(module) => modules.push(module),
                Err(e) => {
                    warn!("Error while importing package {}: {}", package, e);
                    import_errors.push((package.clone(), e));
                }
            }
        }

        PackageFinderCollector {
            root,
            include,
            exclude,
            packages,
            import_errors,
            scanner: ModuleScanningCollector::with_resolver(modules, resolver),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Discovered package names, including those that failed to import
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn import_errors(&self) -> &[(String, ImportError)] {
        &self.import_errors
    }

    pub fn scanner(&self) -> &ModuleScanningCollector<R> {
        &self.scanner
    }
}

impl<R: SpecResolver> PluginCollector for PackageFinderCollector<R> {
    fn collect_plugins(&self) -> Vec<PluginSpec> {
        self.scanner.collect_plugins()
    }
}
