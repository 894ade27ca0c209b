//! Static module loading
//!
//! [`ModuleLoader`] is the import machinery: it maps dotted module names to
//! files under a search root, extracts their top-level statements and binds
//! them into [`PythonModule`]s. `from ... import` statements that target the
//! search root are followed so re-exported members keep the identity of the
//! module that defines them.

use crate::extractor::{ImportSource, ImportedName, SourceExtractor, Statement};
use crate::module::{ClassDef, Expr, FunctionDef, PythonModule, Symbol, Value};
use plugscan_registry::types::is_identifier;
use plugscan_registry::FactoryKind;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Why a module could not be imported
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No module named '{0}'")]
    NotFound(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid syntax in '{module}' at line {line}")]
    Syntax { module: String, line: usize },

    #[error("Attempted relative import beyond top-level package in '{0}'")]
    BeyondTopLevel(String),

    #[error("Cannot import name '{name}' from '{module}'")]
    MissingName { module: String, name: String },

    #[error("Circular import of '{0}'")]
    Cycle(String),
}

/// Loads Python modules from a search root
///
/// Loaded modules are cached, so importing the same name twice returns the
/// same [`Arc`].
#[derive(Debug)]
pub struct ModuleLoader {
    search_root: PathBuf,
    cache: HashMap<String, Arc<PythonModule>>,
    loading: HashSet<String>,
}

impl ModuleLoader {
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        ModuleLoader {
            search_root: search_root.into(),
            cache: HashMap::new(),
            loading: HashSet::new(),
        }
    }

    pub fn search_root(&self) -> &Path {
        &self.search_root
    }

    /// Import a module by dotted name, loading parent packages first
    pub fn import_module(&mut self, name: &str) -> Result<Arc<PythonModule>, ImportError> {
        if let Some(module) = self.cache.get(name) {
            return Ok(Arc::clone(module));
        }
        if self.loading.contains(name) {
            return Err(ImportError::Cycle(name.to_string()));
        }

        if let Some((parent, _)) = name.rsplit_once('.') {
            match self.import_module(parent) {
                Ok(_) | Err(ImportError::Cycle(_)) => {}
                // implicit namespace package
                Err(ImportError::NotFound(_)) if self.module_dir(parent).is_dir() => {}
                Err(e) => return Err(e),
            }
        }

        let (path, is_package) = self
            .locate(name)
            .ok_or_else(|| ImportError::NotFound(name.to_string()))?;
        let content = std::fs::read_to_string(&path).map_err(|source| ImportError::Io {
            path: path.clone(),
            source,
        })?;

        self.load(name, path, is_package, &content)
    }

    /// Load a module from source text instead of the search root
    ///
    /// Imports inside `content` are still resolved against the search root.
    pub fn load_source(
        &mut self,
        name: &str,
        content: &str,
    ) -> Result<Arc<PythonModule>, ImportError> {
        let path = PathBuf::from(format!("<{}>", name));
        self.load(name, path, false, content)
    }

    fn load(
        &mut self,
        name: &str,
        path: PathBuf,
        is_package: bool,
        content: &str,
    ) -> Result<Arc<PythonModule>, ImportError> {
        let statements = SourceExtractor::new(name)
            .extract(content)
            .map_err(|e| ImportError::Syntax {
                module: name.to_string(),
                line: e.line,
            })?;

        self.loading.insert(name.to_string());
        let mut module = PythonModule::new(name.to_string(), path, is_package);
        let result = statements
            .into_iter()
            .try_for_each(|statement| self.bind_statement(&mut module, statement));
        self.loading.remove(name);
        result?;

        debug!(
            "Loaded module {} ({} member(s)) from {}",
            name,
            module.len(),
            module.path().display()
        );
        let module = Arc::new(module);
        self.cache.insert(name.to_string(), Arc::clone(&module));
        Ok(module)
    }

    fn module_dir(&self, name: &str) -> PathBuf {
        let mut dir = self.search_root.clone();
        dir.extend(name.split('.'));
        dir
    }

    /// Source file for a dotted name: `a/b/__init__.py` wins over `a/b.py`
    fn locate(&self, name: &str) -> Option<(PathBuf, bool)> {
        if name.is_empty() || !name.split('.').all(is_identifier) {
            return None;
        }

        let dir = self.module_dir(name);
        let init = dir.join("__init__.py");
        if init.is_file() {
            return Some((init, true));
        }

        let file = dir.with_extension("py");
        file.is_file().then_some((file, false))
    }

    /// Whether the top-level package of `name` lives under the search root
    fn is_local(&self, name: &str) -> bool {
        let top = name.split('.').next().unwrap_or(name);
        self.locate(top).is_some() || self.module_dir(top).is_dir()
    }

    fn bind_statement(
        &mut self,
        module: &mut PythonModule,
        statement: Statement,
    ) -> Result<(), ImportError> {
        match statement {
            Statement::Class { name, bases, body } => {
                let class = self.build_class(module, name, bases, body);
                module.bind(class.name.clone(), Value::Class(class));
            }
            Statement::Function { name, decorators } => {
                let decorators = decorators
                    .into_iter()
                    .map(|d| self.resolve_expr(module, d))
                    .collect();
                let function = FunctionDef {
                    module: module.name().to_string(),
                    name: name.clone(),
                    decorators,
                };
                module.bind(name, Value::Function(function));
            }
            Statement::Assign { targets, value } => {
                let Some(value) = value else {
                    return Ok(());
                };
                // `alias = existing` shares whatever `existing` is bound to
                let value = match &value {
                    Expr::Name(bound) => module.get(bound).cloned(),
                    _ => None,
                }
                .unwrap_or_else(|| Value::Expr(self.resolve_expr(module, value)));
                for target in targets {
                    module.bind(target, value.clone());
                }
            }
            Statement::Import { module: target, alias } => {
                self.import_for_binding(&target)?;
                match alias {
                    Some(alias) => module.bind(alias, Value::Module(target)),
                    None => {
                        let top = target.split('.').next().unwrap_or(&target).to_string();
                        module.bind(top.clone(), Value::Module(top));
                    }
                }
            }
            Statement::ImportFrom { source, names } => {
                let target = resolve_import_source(module, &source)?;
                for imported in names {
                    match imported {
                        ImportedName::Wildcard => self.bind_wildcard(module, &target, &source)?,
                        ImportedName::Name { name, alias } => {
                            let value = self.import_name(&target, &name, &source)?;
                            module.bind(alias.unwrap_or(name), value);
                        }
                    }
                }
            }
            Statement::Try { body, fallback } => {
                for statement in body {
                    if let Err(e) = self.bind_statement(module, statement) {
                        debug!("Import guarded by try in {} failed: {}", module.name(), e);
                        for statement in fallback {
                            self.bind_statement(module, statement)?;
                        }
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// `import a.b` loads in-root modules; anything else is left to the runtime
    fn import_for_binding(&mut self, target: &str) -> Result<(), ImportError> {
        match self.import_module(target) {
            Ok(_) | Err(ImportError::Cycle(_)) => Ok(()),
            Err(ImportError::NotFound(_)) if !self.is_local(target) => {
                trace!("Module {} is outside the search root", target);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn import_name(
        &mut self,
        target: &str,
        name: &str,
        source: &ImportSource,
    ) -> Result<Value, ImportError> {
        let submodule = format!("{}.{}", target, name);
        match self.import_module(target) {
            Ok(loaded) => {
                if let Some(value) = loaded.get(name) {
                    return Ok(value.clone());
                }
                if self.locate(&submodule).is_some() {
                    self.import_for_binding(&submodule)?;
                    return Ok(Value::Module(submodule));
                }
                Err(ImportError::MissingName {
                    module: target.to_string(),
                    name: name.to_string(),
                })
            }
            Err(ImportError::Cycle(_)) => {
                if self.locate(&submodule).is_some() {
                    self.import_for_binding(&submodule)?;
                    Ok(Value::Module(submodule))
                } else {
                    Ok(Value::Imported(Symbol::new(target, name, FactoryKind::Other)))
                }
            }
            Err(ImportError::NotFound(_)) if source.level == 0 && !self.is_local(target) => {
                Ok(Value::Imported(Symbol::new(target, name, FactoryKind::Other)))
            }
            Err(e) => Err(e),
        }
    }

    fn bind_wildcard(
        &mut self,
        module: &mut PythonModule,
        target: &str,
        source: &ImportSource,
    ) -> Result<(), ImportError> {
        match self.import_module(target) {
            Ok(loaded) => {
                if let Some(exported) = exported_names(&loaded) {
                    for name in exported {
                        let value = self.import_name(target, &name, source)?;
                        module.bind(name, value);
                    }
                    return Ok(());
                }
                for (name, value) in loaded.members().filter(|(name, _)| !name.starts_with('_')) {
                    module.bind(name.to_string(), value.clone());
                }
                Ok(())
            }
            Err(ImportError::Cycle(_)) => Ok(()),
            Err(ImportError::NotFound(_)) if source.level == 0 && !self.is_local(target) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn build_class(
        &self,
        module: &PythonModule,
        name: String,
        bases: Vec<Expr>,
        body: Vec<(String, Expr)>,
    ) -> ClassDef {
        let bases: Vec<Expr> = bases
            .into_iter()
            .map(|base| self.resolve_expr(module, base))
            .collect();

        let mut ancestors: Vec<String> = Vec::new();
        let mut attributes = BTreeMap::new();
        let known_bases: Vec<Option<ClassDef>> = bases
            .iter()
            .map(|base| self.known_class(module, base))
            .collect();

        for (base, known) in bases.iter().zip(&known_bases) {
            let names = base
                .terminal_name()
                .map(str::to_string)
                .into_iter()
                .chain(known.iter().flat_map(|class| class.ancestors.iter().cloned()));
            for ancestor in names {
                if !ancestors.contains(&ancestor) {
                    ancestors.push(ancestor);
                }
            }
        }
        // earlier bases take precedence, own attributes override everything
        for known in known_bases.iter().rev().flatten() {
            attributes.extend(known.attributes.clone());
        }
        for (attribute, value) in body {
            let value = self.resolve_expr(module, value);
            attributes.insert(attribute, value);
        }

        ClassDef {
            module: module.name().to_string(),
            name,
            ancestors,
            attributes,
        }
    }

    fn known_class(&self, module: &PythonModule, base: &Expr) -> Option<ClassDef> {
        let Expr::Ref(symbol) = base else {
            return None;
        };
        let value = if symbol.module == module.name() {
            module.get(&symbol.name)
        } else {
            self.cache.get(&symbol.module)?.get(&symbol.name)
        };
        match value {
            Some(Value::Class(class)) => Some(class.clone()),
            _ => None,
        }
    }

    /// Bind names and `module.attr` paths to the definitions they refer to
    fn resolve_expr(&self, module: &PythonModule, expr: Expr) -> Expr {
        match expr {
            Expr::Name(name) => match module.get(&name).and_then(Value::as_symbol) {
                Some(symbol) => Expr::Ref(symbol),
                None => Expr::Name(name),
            },
            Expr::Attribute(parts) => self.resolve_attribute(module, parts),
            Expr::Call(mut call) => {
                call.func = Box::new(self.resolve_expr(module, *call.func));
                call.args = call
                    .args
                    .into_iter()
                    .map(|arg| self.resolve_expr(module, arg))
                    .collect();
                call.kwargs = call
                    .kwargs
                    .into_iter()
                    .map(|(key, value)| (key, self.resolve_expr(module, value)))
                    .collect();
                Expr::Call(call)
            }
            other => other,
        }
    }

    fn resolve_attribute(&self, module: &PythonModule, parts: Vec<String>) -> Expr {
        if parts.len() < 2 {
            return Expr::Attribute(parts);
        }
        let (head, attribute) = (&parts[0], &parts[parts.len() - 1]);
        let Some(Value::Module(bound)) = module.get(head) else {
            return Expr::Attribute(parts);
        };

        let mut path = vec![bound.as_str()];
        path.extend(parts[1..parts.len() - 1].iter().map(String::as_str));
        let module_path = path.join(".");

        if let Some(target) = self.cache.get(&module_path) {
            return match target.get(attribute).and_then(Value::as_symbol) {
                Some(symbol) => Expr::Ref(symbol),
                None => Expr::Attribute(parts),
            };
        }
        if self.is_local(&module_path) {
            return Expr::Attribute(parts);
        }
        Expr::Ref(Symbol::new(module_path, attribute.as_str(), FactoryKind::Other))
    }
}

/// Absolute module targeted by a `from` import inside `module`
fn resolve_import_source(
    module: &PythonModule,
    source: &ImportSource,
) -> Result<String, ImportError> {
    if source.level == 0 {
        return Ok(source.module.clone().unwrap_or_default());
    }

    let package = if module.is_package() {
        module.name()
    } else {
        module.name().rsplit_once('.').map_or("", |(parent, _)| parent)
    };
    let mut parts: Vec<&str> = package.split('.').filter(|p| !p.is_empty()).collect();
    if source.level > parts.len() {
        return Err(ImportError::BeyondTopLevel(module.name().to_string()));
    }
    parts.truncate(parts.len() + 1 - source.level);

    if let Some(rest) = &source.module {
        parts.push(rest);
    }
    Ok(parts.join("."))
}

/// Names listed in a literal `__all__`, which limits what `*` imports
fn exported_names(module: &PythonModule) -> Option<Vec<String>> {
    let Some(Value::Expr(Expr::Sequence(items))) = module.get("__all__") else {
        return None;
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(full, content);
        }
        dir
    }

    fn import(loader: &mut ModuleLoader, name: &str) -> Arc<PythonModule> {
        loader
            .import_module(name)
            .unwrap_or_else(|e| panic!("import {name}: {e}"))
    }

    #[test]
    fn test_reexport_keeps_defining_module() {
        let dir = tree(&[
            ("pkg/__init__.py", "from .impl import make_thing, Thing\n"),
            (
                "pkg/impl.py",
                "def make_thing():\n    pass\n\nclass Thing:\n    pass\n",
            ),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        let pkg = import(&mut loader, "pkg");

        assert!(pkg.is_package());
        let Some(Value::Function(function)) = pkg.get("make_thing") else {
            panic!("make_thing not re-exported: {:?}", pkg.get("make_thing"));
        };
        assert_eq!(function.module, "pkg.impl");
        let Some(Value::Class(class)) = pkg.get("Thing") else {
            panic!("Thing not re-exported");
        };
        assert_eq!(class.module, "pkg.impl");
    }

    #[test]
    fn test_import_is_cached() {
        let dir = tree(&[("solo.py", "x = 1\n")]);
        let mut loader = ModuleLoader::new(dir.path());
        let first = import(&mut loader, "solo");
        let second = import(&mut loader, "solo");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!first.is_package());
    }

    #[test]
    fn test_external_imports_are_opaque() {
        let dir = tree(&[(
            "mod1.py",
            "import os\nfrom framework.core import PluginSpec as Spec\nspec = Spec('ns', 'n', os.path.join)\n",
        )]);
        let mut loader = ModuleLoader::new(dir.path());
        let module = import(&mut loader, "mod1");

        assert_eq!(module.get("os"), Some(&Value::Module("os".to_string())));
        assert_eq!(
            module.get("Spec"),
            Some(&Value::Imported(Symbol::new(
                "framework.core",
                "PluginSpec",
                FactoryKind::Other
            )))
        );
        let Some(Value::Expr(Expr::Call(call))) = module.get("spec") else {
            panic!("spec is not a call");
        };
        assert_eq!(call.callee_name(), Some("PluginSpec"));
        assert_eq!(
            call.args.get(2),
            Some(&Expr::Ref(Symbol::new("os.path", "join", FactoryKind::Other)))
        );
    }

    #[test]
    fn test_module_attribute_reference_resolves() {
        let dir = tree(&[
            ("pkg/__init__.py", ""),
            ("pkg/impl.py", "def make_thing():\n    pass\n"),
            (
                "mod2.py",
                "import pkg.impl\nimport pkg.impl as impl\nspec = PluginSpec('ns', 'a', pkg.impl.make_thing)\nother = PluginSpec('ns', 'b', factory=impl.make_thing)\n",
            ),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        let module = import(&mut loader, "mod2");
        let expected = Expr::Ref(Symbol::new("pkg.impl", "make_thing", FactoryKind::Function));

        let Some(Value::Expr(Expr::Call(call))) = module.get("spec") else {
            panic!("spec is not a call");
        };
        assert_eq!(call.args.get(2), Some(&expected));
        let Some(Value::Expr(Expr::Call(call))) = module.get("other") else {
            panic!("other is not a call");
        };
        assert_eq!(call.argument("factory", 2), Some(&expected));
    }

    #[test]
    fn test_class_inherits_ancestors_and_attributes() {
        let dir = tree(&[
            ("app/__init__.py", "from .providers import S3Provider\n"),
            (
                "app/base.py",
                "class Plugin:\n    pass\n\nclass Provider(Plugin):\n    namespace = 'demo.providers'\n    name = 'base'\n",
            ),
            (
                "app/providers.py",
                "from .base import Provider\n\nclass S3Provider(Provider):\n    name = 's3'\n",
            ),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        let app = import(&mut loader, "app");

        let Some(Value::Class(class)) = app.get("S3Provider") else {
            panic!("S3Provider missing");
        };
        assert_eq!(class.module, "app.providers");
        assert_eq!(class.ancestors, vec!["Provider", "Plugin"]);
        assert_eq!(
            class.attributes.get("namespace"),
            Some(&Expr::Str("demo.providers".to_string()))
        );
        assert_eq!(
            class.attributes.get("name"),
            Some(&Expr::Str("s3".to_string()))
        );
    }

    #[test]
    fn test_from_package_import_submodule() {
        let dir = tree(&[
            ("pkg/__init__.py", ""),
            ("pkg/tools.py", "def helper():\n    pass\n"),
            ("pkg/user.py", "from . import tools\nfrom .tools import *\n"),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        let user = import(&mut loader, "pkg.user");

        assert_eq!(
            user.get("tools"),
            Some(&Value::Module("pkg.tools".to_string()))
        );
        assert!(matches!(user.get("helper"), Some(Value::Function(_))));
    }

    #[test]
    fn test_wildcard_honors_all() {
        let dir = tree(&[
            ("pkg/__init__.py", "from .impl import *\nfrom .loose import *\n"),
            (
                "pkg/impl.py",
                "__all__ = ['public']\n\ndef public():\n    pass\n\nclass Hidden(Plugin):\n    namespace = 'demo'\n    name = 'hidden'\n",
            ),
            (
                "pkg/loose.py",
                "__all__ = BASE + ['extra']\n\ndef extra():\n    pass\n\ndef _private():\n    pass\n",
            ),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        let pkg = import(&mut loader, "pkg");

        assert!(matches!(pkg.get("public"), Some(Value::Function(_))));
        assert!(pkg.get("Hidden").is_none());
        // a computed `__all__` falls back to the public names
        assert!(matches!(pkg.get("extra"), Some(Value::Function(_))));
        assert!(pkg.get("_private").is_none());
    }

    #[test]
    fn test_wildcard_all_naming_missing_member_fails() {
        let dir = tree(&[
            ("pkg/__init__.py", "from .impl import *\n"),
            ("pkg/impl.py", "__all__ = ('gone',)\n"),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        assert!(matches!(
            loader.import_module("pkg"),
            Err(ImportError::MissingName { ref name, .. }) if name == "gone"
        ));
    }

    #[test]
    fn test_bindings_inside_if_and_try_blocks() {
        let dir = tree(&[
            (
                "pkg/__init__.py",
                r#"
try:
    from .impl import make
except ImportError:
    make = None

try:
    from .speedups import fast
except ImportError:
    from .impl import make as fast

spec = PluginSpec('demo', 'thing', make)

if True:
    class Guarded(Plugin):
        namespace = 'demo'
        name = 'guarded'
"#,
            ),
            ("pkg/impl.py", "def make():\n    pass\n"),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        let pkg = import(&mut loader, "pkg");

        let Some(Value::Function(make)) = pkg.get("make") else {
            panic!("make not bound from the try body: {:?}", pkg.get("make"));
        };
        assert_eq!(make.module, "pkg.impl");
        let Some(Value::Function(fast)) = pkg.get("fast") else {
            panic!("fast not bound from the except handler: {:?}", pkg.get("fast"));
        };
        assert_eq!(fast.name, "make");
        let Some(Value::Expr(Expr::Call(call))) = pkg.get("spec") else {
            panic!("spec is not a call");
        };
        assert_eq!(
            call.argument("factory", 2),
            Some(&Expr::Ref(Symbol::new("pkg.impl", "make", FactoryKind::Function)))
        );
        let Some(Value::Class(guarded)) = pkg.get("Guarded") else {
            panic!("Guarded not bound from the if block");
        };
        assert_eq!(guarded.ancestors, vec!["Plugin"]);
    }

    #[test]
    fn test_import_failures() {
        let dir = tree(&[
            ("broken.py", "oops = 1\n)))\n"),
            ("top.py", "from . import sibling\n"),
            ("pkg/__init__.py", "from .missing import thing\n"),
            ("names/__init__.py", "from .impl import nope\n"),
            ("names/impl.py", "x = 1\n"),
            ("uses_broken.py", "from broken import oops\n"),
        ]);
        let mut loader = ModuleLoader::new(dir.path());

        assert!(matches!(
            loader.import_module("broken"),
            Err(ImportError::Syntax { .. })
        ));
        assert!(matches!(
            loader.import_module("top"),
            Err(ImportError::BeyondTopLevel(_))
        ));
        assert!(matches!(
            loader.import_module("pkg"),
            Err(ImportError::NotFound(name)) if name == "pkg.missing"
        ));
        assert!(matches!(
            loader.import_module("names"),
            Err(ImportError::MissingName { .. })
        ));
        assert!(matches!(
            loader.import_module("uses_broken"),
            Err(ImportError::Syntax { .. })
        ));
        assert!(matches!(
            loader.import_module("absent"),
            Err(ImportError::NotFound(_))
        ));
    }

    #[test]
    fn test_import_cycle_degrades_to_opaque_symbol() {
        let dir = tree(&[
            ("ring/__init__.py", "from .a import first\n"),
            ("ring/a.py", "from .b import second\ndef first():\n    pass\n"),
            ("ring/b.py", "from .a import first\ndef second():\n    pass\n"),
        ]);
        let mut loader = ModuleLoader::new(dir.path());
        let ring = import(&mut loader, "ring");

        assert!(matches!(ring.get("first"), Some(Value::Function(_))));
        let b = import(&mut loader, "ring.b");
        assert_eq!(
            b.get("first"),
            Some(&Value::Imported(Symbol::new("ring.a", "first", FactoryKind::Other)))
        );
    }

    #[test]
    fn test_load_source_and_aliases() {
        let mut loader = ModuleLoader::new(".");
        let module = loader
            .load_source(
                "inline",
                "def make():\n    pass\nalias = make\nlabel: str = 'x'\nbare: int\n",
            )
            .unwrap_or_else(|e| panic!("load: {e}"));

        assert!(matches!(module.get("alias"), Some(Value::Function(f)) if f.name == "make"));
        assert_eq!(
            module.get("label"),
            Some(&Value::Expr(Expr::Str("x".to_string())))
        );
        assert!(module.get("bare").is_none());
    }

    #[test]
    fn test_resolve_import_source_levels() {
        let package = PythonModule::new("a.b".to_string(), PathBuf::new(), true);
        let leaf = PythonModule::new("a.b.c".to_string(), PathBuf::new(), false);
        let source = |level, module: Option<&str>| ImportSource {
            level,
            module: module.map(str::to_string),
        };

        assert_eq!(
            resolve_import_source(&package, &source(1, Some("x"))).ok(),
            Some("a.b.x".to_string())
        );
        assert_eq!(
            resolve_import_source(&leaf, &source(1, None)).ok(),
            Some("a.b".to_string())
        );
        assert_eq!(
            resolve_import_source(&leaf, &source(2, Some("y"))).ok(),
            Some("a.y".to_string())
        );
        assert!(matches!(
            resolve_import_source(&leaf, &source(3, None)),
            Err(ImportError::BeyondTopLevel(_))
        ));
    }
}
