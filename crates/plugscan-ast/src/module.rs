//! Loaded Python modules and their top-level members
//!
//! A [`PythonModule`] is the static counterpart of an imported module object:
//! its top-level bindings are materialized as [`Value`]s, with references to
//! classes and functions already resolved to the module that defines them.

use plugscan_registry::FactoryKind;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A reference to a named object in some module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub module: String,
    pub name: String,
    pub kind: FactoryKind,
}

impl Symbol {
    pub fn new(module: impl Into<String>, name: impl Into<String>, kind: FactoryKind) -> Self {
        Symbol {
            module: module.into(),
            name: name.into(),
            kind,
        }
    }
}

/// A call expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub kwargs: Vec<(String, Expr)>,
}

impl Call {
    /// Last path component of the callee (`PluginSpec` for `framework.PluginSpec(...)`)
    pub fn callee_name(&self) -> Option<&str> {
        self.func.terminal_name()
    }

    /// Argument by keyword, falling back to position
    pub fn argument(&self, keyword: &str, position: usize) -> Option<&Expr> {
        self.kwargs
            .iter()
            .find(|(name, _)| name == keyword)
            .map(|(_, value)| value)
            .or_else(|| self.args.get(position))
    }
}

/// A (partially evaluated) Python expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// String literal, already unquoted
    Str(String),
    /// Identifier that is not bound to a known class or function
    Name(String),
    /// Dotted access that could not be resolved (`a.b.c`)
    Attribute(Vec<String>),
    /// Identifier or dotted access resolved to a definition
    Ref(Symbol),
    Call(Call),
    /// Anonymous function defined in the given module
    Lambda(String),
    /// List or tuple literal
    Sequence(Vec<Expr>),
    /// Anything else, kept as source text
    Other(String),
}

impl Expr {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn terminal_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            Expr::Attribute(parts) => parts.last().map(String::as_str),
            Expr::Ref(symbol) => Some(&symbol.name),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Str(s) => write!(f, "{:?}", s),
            Expr::Name(name) => f.write_str(name),
            Expr::Attribute(parts) => f.write_str(&parts.join(".")),
            Expr::Ref(symbol) => write!(f, "{}.{}", symbol.module, symbol.name),
            Expr::Call(call) => write!(f, "{}(...)", call.func),
            Expr::Lambda(_) => f.write_str("<lambda>"),
            Expr::Sequence(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Expr::Other(text) => f.write_str(text),
        }
    }
}

/// A top-level class definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Module the class is defined in
    pub module: String,
    pub name: String,
    /// Names of every known base class, nearest first
    pub ancestors: Vec<String>,
    /// Class-level assignments, including those inherited from known bases
    pub attributes: BTreeMap<String, Expr>,
}

/// A top-level function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Module the function is defined in
    pub module: String,
    pub name: String,
    pub decorators: Vec<Expr>,
}

/// Value bound to a top-level name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Class(ClassDef),
    Function(FunctionDef),
    /// Right-hand side of an assignment
    Expr(Expr),
    /// A module object (`import a.b`, `from . import sub`)
    Module(String),
    /// Imported from outside the search root; nothing is known about it
    Imported(Symbol),
}

impl Value {
    /// Short description used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Value::Class(class) => format!("class {}.{}", class.module, class.name),
            Value::Function(func) => format!("function {}.{}", func.module, func.name),
            Value::Expr(Expr::Call(call)) => {
                format!("call to {}", call.callee_name().unwrap_or("<expression>"))
            }
            Value::Expr(_) => "expression".to_string(),
            Value::Module(name) => format!("module {}", name),
            Value::Imported(symbol) => format!("imported {}.{}", symbol.module, symbol.name),
        }
    }

    /// The symbol this value stands for when used as a reference
    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Class(class) => {
                Some(Symbol::new(&class.module, &class.name, FactoryKind::Class))
            }
            Value::Function(func) => {
                Some(Symbol::new(&func.module, &func.name, FactoryKind::Function))
            }
            Value::Imported(symbol) => Some(symbol.clone()),
            Value::Expr(Expr::Ref(symbol)) => Some(symbol.clone()),
            _ => None,
        }
    }
}

/// A statically loaded Python module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonModule {
    name: String,
    path: PathBuf,
    is_package: bool,
    members: BTreeMap<String, Value>,
}

impl PythonModule {
    pub(crate) fn new(name: String, path: PathBuf, is_package: bool) -> Self {
        PythonModule {
            name,
            path,
            is_package,
            members: BTreeMap::new(),
        }
    }

    /// Dotted module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file the module was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this module is a package initializer (`__init__.py`)
    pub fn is_package(&self) -> bool {
        self.is_package
    }

    /// Top-level members in name order
    pub fn members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Bind a top-level name, replacing any earlier binding
    pub(crate) fn bind(&mut self, name: String, value: Value) {
        self.members.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_are_name_ordered_and_rebinding_replaces() {
        let mut module =
            PythonModule::new("pkg".to_string(), PathBuf::from("pkg/__init__.py"), true);
        module.bind("zeta".to_string(), Value::Expr(Expr::Other("1".to_string())));
        module.bind("Alpha".to_string(), Value::Module("os".to_string()));
        module.bind("beta".to_string(), Value::Expr(Expr::Other("2".to_string())));
        module.bind("zeta".to_string(), Value::Expr(Expr::Other("3".to_string())));

        let names: Vec<_> = module.members().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
        assert_eq!(
            module.get("zeta"),
            Some(&Value::Expr(Expr::Other("3".to_string())))
        );
    }

    #[test]
    fn test_call_argument_prefers_keyword() {
        let call = Call {
            func: Box::new(Expr::Attribute(vec![
                "framework".to_string(),
                "PluginSpec".to_string(),
            ])),
            args: vec![Expr::Str("positional".to_string())],
            kwargs: vec![("namespace".to_string(), Expr::Str("keyword".to_string()))],
        };
        assert_eq!(call.callee_name(), Some("PluginSpec"));
        assert_eq!(
            call.argument("namespace", 0).and_then(Expr::as_str),
            Some("keyword")
        );
        assert_eq!(
            call.argument("name", 0).and_then(Expr::as_str),
            Some("positional")
        );
        assert!(call.argument("factory", 2).is_none());
        assert_eq!(Expr::Call(call).to_string(), "framework.PluginSpec(...)");
    }
}
