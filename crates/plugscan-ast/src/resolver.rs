//! Turning module members into plugin specifications
//!
//! The [`SpecResolver`] seam decides whether a top-level member describes a
//! plugin. [`PluginSpecResolver`] recognizes the three shapes plugin authors
//! write: an explicit `PluginSpec(...)` value, a `Plugin` subclass carrying
//! `namespace`/`name` class attributes, and a function decorated with
//! `@plugin(...)`.

use crate::module::{Call, ClassDef, Expr, FunctionDef, Value};
use plugscan_registry::{FactoryKind, FactoryRef, PluginSpec};
use thiserror::Error;

/// Why a member is not a plugin specification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{0} is not a plugin")]
    NotAPlugin(String),

    #[error("{what} does not define '{field}'")]
    MissingField { field: &'static str, what: String },

    #[error("'{field}' of {what} is not a string literal")]
    NotALiteral { field: &'static str, what: String },

    #[error("factory '{0}' does not refer to a class or function")]
    UnresolvedFactory(String),
}

/// Resolves a module member into a plugin specification
pub trait SpecResolver {
    fn resolve(&self, member: &Value) -> Result<PluginSpec, ResolveError>;
}

impl<F> SpecResolver for F
where
    F: Fn(&Value) -> Result<PluginSpec, ResolveError>,
{
    fn resolve(&self, member: &Value) -> Result<PluginSpec, ResolveError> {
        self(member)
    }
}

/// Default resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpecResolver {
    /// Callee name of explicit specifications
    pub spec_callee: String,
    /// Base class every plugin class derives from
    pub plugin_base: String,
    /// Decorator that turns a function into a plugin
    pub decorator: String,
}

impl Default for PluginSpecResolver {
    fn default() -> Self {
        PluginSpecResolver {
            spec_callee: "PluginSpec".to_string(),
            plugin_base: "Plugin".to_string(),
            decorator: "plugin".to_string(),
        }
    }
}

impl SpecResolver for PluginSpecResolver {
    fn resolve(&self, member: &Value) -> Result<PluginSpec, ResolveError> {
        match member {
            Value::Expr(Expr::Call(call))
                if call.callee_name() == Some(self.spec_callee.as_str()) =>
            {
                self.resolve_spec_call(call)
            }
            Value::Class(class) if class.ancestors.contains(&self.plugin_base) => {
                self.resolve_class(class)
            }
            Value::Function(function) => self.resolve_function(function),
            other => Err(ResolveError::NotAPlugin(other.describe())),
        }
    }
}

impl PluginSpecResolver {
    fn resolve_spec_call(&self, call: &Call) -> Result<PluginSpec, ResolveError> {
        let what = format!("{}(...)", self.spec_callee);
        let namespace = literal(call.argument("namespace", 0), "namespace", &what)?;
        let name = literal(call.argument("name", 1), "name", &what)?;
        let factory = call
            .argument("factory", 2)
            .ok_or_else(|| ResolveError::MissingField {
                field: "factory",
                what: what.clone(),
            })?;

        Ok(PluginSpec::new(namespace, name, factory_ref(factory)?))
    }

    fn resolve_class(&self, class: &ClassDef) -> Result<PluginSpec, ResolveError> {
        let what = format!("class {}", class.name);
        let namespace = literal(class.attributes.get("namespace"), "namespace", &what)?;
        let name = literal(class.attributes.get("name"), "name", &what)?;

        Ok(PluginSpec::new(
            namespace,
            name,
            FactoryRef::new(&class.module, &class.name, FactoryKind::Class),
        ))
    }

    fn resolve_function(&self, function: &FunctionDef) -> Result<PluginSpec, ResolveError> {
        let what = format!("@{} on {}", self.decorator, function.name);
        let decorator = function
            .decorators
            .iter()
            .find(|d| {
                d.terminal_name() == Some(self.decorator.as_str()) || self.is_decorator_call(d)
            })
            .ok_or_else(|| ResolveError::NotAPlugin(format!("function {}", function.name)))?;

        // bare `@plugin` carries no namespace
        let Expr::Call(call) = decorator else {
            return Err(ResolveError::MissingField {
                field: "namespace",
                what,
            });
        };

        let namespace = literal(call.argument("namespace", 0), "namespace", &what)?;
        let name = match call.argument("name", 1) {
            Some(expr) => literal(Some(expr), "name", &what)?,
            None => function.name.clone(),
        };

        Ok(PluginSpec::new(
            namespace,
            name,
            FactoryRef::new(&function.module, &function.name, FactoryKind::Function),
        ))
    }

    fn is_decorator_call(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Call(call) if call.callee_name() == Some(self.decorator.as_str()))
    }
}

fn literal(
    expr: Option<&Expr>,
    field: &'static str,
    what: &str,
) -> Result<String, ResolveError> {
    match expr {
        Some(Expr::Str(value)) => Ok(value.clone()),
        Some(_) => Err(ResolveError::NotALiteral {
            field,
            what: what.to_string(),
        }),
        None => Err(ResolveError::MissingField {
            field,
            what: what.to_string(),
        }),
    }
}

/// Factory reference for a resolved expression
///
/// Lambdas resolve to `<module>:<lambda>`, which the registry later rejects as
/// not importable.
fn factory_ref(expr: &Expr) -> Result<FactoryRef, ResolveError> {
    match expr {
        Expr::Ref(symbol) => Ok(FactoryRef::new(&symbol.module, &symbol.name, symbol.kind)),
        Expr::Lambda(module) => Ok(FactoryRef::new(module, "<lambda>", FactoryKind::Function)),
        other => Err(ResolveError::UnresolvedFactory(other.to_string())),
    }
}
