//! Top-level statement extraction with ast-grep
//!
//! Turns Python source into the list of top-level statements that bind
//! names: class and function definitions, simple assignments and imports.
//! Bodies of `if`/`with` blocks still run at module level, so their bindings
//! are flattened in source order. `try` blocks keep their except handlers
//! apart as a fallback. Function and class bodies are not descended into.

use ast_grep_core::source::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::Python;
use thiserror::Error;
use tracing::trace;

use crate::module::Expr;

mod args;


pub use args::decode_string_literal;

pub(crate) type PyNode<'r> = Node<'r, StrDoc<Python>>;

/// Source that tree-sitter could not parse cleanly
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid syntax at line {line}")]
pub struct SyntaxError {
    pub line: usize,
}

/// Where a `from ... import` statement imports from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    /// Number of leading dots; 0 for absolute imports
    pub level: usize,
    pub module: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Name { name: String, alias: Option<String> },
    Wildcard,
}

/// A top-level statement that binds names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Class {
        name: String,
        bases: Vec<Expr>,
        /// Class-level `name = value` assignments in source order
        body: Vec<(String, Expr)>,
    },
    Function {
        name: String,
        decorators: Vec<Expr>,
    },
    Assign {
        targets: Vec<String>,
        /// `None` for bare annotations (`x: int`)
        value: Option<Expr>,
    },
    /// `import a.b` or `import a.b as c`
    Import { module: String, alias: Option<String> },
    /// `from x import a, b as c` or `from . import *`
    ImportFrom {
        source: ImportSource,
        names: Vec<ImportedName>,
    },
    /// `try` block; `body` includes the `else` clause, `fallback` every
    /// except handler. `finally` bindings follow as plain statements.
    Try {
        body: Vec<Statement>,
        fallback: Vec<Statement>,
    },
}

/// Compound statements whose blocks execute at module level
const FLATTENED: &[&str] = &[
    "block",
    "if_statement",
    "elif_clause",
    "else_clause",
    "with_statement",
];

/// Extracts top-level statements from one module's source
pub struct SourceExtractor<'a> {
    module_name: &'a str,
}

impl<'a> SourceExtractor<'a> {
    pub fn new(module_name: &'a str) -> Self {
        SourceExtractor { module_name }
    }

    pub fn extract(&self, content: &str) -> Result<Vec<Statement>, SyntaxError> {
        let sg = AstGrep::new(content, Python);
        let root = sg.root();

        if let Some(offset) = first_error_offset(&root) {
            let line = content[..offset.min(content.len())].matches('\n').count() + 1;
            return Err(SyntaxError { line });
        }

        let mut statements = Vec::new();
        self.extract_block(&root, &mut statements);

        trace!(
            "Extracted {} top-level statement(s) from {}",
            statements.len(),
            self.module_name
        );
        Ok(statements)
    }

    fn extract_block(&self, parent: &PyNode<'_>, statements: &mut Vec<Statement>) {
        for node in named_children(parent) {
            let kind = node.kind();
            match kind.as_ref() {
                // `import a, b as c` binds one name per module
                "import_statement" => {
                    for child in named_children(&node) {
                        if let Some((module, alias)) = dotted_with_alias(&child) {
                            statements.push(Statement::Import { module, alias });
                        }
                    }
                }
                "try_statement" => self.extract_try(&node, statements),
                kind if FLATTENED.contains(&kind) => self.extract_block(&node, statements),
                _ => statements.extend(self.extract_statement(&node)),
            }
        }
    }

    fn extract_try(&self, node: &PyNode<'_>, statements: &mut Vec<Statement>) {
        let mut body = Vec::new();
        let mut fallback = Vec::new();
        let mut finally = Vec::new();
        for clause in named_children(node) {
            match clause.kind().as_ref() {
                "block" | "else_clause" => self.extract_block(&clause, &mut body),
                "except_clause" | "except_group_clause" => {
                    self.extract_block(&clause, &mut fallback);
                }
                "finally_clause" => self.extract_block(&clause, &mut finally),
                _ => {}
            }
        }
        statements.push(Statement::Try { body, fallback });
        statements.extend(finally);
    }

    fn extract_statement(&self, node: &PyNode<'_>) -> Option<Statement> {
        match node.kind().as_ref() {
            "class_definition" => self.extract_class(node),
            "function_definition" => self.extract_function(node, Vec::new()),
            "decorated_definition" => {
                let definition = node.field("definition")?;
                match definition.kind().as_ref() {
                    "class_definition" => self.extract_class(&definition),
                    "function_definition" => {
                        let decorators = node
                            .children()
                            .filter(|child| child.kind() == "decorator")
                            .filter_map(|decorator| {
                                named_children(&decorator)
                                    .next()
                                    .map(|expr| args::parse_expr(&expr, self.module_name))
                            })
                            .collect();
                        self.extract_function(&definition, decorators)
                    }
                    _ => None,
                }
            }
            "expression_statement" => {
                let inner = named_children(node).next()?;
                if inner.kind() == "assignment" {
                    self.extract_assignment(&inner)
                } else {
                    None
                }
            }
            "import_from_statement" => self.extract_import_from(node),
            _ => None,
        }
    }

    fn extract_class(&self, node: &PyNode<'_>) -> Option<Statement> {
        let name = node.field("name")?.text().to_string();

        let bases = node
            .field("superclasses")
            .map(|superclasses| {
                named_children(&superclasses)
                    .filter(|base| base.kind() != "keyword_argument")
                    .map(|base| args::parse_expr(&base, self.module_name))
                    .collect()
            })
            .unwrap_or_default();

        let mut body = Vec::new();
        if let Some(block) = node.field("body") {
            for statement in named_children(&block) {
                if statement.kind() != "expression_statement" {
                    continue;
                }
                let Some(assignment) = named_children(&statement).next() else {
                    continue;
                };
                if assignment.kind() != "assignment" {
                    continue;
                }
                if let Some(Statement::Assign {
                    targets,
                    value: Some(value),
                }) = self.extract_assignment(&assignment)
                {
                    for target in targets {
                        body.push((target, value.clone()));
                    }
                }
            }
        }

        Some(Statement::Class { name, bases, body })
    }

    fn extract_function(&self, node: &PyNode<'_>, decorators: Vec<Expr>) -> Option<Statement> {
        let name = node.field("name")?.text().to_string();
        Some(Statement::Function { name, decorators })
    }

    /// Handles chained assignments (`a = b = value`); tuple targets bind nothing
    fn extract_assignment(&self, node: &PyNode<'_>) -> Option<Statement> {
        let mut targets = Vec::new();
        let mut current = node.clone();
        loop {
            let left = current.field("left")?;
            if left.kind() == "identifier" {
                targets.push(left.text().to_string());
            }
            match current.field("right") {
                Some(right) if right.kind() == "assignment" => current = right,
                Some(right) => {
                    return Some(Statement::Assign {
                        targets,
                        value: Some(args::parse_expr(&right, self.module_name)),
                    });
                }
                None => return Some(Statement::Assign { targets, value: None }),
            }
        }
    }

    fn extract_import_from(&self, node: &PyNode<'_>) -> Option<Statement> {
        let module_node = node.field("module_name")?;
        let source = match module_node.kind().as_ref() {
            "relative_import" => {
                let text = compact(&module_node.text());
                let level = text.chars().take_while(|c| *c == '.').count();
                let rest = text[level..].to_string();
                ImportSource {
                    level,
                    module: if rest.is_empty() { None } else { Some(rest) },
                }
            }
            _ => ImportSource {
                level: 0,
                module: Some(compact(&module_node.text())),
            },
        };

        let module_range = module_node.range();
        let mut names = Vec::new();
        for child in named_children(node) {
            if child.range() == module_range {
                continue;
            }
            if child.kind() == "wildcard_import" {
                names.push(ImportedName::Wildcard);
                continue;
            }
            if let Some((name, alias)) = dotted_with_alias(&child) {
                names.push(ImportedName::Name { name, alias });
            }
        }

        Some(Statement::ImportFrom { source, names })
    }
}

fn named_children<'r, 's>(node: &'s PyNode<'r>) -> impl Iterator<Item = PyNode<'r>> + 's {
    node.children()
        .filter(|child| child.is_named() && child.kind() != "comment")
}

/// `a.b` or `a.b as c` from a dotted_name / aliased_import node
fn dotted_with_alias(node: &PyNode<'_>) -> Option<(String, Option<String>)> {
    match node.kind().as_ref() {
        "dotted_name" | "identifier" => Some((compact(&node.text()), None)),
        "aliased_import" => {
            let name = node.field("name")?;
            let alias = node.field("alias").map(|a| a.text().to_string());
            Some((compact(&name.text()), alias))
        }
        _ => None,
    }
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn first_error_offset(node: &PyNode<'_>) -> Option<usize> {
    if node.kind() == "ERROR" {
        return Some(node.range().start);
    }
    node.children().find_map(|child| first_error_offset(&child))
}
