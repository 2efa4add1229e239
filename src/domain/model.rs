use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What part of a React/Redux codebase a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleRole {
    Component,
    Container,
    Reducer,
    Actions,
    Service,
    Util,
    Other,
}

impl ModuleRole {
    /// Classification order: the first role whose patterns match wins.
    pub const PRECEDENCE: [ModuleRole; 6] = [
        ModuleRole::Container,
        ModuleRole::Component,
        ModuleRole::Reducer,
        ModuleRole::Actions,
        ModuleRole::Service,
        ModuleRole::Util,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleRole::Component => "component",
            ModuleRole::Container => "container",
            ModuleRole::Reducer => "reducer",
            ModuleRole::Actions => "actions",
            ModuleRole::Service => "service",
            ModuleRole::Util => "util",
            ModuleRole::Other => "other",
        }
    }
}

impl fmt::Display for ModuleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Display path with `/` separators
    pub path: String,
    pub role: ModuleRole,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, role: ModuleRole, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role,
            text: text.into(),
        }
    }

    /// The source line at `line` (1-based), without its terminator
    pub fn line_text(&self, line: usize) -> &str {
        line.checked_sub(1)
            .and_then(|idx| self.text.lines().nth(idx))
            .unwrap_or("")
    }

    /// File name without extension; `index` files take their directory's name.
    pub fn module_stem(&self) -> Option<&str> {
        let mut segments = self.path.rsplit('/');
        let file_name = segments.next()?;
        let stem = file_name.split('.').next().filter(|s| !s.is_empty())?;
        if stem == "index" {
            segments.next().filter(|s| !s.is_empty() && *s != ".")
        } else {
            Some(stem)
        }
    }
}

/// 1-based line/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
    Var,
}

impl DeclKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclKind::Const => "const",
            DeclKind::Let => "let",
            DeclKind::Var => "var",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportForm {
    Named,
    Default,
}

/// Coarse shape of an expression, as far as the conventions care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueShape {
    Arrow { contains_jsx: bool },
    Function { name: Option<String>, contains_jsx: bool },
    Class { name: Option<String> },
    /// `callee` is the innermost callee, so `connect(a)(B)` reads as `connect`, curried.
    Call { callee: String, curried: bool },
    String(String),
    Identifier(String),
    Object,
    Other,
}

impl ValueShape {
    pub fn is_function_like(&self) -> bool {
        matches!(self, ValueShape::Arrow { .. } | ValueShape::Function { .. })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ValueShape::Arrow { .. } => "an arrow function",
            ValueShape::Function { name: Some(_), .. } => "a named function",
            ValueShape::Function { name: None, .. } => "an anonymous function",
            ValueShape::Class { .. } => "a class",
            ValueShape::Call { .. } => "a call expression",
            ValueShape::String(_) => "a string literal",
            ValueShape::Identifier(_) => "an identifier",
            ValueShape::Object => "an object literal",
            ValueShape::Other => "an expression",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    /// `None` for destructuring patterns
    pub name: Option<String>,
    pub value: Option<ValueShape>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Import {
        source: String,
        bindings: Vec<String>,
    },
    Function {
        name: Option<String>,
        contains_jsx: bool,
    },
    Class {
        name: Option<String>,
    },
    Declaration {
        kind: DeclKind,
        declarators: Vec<Declarator>,
    },
    /// `export default <expression>;`
    DefaultExpression {
        value: ValueShape,
    },
    ExportList {
        names: Vec<ExportSpecifier>,
        from: Option<String>,
        star: bool,
    },
    Statement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelItem {
    pub kind: ItemKind,
    pub export: Option<ExportForm>,
    pub span: Span,
}

/// One entry of a module's export surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// `"default"` for the default export
    pub name: String,
    pub span: Span,
    /// `None` when the export re-exports or lists a binding the module does not declare inline
    pub shape: Option<ValueShape>,
}

impl ExportEntry {
    pub fn is_default(&self) -> bool {
        self.name == "default"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetBinding {
    pub name: String,
    pub span: Span,
    /// `let x;` has no initializer and cannot become `const`
    pub initialized: bool,
}

/// Lowered view of an ES module: top-level structure plus a few tree-wide facts.
#[derive(Debug, Clone, Default)]
pub struct SourceModule {
    pub items: Vec<TopLevelItem>,
    pub var_sites: Vec<Span>,
    pub let_bindings: Vec<LetBinding>,
    pub reassigned: HashSet<String>,
    pub first_jsx: Option<Span>,
}

impl SourceModule {
    pub fn has_jsx(&self) -> bool {
        self.first_jsx.is_some()
    }

    pub fn imports(&self) -> impl Iterator<Item = (&str, Span)> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Import { source, .. } => Some((source.as_str(), item.span)),
            _ => None,
        })
    }

    /// Top-level function declaration by name
    pub fn function_named(&self, wanted: &str) -> Option<&TopLevelItem> {
        self.items.iter().find(|item| {
            matches!(&item.kind, ItemKind::Function { name: Some(name), .. } if name == wanted)
        })
    }

    /// Value shape of a top-level `const`/`let`/`var` binding by name
    pub fn binding_value(&self, wanted: &str) -> Option<&ValueShape> {
        self.items.iter().find_map(|item| match &item.kind {
            ItemKind::Declaration { declarators, .. } => declarators
                .iter()
                .find(|d| d.name.as_deref() == Some(wanted))
                .and_then(|d| d.value.as_ref()),
            _ => None,
        })
    }

    /// Local shape for a name: function and class declarations first, then bindings.
    pub fn resolve_local(&self, wanted: &str) -> Option<ValueShape> {
        for item in &self.items {
            match &item.kind {
                ItemKind::Function {
                    name: Some(name),
                    contains_jsx,
                    ..
                } if name == wanted => {
                    return Some(ValueShape::Function {
                        name: Some(name.clone()),
                        contains_jsx: *contains_jsx,
                    })
                }
                ItemKind::Class { name: Some(name) } if name == wanted => {
                    return Some(ValueShape::Class {
                        name: Some(name.clone()),
                    })
                }
                _ => {}
            }
        }
        self.binding_value(wanted).cloned()
    }

    pub fn exports(&self) -> Vec<ExportEntry> {
        let mut entries = Vec::new();

        for item in &self.items {
            let Some(form) = item.export else {
                continue;
            };
            let default_or = |name: Option<&String>| match form {
                ExportForm::Default => "default".to_string(),
                ExportForm::Named => name.cloned().unwrap_or_default(),
            };

            match &item.kind {
                ItemKind::Function {
                    name, contains_jsx, ..
                } => entries.push(ExportEntry {
                    name: default_or(name.as_ref()),
                    span: item.span,
                    shape: Some(ValueShape::Function {
                        name: name.clone(),
                        contains_jsx: *contains_jsx,
                    }),
                }),
                ItemKind::Class { name } => entries.push(ExportEntry {
                    name: default_or(name.as_ref()),
                    span: item.span,
                    shape: Some(ValueShape::Class { name: name.clone() }),
                }),
                ItemKind::Declaration { declarators, .. } => {
                    for declarator in declarators {
                        if let Some(name) = &declarator.name {
                            entries.push(ExportEntry {
                                name: name.clone(),
                                span: declarator.span,
                                shape: declarator.value.clone(),
                            });
                        }
                    }
                }
                ItemKind::DefaultExpression { value } => entries.push(ExportEntry {
                    name: "default".to_string(),
                    span: item.span,
                    shape: Some(value.clone()),
                }),
                ItemKind::ExportList { names, from, .. } => {
                    for specifier in names {
                        let shape = if from.is_none() {
                            self.resolve_local(&specifier.local)
                        } else {
                            None
                        };
                        entries.push(ExportEntry {
                            name: specifier.exported.clone(),
                            span: item.span,
                            shape,
                        });
                    }
                }
                ItemKind::Import { .. } | ItemKind::Statement => {}
            }
        }

        entries
    }

    pub fn default_export(&self) -> Option<ExportEntry> {
        self.exports().into_iter().find(|e| e.is_default())
    }
}
