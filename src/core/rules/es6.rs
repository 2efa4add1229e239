//! ES6 conventions: declaration style, function style and naming, import order

use super::naming::{is_camel_case, is_pascal_case, to_camel_case, to_pascal_case};
use super::{Rule, RuleContext, RuleMeta, Section};
use crate::core::diagnostics::{Diagnostic, Severity};
use crate::domain::model::{ItemKind, ValueShape};

pub struct NoVar;

static NO_VAR: RuleMeta = RuleMeta {
    code: "E101",
    name: "no-var",
    section: Section::Es6,
    default_severity: Severity::Error,
    roles: &[],
    summary: "declare variables with const or let, never var",
};

impl Rule for NoVar {
    fn meta(&self) -> &'static RuleMeta {
        &NO_VAR
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        ctx.module
            .var_sites
            .iter()
            .map(|span| {
                ctx.diagnostic(*span, "`var` declaration")
                    .with_suggestion("use `const`, or `let` if the binding is reassigned")
            })
            .collect()
    }
}

pub struct PreferConst;

static PREFER_CONST: RuleMeta = RuleMeta {
    code: "E102",
    name: "prefer-const",
    section: Section::Es6,
    default_severity: Severity::Warning,
    roles: &[],
    summary: "let bindings that are never reassigned should be const",
};

impl Rule for PreferConst {
    fn meta(&self) -> &'static RuleMeta {
        &PREFER_CONST
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        ctx.module
            .let_bindings
            .iter()
            .filter(|binding| binding.initialized)
            .filter(|binding| !ctx.module.reassigned.contains(&binding.name))
            .map(|binding| {
                ctx.diagnostic(
                    binding.span,
                    format!("`{}` is never reassigned", binding.name),
                )
                .with_suggestion(format!("declare it with `const {}`", binding.name))
            })
            .collect()
    }
}

pub struct NoTopLevelArrow;

static NO_TOP_LEVEL_ARROW: RuleMeta = RuleMeta {
    code: "E103",
    name: "no-top-level-arrow",
    section: Section::Es6,
    default_severity: Severity::Warning,
    roles: &[],
    summary: "top-level functions are function declarations, not bound arrow functions",
};

impl Rule for NoTopLevelArrow {
    fn meta(&self) -> &'static RuleMeta {
        &NO_TOP_LEVEL_ARROW
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for item in &ctx.module.items {
            let ItemKind::Declaration { kind, declarators } = &item.kind else {
                continue;
            };
            for declarator in declarators {
                let (Some(name), Some(value)) = (&declarator.name, &declarator.value) else {
                    continue;
                };
                if !value.is_function_like() {
                    continue;
                }
                let export = if item.export.is_some() { "export " } else { "" };
                diagnostics.push(
                    ctx.diagnostic(
                        declarator.span,
                        format!(
                            "top-level `{} {}` is bound to {}",
                            kind.keyword(),
                            name,
                            value.describe()
                        ),
                    )
                    .with_suggestion(format!("{}function {}(...) {{ ... }}", export, name)),
                );
            }
        }

        diagnostics
    }
}

pub struct FunctionNaming;

static FUNCTION_NAMING: RuleMeta = RuleMeta {
    code: "E104",
    name: "function-naming",
    section: Section::Es6,
    default_severity: Severity::Warning,
    roles: &[],
    summary: "functions rendering JSX are PascalCase, all other functions camelCase",
};

impl Rule for FunctionNaming {
    fn meta(&self) -> &'static RuleMeta {
        &FUNCTION_NAMING
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for item in &ctx.module.items {
            let (name, renders) = match &item.kind {
                ItemKind::Function {
                    name: Some(name),
                    contains_jsx,
                    ..
                } => (name, *contains_jsx),
                ItemKind::DefaultExpression {
                    value:
                        ValueShape::Function {
                            name: Some(name),
                            contains_jsx,
                        },
                } => (name, *contains_jsx),
                _ => continue,
            };

            if renders && !is_pascal_case(name) {
                diagnostics.push(
                    ctx.diagnostic(
                        item.span,
                        format!("component function `{}` should be PascalCase", name),
                    )
                    .with_suggestion(format!("rename to `{}`", to_pascal_case(name))),
                );
            } else if !renders && !is_camel_case(name) {
                diagnostics.push(
                    ctx.diagnostic(
                        item.span,
                        format!("function `{}` should be camelCase", name),
                    )
                    .with_suggestion(format!("rename to `{}`", to_camel_case(name))),
                );
            }
        }

        diagnostics
    }
}

pub struct ImportsFirst;

static IMPORTS_FIRST: RuleMeta = RuleMeta {
    code: "M105",
    name: "imports-first",
    section: Section::Es6,
    default_severity: Severity::Warning,
    roles: &[],
    summary: "all imports come before any other top-level statement",
};

impl Rule for ImportsFirst {
    fn meta(&self) -> &'static RuleMeta {
        &IMPORTS_FIRST
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut body_started = false;

        for item in &ctx.module.items {
            match &item.kind {
                ItemKind::Import { source, .. } if body_started => diagnostics.push(
                    ctx.diagnostic(
                        item.span,
                        format!("import of '{}' follows other statements", source),
                    )
                    .with_suggestion("move it up with the other imports"),
                ),
                ItemKind::Import { .. } => {}
                _ => body_started = true,
            }
        }

        diagnostics
    }
}
