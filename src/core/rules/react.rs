//! React conventions: component and container modules

use super::{Rule, RuleContext, RuleMeta, Section};
use crate::core::diagnostics::{Diagnostic, Severity};
use crate::domain::model::{ModuleRole, SourceModule, Span, ValueShape};

/// Name of the function behind an export shape, following a bare identifier
/// to the top-level function declaration it names.
pub(super) fn resolved_function_name(module: &SourceModule, shape: &ValueShape) -> Option<String> {
    match shape {
        ValueShape::Function {
            name: Some(name), ..
        } => Some(name.clone()),
        ValueShape::Identifier(ident) => module.function_named(ident).map(|_| ident.clone()),
        _ => None,
    }
}

pub struct ComponentDefaultExport;

static COMPONENT_DEFAULT_EXPORT: RuleMeta = RuleMeta {
    code: "R201",
    name: "component-default-export",
    section: Section::React,
    default_severity: Severity::Error,
    roles: &[ModuleRole::Component],
    summary: "a component module default-exports a named function",
};

impl Rule for ComponentDefaultExport {
    fn meta(&self) -> &'static RuleMeta {
        &COMPONENT_DEFAULT_EXPORT
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let stem = ctx.file.module_stem().unwrap_or("Component");
        let suggestion = format!("export default function {}(props) {{ ... }}", stem);

        let Some(default) = ctx.module.default_export() else {
            return vec![ctx
                .diagnostic(Span::new(1, 1), "component module has no default export")
                .with_suggestion(suggestion)];
        };
        // `export { default } from './Button'` style re-exports are checked in the target file
        let Some(shape) = &default.shape else {
            return Vec::new();
        };

        if resolved_function_name(ctx.module, shape).is_some() {
            return Vec::new();
        }

        let message = match shape {
            ValueShape::Identifier(ident) => match ctx.module.resolve_local(ident) {
                Some(local) => format!(
                    "default export `{}` is {}, not a named function",
                    ident,
                    local.describe()
                ),
                None => format!(
                    "default export `{}` is not a function declared in this module",
                    ident
                ),
            },
            ValueShape::Class { .. } => {
                "default export is a class; components are named functions".to_string()
            }
            other => format!("default export is {}, not a named function", other.describe()),
        };

        vec![ctx
            .diagnostic(default.span, message)
            .with_suggestion(suggestion)]
    }
}

pub struct ComponentNameMatchesFile;

static COMPONENT_NAME_MATCHES_FILE: RuleMeta = RuleMeta {
    code: "R202",
    name: "component-name-matches-file",
    section: Section::React,
    default_severity: Severity::Warning,
    roles: &[ModuleRole::Component],
    summary: "the default-exported component is named after its file",
};

impl Rule for ComponentNameMatchesFile {
    fn meta(&self) -> &'static RuleMeta {
        &COMPONENT_NAME_MATCHES_FILE
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(stem) = ctx.file.module_stem() else {
            return Vec::new();
        };
        let Some(default) = ctx.module.default_export() else {
            return Vec::new();
        };
        let Some(name) = default
            .shape
            .as_ref()
            .and_then(|shape| resolved_function_name(ctx.module, shape))
        else {
            return Vec::new();
        };

        if name == stem {
            return Vec::new();
        }

        vec![ctx
            .diagnostic(
                default.span,
                format!(
                    "component `{}` is exported from a file named `{}`",
                    name, stem
                ),
            )
            .with_suggestion(format!("rename the function or the file so both read `{}`", name))]
    }
}

pub struct ComponentNoStoreAccess;

static COMPONENT_NO_STORE_ACCESS: RuleMeta = RuleMeta {
    code: "R203",
    name: "component-no-store-access",
    section: Section::React,
    default_severity: Severity::Error,
    roles: &[ModuleRole::Component],
    summary: "presentational components do not import store bindings",
};

impl Rule for ComponentNoStoreAccess {
    fn meta(&self) -> &'static RuleMeta {
        &COMPONENT_NO_STORE_ACCESS
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        ctx.module
            .imports()
            .filter(|(source, _)| {
                ctx.settings.store_packages.iter().any(|pkg| {
                    *source == pkg.as_str()
                        || source
                            .strip_prefix(pkg.as_str())
                            .is_some_and(|rest| rest.starts_with('/'))
                })
            })
            .map(|(source, span)| {
                ctx.diagnostic(
                    span,
                    format!("component imports '{}'; only containers reach the store", source),
                )
                .with_suggestion("move the store connection into a module under containers/")
            })
            .collect()
    }
}

pub struct ContainerConnectDefault;

static CONTAINER_CONNECT_DEFAULT: RuleMeta = RuleMeta {
    code: "R204",
    name: "container-connect-default",
    section: Section::React,
    default_severity: Severity::Error,
    roles: &[ModuleRole::Container],
    summary: "a container module default-exports connect(...)(Component)",
};

impl ContainerConnectDefault {
    fn is_connected(&self, ctx: &RuleContext<'_>, shape: &ValueShape) -> bool {
        match shape {
            ValueShape::Call { callee, curried } => {
                *curried && ctx.settings.is_connect_callee(callee)
            }
            ValueShape::Identifier(ident) => ctx
                .module
                .binding_value(ident)
                .is_some_and(|value| self.is_connected(ctx, value)),
            _ => false,
        }
    }
}

impl Rule for ContainerConnectDefault {
    fn meta(&self) -> &'static RuleMeta {
        &CONTAINER_CONNECT_DEFAULT
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let suggestion = "export default connect(mapStateToProps, mapDispatchToProps)(Component);";

        let Some(default) = ctx.module.default_export() else {
            return vec![ctx
                .diagnostic(Span::new(1, 1), "container module has no default export")
                .with_suggestion(suggestion)];
        };
        let Some(shape) = &default.shape else {
            return Vec::new();
        };
        if self.is_connected(ctx, shape) {
            return Vec::new();
        }

        let message = match shape {
            ValueShape::Call { callee, .. } => format!(
                "default export calls `{}` but is not a curried `connect(...)(Component)`",
                callee
            ),
            other => format!(
                "default export is {}, not a connected component",
                other.describe()
            ),
        };

        vec![ctx.diagnostic(default.span, message).with_suggestion(suggestion)]
    }
}

pub struct ContainerNoMarkup;

static CONTAINER_NO_MARKUP: RuleMeta = RuleMeta {
    code: "R205",
    name: "container-no-markup",
    section: Section::React,
    default_severity: Severity::Warning,
    roles: &[ModuleRole::Container],
    summary: "containers wire state to components and render no JSX themselves",
};

impl Rule for ContainerNoMarkup {
    fn meta(&self) -> &'static RuleMeta {
        &CONTAINER_NO_MARKUP
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        match ctx.module.first_jsx {
            Some(span) => vec![ctx
                .diagnostic(span, "container renders JSX")
                .with_suggestion("move the markup into a component and connect that component")],
            None => Vec::new(),
        }
    }
}
