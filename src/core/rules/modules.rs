//! Services and utils organization

use super::{Rule, RuleContext, RuleMeta, Section};
use crate::core::diagnostics::{Diagnostic, Severity};
use crate::domain::model::ModuleRole;

pub struct NoDefaultExport;

static NO_DEFAULT_EXPORT: RuleMeta = RuleMeta {
    code: "S401",
    name: "no-default-export",
    section: Section::ServicesUtils,
    default_severity: Severity::Warning,
    roles: &[ModuleRole::Service, ModuleRole::Util],
    summary: "services and utils expose named exports only",
};

impl Rule for NoDefaultExport {
    fn meta(&self) -> &'static RuleMeta {
        &NO_DEFAULT_EXPORT
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(default) = ctx.module.default_export() else {
            return Vec::new();
        };

        vec![ctx
            .diagnostic(
                default.span,
                format!("{} module has a default export", ctx.file.role),
            )
            .with_suggestion("export each function by name and import them with `import { ... }`")]
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{lint, rule_hits};
    use crate::domain::model::ModuleRole;

    #[test]
    fn test_service_default_export() {
        let diagnostics = lint(
            "src/services/todoApi.js",
            ModuleRole::Service,
            "export function fetchTodos() {\n  return fetch('/todos');\n}\n\nexport default { fetchTodos };\n",
        );
        let hits = rule_hits(&diagnostics, "no-default-export");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].message, "service module has a default export");
        assert_eq!(hits[0].line, 5);
    }

    #[test]
    fn test_util_named_exports_are_clean() {
        let diagnostics = lint(
            "src/utils/strings.js",
            ModuleRole::Util,
            "export function capitalize(s) {\n  return s.charAt(0).toUpperCase() + s.slice(1);\n}\n",
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }
}
