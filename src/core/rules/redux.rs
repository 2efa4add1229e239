//! Redux conventions: reducers and action modules

use super::naming::{is_camel_case, is_screaming_snake_case, to_camel_case, to_screaming_snake_case};
use super::react::resolved_function_name;
use super::{Rule, RuleContext, RuleMeta, Section};
use crate::core::diagnostics::{Diagnostic, Severity};
use crate::domain::model::{DeclKind, ExportForm, ItemKind, ModuleRole, Span, ValueShape};

const COMBINE_REDUCERS: &str = "combineReducers";

pub struct ReducerSingleExport;

static REDUCER_SINGLE_EXPORT: RuleMeta = RuleMeta {
    code: "X301",
    name: "reducer-single-export",
    section: Section::Redux,
    default_severity: Severity::Error,
    roles: &[ModuleRole::Reducer],
    summary: "the reducer is the default export and the only non-helper export",
};

impl Rule for ReducerSingleExport {
    fn meta(&self) -> &'static RuleMeta {
        &REDUCER_SINGLE_EXPORT
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let exports = ctx.module.exports();
        let mut diagnostics = Vec::new();

        if !exports.iter().any(|e| e.is_default()) {
            diagnostics.push(
                ctx.diagnostic(Span::new(1, 1), "reducers module has no default export")
                    .with_suggestion("export default function reducer(state, action) { ... }"),
            );
        }

        for entry in exports.iter().filter(|e| !e.is_default()) {
            if ctx.settings.is_helper(&entry.name) {
                continue;
            }
            diagnostics.push(
                ctx.diagnostic(
                    entry.span,
                    format!("`{}` is exported alongside the reducer", entry.name),
                )
                .with_suggestion(format!(
                    "keep it module-private, or name it as a helper matching `{}`",
                    ctx.settings.helper_pattern.as_str()
                )),
            );
        }

        diagnostics
    }
}

pub struct ReducerDefaultFunction;

static REDUCER_DEFAULT_FUNCTION: RuleMeta = RuleMeta {
    code: "X302",
    name: "reducer-default-function",
    section: Section::Redux,
    default_severity: Severity::Warning,
    roles: &[ModuleRole::Reducer],
    summary: "the default export is a named reducer function or a combineReducers call",
};

impl Rule for ReducerDefaultFunction {
    fn meta(&self) -> &'static RuleMeta {
        &REDUCER_DEFAULT_FUNCTION
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(default) = ctx.module.default_export() else {
            return Vec::new();
        };
        let Some(shape) = &default.shape else {
            return Vec::new();
        };
        if resolved_function_name(ctx.module, shape).is_some() {
            return Vec::new();
        }

        let resolved = match shape {
            ValueShape::Identifier(ident) => ctx.module.resolve_local(ident),
            other => Some(other.clone()),
        };
        if let Some(ValueShape::Call { callee, .. }) = &resolved {
            if callee == COMBINE_REDUCERS {
                return Vec::new();
            }
        }

        let description = resolved
            .as_ref()
            .map(|s| s.describe())
            .unwrap_or("not declared in this module");
        vec![ctx
            .diagnostic(
                default.span,
                format!("default export is {}, not a named reducer function", description),
            )
            .with_suggestion("export default function reducer(state = initialState, action) { ... }")]
    }
}

pub struct ActionTypeConstantCase;

static ACTION_TYPE_CONSTANT_CASE: RuleMeta = RuleMeta {
    code: "X303",
    name: "action-type-constant-case",
    section: Section::Redux,
    default_severity: Severity::Warning,
    roles: &[ModuleRole::Actions],
    summary: "exported action type constants are SCREAMING_SNAKE_CASE",
};

impl Rule for ActionTypeConstantCase {
    fn meta(&self) -> &'static RuleMeta {
        &ACTION_TYPE_CONSTANT_CASE
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for item in &ctx.module.items {
            let ItemKind::Declaration {
                kind: DeclKind::Const,
                declarators,
            } = &item.kind
            else {
                continue;
            };
            if item.export != Some(ExportForm::Named) {
                continue;
            }
            for declarator in declarators {
                let (Some(name), Some(ValueShape::String(_))) = (&declarator.name, &declarator.value)
                else {
                    continue;
                };
                if is_screaming_snake_case(name) {
                    continue;
                }
                diagnostics.push(
                    ctx.diagnostic(
                        declarator.span,
                        format!("action type `{}` should be SCREAMING_SNAKE_CASE", name),
                    )
                    .with_suggestion(format!("rename to `{}`", to_screaming_snake_case(name))),
                );
            }
        }

        diagnostics
    }
}

pub struct ActionCreatorNamedExport;

static ACTION_CREATOR_NAMED_EXPORT: RuleMeta = RuleMeta {
    code: "X304",
    name: "action-creator-named-export",
    section: Section::Redux,
    default_severity: Severity::Warning,
    roles: &[ModuleRole::Actions],
    summary: "action creators are camelCase named exports; no default export",
};

impl Rule for ActionCreatorNamedExport {
    fn meta(&self) -> &'static RuleMeta {
        &ACTION_CREATOR_NAMED_EXPORT
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for entry in ctx.module.exports() {
            if entry.is_default() {
                diagnostics.push(
                    ctx.diagnostic(entry.span, "actions module has a default export")
                        .with_suggestion("export each action creator by name"),
                );
                continue;
            }
            let is_creator = entry.shape.as_ref().is_some_and(|s| s.is_function_like());
            if is_creator && !is_camel_case(&entry.name) {
                diagnostics.push(
                    ctx.diagnostic(
                        entry.span,
                        format!("action creator `{}` should be camelCase", entry.name),
                    )
                    .with_suggestion(format!("rename to `{}`", to_camel_case(&entry.name))),
                );
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{lint, rule_hits};
    use crate::domain::model::ModuleRole;

    const REDUCER: ModuleRole = ModuleRole::Reducer;
    const ACTIONS: ModuleRole = ModuleRole::Actions;

    #[test]
    fn test_clean_reducer_with_selector_helpers() {
        let diagnostics = lint(
            "src/reducers/todos.js",
            REDUCER,
            "import { ADD_TODO } from '../actions/todos';\n\nconst initialState = [];\n\nexport default function todos(state = initialState, action) {\n  switch (action.type) {\n    case ADD_TODO:\n      return [...state, action.todo];\n    default:\n      return state;\n  }\n}\n\nexport function selectOpenTodos(state) {\n  return state.filter((t) => !t.done);\n}\n",
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_reducer_extra_exports() {
        let diagnostics = lint(
            "src/reducers/session.js",
            REDUCER,
            "export const initialState = {};\nexport function session(state = initialState) {\n  return state;\n}\nexport default session;\nexport function getUser(state) {\n  return state.user;\n}\n",
        );
        let hits = rule_hits(&diagnostics, "reducer-single-export");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].message.contains("`initialState`"));
        assert!(hits[1].message.contains("`session`"));
        assert!(rule_hits(&diagnostics, "reducer-default-function").is_empty());
    }

    #[test]
    fn test_reducer_missing_default() {
        let diagnostics = lint(
            "src/reducers/ui.js",
            REDUCER,
            "export function ui(state = {}) {\n  return state;\n}\n",
        );
        let hits = rule_hits(&diagnostics, "reducer-single-export");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].message, "reducers module has no default export");
    }

    #[test]
    fn test_reducer_default_function_shapes() {
        let combined = lint(
            "src/reducers/index.js",
            REDUCER,
            "import { combineReducers } from 'redux';\nimport todos from './todos';\n\nexport default combineReducers({ todos });\n",
        );
        assert!(combined.is_empty(), "{:?}", combined);

        let arrow = lint(
            "src/reducers/filter.js",
            REDUCER,
            "export default (state = 'all', action) => state;\n",
        );
        let hits = rule_hits(&arrow, "reducer-default-function");
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].message,
            "default export is an arrow function, not a named reducer function"
        );
    }

    #[test]
    fn test_action_type_constant_case() {
        let diagnostics = lint(
            "src/actions/todos.js",
            ACTIONS,
            "export const ADD_TODO = 'ADD_TODO';\nexport const removeTodo = 'REMOVE_TODO';\nconst internalType = 'INTERNAL';\nexport const PAGE_SIZE = 20;\n",
        );
        let hits = rule_hits(&diagnostics, "action-type-constant-case");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.contains("`removeTodo`"));
        assert_eq!(hits[0].suggestions[0], "rename to `REMOVE_TODO`");
    }

    #[test]
    fn test_action_creators() {
        let diagnostics = lint(
            "src/actions/todos.js",
            ACTIONS,
            "export const ADD_TODO = 'ADD_TODO';\n\nexport function addTodo(text) {\n  return { type: ADD_TODO, text };\n}\n\nexport function Remove_Todo(id) {\n  return { type: 'REMOVE_TODO', id };\n}\n\nexport default addTodo;\n",
        );
        let hits = rule_hits(&diagnostics, "action-creator-named-export");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].message.contains("`Remove_Todo` should be camelCase"));
        assert_eq!(hits[0].suggestions[0], "rename to `removeTodo`");
        assert_eq!(hits[1].message, "actions module has a default export");
    }
}
