//! Convention rules and the engine that runs them.
//!
//! Every rule is an independent, stateless checker over a parsed module.
//! Rules are grouped by the part of the style guide they come from:
//! ES6 conventions, React, Redux, and services/utils organization.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::diagnostics::{Diagnostic, Severity};
use crate::domain::model::{ModuleRole, SourceFile, SourceModule, Span};
use crate::utils::error::{LintError, Result};

pub mod es6;
pub mod modules;
pub mod naming;
pub mod react;
pub mod redux;

pub const DEFAULT_HELPER_PATTERN: &str = "^(select|get|is|has)[A-Z]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Es6,
    React,
    Redux,
    ServicesUtils,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Es6 => write!(f, "ES6"),
            Section::React => write!(f, "React"),
            Section::Redux => write!(f, "Redux"),
            Section::ServicesUtils => write!(f, "Services/Utils"),
        }
    }
}

/// Static description of a rule
#[derive(Debug)]
pub struct RuleMeta {
    pub code: &'static str,
    pub name: &'static str,
    pub section: Section,
    pub default_severity: Severity,
    /// Empty means every role
    pub roles: &'static [ModuleRole],
    pub summary: &'static str,
}

impl RuleMeta {
    pub fn applies_to(&self, role: ModuleRole) -> bool {
        self.roles.is_empty() || self.roles.contains(&role)
    }
}

/// Configured level of a rule: disabled, or enabled at a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleLevel {
    Off,
    On(Severity),
}

impl FromStr for RuleLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "allow" | "none" => Ok(RuleLevel::Off),
            other => other
                .parse::<Severity>()
                .map(RuleLevel::On)
                .map_err(|_| format!("expected off, info, warning or error, got '{}'", s)),
        }
    }
}

impl TryFrom<String> for RuleLevel {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuleLevel> for String {
    fn from(level: RuleLevel) -> Self {
        match level {
            RuleLevel::Off => "off".to_string(),
            RuleLevel::On(severity) => severity.to_string(),
        }
    }
}

/// Knobs shared by the rules
#[derive(Debug, Clone)]
pub struct RuleSettings {
    /// Named exports of a reducers module matching this are helpers (selectors and such)
    pub helper_pattern: Regex,
    /// Functions whose curried call connects a container to the store
    pub connect_callees: Vec<String>,
    /// Packages a presentational component must not import
    pub store_packages: Vec<String>,
}

impl RuleSettings {
    pub fn new(
        helper_pattern: &str,
        connect_callees: Vec<String>,
        store_packages: Vec<String>,
    ) -> Result<Self> {
        let helper_pattern =
            crate::utils::validation::validate_regex("settings.helper_pattern", helper_pattern)?;
        Ok(Self {
            helper_pattern,
            connect_callees,
            store_packages,
        })
    }

    pub fn is_helper(&self, export_name: &str) -> bool {
        self.helper_pattern.is_match(export_name)
    }

    pub fn is_connect_callee(&self, callee: &str) -> bool {
        self.connect_callees.iter().any(|c| c == callee)
    }
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            helper_pattern: Regex::new(DEFAULT_HELPER_PATTERN)
                .expect("default helper pattern is a valid regex"),
            connect_callees: vec!["connect".to_string()],
            store_packages: vec!["react-redux".to_string(), "redux".to_string()],
        }
    }
}

/// What a rule sees while checking one file
pub struct RuleContext<'a> {
    pub file: &'a SourceFile,
    pub module: &'a SourceModule,
    pub settings: &'a RuleSettings,
    meta: &'static RuleMeta,
    severity: Severity,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        file: &'a SourceFile,
        module: &'a SourceModule,
        settings: &'a RuleSettings,
        meta: &'static RuleMeta,
        severity: Severity,
    ) -> Self {
        Self {
            file,
            module,
            settings,
            meta,
            severity,
        }
    }

    /// A diagnostic for the current rule at `span`
    pub fn diagnostic(&self, span: Span, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(
            self.severity,
            self.meta.code,
            self.meta.name,
            message,
            self.file.path.clone(),
            span.line,
            span.column,
            self.file.line_text(span.line),
        )
    }
}

pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// Every rule, in catalogue order
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(es6::NoVar),
        Box::new(es6::PreferConst),
        Box::new(es6::NoTopLevelArrow),
        Box::new(es6::FunctionNaming),
        Box::new(es6::ImportsFirst),
        Box::new(react::ComponentDefaultExport),
        Box::new(react::ComponentNameMatchesFile),
        Box::new(react::ComponentNoStoreAccess),
        Box::new(react::ContainerConnectDefault),
        Box::new(react::ContainerNoMarkup),
        Box::new(redux::ReducerSingleExport),
        Box::new(redux::ReducerDefaultFunction),
        Box::new(redux::ActionTypeConstantCase),
        Box::new(redux::ActionCreatorNamedExport),
        Box::new(modules::NoDefaultExport),
    ]
}

struct ActiveRule {
    rule: Box<dyn Rule>,
    severity: Severity,
}

/// The enabled rules with their effective severities
pub struct RuleSet {
    rules: Vec<ActiveRule>,
    settings: RuleSettings,
}

impl RuleSet {
    /// `levels` is keyed by rule name or code; unknown keys are rejected.
    pub fn new(levels: &HashMap<String, RuleLevel>, settings: RuleSettings) -> Result<Self> {
        let catalogue = all_rules();

        for key in levels.keys() {
            let known = catalogue
                .iter()
                .any(|r| r.meta().name == key.as_str() || r.meta().code == key.as_str());
            if !known {
                return Err(LintError::UnknownRuleError { name: key.clone() });
            }
        }

        Ok(Self::build(catalogue, levels, settings))
    }

    pub fn with_defaults() -> Self {
        Self::build(all_rules(), &HashMap::new(), RuleSettings::default())
    }

    fn build(
        catalogue: Vec<Box<dyn Rule>>,
        levels: &HashMap<String, RuleLevel>,
        settings: RuleSettings,
    ) -> Self {
        let rules = catalogue
            .into_iter()
            .filter_map(|rule| {
                let meta = rule.meta();
                let level = levels
                    .get(meta.name)
                    .or_else(|| levels.get(meta.code))
                    .copied()
                    .unwrap_or(RuleLevel::On(meta.default_severity));
                match level {
                    RuleLevel::Off => None,
                    RuleLevel::On(severity) => Some(ActiveRule { rule, severity }),
                }
            })
            .collect();

        Self { rules, settings }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.rule.meta().name == name)
    }

    pub fn run(&self, file: &SourceFile, module: &SourceModule) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for active in &self.rules {
            let meta = active.rule.meta();
            if !meta.applies_to(file.role) {
                continue;
            }
            let ctx = RuleContext::new(file, module, &self.settings, meta, active.severity);
            diagnostics.extend(active.rule.check(&ctx));
        }
        diagnostics
    }
}

/// One line per rule, for `--list-rules`
pub fn format_catalogue() -> String {
    let mut output = String::new();
    for rule in all_rules() {
        let meta = rule.meta();
        let roles = if meta.roles.is_empty() {
            "all".to_string()
        } else {
            meta.roles
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        output.push_str(&format!(
            "{:<5} {:<28} {:<8} {:<15} {:<18} {}\n",
            meta.code,
            meta.name,
            meta.default_severity.to_string(),
            meta.section.to_string(),
            roles,
            meta.summary
        ));
    }
    output
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::parser::ModuleParser;

    /// Parse `text` as a file at `path` with `role` and run the default rule set.
    pub fn lint(path: &str, role: ModuleRole, text: &str) -> Vec<Diagnostic> {
        let file = SourceFile::new(path, role, text);
        let module = ModuleParser::new().unwrap().parse(&file).unwrap();
        RuleSet::with_defaults().run(&file, &module)
    }

    pub fn rule_hits<'a>(diagnostics: &'a [Diagnostic], rule: &str) -> Vec<&'a Diagnostic> {
        diagnostics.iter().filter(|d| d.rule == rule).collect()
    }
}
