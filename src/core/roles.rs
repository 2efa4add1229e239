use crate::domain::model::ModuleRole;
use crate::utils::error::Result;
use crate::utils::validation::validate_glob;
use glob::{MatchOptions, Pattern};
use std::collections::HashMap;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

fn to_vec(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

pub fn default_role_patterns() -> HashMap<ModuleRole, Vec<String>> {
    HashMap::from([
        (
            ModuleRole::Container,
            to_vec(&["**/containers/**", "**/*Container.js", "**/*Container.jsx"]),
        ),
        (ModuleRole::Component, to_vec(&["**/components/**"])),
        (
            ModuleRole::Reducer,
            to_vec(&["**/reducers/**", "**/reducer.js", "**/*.reducer.js"]),
        ),
        (
            ModuleRole::Actions,
            to_vec(&["**/actions/**", "**/actions.js", "**/*.actions.js"]),
        ),
        (ModuleRole::Service, to_vec(&["**/services/**"])),
        (ModuleRole::Util, to_vec(&["**/utils/**", "**/helpers/**"])),
    ])
}

pub fn default_exclude_patterns() -> Vec<String> {
    to_vec(&["**/node_modules/**", "**/build/**", "**/dist/**"])
}

/// Assigns a `ModuleRole` to a path from glob patterns.
#[derive(Debug)]
pub struct RoleMatcher {
    patterns: Vec<(ModuleRole, Vec<Pattern>)>,
}

impl RoleMatcher {
    pub fn new(role_patterns: &HashMap<ModuleRole, Vec<String>>) -> Result<Self> {
        let mut patterns = Vec::new();

        for role in ModuleRole::PRECEDENCE {
            let Some(globs) = role_patterns.get(&role) else {
                continue;
            };
            let field = format!("roles.{}", role);
            let compiled = globs
                .iter()
                .map(|g| validate_glob(&field, g))
                .collect::<Result<Vec<_>>>()?;
            patterns.push((role, compiled));
        }

        Ok(Self { patterns })
    }

    pub fn classify(&self, path: &str) -> ModuleRole {
        self.patterns
            .iter()
            .find(|(_, globs)| globs.iter().any(|g| g.matches_with(path, MATCH_OPTIONS)))
            .map(|(role, _)| *role)
            .unwrap_or(ModuleRole::Other)
    }
}

#[derive(Debug)]
pub struct ExcludeFilter {
    patterns: Vec<Pattern>,
}

impl ExcludeFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| validate_glob("lint.exclude", p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}
