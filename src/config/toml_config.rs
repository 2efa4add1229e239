use crate::core::diagnostics::Severity;
use crate::core::report::OutputFormat;
use crate::core::rules::{all_rules, RuleLevel};
use crate::domain::model::ModuleRole;
use crate::utils::error::{LintError, Result};
use crate::utils::validation::{
    validate_extensions, validate_glob, validate_path, validate_regex, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// `rclint.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub lint: Option<LintSection>,
    pub roles: Option<RolesSection>,
    /// rule name or code -> `off | info | warning | error`
    pub rules: Option<HashMap<String, String>>,
    pub settings: Option<SettingsSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintSection {
    pub paths: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub min_severity: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RolesSection {
    pub component: Option<Vec<String>>,
    pub container: Option<Vec<String>>,
    pub reducer: Option<Vec<String>>,
    pub actions: Option<Vec<String>>,
    pub service: Option<Vec<String>>,
    pub util: Option<Vec<String>>,
}

impl RolesSection {
    /// Roles that are configured, with their glob lists
    pub fn configured(&self) -> Vec<(ModuleRole, &[String])> {
        [
            (ModuleRole::Component, &self.component),
            (ModuleRole::Container, &self.container),
            (ModuleRole::Reducer, &self.reducer),
            (ModuleRole::Actions, &self.actions),
            (ModuleRole::Service, &self.service),
            (ModuleRole::Util, &self.util),
        ]
        .into_iter()
        .filter_map(|(role, globs)| globs.as_deref().map(|g| (role, g)))
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    pub helper_pattern: Option<String>,
    pub connect_callees: Option<Vec<String>>,
    pub store_packages: Option<Vec<String>>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| LintError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LintError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = validate_regex("env_substitution", r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(lint) = &self.lint {
            for path in lint.paths.iter().flatten() {
                validate_path("lint.paths", path)?;
            }
            if let Some(extensions) = &lint.extensions {
                validate_extensions("lint.extensions", extensions)?;
            }
            for pattern in lint.exclude.iter().flatten() {
                validate_glob("lint.exclude", pattern)?;
            }
            self.min_severity()?;
            self.format()?;
        }

        if let Some(roles) = &self.roles {
            for (role, globs) in roles.configured() {
                for pattern in globs {
                    validate_glob(&format!("roles.{}", role), pattern)?;
                }
            }
        }

        self.rule_levels()?;

        if let Some(pattern) = self.settings.as_ref().and_then(|s| s.helper_pattern.as_deref()) {
            validate_regex("settings.helper_pattern", pattern)?;
        }

        Ok(())
    }

    pub fn min_severity(&self) -> Result<Option<Severity>> {
        let Some(value) = self.lint.as_ref().and_then(|l| l.min_severity.as_deref()) else {
            return Ok(None);
        };
        value
            .parse()
            .map(Some)
            .map_err(|reason| LintError::InvalidConfigValueError {
                field: "lint.min_severity".to_string(),
                value: value.to_string(),
                reason,
            })
    }

    pub fn format(&self) -> Result<Option<OutputFormat>> {
        let Some(value) = self.lint.as_ref().and_then(|l| l.format.as_deref()) else {
            return Ok(None);
        };
        value
            .parse()
            .map(Some)
            .map_err(|reason| LintError::InvalidConfigValueError {
                field: "lint.format".to_string(),
                value: value.to_string(),
                reason,
            })
    }

    /// Parsed `[rules]` table. Names are checked against the catalogue.
    pub fn rule_levels(&self) -> Result<HashMap<String, RuleLevel>> {
        let mut levels = HashMap::new();
        let Some(rules) = &self.rules else {
            return Ok(levels);
        };

        let catalogue = all_rules();
        for (name, value) in rules {
            let known = catalogue
                .iter()
                .any(|r| r.meta().name == name.as_str() || r.meta().code == name.as_str());
            if !known {
                return Err(LintError::UnknownRuleError { name: name.clone() });
            }
            let level = value
                .parse::<RuleLevel>()
                .map_err(|reason| LintError::InvalidConfigValueError {
                    field: format!("rules.{}", name),
                    value: value.clone(),
                    reason,
                })?;
            levels.insert(name.clone(), level);
        }

        Ok(levels)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL: &str = r#"
[lint]
paths = ["src"]
extensions = ["js", "jsx"]
exclude = ["**/vendor/**"]
min_severity = "warning"
format = "json"

[roles]
component = ["**/ui/**"]

[rules]
"prefer-const" = "off"
E101 = "warning"

[settings]
helper_pattern = "^select"
connect_callees = ["connect", "withStore"]
"#;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(FULL).unwrap();
        config.validate().unwrap();

        let lint = config.lint.as_ref().unwrap();
        assert_eq!(lint.paths.as_deref(), Some(&["src".to_string()][..]));
        assert_eq!(config.min_severity().unwrap(), Some(Severity::Warning));
        assert_eq!(config.format().unwrap(), Some(OutputFormat::Json));

        let levels = config.rule_levels().unwrap();
        assert_eq!(levels["prefer-const"], RuleLevel::Off);
        assert_eq!(levels["E101"], RuleLevel::On(Severity::Warning));

        let roles = config.roles.as_ref().unwrap().configured();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].0, ModuleRole::Component);
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        config.validate().unwrap();
        assert!(config.lint.is_none());
        assert!(config.rule_levels().unwrap().is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert!(config.settings.is_some());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/nonexistent/rclint.toml").unwrap_err();
        assert!(matches!(err, LintError::ConfigError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RCLINT_TEST_SRC_DIR", "app/src");
        let config = TomlConfig::from_toml_str(
            "[lint]\npaths = [\"${RCLINT_TEST_SRC_DIR}\", \"${RCLINT_TEST_UNSET_VAR}\"]\n",
        )
        .unwrap();

        let paths = config.lint.unwrap().paths.unwrap();
        assert_eq!(paths[0], "app/src");
        assert_eq!(paths[1], "${RCLINT_TEST_UNSET_VAR}");
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let config = TomlConfig::from_toml_str("[rules]\nno-semicolons = \"off\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, LintError::UnknownRuleError { name } if name == "no-semicolons"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            "[rules]\nno-var = \"fatal\"\n",
            "[lint]\nmin_severity = \"loud\"\n",
            "[lint]\nformat = \"xml\"\n",
            "[lint]\nextensions = []\n",
            "[lint]\nexclude = [\"src/[\"]\n",
            "[roles]\nreducer = [\"**/[\"]\n",
            "[settings]\nhelper_pattern = \"(\"\n",
        ];
        for case in cases {
            let config = TomlConfig::from_toml_str(case).unwrap();
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, LintError::InvalidConfigValueError { .. }),
                "{}: {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_unknown_section_is_parse_error() {
        let err = TomlConfig::from_toml_str("[pipeline]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, LintError::ConfigError { .. }));
    }
}
