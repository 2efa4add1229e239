pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use cli::LocalSources;
pub use toml_config::TomlConfig;

use crate::core::diagnostics::Severity;
use crate::core::report::OutputFormat;
use crate::core::roles::{default_exclude_patterns, default_role_patterns};
use crate::core::rules::{RuleLevel, DEFAULT_HELPER_PATTERN};
use crate::domain::model::ModuleRole;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_extensions, validate_path, Validate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "rclint.toml";

/// Fully resolved settings for a run: built-in defaults, then the config
/// file, then command-line flags.
#[derive(Debug, Clone)]
pub struct LintOptions {
    pub targets: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub roles: HashMap<ModuleRole, Vec<String>>,
    pub rule_levels: HashMap<String, RuleLevel>,
    pub helper_pattern: String,
    pub connect_callees: Vec<String>,
    pub store_packages: Vec<String>,
    pub min_severity: Severity,
    pub format: OutputFormat,
    pub color: bool,
    pub output: Option<PathBuf>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            targets: vec![PathBuf::from(".")],
            extensions: vec!["js".to_string(), "jsx".to_string(), "mjs".to_string()],
            exclude: default_exclude_patterns(),
            roles: default_role_patterns(),
            rule_levels: HashMap::new(),
            helper_pattern: DEFAULT_HELPER_PATTERN.to_string(),
            connect_callees: vec!["connect".to_string()],
            store_packages: vec!["react-redux".to_string(), "redux".to_string()],
            min_severity: Severity::Info,
            format: OutputFormat::Human,
            color: false,
            output: None,
        }
    }
}

impl LintOptions {
    /// Defaults overlaid with a validated config file.
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        config.validate()?;
        let mut options = Self::default();

        if let Some(lint) = &config.lint {
            if let Some(paths) = &lint.paths {
                options.targets = paths.iter().map(PathBuf::from).collect();
            }
            if let Some(extensions) = &lint.extensions {
                options.extensions = extensions.clone();
            }
            if let Some(exclude) = &lint.exclude {
                options.exclude = exclude.clone();
            }
        }
        if let Some(min_severity) = config.min_severity()? {
            options.min_severity = min_severity;
        }
        if let Some(format) = config.format()? {
            options.format = format;
        }

        // a configured role replaces that role's default globs only
        if let Some(roles) = &config.roles {
            for (role, globs) in roles.configured() {
                options.roles.insert(role, globs.to_vec());
            }
        }

        options.rule_levels = config.rule_levels()?;

        if let Some(settings) = &config.settings {
            if let Some(pattern) = &settings.helper_pattern {
                options.helper_pattern = pattern.clone();
            }
            if let Some(callees) = &settings.connect_callees {
                options.connect_callees = callees.clone();
            }
            if let Some(packages) = &settings.store_packages {
                options.store_packages = packages.clone();
            }
        }

        Ok(options)
    }

    /// Loads the config file named by `--config`, or `rclint.toml` in the
    /// working directory when present, then applies the flags.
    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let config_file = match &cli.config {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let mut options = match config_file {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_toml(&TomlConfig::from_file(&path)?)?
            }
            None => Self::default(),
        };
        options.apply_cli(cli);
        options.validate()?;
        Ok(options)
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if !cli.paths.is_empty() {
            self.targets = cli.paths.clone();
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(level) = cli.level {
            self.min_severity = level;
        }
        for rule in &cli.disable {
            self.rule_levels.insert(rule.trim().to_string(), RuleLevel::Off);
        }
        if cli.output.is_some() {
            self.output = cli.output.clone();
        }
        self.color = !cli.no_color && std::io::IsTerminal::is_terminal(&std::io::stdout());
    }
}

impl Validate for LintOptions {
    fn validate(&self) -> Result<()> {
        for target in &self.targets {
            validate_path("paths", &target.to_string_lossy())?;
        }
        validate_extensions("lint.extensions", &self.extensions)
    }
}

impl ConfigProvider for LintOptions {
    fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn exclude_patterns(&self) -> &[String] {
        &self.exclude
    }

    fn role_patterns(&self) -> &HashMap<ModuleRole, Vec<String>> {
        &self.roles
    }

    fn rule_levels(&self) -> &HashMap<String, RuleLevel> {
        &self.rule_levels
    }

    fn helper_pattern(&self) -> &str {
        &self.helper_pattern
    }

    fn connect_callees(&self) -> &[String] {
        &self.connect_callees
    }

    fn store_packages(&self) -> &[String] {
        &self.store_packages
    }

    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn color(&self) -> bool {
        self.color
    }

    fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}
