use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Parse error in {file}:{line}:{column}: {message}")]
    ParseError {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Parser setup failed: {message}")]
    ParserSetupError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown rule: {name}")]
    UnknownRuleError { name: String },

    #[error("Lint target not found: {path}")]
    TargetNotFound { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Syntax,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LintError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LintError::IoError(_) | LintError::TargetNotFound { .. } => ErrorCategory::Input,
            LintError::ParseError { .. } => ErrorCategory::Syntax,
            LintError::ConfigError { .. }
            | LintError::InvalidConfigValueError { .. }
            | LintError::UnknownRuleError { .. } => ErrorCategory::Configuration,
            LintError::SerializationError(_) | LintError::ParserSetupError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // a single unparsable file never stops the run
            LintError::ParseError { .. } => ErrorSeverity::Low,
            LintError::TargetNotFound { .. } => ErrorSeverity::Medium,
            LintError::IoError(_)
            | LintError::ConfigError { .. }
            | LintError::InvalidConfigValueError { .. }
            | LintError::UnknownRuleError { .. } => ErrorSeverity::High,
            LintError::SerializationError(_) | LintError::ParserSetupError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LintError::IoError(_) => "Check that the files exist and are readable".to_string(),
            LintError::TargetNotFound { path } => {
                format!("Check the path '{}' or pass an existing file or directory", path)
            }
            LintError::ParseError { .. } => {
                "Fix the syntax error, or exclude the file if it is not plain JavaScript/JSX"
                    .to_string()
            }
            LintError::ParserSetupError { .. } => {
                "The JavaScript grammar could not be loaded; reinstall rclint".to_string()
            }
            LintError::ConfigError { .. } | LintError::InvalidConfigValueError { .. } => {
                "Check the configuration file against the documented format".to_string()
            }
            LintError::UnknownRuleError { .. } => {
                "Run `rclint --list-rules` to see the available rule names".to_string()
            }
            LintError::SerializationError(_) => {
                "Retry with --format human to bypass JSON output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LintError::ParseError {
                file,
                line,
                column,
                message,
            } => format!("Could not parse {} at {}:{}: {}", file, line, column, message),
            LintError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Config field '{}' has invalid value '{}': {}", field, value, reason),
            LintError::UnknownRuleError { name } => format!("There is no rule named '{}'", name),
            other => other.to_string(),
        }
    }

    /// Process exit code used by the CLI when a run aborts with this error
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Critical => 4,
            _ => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, LintError>;
