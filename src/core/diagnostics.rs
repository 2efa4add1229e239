//! Diagnostic types for convention violations

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// A single convention violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub rule: String,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub context: String,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
        context: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            rule: rule.into(),
            message: message.into(),
            file: file.into(),
            line,
            column,
            context: context.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format as human-readable output
    pub fn format_human(&self, color: bool) -> String {
        let mut output = String::new();

        let severity = self.severity.to_string();
        let severity = if !color {
            severity
        } else {
            match self.severity {
                Severity::Error => severity.red().bold().to_string(),
                Severity::Warning => severity.yellow().bold().to_string(),
                Severity::Info => severity.blue().bold().to_string(),
            }
        };
        let rule = if color {
            self.rule.bold().to_string()
        } else {
            self.rule.clone()
        };

        output.push_str(&format!(
            "{}:{}:{} {}[{}]: {}\n",
            self.file, self.line, self.column, severity, self.code, rule
        ));

        // Context with arrow
        let gutter = " ".repeat(self.line.to_string().len());
        output.push_str(&format!("{}--> {}:{}\n", gutter, self.file, self.line));
        output.push_str(&format!("{} |\n", gutter));
        output.push_str(&format!("{} | {}\n", self.line, self.context));

        let spaces = " ".repeat(self.column.saturating_sub(1));
        let caret = if color {
            "^".red().to_string()
        } else {
            "^".to_string()
        };
        output.push_str(&format!("{} | {}{}\n", gutter, spaces, caret));

        output.push_str(&format!("{} = {}\n", gutter, self.message));

        for suggestion in &self.suggestions {
            output.push_str(&format!("{} = help: {}\n", gutter, suggestion));
        }

        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Diagnostic {
        Diagnostic::new(
            Severity::Error,
            "E101",
            "no-var",
            "use `const` or `let` instead of `var`",
            "src/utils/format.js",
            3,
            1,
            "var count = 0;",
        )
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_format_human_plain() {
        let text = sample()
            .with_suggestion("const count = 0;")
            .format_human(false);

        assert!(text.starts_with("src/utils/format.js:3:1 error[E101]: no-var\n"));
        assert!(text.contains("3 | var count = 0;"));
        assert!(text.contains("  | ^"));
        assert!(text.contains("= help: const count = 0;"));
    }

    #[test]
    fn test_diagnostic_serializes_lowercase_severity() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["severity"], "error");
        assert_eq!(value["code"], "E101");
        assert_eq!(value["line"], 3);
    }
}
