use crate::core::diagnostics::{Diagnostic, Severity};
use crate::domain::model::SourceFile;
use crate::utils::error::{LintError, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// A file that could not be linted at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl FileFailure {
    /// Parse errors become failures; anything else is not per-file and is handed back.
    pub fn from_error(err: LintError) -> std::result::Result<Self, LintError> {
        match err {
            LintError::ParseError {
                file,
                line,
                column,
                message,
            } => Ok(Self {
                file,
                line,
                column,
                message,
            }),
            other => Err(other),
        }
    }

    /// A discovered file whose bytes are not UTF-8 text
    pub fn unreadable(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: 1,
            column: 1,
            message: "not valid UTF-8".to_string(),
        }
    }
}

/// Output of the discover stage
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub files: Vec<SourceFile>,
    /// Files that were found but could not be read as source text
    pub failures: Vec<FileFailure>,
}

/// Output of the check stage, before filtering and ordering
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub files_checked: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub files_checked: usize,
    pub files_failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<FileFailure>,
}

impl LintReport {
    /// Drop diagnostics below `min_severity` and order the rest by location.
    pub fn build(result: CheckResult, min_severity: Severity) -> Self {
        let mut diagnostics: Vec<_> = result
            .diagnostics
            .into_iter()
            .filter(|d| d.severity >= min_severity)
            .collect();
        diagnostics.sort_by(|a, b| {
            (&a.file, a.line, a.column, &a.code).cmp(&(&b.file, b.line, b.column, &b.code))
        });

        let mut failures = result.failures;
        failures.sort_by(|a, b| a.file.cmp(&b.file));

        let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
        let summary = Summary {
            files_checked: result.files_checked,
            files_failed: failures.len(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            infos: count(Severity::Info),
        };

        Self {
            generated_at: Utc::now(),
            summary,
            diagnostics,
            failures,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failures.is_empty()
    }

    /// 0 = clean or info only, 1 = errors or unparsable files, 2 = warnings
    pub fn exit_code(&self) -> i32 {
        if self.summary.errors > 0 || self.summary.files_failed > 0 {
            1
        } else if self.summary.warnings > 0 {
            2
        } else {
            0
        }
    }

    pub fn render(&self, format: OutputFormat, color: bool) -> Result<String> {
        match format {
            OutputFormat::Human => Ok(self.render_human(color)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_human(&self, color: bool) -> String {
        let mut output = String::new();

        for failure in &self.failures {
            let label = if color {
                "parse error".red().bold().to_string()
            } else {
                "parse error".to_string()
            };
            output.push_str(&format!(
                "{}:{}:{} {}: {}\n\n",
                failure.file, failure.line, failure.column, label, failure.message
            ));
        }

        for diagnostic in &self.diagnostics {
            output.push_str(&diagnostic.format_human(color));
        }

        let s = &self.summary;
        let mut line = format!(
            "{} error{}, {} warning{}, {} info in {} file{}",
            s.errors,
            plural(s.errors),
            s.warnings,
            plural(s.warnings),
            s.infos,
            s.files_checked,
            plural(s.files_checked)
        );
        if s.files_failed > 0 {
            line.push_str(&format!(" ({} could not be parsed)", s.files_failed));
        }

        if color {
            let line = if self.exit_code() == 0 {
                line.green().to_string()
            } else {
                line.bold().to_string()
            };
            output.push_str(&line);
        } else {
            output.push_str(&line);
        }
        output.push('\n');
        output
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
