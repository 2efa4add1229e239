pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LintOptions, LocalSources, TomlConfig};

pub use crate::core::{
    diagnostics::{Diagnostic, Severity},
    engine::LintEngine,
    pipeline::ConventionsPipeline,
    report::{LintReport, OutputFormat},
};
pub use utils::error::{LintError, Result};
