use crate::core::diagnostics::Severity;
use crate::core::report::{CheckResult, Discovery, LintReport, OutputFormat};
use crate::core::rules::RuleLevel;
use crate::domain::model::ModuleRole;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait SourceStore: Send + Sync {
    /// Source files under `target` (or `target` itself when it is a file) with one of `extensions`
    fn list_files(
        &self,
        target: &Path,
        extensions: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn targets(&self) -> &[PathBuf];
    fn extensions(&self) -> &[String];
    fn exclude_patterns(&self) -> &[String];
    fn role_patterns(&self) -> &HashMap<ModuleRole, Vec<String>>;
    fn rule_levels(&self) -> &HashMap<String, RuleLevel>;
    fn helper_pattern(&self) -> &str;
    fn connect_callees(&self) -> &[String];
    fn store_packages(&self) -> &[String];
    fn min_severity(&self) -> Severity;
    fn format(&self) -> OutputFormat;
    fn color(&self) -> bool;
    fn output_path(&self) -> Option<&Path>;
}

#[async_trait]
pub trait LintPipeline: Send + Sync {
    async fn discover(&self) -> Result<Discovery>;
    async fn check(&self, discovery: Discovery) -> Result<CheckResult>;
    async fn report(&self, result: CheckResult) -> Result<LintReport>;
}
