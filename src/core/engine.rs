use crate::core::report::LintReport;
use crate::domain::ports::LintPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct LintEngine<P: LintPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: LintPipeline> LintEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<LintReport> {
        let start = Instant::now();
        tracing::info!("🚀 Starting lint run");
        self.monitor.log_stats("start");

        // Discover
        let discovery = self.pipeline.discover().await?;
        tracing::info!(
            "📂 Discovered {} source files ({} unreadable)",
            discovery.files.len(),
            discovery.failures.len()
        );
        self.monitor.log_stats("discover");

        // Check
        let result = self.pipeline.check(discovery).await?;
        tracing::info!(
            "🔎 Checked {} files: {} diagnostics, {} failures",
            result.files_checked,
            result.diagnostics.len(),
            result.failures.len()
        );
        self.monitor.log_stats("check");

        // Report
        let report = self.pipeline.report(result).await?;
        tracing::info!(
            "✅ Lint finished in {:?}: {} errors, {} warnings",
            start.elapsed(),
            report.summary.errors,
            report.summary.warnings
        );
        self.monitor.log_final_stats();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::{Diagnostic, Severity};
    use crate::core::report::{CheckResult, Discovery, FileFailure};
    use crate::domain::model::{ModuleRole, SourceFile};
    use async_trait::async_trait;

    struct FixedPipeline;

    #[async_trait]
    impl LintPipeline for FixedPipeline {
        async fn discover(&self) -> Result<Discovery> {
            Ok(Discovery {
                files: vec![SourceFile::new("src/a.js", ModuleRole::Other, "var a;\n")],
                failures: vec![FileFailure::unreadable("src/b.js")],
            })
        }

        async fn check(&self, discovery: Discovery) -> Result<CheckResult> {
            Ok(CheckResult {
                files_checked: discovery.files.len() + discovery.failures.len(),
                diagnostics: vec![Diagnostic::new(
                    Severity::Warning,
                    "E102",
                    "prefer-const",
                    "message",
                    "src/a.js",
                    1,
                    1,
                    "var a;",
                )],
                failures: discovery.failures,
            })
        }

        async fn report(&self, result: CheckResult) -> Result<LintReport> {
            Ok(LintReport::build(result, Severity::Info))
        }
    }

    #[tokio::test]
    async fn test_engine_runs_all_stages() {
        let engine = LintEngine::new(FixedPipeline);
        let report = engine.run().await.unwrap();

        assert_eq!(report.summary.files_checked, 2);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.files_failed, 1);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_engine_with_monitoring_blocking() {
        let engine = LintEngine::new_with_monitoring(FixedPipeline, true);
        let report = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
    }
}
