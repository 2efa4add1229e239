use crate::core::parser::ModuleParser;
use crate::core::report::{CheckResult, Discovery, FileFailure, LintReport};
use crate::core::roles::{ExcludeFilter, RoleMatcher};
use crate::core::rules::{RuleSet, RuleSettings};
use crate::domain::model::SourceFile;
use crate::domain::ports::{ConfigProvider, LintPipeline, SourceStore};
use crate::utils::error::{LintError, Result};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

/// Lints a set of source trees for React/Redux project conventions.
pub struct ConventionsPipeline<S: SourceStore, C: ConfigProvider> {
    store: S,
    config: C,
    parser: ModuleParser,
    rules: RuleSet,
    roles: RoleMatcher,
    exclude: ExcludeFilter,
}

impl<S: SourceStore, C: ConfigProvider> ConventionsPipeline<S, C> {
    pub fn new(store: S, config: C) -> Result<Self> {
        let settings = RuleSettings::new(
            config.helper_pattern(),
            config.connect_callees().to_vec(),
            config.store_packages().to_vec(),
        )?;
        let rules = RuleSet::new(config.rule_levels(), settings)?;
        let roles = RoleMatcher::new(config.role_patterns())?;
        let exclude = ExcludeFilter::new(config.exclude_patterns())?;

        Ok(Self {
            store,
            config,
            parser: ModuleParser::new()?,
            rules,
            roles,
            exclude,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// `/`-separated path without a leading `./`
pub fn display_path(path: &Path) -> String {
    let shown = path.to_string_lossy().replace('\\', "/");
    match shown.strip_prefix("./") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => shown,
    }
}

#[async_trait::async_trait]
impl<S: SourceStore, C: ConfigProvider> LintPipeline for ConventionsPipeline<S, C> {
    async fn discover(&self) -> Result<Discovery> {
        let mut paths = BTreeMap::new();

        for target in self.config.targets() {
            tracing::debug!("Scanning target: {}", target.display());
            let found = self
                .store
                .list_files(target, self.config.extensions())
                .await?;

            for path in found {
                let shown = display_path(&path);
                if self.exclude.is_excluded(&shown) {
                    tracing::debug!("Excluded: {}", shown);
                    continue;
                }
                paths.entry(shown).or_insert(path);
            }
        }

        let mut discovery = Discovery {
            files: Vec::with_capacity(paths.len()),
            failures: Vec::new(),
        };
        for (shown, path) in paths {
            let text = match self.store.read_file(&path).await {
                Ok(text) => text,
                Err(LintError::IoError(e)) if e.kind() == ErrorKind::InvalidData => {
                    tracing::warn!("⚠️ {}: {}", shown, e);
                    discovery.failures.push(FileFailure::unreadable(shown));
                    continue;
                }
                Err(e) => return Err(e),
            };
            let role = self.roles.classify(&shown);
            tracing::debug!("Classified {} as {}", shown, role);
            discovery.files.push(SourceFile::new(shown, role, text));
        }

        Ok(discovery)
    }

    async fn check(&self, discovery: Discovery) -> Result<CheckResult> {
        let Discovery { files, failures } = discovery;
        let mut result = CheckResult {
            files_checked: files.len() + failures.len(),
            diagnostics: Vec::new(),
            failures,
        };

        for file in &files {
            match self.parser.parse(file) {
                Ok(module) => {
                    let diagnostics = self.rules.run(file, &module);
                    tracing::debug!("{}: {} diagnostics", file.path, diagnostics.len());
                    result.diagnostics.extend(diagnostics);
                }
                Err(e) => {
                    tracing::warn!("⚠️ {}", e);
                    result.failures.push(FileFailure::from_error(e)?);
                }
            }
        }

        Ok(result)
    }

    async fn report(&self, result: CheckResult) -> Result<LintReport> {
        let report = LintReport::build(result, self.config.min_severity());

        if let Some(output) = self.config.output_path() {
            let rendered = report.render(self.config.format(), false)?;
            self.store.write_file(output, rendered.as_bytes()).await?;
            tracing::info!("📁 Report written to: {}", output.display());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::Severity;
    use crate::core::report::OutputFormat;
    use crate::core::roles::{default_exclude_patterns, default_role_patterns};
    use crate::core::rules::{RuleLevel, DEFAULT_HELPER_PATTERN};
    use crate::domain::model::ModuleRole;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStore {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    }

    /// Stored paths have no leading `./`
    fn stored(path: &Path) -> &Path {
        path.strip_prefix(".").unwrap_or(path)
    }

    impl MockStore {
        fn new(files: &[(&str, &str)]) -> Self {
            let files = files
                .iter()
                .map(|(path, text)| (PathBuf::from(path), text.as_bytes().to_vec()))
                .collect();
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn insert_bytes(&self, path: &str, data: Vec<u8>) {
            self.files.lock().await.insert(PathBuf::from(path), data);
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(Path::new(path))
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl SourceStore for MockStore {
        async fn list_files(&self, target: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
            let files = self.files.lock().await;
            let base = stored(target);
            let found: Vec<_> = files
                .keys()
                .filter_map(|p| p.strip_prefix(base).ok())
                .filter(|rest| {
                    rest.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| extensions.iter().any(|x| x == e))
                })
                .map(|rest| target.join(rest))
                .collect();
            if found.is_empty() {
                return Err(LintError::TargetNotFound {
                    path: target.display().to_string(),
                });
            }
            Ok(found)
        }

        async fn read_file(&self, path: &Path) -> Result<String> {
            let files = self.files.lock().await;
            let data = files.get(stored(path)).cloned().ok_or_else(|| {
                LintError::IoError(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ))
            })?;
            String::from_utf8(data)
                .map_err(|e| LintError::IoError(std::io::Error::new(ErrorKind::InvalidData, e)))
        }

        async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        targets: Vec<PathBuf>,
        extensions: Vec<String>,
        exclude: Vec<String>,
        roles: HashMap<ModuleRole, Vec<String>>,
        levels: HashMap<String, RuleLevel>,
        connect_callees: Vec<String>,
        store_packages: Vec<String>,
        min_severity: Severity,
        output: Option<PathBuf>,
    }

    impl Default for MockConfig {
        fn default() -> Self {
            Self {
                targets: vec![PathBuf::from("src")],
                extensions: vec!["js".to_string(), "jsx".to_string()],
                exclude: default_exclude_patterns(),
                roles: default_role_patterns(),
                levels: HashMap::new(),
                connect_callees: vec!["connect".to_string()],
                store_packages: vec!["react-redux".to_string(), "redux".to_string()],
                min_severity: Severity::Info,
                output: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
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
            &self.levels
        }
        fn helper_pattern(&self) -> &str {
            DEFAULT_HELPER_PATTERN
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
            OutputFormat::Json
        }
        fn color(&self) -> bool {
            false
        }
        fn output_path(&self) -> Option<&Path> {
            self.output.as_deref()
        }
    }

    fn project() -> MockStore {
        MockStore::new(&[
            (
                "src/components/TodoItem.jsx",
                "export default function TodoItem({ text }) {\n  return <li>{text}</li>;\n}\n",
            ),
            (
                "src/containers/TodoApp.js",
                "import { connect } from 'react-redux';\nimport TodoList from '../components/TodoList';\n\nfunction mapStateToProps(state) {\n  return { todos: state.todos };\n}\n\nexport default connect(mapStateToProps)(TodoList);\n",
            ),
            ("src/utils/legacy.js", "var x = 1;\nexport function double(n) {\n  return n * 2;\n}\n"),
            ("src/reducers/broken.js", "export default function (state {\n"),
            ("src/node_modules/lib/index.js", "var ignored = true;\n"),
            ("src/styles/app.css", "body {}\n"),
        ])
    }

    #[tokio::test]
    async fn test_discover_filters_and_classifies() {
        let pipeline = ConventionsPipeline::new(project(), MockConfig::default()).unwrap();
        let discovery = pipeline.discover().await.unwrap();

        let listed: Vec<_> = discovery.files.iter().map(|f| (f.path.as_str(), f.role)).collect();
        assert_eq!(
            listed,
            vec![
                ("src/components/TodoItem.jsx", ModuleRole::Component),
                ("src/containers/TodoApp.js", ModuleRole::Container),
                ("src/reducers/broken.js", ModuleRole::Reducer),
                ("src/utils/legacy.js", ModuleRole::Util),
            ]
        );
    }

    #[tokio::test]
    async fn test_discover_deduplicates_overlapping_targets() {
        let config = MockConfig {
            targets: vec![PathBuf::from("src"), PathBuf::from("src/utils")],
            ..MockConfig::default()
        };
        let pipeline = ConventionsPipeline::new(project(), config).unwrap();
        let discovery = pipeline.discover().await.unwrap();
        assert_eq!(discovery.files.len(), 4);
    }

    #[tokio::test]
    async fn test_discover_treats_dot_prefixed_target_as_same_tree() {
        let config = MockConfig {
            targets: vec![PathBuf::from("src"), PathBuf::from("./src")],
            ..MockConfig::default()
        };
        let pipeline = ConventionsPipeline::new(project(), config).unwrap();
        let discovery = pipeline.discover().await.unwrap();

        let listed: Vec<_> = discovery.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            listed,
            vec![
                "src/components/TodoItem.jsx",
                "src/containers/TodoApp.js",
                "src/reducers/broken.js",
                "src/utils/legacy.js",
            ]
        );

        let result = pipeline.check(discovery).await.unwrap();
        assert_eq!(result.files_checked, 4);
        assert_eq!(result.failures.len(), 1);
        let no_var = result.diagnostics.iter().filter(|d| d.rule == "no-var").count();
        assert_eq!(no_var, 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_a_file_failure() {
        let store = project();
        store
            .insert_bytes("src/utils/bad.js", vec![0xff, 0xfe, b'\n'])
            .await;
        let pipeline = ConventionsPipeline::new(store, MockConfig::default()).unwrap();

        let discovery = pipeline.discover().await.unwrap();
        assert_eq!(discovery.files.len(), 4);
        assert_eq!(
            discovery.failures,
            vec![FileFailure {
                file: "src/utils/bad.js".to_string(),
                line: 1,
                column: 1,
                message: "not valid UTF-8".to_string(),
            }]
        );

        let result = pipeline.check(discovery).await.unwrap();
        assert_eq!(result.files_checked, 5);
        assert_eq!(result.failures.len(), 2);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.rule == "no-var" && d.file == "src/utils/legacy.js"));
    }

    #[tokio::test]
    async fn test_missing_target_fails() {
        let config = MockConfig {
            targets: vec![PathBuf::from("lib")],
            ..MockConfig::default()
        };
        let pipeline = ConventionsPipeline::new(project(), config).unwrap();
        let err = pipeline.discover().await.unwrap_err();
        assert!(matches!(err, LintError::TargetNotFound { .. }));
    }

    #[tokio::test]
    async fn test_parse_failure_does_not_stop_the_run() {
        let pipeline = ConventionsPipeline::new(project(), MockConfig::default()).unwrap();
        let discovery = pipeline.discover().await.unwrap();
        let result = pipeline.check(discovery).await.unwrap();

        assert_eq!(result.files_checked, 4);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].file, "src/reducers/broken.js");
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.rule == "no-var" && d.file == "src/utils/legacy.js"));
    }

    #[tokio::test]
    async fn test_rule_levels_apply() {
        let mut levels = HashMap::new();
        levels.insert("no-var".to_string(), RuleLevel::Off);
        let config = MockConfig {
            levels,
            ..MockConfig::default()
        };
        let pipeline = ConventionsPipeline::new(project(), config).unwrap();
        let discovery = pipeline.discover().await.unwrap();
        let result = pipeline.check(discovery).await.unwrap();

        assert!(result.diagnostics.iter().all(|d| d.rule != "no-var"));
        assert!(!pipeline.rules().is_enabled("no-var"));
    }

    #[tokio::test]
    async fn test_unknown_rule_is_rejected() {
        let mut levels = HashMap::new();
        levels.insert("no-semicolons".to_string(), RuleLevel::Off);
        let config = MockConfig {
            levels,
            ..MockConfig::default()
        };
        let err = ConventionsPipeline::new(project(), config).err().unwrap();
        assert!(matches!(err, LintError::UnknownRuleError { .. }));
    }

    #[tokio::test]
    async fn test_report_writes_output() {
        let store = project();
        let config = MockConfig {
            output: Some(PathBuf::from("out/report.json")),
            ..MockConfig::default()
        };
        let pipeline = ConventionsPipeline::new(store.clone(), config).unwrap();
        let discovery = pipeline.discover().await.unwrap();
        let result = pipeline.check(discovery).await.unwrap();
        let report = pipeline.report(result).await.unwrap();

        assert_eq!(report.exit_code(), 1);
        let written = store.get_file("out/report.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["summary"]["files_failed"], 1);
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Path::new("./src/a.js")), "src/a.js");
        assert_eq!(display_path(Path::new("src/a.js")), "src/a.js");
        assert_eq!(display_path(Path::new(".")), ".");
    }
}
