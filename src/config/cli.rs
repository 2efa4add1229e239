use crate::domain::ports::SourceStore;
use crate::utils::error::{LintError, Result};
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::core::diagnostics::Severity;
    use crate::core::report::OutputFormat;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "rclint", version)]
    #[command(about = "Checks React/Redux ES module code against project conventions")]
    pub struct CliConfig {
        /// Files or directories to lint [default: lint.paths from the config, or .]
        pub paths: Vec<PathBuf>,

        /// TOML config file [default: rclint.toml if present]
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        #[arg(short, long, value_enum, help = "Output format")]
        pub format: Option<OutputFormat>,

        #[arg(short, long, value_enum, help = "Minimum severity to report")]
        pub level: Option<Severity>,

        /// Disable a rule by name or code (repeatable, comma separated)
        #[arg(long, value_delimiter = ',')]
        pub disable: Vec<String>,

        #[arg(short, long, help = "Also write the rendered report to this file")]
        pub output: Option<PathBuf>,

        #[arg(long, help = "Plain human output")]
        pub no_color: bool,

        #[arg(long, help = "Print the rule catalogue and exit")]
        pub list_rules: bool,

        #[arg(long, help = "Log process statistics per stage")]
        pub monitor: bool,

        #[arg(long, help = "Emit log lines as JSON")]
        pub log_json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            for path in &self.paths {
                validate_path("paths", &path.to_string_lossy())?;
            }
            if let Some(output) = &self.output {
                validate_path("output", &output.to_string_lossy())?;
            }
            for rule in &self.disable {
                validate_non_empty_string("disable", rule)?;
            }
            Ok(())
        }
    }
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalSources;

impl LocalSources {
    pub fn new() -> Self {
        Self
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.trim_start_matches('.') == e))
}

impl SourceStore for LocalSources {
    async fn list_files(&self, target: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let metadata = match tokio::fs::metadata(target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LintError::TargetNotFound {
                    path: target.display().to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        // explicit files are linted whatever their extension
        if metadata.is_file() {
            return Ok(vec![target.to_path_buf()]);
        }

        let mut files = Vec::new();
        let mut pending = vec![target.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_symlink() {
                    // links to files are followed; linked directories are not walked
                    match tokio::fs::metadata(&path).await {
                        Ok(linked) if linked.is_file() => {
                            if has_extension(&path, extensions) {
                                files.push(path);
                            }
                        }
                        Ok(_) => tracing::debug!("Skipping linked directory: {}", path.display()),
                        Err(e) => tracing::debug!("Skipping broken link {}: {}", path.display(), e),
                    }
                } else if file_type.is_dir() {
                    if !is_hidden(&path) {
                        pending.push(path);
                    }
                } else if file_type.is_file() && has_extension(&path, extensions) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        let text = tokio::fs::read_to_string(path).await?;
        Ok(text)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        vec!["js".to_string(), "jsx".to_string()]
    }

    #[tokio::test]
    async fn test_list_files_walks_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/components")).unwrap();
        std::fs::create_dir_all(root.join(".cache")).unwrap();
        std::fs::write(root.join("src/index.js"), "").unwrap();
        std::fs::write(root.join("src/components/App.jsx"), "").unwrap();
        std::fs::write(root.join("src/components/App.css"), "").unwrap();
        std::fs::write(root.join(".cache/stale.js"), "").unwrap();

        let files = LocalSources::new().list_files(root, &exts()).await.unwrap();

        assert_eq!(
            files,
            vec![root.join("src/components/App.jsx"), root.join("src/index.js")]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_files_follows_file_links_only() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("shared")).unwrap();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("shared/theme.js"), "").unwrap();
        std::os::unix::fs::symlink(root.join("shared/theme.js"), root.join("src/theme.js")).unwrap();
        std::os::unix::fs::symlink(root.join("shared"), root.join("src/shared")).unwrap();
        std::os::unix::fs::symlink(root.join("gone.js"), root.join("src/gone.js")).unwrap();

        let files = LocalSources::new()
            .list_files(&root.join("src"), &exts())
            .await
            .unwrap();

        assert_eq!(files, vec![root.join("src/theme.js")]);
    }

    #[tokio::test]
    async fn test_read_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.js");
        std::fs::write(&path, [0xff, 0xfe]).unwrap();

        let err = LocalSources::new().read_file(&path).await.unwrap_err();
        assert!(matches!(
            err,
            LintError::IoError(ref e) if e.kind() == std::io::ErrorKind::InvalidData
        ));
    }

    #[tokio::test]
    async fn test_explicit_file_ignores_extension() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("legacy.es6");
        std::fs::write(&file, "var a = 1;\n").unwrap();

        let files = LocalSources::new().list_files(&file, &exts()).await.unwrap();
        assert_eq!(files, vec![file]);
    }

    #[tokio::test]
    async fn test_missing_target() {
        let dir = TempDir::new().unwrap();
        let err = LocalSources::new()
            .list_files(&dir.path().join("nope"), &exts())
            .await
            .unwrap_err();
        assert!(matches!(err, LintError::TargetNotFound { .. }));
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports/lint.json");
        let store = LocalSources::new();

        store.write_file(&path, b"{}").await.unwrap();
        assert_eq!(store.read_file(&path).await.unwrap(), "{}");
    }
}
