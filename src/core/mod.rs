pub mod diagnostics;
pub mod engine;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod roles;
pub mod rules;

pub use crate::domain::model::{ModuleRole, SourceFile, SourceModule};
pub use crate::domain::ports::{ConfigProvider, LintPipeline, SourceStore};
pub use crate::utils::error::Result;
