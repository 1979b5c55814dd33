//! Entry generation and two-pass compilation.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! # Architecture
//!
//! A run moves forward through fixed stages:
//! 1. `GenerateEntry`: discover sources (`generate_scss_map`), resolve the
//!    plan (`CompilationPlan::build`) and write the merged entry
//! 2. `CompileNormal`: compile the entry to expanded CSS
//! 3. `CompileMin`: compile the same entry to compressed CSS, only when a
//!    minified output path is configured
//! 4. `Done`
//!
//! Both passes read the same entry file and do not depend on each other: the
//! minified pass runs even if the expanded one failed. Compiler errors are
//! logged and reported per pass; only discovery and entry-writing failures
//! abort the run.
//!
//! Nothing is cached. Two runs sharing one configuration write the same files
//! and must not overlap.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use grass::OutputStyle;

use crate::catalog::generate_scss_map;
use crate::compiler::{CompileDiagnostic, GrassCompiler, StylesheetCompiler};
use crate::config::CompileScssConfig;
use crate::entry::render_entry_stylesheet;
use crate::error::ScssCompileError;
use crate::importer::OverrideFs;
use crate::plan::CompilationPlan;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompileStage {
    GenerateEntry,
    CompileNormal,
    CompileMin,
    Done,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompileStage::GenerateEntry => "generate-entry",
            CompileStage::CompileNormal => "compile-normal",
            CompileStage::CompileMin => "compile-min",
            CompileStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of one compiler pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// CSS was compiled and written.
    Written { path: PathBuf, bytes: usize },
    /// The compiler rejected the input.
    CompileFailed(CompileDiagnostic),
    /// CSS was compiled but could not be written.
    WriteFailed { path: PathBuf, message: String },
}

impl PassOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, PassOutcome::Written { .. })
    }
}

/// Per-pass results of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    /// The merged entry that both passes compiled.
    pub entry: PathBuf,
    pub normal: PassOutcome,
    /// `None` when no minified output path is configured.
    pub minified: Option<PassOutcome>,
}

impl CompileReport {
    /// Both passes succeeded; a skipped minified pass counts as success.
    pub fn succeeded(&self) -> bool {
        self.normal.succeeded() && self.minified.as_ref().is_none_or(PassOutcome::succeeded)
    }
}

/// Compiles the Semi SCSS bundle described by a [`CompileScssConfig`].
///
/// # Example
///
/// ```rust,ignore
/// use semi_scss_compile::{CompileScssConfig, ScssCompilation};
///
/// let config = CompileScssConfig::builder()
///     .foundation_path("packages/semi-foundation")
///     .theme_path("packages/semi-theme-default")
///     .output_scss_path("packages/semi-theme-default/semi.scss")
///     .output_css_path("packages/semi-ui/dist/css/semi.css")
///     .output_css_min_path("packages/semi-ui/dist/css/semi.min.css")
///     .build()?;
///
/// let ok = ScssCompilation::new(config).compile()?;
/// ```
#[derive(Debug, Clone)]
pub struct ScssCompilation<C = GrassCompiler> {
    config: CompileScssConfig,
    compiler: C,
}

impl ScssCompilation<GrassCompiler> {
    pub fn new(config: CompileScssConfig) -> Self {
        Self::with_compiler(config, GrassCompiler)
    }
}

impl<C: StylesheetCompiler> ScssCompilation<C> {
    /// Use a different compiler backend.
    pub fn with_compiler(config: CompileScssConfig, compiler: C) -> Self {
        Self { config, compiler }
    }

    pub fn config(&self) -> &CompileScssConfig {
        &self.config
    }

    /// Run the whole pipeline and reduce it to a single success flag.
    ///
    /// # Errors
    ///
    /// Returns an error only if sources cannot be discovered or the merged
    /// entry cannot be written. Compiler failures yield `Ok(false)`.
    pub fn compile(&self) -> Result<bool, ScssCompileError> {
        Ok(self.compile_report()?.succeeded())
    }

    /// Run the whole pipeline and report each pass.
    pub fn compile_report(&self) -> Result<CompileReport, ScssCompileError> {
        tracing::info!(
            foundation = %self.config.foundation_path().display(),
            theme = %self.config.theme_path().display(),
            is_min = self.config.is_min(),
            "Compiling SCSS bundle"
        );

        enter(CompileStage::GenerateEntry);
        self.generate_entry()?;
        let entry = self.config.output_scss_path().to_path_buf();

        let fs = OverrideFs::new(
            self.config.foundation_path(),
            self.config.extra_import().map(str::to_string),
        );

        enter(CompileStage::CompileNormal);
        let normal = self.run_pass(
            &fs,
            &entry,
            OutputStyle::Expanded,
            self.config.output_css_path(),
        );

        let minified = self.config.output_css_min_path().map(|min_path| {
            enter(CompileStage::CompileMin);
            self.run_pass(&fs, &entry, OutputStyle::Compressed, min_path)
        });

        enter(CompileStage::Done);
        let report = CompileReport {
            entry,
            normal,
            minified,
        };
        tracing::info!(success = report.succeeded(), "SCSS compilation finished");
        Ok(report)
    }

    /// Discover sources, resolve the plan and write the merged entry.
    pub fn generate_entry(&self) -> Result<CompilationPlan, ScssCompileError> {
        let scss_map = generate_scss_map(self.config.foundation_path(), self.config.theme_path())?;
        let plan = CompilationPlan::build(&self.config, &scss_map);
        if plan.is_empty() {
            tracing::warn!(
                foundation = %self.config.foundation_path().display(),
                "No component or theme SCSS found, writing an empty entry"
            );
        }

        let entry_path = self.config.output_scss_path();
        write_creating_parents(entry_path, render_entry_stylesheet(&plan).as_bytes())?;
        tracing::info!(
            path = %entry_path.display(),
            components = plan.components.len(),
            theme = plan.theme.len(),
            "Wrote merged SCSS entry"
        );

        Ok(plan)
    }

    fn run_pass(
        &self,
        fs: &OverrideFs,
        entry: &Path,
        style: OutputStyle,
        output: &Path,
    ) -> PassOutcome {
        let css = match self.compiler.compile(entry, fs, style) {
            Ok(css) => css,
            Err(diagnostic) => {
                tracing::error!(
                    entry = %entry.display(),
                    line = ?diagnostic.line,
                    column = ?diagnostic.column,
                    "SCSS compilation failed: {}",
                    diagnostic.message
                );
                return PassOutcome::CompileFailed(diagnostic);
            }
        };

        match write_creating_parents(output, css.as_bytes()) {
            Ok(()) => {
                tracing::info!(path = %output.display(), bytes = css.len(), "Wrote CSS");
                PassOutcome::Written {
                    path: output.to_path_buf(),
                    bytes: css.len(),
                }
            }
            Err(e) => {
                tracing::error!(path = %output.display(), error = %e, "Failed to write CSS");
                PassOutcome::WriteFailed {
                    path: output.to_path_buf(),
                    message: e.to_string(),
                }
            }
        }
    }
}

fn enter(stage: CompileStage) {
    tracing::debug!(%stage, "Entering stage");
}

fn write_creating_parents(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records whether each call was compressed and fails the expanded pass.
    #[derive(Default)]
    struct FailingExpanded {
        calls: RefCell<Vec<bool>>,
    }

    impl StylesheetCompiler for FailingExpanded {
        fn compile(
            &self,
            _entry: &Path,
            _fs: &dyn grass::Fs,
            style: OutputStyle,
        ) -> Result<String, CompileDiagnostic> {
            let compressed = matches!(style, OutputStyle::Compressed);
            self.calls.borrow_mut().push(compressed);
            if !compressed {
                return Err(CompileDiagnostic {
                    message: "expected \";\".".to_string(),
                    line: Some(2),
                    column: Some(5),
                });
            }
            Ok(".a{b:c}".to_string())
        }
    }

    fn config(root: &Path, with_min: bool) -> CompileScssConfig {
        fs::create_dir_all(root.join("foundation")).unwrap();
        fs::create_dir_all(root.join("theme")).unwrap();
        let builder = CompileScssConfig::builder()
            .foundation_path(root.join("foundation"))
            .theme_path(root.join("theme"))
            .output_scss_path(root.join("theme/semi.scss"))
            .output_css_path(root.join("dist/semi.css"));
        let builder = if with_min {
            builder.output_css_min_path(root.join("dist/semi.min.css"))
        } else {
            builder
        };
        builder.build().unwrap()
    }

    #[test]
    fn test_min_pass_runs_after_failed_normal_pass() {
        let temp = TempDir::new().unwrap();
        let compilation = ScssCompilation::with_compiler(
            config(temp.path(), true),
            FailingExpanded::default(),
        );

        let report = compilation.compile_report().unwrap();

        assert!(matches!(report.normal, PassOutcome::CompileFailed(_)));
        assert!(report.minified.as_ref().unwrap().succeeded());
        assert!(!report.succeeded());
        assert_eq!(
            *compilation.compiler.calls.borrow(),
            vec![false, true]
        );
        assert!(!temp.path().join("dist/semi.css").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join("dist/semi.min.css")).unwrap(),
            ".a{b:c}"
        );
    }

    #[test]
    fn test_min_pass_skipped_when_unconfigured() {
        let temp = TempDir::new().unwrap();
        let compilation = ScssCompilation::with_compiler(
            config(temp.path(), false),
            FailingExpanded::default(),
        );

        let report = compilation.compile_report().unwrap();

        assert_eq!(report.minified, None);
        assert_eq!(*compilation.compiler.calls.borrow(), vec![false]);
        assert!(!compilation.compile().unwrap());
    }

    #[test]
    fn test_write_failure_is_pass_failure() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let config = config(root, false);
        // A directory where the CSS file should go makes the write fail
        fs::create_dir_all(root.join("dist/semi.css")).unwrap();

        let report = ScssCompilation::new(config).compile_report().unwrap();

        assert!(matches!(report.normal, PassOutcome::WriteFailed { .. }));
        assert!(!report.succeeded());
    }

    #[test]
    fn test_stage_order_and_display() {
        assert!(CompileStage::GenerateEntry < CompileStage::CompileNormal);
        assert!(CompileStage::CompileNormal < CompileStage::CompileMin);
        assert!(CompileStage::CompileMin < CompileStage::Done);
        assert_eq!(CompileStage::CompileMin.to_string(), "compile-min");
    }

    #[test]
    fn test_report_success_rules() {
        let written = PassOutcome::Written {
            path: PathBuf::from("/a.css"),
            bytes: 1,
        };
        let failed = PassOutcome::CompileFailed(CompileDiagnostic::new("x"));

        let report = |normal: &PassOutcome, minified: Option<&PassOutcome>| CompileReport {
            entry: PathBuf::from("/semi.scss"),
            normal: normal.clone(),
            minified: minified.cloned(),
        };

        assert!(report(&written, None).succeeded());
        assert!(report(&written, Some(&written)).succeeded());
        assert!(!report(&written, Some(&failed)).succeeded());
        assert!(!report(&failed, None).succeeded());
        assert!(!report(&failed, Some(&written)).succeeded());
    }
}
