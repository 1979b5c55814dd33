//! Compilation configuration.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! `CompileScssConfig` is an immutable, fully-populated value. Every field is
//! validated and every path is made absolute when the value is built, so
//! nothing is looked up lazily while a compilation is running.
//!
//! # Configuration Formats
//!
//! The configuration can be assembled in code with [`CompileScssConfig::builder()`]
//! or loaded from TOML:
//!
//! ```toml
//! foundation-path = "../semi-foundation"
//! theme-path = "../semi-theme-default"
//! output-scss-path = "../semi-theme-default/semi.scss"
//! output-css-path = "../semi-ui/dist/css/semi.css"
//! output-css-min-path = "../semi-ui/dist/css/semi.min.css"
//! is-min = true
//! extra-import = "~@custom/theme/scss/local.scss"
//! use-absolute-path = false
//! ```
//!
//! Relative paths in a TOML file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ScssCompileError;
use crate::plan::ThemePathMode;

/// Validated configuration for one compilation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileScssConfig {
    foundation_path: PathBuf,
    theme_path: PathBuf,
    output_css_path: PathBuf,
    is_min: bool,
    extra_import: Option<String>,
    use_absolute_path: bool,
    output_scss_path: PathBuf,
    output_css_min_path: Option<PathBuf>,
}

impl CompileScssConfig {
    /// Start building a configuration.
    pub fn builder() -> CompileScssConfigBuilder {
        CompileScssConfigBuilder::default()
    }

    /// Parse a TOML configuration, resolving relative paths against `base_dir`.
    pub fn from_toml_str(source: &str, base_dir: &Path) -> Result<Self, ScssCompileError> {
        CompileScssConfigBuilder::from_toml_str(source, base_dir)?.build()
    }

    /// Load a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ScssCompileError> {
        CompileScssConfigBuilder::from_toml_file(path)?.build()
    }

    /// Root of the foundation tree (one subdirectory per component).
    pub fn foundation_path(&self) -> &Path {
        &self.foundation_path
    }

    /// Root of the theme tree.
    pub fn theme_path(&self) -> &Path {
        &self.theme_path
    }

    /// Where the expanded CSS is written.
    pub fn output_css_path(&self) -> &Path {
        &self.output_css_path
    }

    pub fn is_min(&self) -> bool {
        self.is_min
    }

    /// Import injected after the `./variables.scss` anchor of component partials.
    ///
    /// Written verbatim into the `@import` statement, so it is resolved by the
    /// compiler relative to the importing partial or the load paths.
    pub fn extra_import(&self) -> Option<&str> {
        self.extra_import.as_deref()
    }

    /// How theme files are referenced from the merged entry.
    pub fn theme_path_mode(&self) -> ThemePathMode {
        if self.use_absolute_path {
            ThemePathMode::Absolute
        } else {
            ThemePathMode::Relative
        }
    }

    /// Where the merged entry stylesheet is written.
    pub fn output_scss_path(&self) -> &Path {
        &self.output_scss_path
    }

    /// Directory containing the merged entry stylesheet.
    pub fn output_scss_dir(&self) -> &Path {
        self.output_scss_path.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// Where the compressed CSS is written. `None` skips the minified pass.
    pub fn output_css_min_path(&self) -> Option<&Path> {
        self.output_css_min_path.as_deref()
    }
}

/// Raw TOML shape, all fields optional so files can be completed by flags.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    foundation_path: Option<PathBuf>,
    theme_path: Option<PathBuf>,
    output_css_path: Option<PathBuf>,
    is_min: Option<bool>,
    extra_import: Option<String>,
    use_absolute_path: Option<bool>,
    output_scss_path: Option<PathBuf>,
    output_css_min_path: Option<PathBuf>,
}

/// Builder for [`CompileScssConfig`].
///
/// Setters overwrite earlier values, which lets a CLI layer its flags on top of
/// a configuration file.
#[derive(Debug, Clone, Default)]
pub struct CompileScssConfigBuilder {
    base_dir: Option<PathBuf>,
    foundation_path: Option<PathBuf>,
    theme_path: Option<PathBuf>,
    output_css_path: Option<PathBuf>,
    is_min: bool,
    extra_import: Option<String>,
    use_absolute_path: bool,
    output_scss_path: Option<PathBuf>,
    output_css_min_path: Option<PathBuf>,
}

impl CompileScssConfigBuilder {
    /// Parse TOML into a builder, resolving relative paths against `base_dir`.
    pub fn from_toml_str(source: &str, base_dir: &Path) -> Result<Self, ScssCompileError> {
        let raw: RawConfig = toml::from_str(source)?;
        let resolve = |p: Option<PathBuf>| p.map(|p| base_dir.join(p));
        Ok(Self {
            base_dir: None,
            foundation_path: resolve(raw.foundation_path),
            theme_path: resolve(raw.theme_path),
            output_css_path: resolve(raw.output_css_path),
            is_min: raw.is_min.unwrap_or(false),
            extra_import: raw.extra_import,
            use_absolute_path: raw.use_absolute_path.unwrap_or(false),
            output_scss_path: resolve(raw.output_scss_path),
            output_css_min_path: resolve(raw.output_css_min_path),
        })
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ScssCompileError> {
        let source = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&source, base_dir)
    }

    /// Directory used to resolve relative paths given to the setters.
    ///
    /// Defaults to the current working directory.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn foundation_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.foundation_path = Some(path.into());
        self
    }

    pub fn theme_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.theme_path = Some(path.into());
        self
    }

    pub fn output_css_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_css_path = Some(path.into());
        self
    }

    pub fn is_min(mut self, is_min: bool) -> Self {
        self.is_min = is_min;
        self
    }

    pub fn extra_import(mut self, import: impl Into<String>) -> Self {
        self.extra_import = Some(import.into());
        self
    }

    pub fn use_absolute_path(mut self, enabled: bool) -> Self {
        self.use_absolute_path = enabled;
        self
    }

    pub fn output_scss_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_scss_path = Some(path.into());
        self
    }

    pub fn output_css_min_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_css_min_path = Some(path.into());
        self
    }

    /// Validate and produce the immutable configuration.
    ///
    /// # Errors
    ///
    /// Returns `ScssCompileError::InvalidConfig` if:
    /// - a required path is missing or empty
    /// - the extra import is empty or cannot be written inside a quoted `@import`
    /// - `is_min` is set but no minified output path is configured
    pub fn build(self) -> Result<CompileScssConfig, ScssCompileError> {
        let base_dir = match self.base_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        let foundation_path = required(self.foundation_path, "foundation-path", &base_dir)?;
        let theme_path = required(self.theme_path, "theme-path", &base_dir)?;
        let output_css_path = required(self.output_css_path, "output-css-path", &base_dir)?;
        let output_scss_path = required(self.output_scss_path, "output-scss-path", &base_dir)?;
        let output_css_min_path = match self.output_css_min_path {
            Some(path) => Some(absolute(path, "output-css-min-path", &base_dir)?),
            None => None,
        };

        if self.is_min && output_css_min_path.is_none() {
            return Err(ScssCompileError::invalid_config(
                "`is-min` is set but `output-css-min-path` is not configured",
            ));
        }

        if let Some(import) = &self.extra_import {
            if import.trim().is_empty() {
                return Err(ScssCompileError::invalid_config(
                    "`extra-import` must not be empty",
                ));
            }
            if import.contains(['"', '\n', '\r']) {
                return Err(ScssCompileError::invalid_config(format!(
                    "`extra-import` cannot contain quotes or line breaks: {import:?}"
                )));
            }
        }

        Ok(CompileScssConfig {
            foundation_path,
            theme_path,
            output_css_path,
            is_min: self.is_min,
            extra_import: self.extra_import,
            use_absolute_path: self.use_absolute_path,
            output_scss_path,
            output_css_min_path,
        })
    }
}

fn required(
    path: Option<PathBuf>,
    name: &str,
    base_dir: &Path,
) -> Result<PathBuf, ScssCompileError> {
    let path =
        path.ok_or_else(|| ScssCompileError::invalid_config(format!("`{name}` is required")))?;
    absolute(path, name, base_dir)
}

fn absolute(path: PathBuf, name: &str, base_dir: &Path) -> Result<PathBuf, ScssCompileError> {
    if path.as_os_str().is_empty() {
        return Err(ScssCompileError::invalid_config(format!(
            "`{name}` must not be empty"
        )));
    }
    Ok(std::path::absolute(base_dir.join(path))?)
}
