//! Discovery of component and theme SCSS sources.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The foundation tree holds one directory per component:
//!
//! ```text
//! semi-foundation/
//!   button/
//!     button.scss
//!     iconButton.scss
//!     variables.scss
//!   input/
//!     input.scss
//!     textarea.scss
//! ```
//!
//! The theme tree holds a fixed set of shared files under `scss/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ScssCompileError;

/// Canonical theme file names, in the order they are assembled.
pub const THEME_FILE_NAMES: [&str; 7] = [
    "_font.scss",
    "_palette.scss",
    "global.scss",
    "index.scss",
    "local.scss",
    "mixin.scss",
    "variables.scss",
];

pub(crate) const SCSS_SUFFIX: &str = ".scss";

/// Component name → SCSS file name → file content.
pub type ComponentScssMap = BTreeMap<String, BTreeMap<String, String>>;

/// Canonical theme file name → file content.
pub type ThemeScssMap = BTreeMap<String, String>;

/// Both catalogs for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScssMap {
    pub components: ComponentScssMap,
    pub theme: ThemeScssMap,
}

impl ScssMap {
    /// Names of the discovered component folders, sorted.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}

/// Scan both source trees.
pub fn generate_scss_map(
    foundation_path: &Path,
    theme_path: &Path,
) -> Result<ScssMap, ScssCompileError> {
    Ok(ScssMap {
        components: generate_components_scss_map(foundation_path)?,
        theme: generate_theme_scss_map(theme_path)?,
    })
}

/// Collect the `.scss` files of every immediate subdirectory of `foundation_path`.
///
/// Top-level files are ignored and component directories are not searched
/// recursively. A component directory without any `.scss` file still gets an
/// (empty) entry.
///
/// # Errors
///
/// Returns `ScssCompileError::Discovery` if the root, a component directory or
/// one of its `.scss` files cannot be read.
pub fn generate_components_scss_map(
    foundation_path: &Path,
) -> Result<ComponentScssMap, ScssCompileError> {
    let mut components = ComponentScssMap::new();

    let entries =
        fs::read_dir(foundation_path).map_err(|e| ScssCompileError::discovery(foundation_path, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ScssCompileError::discovery(foundation_path, e))?;
        let component_path = entry.path();
        if !component_path.is_dir() {
            continue;
        }

        let component_name = entry.file_name().to_string_lossy().into_owned();
        let files = components.entry(component_name).or_default();

        let children = fs::read_dir(&component_path)
            .map_err(|e| ScssCompileError::discovery(&component_path, e))?;
        for child in children {
            let child = child.map_err(|e| ScssCompileError::discovery(&component_path, e))?;
            let file_name = child.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(SCSS_SUFFIX) {
                continue;
            }
            let file_path = child.path();
            files.insert(file_name, read_scss(&file_path)?);
        }
    }

    tracing::debug!(
        root = %foundation_path.display(),
        components = components.len(),
        "Discovered component SCSS"
    );

    Ok(components)
}

/// Collect the canonical theme files found under `<theme_path>/scss/`.
///
/// Only names in [`THEME_FILE_NAMES`] are considered; missing ones are left
/// out of the map.
///
/// Both the existence probe and the read use `<theme_path>/scss/<name>`, the
/// directory the merged entry imports theme files from. Files placed directly
/// in `<theme_path>` are not considered.
pub fn generate_theme_scss_map(theme_path: &Path) -> Result<ThemeScssMap, ScssCompileError> {
    let scss_dir = theme_path.join("scss");
    let mut theme = ThemeScssMap::new();

    for name in THEME_FILE_NAMES {
        let file_path = scss_dir.join(name);
        if !file_path.is_file() {
            continue;
        }
        theme.insert(name.to_string(), read_scss(&file_path)?);
    }

    tracing::debug!(
        root = %theme_path.display(),
        files = theme.len(),
        "Discovered theme SCSS"
    );

    Ok(theme)
}

/// Read a source file as text, replacing invalid UTF-8 sequences.
///
/// Only I/O failures are discovery errors; encoding problems are left for the
/// compiler passes to deal with.
fn read_scss(path: &Path) -> Result<String, ScssCompileError> {
    let bytes = fs::read(path).map_err(|e| ScssCompileError::discovery(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), "SCSS file is not valid UTF-8");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}
