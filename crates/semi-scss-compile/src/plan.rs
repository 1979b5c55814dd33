//! Resolution of the files that make up the merged entry stylesheet.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::{Path, PathBuf};

use crate::catalog::{SCSS_SUFFIX, ScssMap, THEME_FILE_NAMES};
use crate::config::CompileScssConfig;

/// Component partials that are not named after their folder but are always
/// part of the bundle, relative to the foundation root.
pub const EXTRA_COMPONENT_FILES: [&str; 2] = ["button/iconButton.scss", "input/textarea.scss"];

/// How the merged entry refers to theme files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePathMode {
    /// `./scss/<name>`, relative to the merged entry file.
    #[default]
    Relative,
    /// `<merged entry dir>/scss/<name>`.
    Absolute,
}

/// The concrete, existing files that the merged entry imports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationPlan {
    /// Component entry files, absolute, without duplicates.
    pub components: Vec<PathBuf>,
    /// Theme files in canonical order, as they are written into the entry.
    pub theme: Vec<(&'static str, PathBuf)>,
}

impl CompilationPlan {
    /// Resolve the plan for `config` from freshly discovered sources.
    ///
    /// Every candidate that does not exist on disk is dropped; absence is never
    /// an error at this stage.
    pub fn build(config: &CompileScssConfig, scss_map: &ScssMap) -> Self {
        let plan = Self {
            components: resolve_components(config.foundation_path(), scss_map),
            theme: resolve_theme(config.theme_path_mode(), config.output_scss_dir()),
        };

        tracing::debug!(
            components = plan.components.len(),
            theme = plan.theme.len(),
            mode = ?config.theme_path_mode(),
            "Built compilation plan"
        );

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.theme.is_empty()
    }
}

fn resolve_components(foundation: &Path, scss_map: &ScssMap) -> Vec<PathBuf> {
    let candidates = scss_map
        .component_names()
        .map(|name| foundation.join(name).join(format!("{name}{SCSS_SUFFIX}")))
        .chain(EXTRA_COMPONENT_FILES.iter().map(|extra| foundation.join(extra)));

    let mut components: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        if candidate.is_file() && !components.contains(&candidate) {
            components.push(candidate);
        }
    }
    components
}

fn resolve_theme(mode: ThemePathMode, entry_dir: &Path) -> Vec<(&'static str, PathBuf)> {
    THEME_FILE_NAMES
        .iter()
        .filter_map(|&name| {
            let on_disk = entry_dir.join("scss").join(name);
            if !on_disk.is_file() {
                return None;
            }
            let reference = match mode {
                ThemePathMode::Relative => Path::new(".").join("scss").join(name),
                ThemePathMode::Absolute => on_disk,
            };
            Some((name, reference))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::generate_scss_map;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn config(root: &Path, absolute: bool) -> CompileScssConfig {
        CompileScssConfig::builder()
            .foundation_path(root.join("foundation"))
            .theme_path(root.join("theme"))
            .output_scss_path(root.join("theme/semi.scss"))
            .output_css_path(root.join("dist/semi.css"))
            .use_absolute_path(absolute)
            .build()
            .unwrap()
    }

    fn plan_for(root: &Path, absolute: bool) -> CompilationPlan {
        let config = config(root, absolute);
        let map = generate_scss_map(config.foundation_path(), config.theme_path()).unwrap();
        CompilationPlan::build(&config, &map)
    }

    #[test]
    fn test_components_filtered_to_existing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "foundation/button/button.scss");
        write(root, "foundation/button/iconButton.scss");
        write(root, "foundation/input/textarea.scss");
        // No input/input.scss: folder entry file is missing
        write(root, "foundation/tag/variables.scss");
        fs::create_dir_all(root.join("theme")).unwrap();

        let plan = plan_for(root, false);

        let foundation = root.join("foundation");
        assert_eq!(
            plan.components,
            vec![
                foundation.join("button/button.scss"),
                foundation.join("button/iconButton.scss"),
                foundation.join("input/textarea.scss"),
            ]
        );
        assert!(plan.components.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_extra_component_files_missing_are_dropped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "foundation/tag/tag.scss");
        fs::create_dir_all(root.join("theme")).unwrap();

        let plan = plan_for(root, false);

        assert_eq!(plan.components, vec![root.join("foundation/tag/tag.scss")]);
    }

    #[test]
    fn test_no_duplicate_components() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        // A component folder named after an extra file's stem must not repeat it
        write(root, "foundation/textarea/textarea.scss");
        write(root, "foundation/input/textarea.scss");
        fs::create_dir_all(root.join("theme")).unwrap();

        let plan = plan_for(root, false);

        let mut deduped = plan.components.clone();
        deduped.dedup();
        assert_eq!(plan.components.len(), 2);
        assert_eq!(deduped, plan.components);
    }

    #[test]
    fn test_theme_relative_mode() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("foundation")).unwrap();
        write(root, "theme/scss/variables.scss");
        write(root, "theme/scss/_font.scss");

        let plan = plan_for(root, false);

        assert_eq!(
            plan.theme,
            vec![
                ("_font.scss", PathBuf::from("./scss/_font.scss")),
                ("variables.scss", PathBuf::from("./scss/variables.scss")),
            ]
        );
        assert!(plan.theme.iter().all(|(name, _)| *name != "global.scss"));
    }

    #[test]
    fn test_theme_absolute_mode() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("foundation")).unwrap();
        write(root, "theme/scss/global.scss");

        let plan = plan_for(root, true);

        let expected = std::path::absolute(root.join("theme/scss/global.scss")).unwrap();
        assert_eq!(plan.theme, vec![("global.scss", expected)]);
    }

    #[test]
    fn test_empty_sources_give_empty_plan() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("foundation")).unwrap();
        fs::create_dir_all(root.join("theme")).unwrap();

        assert!(plan_for(root, false).is_empty());
        assert!(plan_for(root, true).is_empty());
    }
}
