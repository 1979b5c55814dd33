//! SCSS bundle compilation for the Semi design system.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - Discovery of component and theme SCSS sources (`catalog`)
//! - Resolution of the files that make up the merged entry (`plan`)
//! - Override import injection into component partials (`rewrite`)
//! - Two-pass (expanded + compressed) compilation with grass (`orchestrator`)

mod catalog;
mod compiler;
mod config;
mod entry;
mod error;
mod importer;
mod orchestrator;
mod plan;
mod rewrite;
mod scratch;

pub use catalog::{
    ComponentScssMap, ScssMap, THEME_FILE_NAMES, ThemeScssMap, generate_components_scss_map,
    generate_scss_map, generate_theme_scss_map,
};
pub use compiler::{CompileDiagnostic, GrassCompiler, StylesheetCompiler};
pub use config::{CompileScssConfig, CompileScssConfigBuilder};
pub use entry::render_entry_stylesheet;
pub use error::ScssCompileError;
pub use importer::OverrideFs;
pub use orchestrator::{CompileReport, CompileStage, PassOutcome, ScssCompilation};
pub use plan::{CompilationPlan, EXTRA_COMPONENT_FILES, ThemePathMode};
pub use rewrite::{RewriteOutcome, inject_extra_import, rewrite_file};
pub use scratch::prepare_scratch_dir;
