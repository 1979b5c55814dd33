//! Merged entry stylesheet generation.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fmt::Write;
use std::path::Path;

use crate::plan::CompilationPlan;

/// Render the merged entry: theme imports in canonical order, then component
/// imports in plan order.
pub fn render_entry_stylesheet(plan: &CompilationPlan) -> String {
    let mut scss = String::new();
    for (_, path) in &plan.theme {
        push_import(&mut scss, path);
    }
    for path in &plan.components {
        push_import(&mut scss, path);
    }
    scss
}

fn push_import(scss: &mut String, path: &Path) {
    let path = path.to_string_lossy().replace('\\', "/");
    // Writing to a String cannot fail
    let _ = writeln!(scss, "@import \"{path}\";");
}
