//! SCSS compiler backend.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The pipeline only needs "entry file + import resolver → CSS or a
//! diagnostic". `StylesheetCompiler` is that seam; `GrassCompiler` implements
//! it with the grass crate, a pure Rust implementation targeting dart-sass.

use std::fmt;
use std::path::Path;

use grass::{Options, OutputStyle};

/// A compiler-reported problem, localized to one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    pub message: String,
    /// 1-based line, when the compiler reported a location.
    pub line: Option<usize>,
    /// 1-based column, when the compiler reported a location.
    pub column: Option<usize>,
}

impl CompileDiagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{} (line {line}, column {column})", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Compiles an SCSS entry file to CSS.
pub trait StylesheetCompiler {
    /// Compile `entry`, resolving it and its imports through `fs`.
    fn compile(
        &self,
        entry: &Path,
        fs: &dyn grass::Fs,
        style: OutputStyle,
    ) -> Result<String, CompileDiagnostic>;
}

/// grass-backed compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassCompiler;

impl StylesheetCompiler for GrassCompiler {
    fn compile(
        &self,
        entry: &Path,
        fs: &dyn grass::Fs,
        style: OutputStyle,
    ) -> Result<String, CompileDiagnostic> {
        let options = Options::default().fs(fs).style(style);
        grass::from_path(entry, &options).map_err(diagnostic_from_grass)
    }
}

fn diagnostic_from_grass(error: Box<grass::Error>) -> CompileDiagnostic {
    let rendered = error.to_string();
    match (*error).kind() {
        grass::ErrorKind::ParseError { message, loc, .. } => CompileDiagnostic {
            message,
            line: Some(loc.begin.line + 1),
            column: Some(loc.begin.column + 1),
        },
        _ => CompileDiagnostic::new(rendered),
    }
}
