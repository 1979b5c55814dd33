//! semi-scss CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use semi_scss_compile::{
    CompileScssConfig, CompileScssConfigBuilder, ScssCompilation, prepare_scratch_dir,
};

#[derive(Parser, Debug)]
#[command(name = "semi-scss")]
#[command(version)]
#[command(about = "Assemble and compile the Semi SCSS bundle", long_about = None)]
struct Cli {
    /// TOML configuration file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Foundation directory (one subdirectory per component)
    #[arg(long)]
    foundation: Option<PathBuf>,

    /// Theme directory
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Where to write the merged SCSS entry
    #[arg(long)]
    output_scss: Option<PathBuf>,

    /// Where to write the compiled CSS
    #[arg(short = 'o', long)]
    output_css: Option<PathBuf>,

    /// Where to write the minified CSS (enables the minified pass)
    #[arg(long)]
    output_css_min: Option<PathBuf>,

    /// Require a minified build
    #[arg(long)]
    min: bool,

    /// Import injected after `./variables.scss` in component partials
    #[arg(long)]
    extra_import: Option<String>,

    /// Reference theme files by absolute path in the merged entry
    #[arg(long)]
    absolute_paths: bool,

    /// Prepare an empty scratch directory and print its path
    #[arg(long)]
    scratch: bool,
}

impl Cli {
    fn into_config(self) -> Result<CompileScssConfig> {
        let mut builder = match &self.config {
            Some(path) => CompileScssConfigBuilder::from_toml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => CompileScssConfig::builder(),
        };

        if let Some(path) = self.foundation {
            builder = builder.foundation_path(path);
        }
        if let Some(path) = self.theme {
            builder = builder.theme_path(path);
        }
        if let Some(path) = self.output_scss {
            builder = builder.output_scss_path(path);
        }
        if let Some(path) = self.output_css {
            builder = builder.output_css_path(path);
        }
        if let Some(path) = self.output_css_min {
            builder = builder.output_css_min_path(path);
        }
        if let Some(import) = self.extra_import {
            builder = builder.extra_import(import);
        }
        if self.min {
            builder = builder.is_min(true);
        }
        if self.absolute_paths {
            builder = builder.use_absolute_path(true);
        }

        builder.build().context("Invalid configuration")
    }
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "semi_scss=info,semi_scss_compile=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if cli.scratch {
        let dir = prepare_scratch_dir().context("Failed to prepare scratch directory")?;
        println!("{}", dir.display());
    }

    let config = cli.into_config()?;
    info!(
        foundation = %config.foundation_path().display(),
        theme = %config.theme_path().display(),
        "Compiling SCSS"
    );

    let success = ScssCompilation::new(config)
        .compile()
        .context("SCSS compilation aborted")?;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
