//! Command-line interface for mediacat.
//!
//! Runs the interactive shell by default, and offers a couple of
//! non-interactive helpers for checking save files and configuration.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config;
use crate::session::Session;

pub mod shell;

pub use shell::{write_statistics, Shell};

/// mediacat - manage a media library and its collections
#[derive(Parser, Debug)]
#[command(name = "mediacat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive command shell (default)
    Shell {
        /// Save file to load before the first prompt
        #[arg(short, long, env = "MEDIACAT_RESTORE")]
        restore: Option<PathBuf>,
    },

    /// Validate a save file and print a summary
    Check {
        /// Save file to validate
        file: PathBuf,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command.unwrap_or(Commands::Shell { restore: None }) {
            Commands::Shell { restore } => run_shell(restore),
            Commands::Check { file } => check_file(file),
            Commands::Config => show_config(),
        }
    }
}

/// Run the shell on stdin/stdout
fn run_shell(restore: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock())
        .with_prompt(cfg.shell.prompt.clone())
        .with_data_dir(cfg.data_dir.clone());

    if let Some(path) = restore {
        shell
            .session_mut()
            .restore_all(&path)
            .with_context(|| format!("Failed to restore {}", path.display()))?;
    } else if let Some(path) = &cfg.shell.restore_on_start {
        if let Err(e) = shell.session_mut().restore_all(path) {
            warn!(path = %path.display(), error = %e, "Skipping startup restore");
        }
    }

    shell.run()
}

/// Restore a save file into a scratch session and summarize it
fn check_file(file: PathBuf) -> Result<()> {
    let mut session = Session::new();
    session
        .restore_all(&file)
        .with_context(|| format!("Invalid save file: {}", file.display()))?;

    let allocations = session.allocations();
    let mut out = io::stdout().lock();

    writeln!(out, "{}: ok", file.display())?;
    writeln!(out, "Records: {}", allocations.records)?;
    writeln!(out, "Collections: {}", allocations.collections)?;
    write_statistics(&mut out, &session.statistics(), allocations.records)?;

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("mediacat configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Data dir: {}", cfg.data_dir.display());
    println!();
    println!("Shell:");
    println!("  Prompt:           {:?}", cfg.shell.prompt);
    println!(
        "  Restore on start: {}",
        cfg.shell
            .restore_on_start
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );

    Ok(())
}
