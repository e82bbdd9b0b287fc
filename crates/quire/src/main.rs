//! Quire CLI - documentation contents and API reference tooling.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Build documentation contents trees and API reference data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to quire.toml config file
    #[arg(short, long, default_value = "quire.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize quire.toml and sample content in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the contents tree as JSON
    Contents {
        /// Grouped content records (JSON); defaults to scanning the docs directory
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a path in the contents tree
    Lookup {
        /// Slash-delimited path, e.g. /getting-started/install
        path: String,

        /// Grouped content records (JSON); defaults to scanning the docs directory
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Group API reference pages into sidebar categories
    Categories {
        /// Reference entries (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read attribute tables from an MDX file
    Attributes {
        /// MDX or markdown file
        file: PathBuf,

        /// Skip list shape validation
        #[arg(long)]
        lenient: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Contents { input, output } => {
            commands::contents::run(&cli.config, input, output)?;
        }
        Commands::Lookup { path, input } => {
            commands::lookup::run(&cli.config, &path, input)?;
        }
        Commands::Categories { input, output } => {
            commands::categories::run(&cli.config, &input, output)?;
        }
        Commands::Attributes { file, lenient } => {
            commands::attributes::run(&cli.config, &file, lenient)?;
        }
    }

    Ok(())
}
