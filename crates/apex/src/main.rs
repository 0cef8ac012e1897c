//! Apex CLI - generate the landing page and client demo sites.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "apex")]
#[command(about = "Generate the Apex Builder landing page and client demo sites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to apex.toml config file
    #[arg(short, long, default_value = "apex.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the landing page and demo sites (default)
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip CSS minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Build, then rebuild on change and live-reload the browser
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Preview a built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },

    /// Create a starter config, client data and templates
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        None => {
            commands::build::run(&cli.config, None, None).await?;
        }
        Some(Commands::Build { output, no_minify }) => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, output, minify).await?;
        }
        Some(Commands::Dev { port, no_open }) => {
            commands::dev::run(&cli.config, port, !no_open).await?;
        }
        Some(Commands::Serve { port, dir }) => {
            commands::serve::run(port, dir).await?;
        }
        Some(Commands::Init { yes }) => {
            commands::init::run(&cli.config, yes).await?;
        }
    }

    Ok(())
}
