use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    keyfile::{handle_clean, handle_generate, GenerateArgs},
    resolve::{handle_check, handle_resolve},
};

#[derive(Parser)]
#[command(name = "keysign")]
#[command(about = "Resolve Android release signing credentials from key.properties", long_about = None)]
#[command(version = keysign_core::VERSION)]
struct Cli {
    /// Android project root containing the properties file
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    /// Properties file name, relative to the project root
    #[arg(long, global = true)]
    file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved release signing configuration
    Resolve {
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate the properties file, failing on misconfiguration
    Check {
        /// Also fail when the properties file is absent
        #[arg(long)]
        require: bool,
    },

    /// Write a properties file
    Generate(GenerateArgs),

    /// Remove the properties file
    Clean,
}

fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    // Diagnostics go to stderr so stdout stays parseable with --json
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keysign=info,keysign_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = config::resolve_settings(cli.project_root.as_deref(), cli.file.as_deref())?;

    match cli.command {
        Commands::Resolve { json } => handle_resolve(&settings, json)?,
        Commands::Check { require } => handle_check(&settings, require)?,
        Commands::Generate(args) => handle_generate(&settings, args)?,
        Commands::Clean => handle_clean(&settings)?,
    }

    Ok(())
}
