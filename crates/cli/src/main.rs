//! `tokenseal` — operator CLI entry point.
//!
//! Startup sequence:
//! 1. Parse arguments.
//! 2. Initialise structured JSON logging (stderr).
//! 3. Load encryption groups from the optional config file and `TOKENSEAL__*`.
//! 4. Run the subcommand against a fresh [`InstanceRegistry`].

mod commands;
mod telemetry;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokenseal::{EncryptConfig, InstanceRegistry, DEFAULT_INSTANCE};

#[derive(Parser)]
#[command(name = "tokenseal", about = "Encode and decode AEAD tokens with named key groups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file defining encryption groups.
    #[arg(long, global = true, env = "TOKENSEAL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt stdin and print a token.
    Encode {
        #[arg(short, long, default_value = DEFAULT_INSTANCE)]
        group: String,
    },
    /// Decrypt a token read from stdin.
    Decode {
        #[arg(short, long, default_value = DEFAULT_INSTANCE)]
        group: String,
    },
    /// Resolve every configured group and report its cipher.
    Check,
    /// List supported ciphers and whether this machine can run them.
    Ciphers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init(&cli.log_level)?;

    if let Commands::Ciphers = cli.command {
        return commands::ciphers(io::stdout().lock());
    }

    let cfg = EncryptConfig::load(cli.config.as_deref())
        .context("failed to load encryption configuration")?;
    let groups = cfg.group_names();
    let registry = InstanceRegistry::new(cfg);

    match cli.command {
        Commands::Encode { group } => {
            commands::encode(&registry, &group, io::stdin().lock(), io::stdout().lock()).await
        }
        Commands::Decode { group } => {
            commands::decode(&registry, &group, io::stdin().lock(), io::stdout().lock()).await
        }
        Commands::Check => commands::check(&registry, &groups, io::stdout().lock()).await,
        Commands::Ciphers => commands::ciphers(io::stdout().lock()),
    }
}
