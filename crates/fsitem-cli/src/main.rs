//! # fsitem CLI
//!
//! Command-line front end for inspecting local filesystem items.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fsitem::Item;
use fsitem_config::logging::{init_logging, LogLevel};
use fsitem_config::{log_cli_debug, log_cli_info, Config};

mod report;

/// fsitem - inspect files as content sources
#[derive(Parser)]
#[command(name = "fsitem")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print identity, locator, size, etag and merged metadata as JSON
    Inspect {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Root the item was discovered under; names are relative to it
        #[arg(long)]
        root: Option<PathBuf>,

        /// Explicit sidecar metadata file
        #[arg(long, value_name = "FILE", conflicts_with = "no_sidecar")]
        meta: Option<PathBuf>,

        /// Ignore sidecar files
        #[arg(long)]
        no_sidecar: bool,
    },

    /// Stream the item's bytes to stdout
    Cat {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print config file locations
    Path,
}

fn main() -> Result<()> {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    let config = fsitem_config::config();
    let level = config.logging.level.parse().unwrap_or(LogLevel::Warn);
    init_logging(level);

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect {
            path,
            root,
            meta,
            no_sidecar,
        } => cmd_inspect(config, &path, root.as_deref(), meta, no_sidecar),
        Commands::Cat { path } => cmd_cat(&path),
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                print!("{}", config.to_toml());
                Ok(())
            }
            ConfigCommands::Path => {
                let global = Config::global_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(no home directory)".to_string());
                println!("Global:  {}", global);
                println!("Project: {}", fsitem_config::PROJECT_CONFIG_PATH);
                Ok(())
            }
        },
    }
}

fn build_item(
    config: &Config,
    path: &Path,
    root: Option<&Path>,
    meta: Option<PathBuf>,
    no_sidecar: bool,
) -> Item {
    let item = match root {
        Some(root) => Item::under_root(root, path),
        None => Item::new(path, None, 0),
    };

    if no_sidecar {
        return item;
    }
    if let Some(meta) = meta {
        return item.with_meta_path(meta);
    }
    match config.sidecar.sidecar_for(path) {
        Some(sidecar) if sidecar.is_file() => {
            let shown = sidecar.display().to_string();
            log_cli_debug!("Using sidecar", sidecar = shown.as_str());
            item.with_meta_path(sidecar)
        }
        Some(sidecar) => {
            let shown = sidecar.display().to_string();
            log_cli_debug!("No sidecar found", sidecar = shown.as_str());
            item
        }
        None => item,
    }
}

fn cmd_inspect(
    config: &Config,
    path: &Path,
    root: Option<&Path>,
    meta: Option<PathBuf>,
    no_sidecar: bool,
) -> Result<()> {
    let item = build_item(config, path, root, meta, no_sidecar);
    let report = report::ItemReport::collect(&item)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_cat(path: &Path) -> Result<()> {
    let item = Item::new(path, None, 0);
    let shown = item.id().display().to_string();
    log_cli_info!("Streaming item", id = shown.as_str());
    let mut file = item.open()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    io::copy(&mut file, &mut out).with_context(|| format!("Failed to stream {}", path.display()))?;
    Ok(())
}
