mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use photoframe_core::FrameConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Manage the storage of a networked photo frame.
#[derive(Debug, Parser)]
#[command(name = "photoframe", version)]
struct Cli {
    /// Hostname or IP address of the frame.
    #[arg(long, env = "PHOTOFRAME_HOST", global = true)]
    host: Option<String>,

    /// JSON configuration file (host, port, timeouts, chunk size).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a folder.
    List {
        folder: String,
        /// Print the device's XML instead of JSON.
        #[arg(long)]
        raw: bool,
    },
    /// Download a file, to stdout when no local path is given.
    Get {
        remote: String,
        local: Option<PathBuf>,
    },
    /// Fetch and decode an image, printing its dimensions.
    Image { remote: String },
    /// Delete a file or an empty folder.
    Delete { path: String },
    /// Delete a folder and everything in it.
    DeleteFolder { folder: String },
    /// Upload a local file into a folder.
    Upload {
        folder: String,
        local: PathBuf,
        /// Remote file name, defaults to the local file name.
        #[arg(long)]
        name: Option<String>,
        /// Mime type, `content/unknown` when omitted.
        #[arg(long)]
        mime: Option<String>,
    },
    /// Create a folder inside a parent folder.
    Mkdir { parent: String, name: String },
    /// Rename a folder.
    Rename { src: String, dst: String },
    /// Show storage usage.
    FsInfo,
    /// Check whether a folder exists.
    Exists { folder: String },
}

/// Merge the optional config file with the host override.
fn resolve_config(host: Option<&str>, config: Option<&PathBuf>) -> anyhow::Result<FrameConfig> {
    let mut resolved = match config {
        Some(path) => FrameConfig::from_json_file(path)?,
        None => FrameConfig::new(""),
    };
    if let Some(host) = host {
        resolved.host = host.to_string();
    }
    resolved
        .validate()
        .context("No usable device settings (set --host, PHOTOFRAME_HOST or --config)")?;
    Ok(resolved)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(cli.host.as_deref(), cli.config.as_ref())?;
    debug!("Using frame at {}:{}", config.host, config.port);

    commands::run(&config, cli.command).await
}
