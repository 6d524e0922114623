use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use explorer_core::config::ExplorerConfig;
use explorer_core::handler::RequestHandler;
use explorer_core::service::ExplorerService;
use explorer_host::HostFileSystem;

mod shell;

#[derive(Parser, Debug)]
#[command(name = "fs-explorer")]
#[command(about = "Navigate and manage a directory tree from the terminal")]
#[command(version)]
struct Cli {
    /// Directory to explore (default: config file value, else ".")
    #[arg(long, env = "EXPLORER_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Path to config file
    #[arg(long, env = "EXPLORER_CONFIG_PATH", global = true)]
    config_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "EXPLORER_LOG_LEVEL", global = true)]
    log_level: String,

    /// Read JSON requests from stdin and write JSON responses, one per line
    #[arg(long)]
    json: bool,

    /// Maximum back-history depth (0 = unbounded)
    #[arg(long, global = true)]
    history_limit: Option<usize>,

    /// Filesystem timeout per request in milliseconds (0 = none)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// List directories before files
    #[arg(long, global = true)]
    directories_first: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries shell/JSON output, logs go to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "fs-explorer v{} starting (os={}, arch={})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
    );

    let config_path = cli
        .config_path
        .clone()
        .unwrap_or_else(ExplorerConfig::default_path);

    let mut config = ExplorerConfig::load_or_default(&config_path)?;
    apply_overrides(&mut config, &cli);

    if let Some(Commands::InitConfig { force }) = cli.command {
        if config_path.exists() && !force {
            anyhow::bail!(
                "config already exists at {} (use --force to overwrite)",
                config_path.display()
            );
        }
        config.save(&config_path)?;
        println!("config written to {}", config_path.display());
        return Ok(());
    }

    let service = ExplorerService::start(&config, Arc::new(HostFileSystem::new()))
        .context("cannot start explorer session")?;
    let handler = RequestHandler::new(service);

    if cli.json {
        shell::run_json(&handler).await
    } else {
        shell::run_interactive(&handler).await
    }
}

/// CLI flags win over the config file
fn apply_overrides(config: &mut ExplorerConfig, cli: &Cli) {
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(limit) = cli.history_limit {
        config.history_limit = limit;
    }
    if let Some(ms) = cli.timeout_ms {
        config.fs_timeout_ms = ms;
    }
    if cli.directories_first {
        config.directories_first = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "fs-explorer",
            "--root",
            "/srv/data",
            "--history-limit",
            "4",
            "--timeout-ms",
            "0",
            "--directories-first",
        ]);
        let mut config = ExplorerConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.root, PathBuf::from("/srv/data"));
        assert_eq!(config.history_limit, 4);
        assert_eq!(config.fs_timeout(), None);
        assert!(config.directories_first);
    }

    #[test]
    fn test_absent_flags_keep_config_values() {
        let cli = Cli::parse_from(["fs-explorer"]);
        let mut config = ExplorerConfig {
            history_limit: 9,
            ..Default::default()
        };
        apply_overrides(&mut config, &cli);
        assert_eq!(config.history_limit, 9);
    }

    #[test]
    fn test_init_config_subcommand() {
        let cli = Cli::parse_from(["fs-explorer", "init-config", "--force"]);
        assert!(matches!(cli.command, Some(Commands::InitConfig { force: true })));
    }
}
