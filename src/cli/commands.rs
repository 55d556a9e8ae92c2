use crate::app::{build_dispatcher, build_registry};
use crate::config::AppConfig;
use crate::controllers::Stores;
use crate::logging::{init_logging_with_config, LogConfig};
use crate::runtime_config::RuntimeConfig;
use crate::server;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for the front controller
#[derive(Debug, Parser)]
#[command(name = "frontctl", version)]
#[command(about = "Front-controller dispatch server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the bundled controllers over HTTP
    Serve {
        /// YAML configuration file
        #[arg(short, long, env = "FRONTCTL_CONFIG")]
        config: Option<PathBuf>,

        /// Address to bind, overrides `server.addr`
        #[arg(long)]
        addr: Option<String>,

        /// Template directory, overrides `views.dir`
        #[arg(long)]
        views: Option<PathBuf>,
    },
    /// Print the routing table and exit
    Routes,
}

/// Load the configuration file, if any, and apply command-line overrides.
pub fn resolve_config(
    path: Option<&Path>,
    addr: Option<&str>,
    views: Option<&Path>,
) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(addr) = addr {
        config.server.addr = addr.to_string();
    }
    if let Some(views) = views {
        config.views.dir = views.to_path_buf();
    }
    Ok(config)
}

/// Parse the process arguments and run the selected command.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            addr,
            views,
        } => {
            let config = resolve_config(config.as_deref(), addr.as_deref(), views.as_deref())?;
            let _log_guard = init_logging_with_config(&LogConfig::from_env())?;
            RuntimeConfig::from_env().apply();

            let dispatcher = build_dispatcher(&config, &Stores::default())
                .context("failed to register routes")?;
            info!(
                addr = %config.server.addr,
                views = %config.views.dir.display(),
                routes = dispatcher.registry().len(),
                "Starting server"
            );
            let handle = server::serve(Arc::new(dispatcher), config.server.addr.as_str())
                .with_context(|| format!("failed to bind {}", config.server.addr))?;
            handle
                .join()
                .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
        }
        Commands::Routes => {
            let registry = build_registry(&Stores::default())?;
            for route in registry.routes() {
                println!("{route}");
            }
            Ok(())
        }
    }
}
