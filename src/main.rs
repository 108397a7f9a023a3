//! `wsdl-bootstrap` command line tool.
//!
//! Resolves WSDL sources through the local cache using the same transport
//! settings a SOAP client bootstrap would use.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use wsdl_bootstrap::config::loader::load_config;
use wsdl_bootstrap::config::BootstrapConfig;
use wsdl_bootstrap::observability::init_logging;
use wsdl_bootstrap::transport::{configure, ClientOptions, HttpFetcher, ProxyRegistry};
use wsdl_bootstrap::WsdlCache;

#[derive(Parser)]
#[command(name = "wsdl-bootstrap")]
#[command(about = "Fetch and cache WSDL documents for SOAP clients", long_about = None)]
struct Cli {
    /// Path to configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the cache directory from the config file
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a WSDL through the cache and print the local path
    Fetch {
        /// WSDL URL; falls back to `defaults.wsdl`
        url: Option<String>,

        /// Refetch even if the cached copy is fresh
        #[arg(short, long)]
        force: bool,
    },
    /// Print the cache path for a WSDL without fetching
    Path {
        /// WSDL URL; falls back to `defaults.wsdl`
        url: Option<String>,
    },
    /// Print the options the SOAP engine would receive
    Options,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BootstrapConfig::default(),
    };
    if let Some(dir) = cli.cache_dir {
        config.cache.dir = dir;
    }

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    init_logging(Some(level));

    tracing::debug!(
        cache_dir = %config.cache.dir.display(),
        freshness_secs = config.cache.freshness_secs,
        proxies = config.proxies.len(),
        "Configuration loaded"
    );

    let registry = ProxyRegistry::new(config.proxies.clone());
    let options = ClientOptions::from_map(config.options.clone());
    let transport = configure(options, &registry, &config.defaults)?;

    match cli.command {
        Commands::Fetch { url, force } => {
            let source = source_or_default(url, &config)?;
            let fetcher = HttpFetcher::new(&transport.client)?;
            let cache = WsdlCache::from_config(&config.cache, Arc::new(fetcher));
            let path = cache.resolve(&source, force)?;
            println!("{}", path.display());
        }
        Commands::Path { url } => {
            let source = source_or_default(url, &config)?;
            let cache = WsdlCache::from_config(
                &config.cache,
                Arc::new(HttpFetcher::new(&transport.client)?),
            );
            let path = cache.entry_path(&source);
            let state = if cache.is_fresh(&path) { "fresh" } else { "stale" };
            println!("{} ({})", path.display(), state);
        }
        Commands::Options => {
            println!("{}", serde_json::to_string_pretty(&transport.engine)?);
        }
    }

    Ok(())
}

fn source_or_default(url: Option<String>, config: &BootstrapConfig) -> Result<String, wsdl_bootstrap::ConfigError> {
    url.or_else(|| config.defaults.wsdl.clone())
        .ok_or(wsdl_bootstrap::ConfigError::MissingWsdl)
}
