use anyhow::{bail, ensure, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use ferrumkv::aof::AofBackend;
use ferrumkv::{Config, Dispatcher, Keyspace};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Typed key-value engine with per-key expiry
#[derive(Parser)]
#[command(name = "ferrumkv", version, about)]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run one command and print the reply
    Exec {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },

    /// Delete every expired key once
    Sweep,

    /// Sweep expired keys periodically until Ctrl-C
    Watch {
        /// Overrides `sweep_interval_ms` from the config
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Rewrite the append-only log
    Compact,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    init_logging(&config.log_filter);

    match args.command {
        Action::Exec { argv } => exec(&config, &argv),
        Action::Sweep => {
            let ks = Keyspace::open(&config.aof)?;
            println!("(integer) {}", ks.cleanup_expired()?);
            Ok(ExitCode::SUCCESS)
        }
        Action::Watch { interval_ms } => {
            watch(&config, interval_ms.unwrap_or(config.sweep_interval_ms)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Action::Compact => {
            if !config.aof.enabled {
                bail!("the append-only log is disabled in this config");
            }
            let backend = AofBackend::open(&config.aof)?;
            let kept = backend.compact()?;
            println!("{} entries kept in {}", kept, backend.path().display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr so replies
/// stay alone on stdout.
fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exec(config: &Config, argv: &[String]) -> Result<ExitCode> {
    let keyspace = Arc::new(Keyspace::open(&config.aof)?);
    let dispatcher = Dispatcher::new(keyspace);

    let argv: Vec<Bytes> = argv.iter().map(|arg| Bytes::from(arg.clone())).collect();
    let reply = dispatcher.dispatch(&argv);
    println!("{}", reply);

    Ok(if reply.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn watch(config: &Config, interval_ms: u64) -> Result<()> {
    ensure!(interval_ms > 0, "the sweep interval must be greater than zero");

    let keyspace = Keyspace::open(&config.aof)?;
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
    info!("Sweeping expired keys every {}ms", interval_ms);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = keyspace.cleanup_expired() {
                    error!("Sweep failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}
