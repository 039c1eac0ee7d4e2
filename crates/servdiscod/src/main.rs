// # servdiscod - Discovery Daemon
//
// Thin integration layer: reads configuration from environment variables,
// initializes logging and the runtime, composes the Docker inventory and
// HTTP notifier into the core scheduler, and handles shutdown signals.
// All discovery logic lives in servdisco-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `SERVER_NAME`: identifies this host in emitted diffs (required)
// - `ENDPOINT`: target URL for diff delivery (required)
// - `ENDPOINT_KEY`: optional bearer token for the endpoint
// - `DISCOVERY_INTERVAL`: seconds between cycles (default 30)
// - `FULL_DISCOVERY_INTERVAL`: seconds between full-discovery cycles;
//   0 or unset disables full discovery; rounded to a multiple of
//   `DISCOVERY_INTERVAL` when it is not one
// - `LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export SERVER_NAME=node-1
// export ENDPOINT=https://registrar.internal/api/diff
// export ENDPOINT_KEY=secret
// export DISCOVERY_INTERVAL=30
// export FULL_DISCOVERY_INTERVAL=300
//
// servdiscod
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use servdisco_core::config::full_discovery_ratio;
use servdisco_core::{DiscoveryEngine, Scheduler, SchedulerConfig};
use servdisco_docker::DockerInventory;
use servdisco_notifier_http::HttpNotifier;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

const DEFAULT_DISCOVERY_INTERVAL_SECS: u64 = 30;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    server_name: String,
    endpoint: String,
    endpoint_key: Option<String>,
    discovery_interval: Duration,
    full_discovery_interval: Duration,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            server_name: env::var("SERVER_NAME").unwrap_or_default(),
            endpoint: env::var("ENDPOINT").unwrap_or_default(),
            endpoint_key: env::var("ENDPOINT_KEY").ok().filter(|k| !k.is_empty()),
            discovery_interval: Duration::from_secs(
                env::var("DISCOVERY_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|&secs| secs > 0)
                    .unwrap_or(DEFAULT_DISCOVERY_INTERVAL_SECS),
            ),
            full_discovery_interval: Duration::from_secs(
                env::var("FULL_DISCOVERY_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
            ),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.server_name.is_empty() {
            anyhow::bail!(
                "SERVER_NAME is required. \
                Set it via: export SERVER_NAME=node-1"
            );
        }

        if self.endpoint.is_empty() {
            anyhow::bail!(
                "ENDPOINT is required. \
                Set it via: export ENDPOINT=https://registrar.internal/api/diff"
            );
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            anyhow::bail!(
                "ENDPOINT must use HTTP or HTTPS scheme. Got: {}",
                self.endpoint
            );
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("starting servdiscod");
    info!(
        "server {} reporting to {} every {:?}",
        config.server_name, config.endpoint, config.discovery_interval
    );

    if config.endpoint_key.is_none() {
        warn!("no ENDPOINT_KEY set, requests may be denied");
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let ratio = full_discovery_ratio(config.discovery_interval, config.full_discovery_interval);

    if ratio == 0 {
        info!("full discovery disabled");
    } else {
        if config.full_discovery_interval.as_secs() % config.discovery_interval.as_secs() != 0 {
            warn!(
                "FULL_DISCOVERY_INTERVAL is not a multiple of DISCOVERY_INTERVAL, \
                rounding to every {} cycles",
                ratio
            );
        }
        info!("full discovery every {} cycles", ratio);
    }

    let inventory = DockerInventory::connect()?;
    let notifier = HttpNotifier::new(&config.endpoint, config.endpoint_key.clone())?;

    let engine = DiscoveryEngine::new(Box::new(inventory));
    let scheduler_config = SchedulerConfig {
        server_name: config.server_name.clone(),
        discovery_interval: config.discovery_interval,
        full_discovery_ratio: ratio,
    };

    let mut scheduler = Scheduler::new(engine, Box::new(notifier), scheduler_config)?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = tokio::spawn(async move { scheduler.run_with_shutdown(Some(shutdown_rx)).await });

    let signal_name = wait_for_shutdown().await?;
    info!("received shutdown signal: {}", signal_name);

    let _ = shutdown_tx.send(());
    handle.await??;

    info!("server exited gracefully");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
