//! Polling scheduler
//!
//! Drives the discovery loop: sleep, discover (incremental or full per the
//! configured ratio), reconcile, emit. Cycles are strictly serialized; the
//! next sleep only begins after the previous cycle's emission attempt
//! completed. All recoverable errors (inventory fetch, notification) are
//! contained within their cycle and never escape the loop.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use crate::diff::Diff;
use crate::engine::DiscoveryEngine;
use crate::error::Result;
use crate::notifier::{DiffPayload, Notifier};

/// Which discovery mode a cycle ran in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Diff against previous roster and host state
    Incremental,
    /// Declarative broadcast of all live hostnames
    Full,
}

/// Outcome of a single cycle, surfaced for tests and monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Mode the cycle ran in
    pub mode: DiscoveryMode,
    /// Reconciled diff (empty on fetch failure or when nothing changed)
    pub diff: Diff<String>,
    /// Whether the notifier was invoked and succeeded
    pub emitted: bool,
}

/// Composes the engine and notifier into the polling loop
///
/// Maintains the cycle counter: the counter is incremented each cycle and,
/// when it reaches `full_discovery_ratio`, that cycle runs full discovery
/// and the counter resets to 0. With ratio 3 the full cycles are the 3rd,
/// 6th, 9th, and so on. Ratio 0 disables full discovery.
pub struct Scheduler {
    engine: DiscoveryEngine,
    notifier: Box<dyn Notifier>,
    server_name: String,
    interval: Duration,
    full_ratio: u32,
    cycle: u32,
}

impl Scheduler {
    /// Create a scheduler from a validated configuration
    pub fn new(
        engine: DiscoveryEngine,
        notifier: Box<dyn Notifier>,
        config: SchedulerConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            engine,
            notifier,
            server_name: config.server_name,
            interval: config.discovery_interval,
            full_ratio: config.full_discovery_ratio,
            cycle: 0,
        })
    }

    /// Engine state, for inspection in tests
    pub fn engine(&self) -> &DiscoveryEngine {
        &self.engine
    }

    /// Run the polling loop until SIGINT
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the polling loop with a controlled shutdown signal
    ///
    /// Contract tests need deterministic shutdown; production code uses
    /// [`Scheduler::run`], which stops on OS signals.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!(
            "discovery loop started (interval {:?}, full-discovery ratio {})",
            self.interval, self.full_ratio
        );

        if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {
                        self.run_cycle().await;
                    }

                    _ = &mut rx => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {
                        self.run_cycle().await;
                    }

                    _ = tokio::signal::ctrl_c() => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Run exactly one cycle: discover, reconcile, emit
    ///
    /// Never fails: fetch and notification errors are logged and reflected
    /// in the returned report, leaving the next cycle independent.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle += 1;

        let mode = if self.full_ratio > 0 && self.cycle == self.full_ratio {
            self.cycle = 0;
            DiscoveryMode::Full
        } else {
            DiscoveryMode::Incremental
        };

        let raw = match mode {
            DiscoveryMode::Incremental => self.engine.discover().await,
            DiscoveryMode::Full => self.engine.discover_full().await,
        };

        let raw = match raw {
            Ok(diff) => diff,
            Err(e) => {
                error!("encountered error during discovery: {}", e);
                return CycleReport {
                    mode,
                    diff: Diff::new(),
                    emitted: false,
                };
            }
        };

        debug!("cleaning diff");
        let cleaned = raw.reconciled();

        if cleaned.is_empty() {
            info!("no changes detected, skipping");
            return CycleReport {
                mode,
                diff: cleaned,
                emitted: false,
            };
        }

        let payload = DiffPayload {
            server_name: self.server_name.clone(),
            diff: cleaned.clone(),
        };

        // Single attempt; the next scheduled cycle is the retry strategy
        let emitted = match self.notifier.notify(&payload).await {
            Ok(()) => {
                debug!(
                    "sent diff (+{} -{})",
                    cleaned.added.len(),
                    cleaned.removed.len()
                );
                true
            }
            Err(e) => {
                warn!("error sending diff: {}", e);
                false
            }
        };

        CycleReport {
            mode,
            diff: cleaned,
            emitted,
        }
    }
}
