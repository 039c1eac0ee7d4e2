//! Discovery engine
//!
//! The engine runs one discovery cycle at a time against the container
//! inventory and accumulates a cycle-level hostname diff.
//!
//! ```text
//! ┌────────────────────┐
//! │ ContainerInventory │─── ContainerRecord[] ───┐
//! └────────────────────┘                         ▼
//!                                       ┌─────────────────┐
//!                                       │ DiscoveryEngine │
//!                                       └─────────────────┘
//!                                                │
//!                        ┌───────────────────────┼──────────────────┐
//!                        ▼                       ▼                  ▼
//!                 roster diff            per-container         HostStateStore
//!                 (ids only)             hostname diff         (read/write)
//! ```
//!
//! Two modes:
//! - **Incremental** ([`DiscoveryEngine::discover`]): diffs against the
//!   previous roster and the host state store, mutating both, and returns
//!   the minimal added/removed change.
//! - **Full** ([`DiscoveryEngine::discover_full`]): broadcasts every
//!   currently live hostname as `added` without touching roster or state;
//!   the next incremental cycle reconciles any drift.
//!
//! A failed inventory fetch returns `Err` before any mutation, so a bad
//! cycle never corrupts the roster or state.

use tracing::{debug, info};

use crate::diff::{Diff, diff};
use crate::error::Result;
use crate::inventory::ContainerInventory;
use crate::labels::hosts_from_labels;
use crate::state::HostStateStore;

/// Orchestrates discovery cycles and owns all cross-cycle state
///
/// The roster (container ids seen last cycle) and the host state store are
/// plain fields: the scheduler serializes cycles, so there is exactly one
/// writer and no locking.
pub struct DiscoveryEngine {
    /// Container inventory to poll each cycle
    inventory: Box<dyn ContainerInventory>,

    /// id → hostnames observed as of the last completed incremental cycle
    state: HostStateStore,

    /// Container ids observed in the previous incremental cycle
    roster: Vec<String>,
}

impl DiscoveryEngine {
    /// Create an engine with empty state
    pub fn new(inventory: Box<dyn ContainerInventory>) -> Self {
        Self {
            inventory,
            state: HostStateStore::new(),
            roster: Vec::new(),
        }
    }

    /// Host state as of the last completed incremental cycle
    pub fn state(&self) -> &HostStateStore {
        &self.state
    }

    /// Container ids observed in the previous incremental cycle
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Run one incremental discovery cycle
    ///
    /// Returns the raw accumulated diff; the caller reconciles it before
    /// emission. On inventory failure the error is returned and neither the
    /// roster nor the state store is touched.
    pub async fn discover(&mut self) -> Result<Diff<String>> {
        debug!("starting discovery");

        let new_containers = self.inventory.enabled_containers().await?;

        let new_ids: Vec<String> = new_containers.iter().map(|c| c.id.clone()).collect();
        let container_diff = diff(&self.roster, &new_ids);
        self.roster = new_ids;

        info!("found {} enabled containers", new_containers.len());
        if !container_diff.added.is_empty() {
            debug!("found {} added containers", container_diff.added.len());
        }
        if !container_diff.removed.is_empty() {
            debug!("found {} removed containers", container_diff.removed.len());
        }

        let mut global = Diff::new();

        // Update changed containers and add new ones
        for container in &new_containers {
            let hosts = hosts_from_labels(&container.labels);

            if let Some(old) = self.state.get(&container.id) {
                let host_diff = diff(old, &hosts);
                host_diff.log(&container.name);
                global.merge(host_diff);
            } else {
                info!("added {}", container.name);
                global.added.extend(hosts.iter().cloned());
            }

            self.state.set(container.id.clone(), hosts);
        }

        // Every hostname of a vanished container counts as removed, and the
        // entry is dropped so no residue survives
        for removed_id in &container_diff.removed {
            if let Some(hosts) = self.state.remove(removed_id) {
                info!("removed {}", removed_id);
                global.removed.extend(hosts);
            }
        }

        Ok(global)
    }

    /// Run one full discovery cycle
    ///
    /// Declarative full-state broadcast: the union of every live hostname is
    /// reported as `added` with `removed` empty. Does not consult or mutate
    /// the state store or the roster.
    pub async fn discover_full(&self) -> Result<Diff<String>> {
        debug!("starting full discovery");

        let containers = self.inventory.enabled_containers().await?;

        debug!("found {} enabled containers", containers.len());

        let mut global = Diff::new();
        for container in &containers {
            global.added.extend(hosts_from_labels(&container.labels));
        }

        Ok(global)
    }
}
