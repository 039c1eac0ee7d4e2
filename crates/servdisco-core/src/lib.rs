// # servdisco-core
//
// Core library for the container hostname discovery daemon.
//
// ## Architecture Overview
//
// This library provides the discovery-and-diff engine:
// - **ContainerInventory**: Trait for listing discovery-enabled containers
// - **Notifier**: Trait for reporting hostname diffs to a remote endpoint
// - **DiscoveryEngine**: Per-cycle discovery and diff accumulation
// - **Scheduler**: Polling loop alternating incremental and full discovery
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from the Docker and
//    HTTP adapters, which plug in through the trait seams
// 2. **Serialized Cycles**: Exactly one discovery cycle is ever in flight;
//    the state store needs no locking
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Self-Healing**: Failed cycles are never retried; the next scheduled
//    cycle (and periodic full discovery) restores consistency

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod labels;
pub mod notifier;
pub mod scheduler;
pub mod state;

// Re-export core types for convenience
pub use config::SchedulerConfig;
pub use diff::{Diff, diff};
pub use engine::DiscoveryEngine;
pub use error::{Error, Result};
pub use inventory::{ContainerInventory, ContainerRecord};
pub use labels::hosts_from_labels;
pub use notifier::{DiffPayload, Notifier};
pub use scheduler::{CycleReport, DiscoveryMode, Scheduler};
pub use state::HostStateStore;
