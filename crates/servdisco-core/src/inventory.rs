//! Container inventory seam
//!
//! The engine never talks to a container runtime directly; it consumes this
//! trait. The `servdisco-docker` crate provides the Docker implementation,
//! and tests inject scripted fixtures.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;

/// Label that marks a container as discovery-enabled
pub const ENABLE_LABEL: &str = "discovery.enable";

/// A snapshot of one running container, as observed in a single cycle
///
/// Owned by the inventory; the core only reads it and never retains it
/// beyond the cycle it was fetched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Opaque stable container identity
    pub id: String,
    /// Display name (used for logging only)
    pub name: String,
    /// Container labels, keys unique
    pub labels: HashMap<String, String>,
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            labels: HashMap::new(),
        }
    }

    /// Attach a label (builder style, mostly for tests and fixtures)
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Trait for container inventory implementations
///
/// One operation: list the containers whose `discovery.enable` label equals
/// `"true"`. A fetch failure must be reported as an error, never a panic;
/// the scheduler treats it as a skipped cycle.
#[async_trait]
pub trait ContainerInventory: Send + Sync {
    /// List currently running discovery-enabled containers
    async fn enabled_containers(&self) -> Result<Vec<ContainerRecord>>;
}
