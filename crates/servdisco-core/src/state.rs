//! Process-lifetime container host state
//!
//! Maps each known container id to the hostnames last observed for it. An
//! entry exists if and only if the container was present as of the last
//! completed incremental cycle: entries are inserted when a container is
//! first seen, overwritten when its hostname set changes, and removed when
//! the container disappears from the enabled-container roster.
//!
//! Deliberately not thread-safe: the scheduler runs one cycle at a time and
//! the [`DiscoveryEngine`](crate::engine::DiscoveryEngine) is the single
//! writer, so no locking is needed.

use std::collections::HashMap;

/// In-memory container-id → hostname-set mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostStateStore {
    inner: HashMap<String, Vec<String>>,
}

impl HostStateStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Hostnames last observed for a container, if it is known
    pub fn get(&self, container_id: &str) -> Option<&[String]> {
        self.inner.get(container_id).map(Vec::as_slice)
    }

    /// Insert or overwrite the hostname set for a container
    pub fn set(&mut self, container_id: impl Into<String>, hosts: Vec<String>) {
        self.inner.insert(container_id.into(), hosts);
    }

    /// Remove a container's entry, returning its last-known hostnames
    pub fn remove(&mut self, container_id: &str) -> Option<Vec<String>> {
        self.inner.remove(container_id)
    }

    /// True if the container has an entry
    pub fn contains(&self, container_id: &str) -> bool {
        self.inner.contains_key(container_id)
    }

    /// Iterate over all known containers and their hostnames
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(id, hosts)| (id.as_str(), hosts.as_slice()))
    }

    /// Number of known containers
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if no containers are known
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
