// # Docker Container Inventory
//
// Implements the `ContainerInventory` seam against the local Docker daemon.
//
// One API call per cycle: `GET /containers/json` filtered server-side on
// the `discovery.enable=true` label. The adapter holds no state and makes
// no scheduling decisions; a failed listing is propagated as an inventory
// error for the scheduler to treat as a skipped cycle.

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::ListContainersOptions;
use bollard::models::ContainerSummary;
use std::collections::HashMap;
use tracing::debug;

use servdisco_core::inventory::ENABLE_LABEL;
use servdisco_core::{ContainerInventory, ContainerRecord, Error, Result};

/// Container inventory backed by the Docker Engine API
pub struct DockerInventory {
    docker: Docker,
}

impl DockerInventory {
    /// Connect to the local Docker daemon
    ///
    /// Uses the platform defaults (the unix socket on Linux); honors
    /// `DOCKER_HOST` when set.
    pub fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| Error::inventory(format!("could not connect to docker: {e}")))?;

        Ok(Self { docker })
    }

    /// Wrap an already-connected client (used by integration setups)
    pub fn with_client(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl ContainerInventory for DockerInventory {
    async fn enabled_containers(&self) -> Result<Vec<ContainerRecord>> {
        let mut filters = HashMap::new();
        filters.insert("label".to_string(), vec![format!("{ENABLE_LABEL}=true")]);

        let options = ListContainersOptions::<String> {
            all: false,
            filters,
            ..Default::default()
        };

        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| Error::inventory(format!("container list failed: {e}")))?;

        debug!("docker returned {} container summaries", summaries.len());

        Ok(summaries.into_iter().filter_map(record_from_summary).collect())
    }
}

/// Map a Docker container summary to a record
///
/// Summaries without an id are skipped. Docker prefixes names with `/`;
/// the first name, trimmed, becomes the display name, falling back to the
/// id when no name is set.
fn record_from_summary(summary: ContainerSummary) -> Option<ContainerRecord> {
    let id = summary.id?;

    let name = summary
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|name| name.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.clone());

    Some(ContainerRecord {
        id,
        name,
        labels: summary.labels.unwrap_or_default(),
    })
}
