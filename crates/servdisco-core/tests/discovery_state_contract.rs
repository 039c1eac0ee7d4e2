//! Contract test: incremental discovery and host state convergence
//!
//! Constraints verified:
//! - A first-seen container reports all its hostnames as added
//! - A label change reports the minimal hostname diff
//! - A vanished container reports all its hostnames as removed and leaves
//!   no residue in the state store
//! - Unparsable label sets contribute nothing and are never an error

mod common;

use common::*;
use servdisco_core::{ContainerRecord, DiscoveryEngine};

#[tokio::test]
async fn first_sighting_reports_all_hosts_added() {
    let inventory = MockInventory::new();
    inventory.push_ok(vec![routed_container(
        "c1",
        "web",
        "Host(`a.com`) && Host(`b.com`)",
    )]);

    let mut engine = DiscoveryEngine::new(Box::new(inventory));
    let diff = engine.discover().await.unwrap();

    assert_eq!(sorted(diff.added), vec!["a.com", "b.com"]);
    assert!(diff.removed.is_empty());

    assert!(engine.state().contains("c1"));
    assert_eq!(engine.roster(), &["c1".to_string()]);
}

#[tokio::test]
async fn label_change_reports_minimal_diff() {
    let inventory = MockInventory::new();
    inventory.push_ok(vec![routed_container(
        "c1",
        "web",
        "Host(`a.com`) && Host(`b.com`)",
    )]);
    inventory.push_ok(vec![routed_container(
        "c1",
        "web",
        "Host(`b.com`) && Host(`c.com`)",
    )]);

    let mut engine = DiscoveryEngine::new(Box::new(inventory));
    engine.discover().await.unwrap();
    let diff = engine.discover().await.unwrap();

    assert_eq!(sorted(diff.added), vec!["c.com"]);
    assert_eq!(sorted(diff.removed), vec!["a.com"]);

    // The stored set was overwritten in place
    assert_eq!(
        sorted(engine.state().get("c1").unwrap().to_vec()),
        vec!["b.com", "c.com"]
    );
}

#[tokio::test]
async fn removed_container_reports_all_hosts_removed() {
    let inventory = MockInventory::new();
    inventory.push_ok(vec![routed_container(
        "c1",
        "web",
        "Host(`a.com`) && Host(`b.com`)",
    )]);
    inventory.push_ok(vec![]);

    let mut engine = DiscoveryEngine::new(Box::new(inventory));
    engine.discover().await.unwrap();
    let diff = engine.discover().await.unwrap();

    assert!(diff.added.is_empty());
    assert_eq!(sorted(diff.removed), vec!["a.com", "b.com"]);

    // No residue: the entry is gone from the state store and the roster
    assert!(!engine.state().contains("c1"));
    assert!(engine.state().is_empty());
    assert!(engine.roster().is_empty());
}

#[tokio::test]
async fn unchanged_container_yields_empty_diff() {
    let inventory = MockInventory::new();
    inventory.push_ok(vec![routed_container("c1", "web", "Host(`a.com`)")]);

    let mut engine = DiscoveryEngine::new(Box::new(inventory));
    engine.discover().await.unwrap();

    // Script exhausted: the same listing repeats
    let diff = engine.discover().await.unwrap();
    assert!(diff.is_empty());
}

#[tokio::test]
async fn unparsable_labels_contribute_nothing() {
    let inventory = MockInventory::new();
    inventory.push_ok(vec![
        ContainerRecord::new("c1", "plain").with_label("discovery.enable", "true"),
        routed_container("c2", "odd", "PathPrefix(`/api`)"),
    ]);

    let mut engine = DiscoveryEngine::new(Box::new(inventory));
    let diff = engine.discover().await.unwrap();

    assert!(diff.is_empty());
    // Both containers are still tracked, just with empty hostname sets
    assert_eq!(engine.state().len(), 2);
}

#[tokio::test]
async fn host_moved_between_containers_cancels_out() {
    let inventory = MockInventory::new();
    inventory.push_ok(vec![
        routed_container("c1", "web", "Host(`a.com`)"),
        ContainerRecord::new("c2", "idle").with_label("discovery.enable", "true"),
    ]);
    inventory.push_ok(vec![
        ContainerRecord::new("c1", "web").with_label("discovery.enable", "true"),
        routed_container("c2", "idle", "Host(`a.com`)"),
    ]);

    let mut engine = DiscoveryEngine::new(Box::new(inventory));
    engine.discover().await.unwrap();
    let raw = engine.discover().await.unwrap();

    // Raw diff holds the contradiction; reconciliation repairs it
    assert_eq!(raw.added, vec!["a.com"]);
    assert_eq!(raw.removed, vec!["a.com"]);

    assert!(raw.reconciled().is_empty());
}
