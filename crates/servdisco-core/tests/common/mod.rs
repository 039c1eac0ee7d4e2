//! Test doubles and common utilities for contract tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use servdisco_core::error::Result;
use servdisco_core::{ContainerInventory, ContainerRecord, DiffPayload, Error, Notifier};

/// A scripted inventory: each call pops the next step; once the script is
/// exhausted, the last successful response repeats.
#[derive(Clone)]
pub struct MockInventory {
    script: Arc<Mutex<VecDeque<InventoryStep>>>,
    last_ok: Arc<Mutex<Vec<ContainerRecord>>>,
    call_count: Arc<AtomicUsize>,
}

pub enum InventoryStep {
    Ok(Vec<ContainerRecord>),
    Fail(String),
}

impl MockInventory {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            last_ok: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue a successful listing for the next call
    pub fn push_ok(&self, containers: Vec<ContainerRecord>) {
        self.script
            .lock()
            .unwrap()
            .push_back(InventoryStep::Ok(containers));
    }

    /// Queue a fetch failure for the next call
    pub fn push_fail(&self, msg: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(InventoryStep::Fail(msg.to_string()));
    }

    /// Number of times enabled_containers() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContainerInventory for MockInventory {
    async fn enabled_containers(&self) -> Result<Vec<ContainerRecord>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(InventoryStep::Ok(containers)) => {
                *self.last_ok.lock().unwrap() = containers.clone();
                Ok(containers)
            }
            Some(InventoryStep::Fail(msg)) => Err(Error::inventory(msg)),
            None => Ok(self.last_ok.lock().unwrap().clone()),
        }
    }
}

/// A notifier that records every payload and can be told to fail
#[derive(Clone)]
pub struct MockNotifier {
    payloads: Arc<Mutex<Vec<DiffPayload>>>,
    fail: Arc<AtomicBool>,
    call_count: Arc<AtomicUsize>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(AtomicBool::new(false)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every subsequent notify() attempt fail
    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of times notify() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// All payloads received so far
    pub fn payloads(&self) -> Vec<DiffPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, payload: &DiffPayload) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::notifier("endpoint responded with 503"));
        }

        self.payloads.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// A container fixture with the discovery label and one router rule
pub fn routed_container(id: &str, name: &str, rule: &str) -> ContainerRecord {
    ContainerRecord::new(id, name)
        .with_label("discovery.enable", "true")
        .with_label(format!("traefik.http.routers.{name}.rule"), rule)
}

/// Sorted copy of a hostname list, for order-insensitive assertions
pub fn sorted(mut hosts: Vec<String>) -> Vec<String> {
    hosts.sort();
    hosts
}
