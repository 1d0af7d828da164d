//! Test doubles and common utilities for router contract tests
//!
//! This module provides engines that record every call they receive, and
//! the networks and addresses passed with it, so tests can prove which
//! engine the router consulted and what it handed over.

#![allow(dead_code)]

use ipnetwork::IpNetwork;
use ranger_core::engine::BruteForceEngine;
use ranger_core::error::{Error, Result};
use ranger_core::net::IpFamily;
use ranger_core::traits::{BasicRangeEntry, PrefixCounts, RangeEngine, RangeEngineFactory, RangeEntry};
use ranger_core::VersionedRouter;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Entry type used throughout the contract tests
pub type Entry = BasicRangeEntry<String>;

/// Build an entry from CIDR text
pub fn entry(network: &str, label: &str) -> Entry {
    BasicRangeEntry::new(network.parse().expect("valid CIDR"), label.to_string())
}

/// Call counters shared between a recording engine and the test
#[derive(Debug, Default)]
pub struct EngineCalls {
    pub insert: AtomicUsize,
    pub insert_with_merge: AtomicUsize,
    pub remove: AtomicUsize,
    pub contains: AtomicUsize,
    pub containing_networks: AtomicUsize,
    pub covered_networks: AtomicUsize,
    pub len: AtomicUsize,
    pub recalculate_len: AtomicUsize,
    pub prefix_layout: AtomicUsize,
    /// When set, prefix_layout() fails
    pub fail_layout: AtomicBool,
    /// Networks received by insert, insert_with_merge, remove and covered_networks
    pub networks: Mutex<Vec<IpNetwork>>,
    /// Addresses received by contains and containing_networks
    pub addresses: Mutex<Vec<IpAddr>>,
}

impl EngineCalls {
    /// Total number of calls of any kind
    pub fn total(&self) -> usize {
        [
            &self.insert,
            &self.insert_with_merge,
            &self.remove,
            &self.contains,
            &self.containing_networks,
            &self.covered_networks,
            &self.len,
            &self.recalculate_len,
            &self.prefix_layout,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::SeqCst))
        .sum()
    }

    /// Total number of single-family operation calls (everything except counts and layout)
    pub fn routed(&self) -> usize {
        [
            &self.insert,
            &self.insert_with_merge,
            &self.remove,
            &self.contains,
            &self.containing_networks,
            &self.covered_networks,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::SeqCst))
        .sum()
    }

    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Networks the engine has received, in call order
    pub fn networks(&self) -> Vec<IpNetwork> {
        self.networks.lock().unwrap().clone()
    }

    /// Addresses the engine has received, in call order
    pub fn addresses(&self) -> Vec<IpAddr> {
        self.addresses.lock().unwrap().clone()
    }
}

/// A brute-force engine that records every call
pub struct RecordingEngine {
    inner: BruteForceEngine<Entry>,
    calls: Arc<EngineCalls>,
}

impl RecordingEngine {
    pub fn new(family: IpFamily, calls: Arc<EngineCalls>) -> Self {
        Self {
            inner: BruteForceEngine::new(family),
            calls,
        }
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn saw_network(&self, network: IpNetwork) {
        self.calls.networks.lock().unwrap().push(network);
    }

    fn saw_address(&self, address: IpAddr) {
        self.calls.addresses.lock().unwrap().push(address);
    }
}

impl RangeEngine<Entry> for RecordingEngine {
    fn family(&self) -> IpFamily {
        self.inner.family()
    }

    fn insert(&self, entry: Entry) -> Result<()> {
        Self::bump(&self.calls.insert);
        self.saw_network(entry.network());
        self.inner.insert(entry)
    }

    fn insert_with_merge(&self, entry: Entry) -> Result<()> {
        Self::bump(&self.calls.insert_with_merge);
        self.saw_network(entry.network());
        self.inner.insert_with_merge(entry)
    }

    fn remove(&self, network: IpNetwork) -> Result<Entry> {
        Self::bump(&self.calls.remove);
        self.saw_network(network);
        self.inner.remove(network)
    }

    fn contains(&self, address: IpAddr) -> Result<bool> {
        Self::bump(&self.calls.contains);
        self.saw_address(address);
        self.inner.contains(address)
    }

    fn containing_networks(&self, address: IpAddr) -> Result<Vec<Entry>> {
        Self::bump(&self.calls.containing_networks);
        self.saw_address(address);
        self.inner.containing_networks(address)
    }

    fn covered_networks(&self, network: IpNetwork) -> Result<Vec<Entry>> {
        Self::bump(&self.calls.covered_networks);
        self.saw_network(network);
        self.inner.covered_networks(network)
    }

    fn len(&self) -> usize {
        Self::bump(&self.calls.len);
        self.inner.len()
    }

    fn recalculate_len(&self) -> usize {
        Self::bump(&self.calls.recalculate_len);
        self.inner.recalculate_len()
    }

    fn prefix_layout(&self) -> Result<PrefixCounts> {
        Self::bump(&self.calls.prefix_layout);
        if self.calls.fail_layout.load(Ordering::SeqCst) {
            return Err(Error::engine(self.family(), "layout unavailable"));
        }
        self.inner.prefix_layout()
    }
}

/// Factory handing out recording engines and remembering what it was asked for
#[derive(Default)]
pub struct RecordingFactory {
    pub v4: Arc<EngineCalls>,
    pub v6: Arc<EngineCalls>,
    pub requested: Mutex<Vec<IpFamily>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self, family: IpFamily) -> &EngineCalls {
        match family {
            IpFamily::V4 => &self.v4,
            IpFamily::V6 => &self.v6,
        }
    }

    pub fn requested(&self) -> Vec<IpFamily> {
        self.requested.lock().unwrap().clone()
    }
}

impl RangeEngineFactory<Entry> for RecordingFactory {
    fn create(&self, family: IpFamily) -> Result<Box<dyn RangeEngine<Entry>>> {
        self.requested.lock().unwrap().push(family);
        let calls = match family {
            IpFamily::V4 => Arc::clone(&self.v4),
            IpFamily::V6 => Arc::clone(&self.v6),
        };
        Ok(Box::new(RecordingEngine::new(family, calls)))
    }
}

/// Build a router over recording engines
pub fn recording_router() -> (VersionedRouter<Entry>, RecordingFactory) {
    let factory = RecordingFactory::new();
    let router = VersionedRouter::new(&factory).expect("router construction succeeds");
    (router, factory)
}
