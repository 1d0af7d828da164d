// # Brute Force Engine
//
// Linear-scan implementation of RangeEngine.
//
// ## Purpose
//
// Provides a simple, obviously-correct engine for small collections, tests,
// and as a baseline when validating faster engines. Every query walks the
// full entry list.
//
// ## Merge Policy
//
// None. `insert_with_merge` stores the entry exactly like `insert`.
//
// ## Ordering
//
// Query results come back in insertion order. Replacing an entry keeps its
// original position.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use ipnetwork::IpNetwork;
use tracing::debug;

use crate::error::{Error, Result};
use crate::net::{self, IpFamily};
use crate::traits::{PrefixCounts, RangeEngine, RangeEngineFactory, RangeEntry};

/// A stored entry together with its canonical network
#[derive(Debug, Clone)]
struct Slot<E> {
    network: IpNetwork,
    entry: E,
}

/// Linear-scan range engine bound to one address family
///
/// Entries live in a `Vec` behind a `RwLock`; the maintained count is an
/// atomic that is updated on every insert and remove.
///
/// # Example
///
/// ```rust,no_run
/// use ranger_core::engine::BruteForceEngine;
/// use ranger_core::net::IpFamily;
/// use ranger_core::traits::RangeEngine;
/// use ipnetwork::IpNetwork;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let engine = BruteForceEngine::<IpNetwork>::new(IpFamily::V4);
///     engine.insert("10.0.0.0/8".parse()?)?;
///     assert!(engine.contains("10.1.2.3".parse()?)?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BruteForceEngine<E> {
    family: IpFamily,
    slots: RwLock<Vec<Slot<E>>>,
    cached_len: AtomicUsize,
}

impl<E: RangeEntry> BruteForceEngine<E> {
    /// Create an empty engine for `family`
    pub fn new(family: IpFamily) -> Self {
        Self::with_capacity(family, 0)
    }

    /// Create an empty engine with room for `capacity` entries
    pub fn with_capacity(family: IpFamily, capacity: usize) -> Self {
        Self {
            family,
            slots: RwLock::new(Vec::with_capacity(capacity)),
            cached_len: AtomicUsize::new(0),
        }
    }

    /// Canonicalise `network` and check it belongs to this engine
    fn owned_network(&self, network: IpNetwork) -> Result<IpNetwork> {
        let canonical = net::canonical_network(network)
            .map_err(|e| Error::invalid_network(e.to_string()))?;

        if net::network_family(&canonical)? != self.family {
            return Err(Error::invalid_network(format!(
                "{} does not belong to the {} engine",
                network, self.family
            )));
        }

        Ok(canonical)
    }

    fn store(&self, entry: E) -> Result<()> {
        let network = self.owned_network(entry.network())?;
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);

        match slots.iter_mut().find(|slot| same_network(&slot.network, &network)) {
            Some(slot) => {
                debug!("Replacing {} entry at {}", self.family, network);
                slot.entry = entry;
            }
            None => {
                slots.push(Slot { network, entry });
                self.cached_len.fetch_add(1, Ordering::SeqCst);
            }
        }

        Ok(())
    }

    fn collect<F>(&self, predicate: F) -> Vec<E>
    where
        F: Fn(&IpNetwork) -> bool,
    {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .filter(|slot| predicate(&slot.network))
            .map(|slot| slot.entry.clone())
            .collect()
    }
}

impl<E: RangeEntry> RangeEngine<E> for BruteForceEngine<E> {
    fn family(&self) -> IpFamily {
        self.family
    }

    fn insert(&self, entry: E) -> Result<()> {
        self.store(entry)
    }

    fn insert_with_merge(&self, entry: E) -> Result<()> {
        self.store(entry)
    }

    fn remove(&self, network: IpNetwork) -> Result<E> {
        let network = self.owned_network(network)?;
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);

        let position = slots
            .iter()
            .position(|slot| same_network(&slot.network, &network))
            .ok_or_else(|| Error::not_found(network.to_string()))?;

        self.cached_len.fetch_sub(1, Ordering::SeqCst);
        Ok(slots.remove(position).entry)
    }

    fn contains(&self, address: IpAddr) -> Result<bool> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.iter().any(|slot| slot.network.contains(address)))
    }

    fn containing_networks(&self, address: IpAddr) -> Result<Vec<E>> {
        Ok(self.collect(|stored| stored.contains(address)))
    }

    fn covered_networks(&self, network: IpNetwork) -> Result<Vec<E>> {
        let network = self.owned_network(network)?;
        Ok(self.collect(|stored| covers(&network, stored)))
    }

    fn len(&self) -> usize {
        self.cached_len.load(Ordering::SeqCst)
    }

    fn recalculate_len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        self.cached_len.store(slots.len(), Ordering::SeqCst);
        slots.len()
    }

    fn prefix_layout(&self) -> Result<PrefixCounts> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let mut layout = BTreeMap::new();
        for slot in slots.iter() {
            *layout.entry(slot.network.prefix()).or_insert(0) += 1;
        }
        Ok(layout)
    }
}

/// Two networks denote the same block (host bits in the base are ignored)
fn same_network(a: &IpNetwork, b: &IpNetwork) -> bool {
    a.prefix() == b.prefix() && a.network() == b.network()
}

/// `outer` is as broad as or broader than `inner` and contains all of it
fn covers(outer: &IpNetwork, inner: &IpNetwork) -> bool {
    outer.prefix() <= inner.prefix() && outer.contains(inner.network())
}

/// Factory producing empty [`BruteForceEngine`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceEngineFactory {
    capacity: usize,
}

impl BruteForceEngineFactory {
    /// Create a factory whose engines start empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory whose engines preallocate `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl<E: RangeEntry> RangeEngineFactory<E> for BruteForceEngineFactory {
    fn create(&self, family: IpFamily) -> Result<Box<dyn RangeEngine<E>>> {
        Ok(Box::new(BruteForceEngine::with_capacity(family, self.capacity)))
    }
}
