//! Dual-stack range router
//!
//! The VersionedRouter is responsible for:
//! - Classifying every address or network by family
//! - Forwarding single-family operations to the engine owning that family
//! - Combining both engines for whole-collection queries
//!
//! ## Architecture
//!
//! ```text
//!                 insert / remove / contains / ...
//!                              │
//!                              ▼
//!                    ┌──────────────────┐
//!                    │ VersionedRouter  │── classify ──▶ InvalidAddressInput
//!                    └──────────────────┘
//!                       │            │
//!                  IpFamily::V4  IpFamily::V6
//!                       ▼            ▼
//!               ┌─────────────┐ ┌─────────────┐
//!               │ RangeEngine │ │ RangeEngine │
//!               │   (IPv4)    │ │   (IPv6)    │
//!               └─────────────┘ └─────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! 1. Extract the relevant address (entry network, network, or query address)
//! 2. Classify it; on failure return `InvalidAddressInput` untouched
//! 3. Select the engine for the family
//! 4. Delegate and return the engine's result unmodified

use crate::config::RouterConfig;
use crate::error::{Error, Result};
use crate::net::{self, IpFamily, ToAddress, ToNetwork};
use crate::registry::EngineRegistry;
use crate::traits::{PrefixCounts, RangeEngine, RangeEngineFactory, RangeEntry};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tracing::{debug, info, warn};

/// Per-family prefix-length histograms
///
/// The two mappings are never merged: an IPv4 /24 and an IPv6 /24 describe
/// unrelated block sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixLayout {
    /// Entries per prefix length in the IPv4 engine (0..=32)
    pub ipv4: PrefixCounts,
    /// Entries per prefix length in the IPv6 engine (0..=128)
    pub ipv6: PrefixCounts,
}

impl PrefixLayout {
    /// The mapping for one family
    pub fn get(&self, family: IpFamily) -> &PrefixCounts {
        match family {
            IpFamily::V4 => &self.ipv4,
            IpFamily::V6 => &self.ipv6,
        }
    }
}

/// Routes range operations to one of two family-specific engines
///
/// ## Lifecycle
///
/// 1. Create with [`VersionedRouter::new()`] (or [`VersionedRouter::from_config()`]);
///    both engines are built immediately
/// 2. Insert, query and remove entries through the router
/// 3. Drop to release both engines
///
/// ## Threading
///
/// Every method takes `&self` and performs a synchronous call into one or
/// both engines. The router adds no locking of its own; concurrent use is
/// as safe as the engines make it.
///
/// ## Cross-Family Atomicity
///
/// [`len()`](Self::len), [`recalculate_len()`](Self::recalculate_len) and
/// [`prefix_layout()`](Self::prefix_layout) read the IPv4 engine and then
/// the IPv6 engine. There is no atomicity across the two reads: with
/// concurrent mutation the combined result may describe a state that never
/// existed at a single instant.
pub struct VersionedRouter<E: RangeEntry> {
    /// Engine owning the IPv4 address space
    ipv4: Box<dyn RangeEngine<E>>,

    /// Engine owning the IPv6 address space
    ipv6: Box<dyn RangeEngine<E>>,
}

impl<E: RangeEntry> VersionedRouter<E> {
    /// Create a router, building both engines eagerly
    ///
    /// The factory is called exactly twice, for IPv4 then IPv6. A factory
    /// failure aborts construction, as does an engine reporting a family
    /// other than the one requested.
    pub fn new<F>(factory: &F) -> Result<Self>
    where
        F: RangeEngineFactory<E> + ?Sized,
    {
        let ipv4 = Self::build_engine(factory, IpFamily::V4)?;
        let ipv6 = Self::build_engine(factory, IpFamily::V6)?;

        info!("Range router ready (IPv4 and IPv6 engines built)");
        Ok(Self { ipv4, ipv6 })
    }

    /// Create a router from configuration, resolving the engine through `registry`
    pub fn from_config(registry: &EngineRegistry<E>, config: &RouterConfig) -> Result<Self> {
        config.validate()?;
        let factory = registry.create_factory(&config.engine)?;
        info!("Building range router with '{}' engines", config.engine.type_name());
        Self::new(&*factory)
    }

    fn build_engine<F>(factory: &F, family: IpFamily) -> Result<Box<dyn RangeEngine<E>>>
    where
        F: RangeEngineFactory<E> + ?Sized,
    {
        let engine = factory.create(family)?;
        if engine.family() != family {
            return Err(Error::config(format!(
                "Factory returned a {} engine when asked for {}",
                engine.family(),
                family
            )));
        }
        debug!("Built {} engine", family);
        Ok(engine)
    }

    /// Insert an entry into the engine owning its network's family
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The engine stored the entry
    /// - `Err(Error::InvalidAddressInput)`: The network base is unclassifiable,
    ///   or the network is written in IPv4-mapped form
    /// - `Err(Error)`: Any engine error, unchanged
    pub fn insert(&self, entry: E) -> Result<()> {
        let family = self.classify_entry(&entry)?;
        self.engine_for(family).insert(entry)
    }

    /// Insert an entry, letting the owning engine apply its merge policy
    pub fn insert_with_merge(&self, entry: E) -> Result<()> {
        let family = self.classify_entry(&entry)?;
        self.engine_for(family).insert_with_merge(entry)
    }

    /// Remove and return the entry stored at exactly `network`
    ///
    /// # Returns
    ///
    /// - `Ok(E)`: The removed entry
    /// - `Err(Error::InvalidAddressInput)`: The network is unclassifiable
    /// - `Err(Error)`: The engine's error (e.g. not found), unchanged
    pub fn remove<N>(&self, network: &N) -> Result<E>
    where
        N: ToNetwork + ?Sized,
    {
        let network = self.resolve_network(network)?;
        self.engine_for(IpFamily::of(&network.ip())).remove(network)
    }

    /// Whether some stored network covers `address`
    pub fn contains<A>(&self, address: &A) -> Result<bool>
    where
        A: ToAddress + ?Sized,
    {
        let address = self.resolve_address(address)?;
        self.engine_for(IpFamily::of(&address)).contains(address)
    }

    /// All stored entries whose network covers `address`
    pub fn containing_networks<A>(&self, address: &A) -> Result<Vec<E>>
    where
        A: ToAddress + ?Sized,
    {
        let address = self.resolve_address(address)?;
        self.engine_for(IpFamily::of(&address))
            .containing_networks(address)
    }

    /// All stored entries whose network is covered by `network`
    pub fn covered_networks<N>(&self, network: &N) -> Result<Vec<E>>
    where
        N: ToNetwork + ?Sized,
    {
        let network = self.resolve_network(network)?;
        self.engine_for(IpFamily::of(&network.ip()))
            .covered_networks(network)
    }

    /// Total number of entries, from each engine's maintained count
    pub fn len(&self) -> usize {
        self.ipv4.len() + self.ipv6.len()
    }

    /// Whether neither engine holds an entry
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of entries, forcing each engine to recount
    pub fn recalculate_len(&self) -> usize {
        self.ipv4.recalculate_len() + self.ipv6.recalculate_len()
    }

    /// Entry count of a single family
    pub fn family_len(&self, family: IpFamily) -> usize {
        self.engine_for(family).len()
    }

    /// Per-family prefix layouts, best effort
    ///
    /// An engine that fails to compute its layout contributes an empty
    /// mapping; the error is logged and discarded. Use
    /// [`try_prefix_layout()`](Self::try_prefix_layout) to see it.
    pub fn prefix_layout(&self) -> PrefixLayout {
        PrefixLayout {
            ipv4: self.best_effort_layout(IpFamily::V4),
            ipv6: self.best_effort_layout(IpFamily::V6),
        }
    }

    /// Per-family prefix layouts, failing on the first engine error
    pub fn try_prefix_layout(&self) -> Result<PrefixLayout> {
        Ok(PrefixLayout {
            ipv4: self.ipv4.prefix_layout()?,
            ipv6: self.ipv6.prefix_layout()?,
        })
    }

    fn best_effort_layout(&self, family: IpFamily) -> PrefixCounts {
        self.engine_for(family)
            .prefix_layout()
            .unwrap_or_else(|e| {
                warn!("Discarding {} prefix layout error: {}", family, e);
                PrefixCounts::new()
            })
    }

    /// The engine owning `family`
    fn engine_for(&self, family: IpFamily) -> &dyn RangeEngine<E> {
        match family {
            IpFamily::V4 => &*self.ipv4,
            IpFamily::V6 => &*self.ipv6,
        }
    }

    fn classify_entry(&self, entry: &E) -> Result<IpFamily> {
        net::entry_network_family(&entry.network())
            .inspect_err(|e| debug!("Rejected entry: {}", e))
    }

    fn resolve_network<N>(&self, network: &N) -> Result<ipnetwork::IpNetwork>
    where
        N: ToNetwork + ?Sized,
    {
        network
            .to_network()
            .inspect_err(|e| debug!("Rejected network: {}", e))
    }

    fn resolve_address<A>(&self, address: &A) -> Result<IpAddr>
    where
        A: ToAddress + ?Sized,
    {
        address
            .to_address()
            .inspect_err(|e| debug!("Rejected address: {}", e))
    }
}
