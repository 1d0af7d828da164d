// # Range Engine Trait
//
// Defines the interface a single-family range-matching engine must expose.
// The router owns one engine per address family and never inspects how an
// engine stores its entries.
//
// ## Implementations
//
// - Brute force (linear scan): `engine::BruteForceEngine`
// - Future: path-compressed prefix trie
//
// ## Usage
//
// ```rust,ignore
// use ranger_core::traits::RangeEngine;
//
// let engine = /* RangeEngine implementation for IPv4 */;
// engine.insert(entry)?;
// assert!(engine.contains("10.1.2.3".parse()?)?);
// ```

use crate::error::Result;
use crate::net::IpFamily;
use crate::traits::RangeEntry;
use ipnetwork::IpNetwork;
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Number of stored entries per prefix length
pub type PrefixCounts = BTreeMap<u8, usize>;

/// Trait for single-family range engines
///
/// Every address, network and entry network passed in by the router is
/// already canonical (never IPv4-mapped) and belongs to
/// [`RangeEngine::family`]. The router canonicalises query inputs and
/// rejects entries whose network is not canonical.
///
/// # Thread Safety
///
/// All methods take `&self`. Implementations must provide their own
/// locking; the router adds none.
///
/// # Responsibilities
///
/// - ✅ Store, replace and remove entries keyed by network
/// - ✅ Answer containment and coverage queries
/// - ✅ Apply its own merge policy in `insert_with_merge`
/// - ❌ Retry failed operations (callers decide)
/// - ❌ Accept entries of the other family (return `InvalidNetwork`)
pub trait RangeEngine<E: RangeEntry>: Send + Sync {
    /// The address family this engine owns
    fn family(&self) -> IpFamily;

    /// Store an entry keyed by its network
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The entry is stored
    /// - `Err(Error)`: If the network is malformed or of the wrong family
    fn insert(&self, entry: E) -> Result<()>;

    /// Store an entry, allowing the engine to coalesce it with adjacent or
    /// overlapping entries according to its own merge policy
    fn insert_with_merge(&self, entry: E) -> Result<()>;

    /// Remove the entry stored at exactly `network`
    ///
    /// # Returns
    ///
    /// - `Ok(E)`: The removed entry
    /// - `Err(Error::NotFound)`: If no entry is stored at that network
    fn remove(&self, network: IpNetwork) -> Result<E>;

    /// Whether some stored network covers `address`
    fn contains(&self, address: IpAddr) -> Result<bool>;

    /// All stored entries whose network covers `address`
    ///
    /// Order is unspecified but stable for unchanged state.
    fn containing_networks(&self, address: IpAddr) -> Result<Vec<E>>;

    /// All stored entries whose network is covered by `network`
    fn covered_networks(&self, network: IpNetwork) -> Result<Vec<E>>;

    /// Currently maintained entry count
    fn len(&self) -> usize;

    /// Whether the engine holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry count recomputed from storage, bypassing any cache
    fn recalculate_len(&self) -> usize;

    /// Number of stored entries per prefix length
    fn prefix_layout(&self) -> Result<PrefixCounts>;
}

/// Helper trait for constructing one engine per address family
///
/// Any `Fn(IpFamily) -> Result<Box<dyn RangeEngine<E>>>` closure is a
/// factory.
pub trait RangeEngineFactory<E: RangeEntry>: Send + Sync {
    /// Create a ready-to-use engine for `family`
    fn create(&self, family: IpFamily) -> Result<Box<dyn RangeEngine<E>>>;
}

impl<E, F> RangeEngineFactory<E> for F
where
    E: RangeEntry,
    F: Fn(IpFamily) -> Result<Box<dyn RangeEngine<E>>> + Send + Sync,
{
    fn create(&self, family: IpFamily) -> Result<Box<dyn RangeEngine<E>>> {
        self(family)
    }
}
