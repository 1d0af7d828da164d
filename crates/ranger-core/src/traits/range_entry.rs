// # Range Entry Trait
//
// An entry associates a CIDR network with caller-supplied metadata. Engines
// key entries by their network; metadata is opaque to both the router and
// the engines.
//
// ## Usage
//
// ```rust,ignore
// use ranger_core::traits::{BasicRangeEntry, RangeEntry};
//
// let entry = BasicRangeEntry::new("10.0.0.0/8".parse()?, "corp-vpn");
// assert_eq!(entry.network().prefix(), 8);
// ```

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Trait for values stored in a range engine
///
/// Identity for removal and replacement is the network returned by
/// [`RangeEntry::network`], never the metadata. Engines hand entries back
/// by value, so implementations should be cheap to clone (wrap large
/// payloads in an `Arc`).
pub trait RangeEntry: Clone + Send + Sync + 'static {
    /// The network this entry is stored under
    fn network(&self) -> IpNetwork;
}

impl RangeEntry for IpNetwork {
    fn network(&self) -> IpNetwork {
        *self
    }
}

impl<T: RangeEntry> RangeEntry for Arc<T> {
    fn network(&self) -> IpNetwork {
        (**self).network()
    }
}

/// A network paired with arbitrary metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicRangeEntry<M> {
    /// The stored network
    pub network: IpNetwork,
    /// Caller-defined metadata
    pub metadata: M,
}

impl<M> BasicRangeEntry<M> {
    /// Create a new entry
    pub fn new(network: IpNetwork, metadata: M) -> Self {
        Self { network, metadata }
    }

    /// Split the entry into network and metadata
    pub fn into_parts(self) -> (IpNetwork, M) {
        (self.network, self.metadata)
    }
}

impl<M> RangeEntry for BasicRangeEntry<M>
where
    M: Clone + Send + Sync + 'static,
{
    fn network(&self) -> IpNetwork {
        self.network
    }
}
