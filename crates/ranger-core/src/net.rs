// # Address-Family Classification
//
// Every router operation funnels its input through this module before an
// engine is selected. Classification is total for well-formed input and
// fails with `Error::InvalidAddressInput` for everything else.
//
// ## Canonical Forms
//
// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) belong to the IPv4 family
// and are handed to engines in their IPv4 form. Query networks follow their
// base address: `::ffff:10.0.0.0/104` is the same block as `10.0.0.0/8`.
// Stored entries carry their own network and cannot be rewritten, so an
// entry must already use the canonical form.
//
// Text is parsed strictly; surrounding whitespace is an error.

use crate::error::{Error, Result};
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Bit offset of the embedded IPv4 address inside an IPv4-mapped IPv6 address
const MAPPED_PREFIX_BITS: u8 = 96;

/// Address family (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Family of an already-typed address
    ///
    /// IPv4-mapped IPv6 addresses classify as IPv4.
    pub fn of(address: &IpAddr) -> Self {
        match address.to_canonical() {
            IpAddr::V4(_) => IpFamily::V4,
            IpAddr::V6(_) => IpFamily::V6,
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => f.write_str("IPv4"),
            IpFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// Classify a raw byte representation of an address
///
/// 4 bytes are IPv4. 16 bytes are IPv4 when they hold an IPv4-mapped
/// address and IPv6 otherwise. Any other length is rejected.
pub fn classify_bytes(bytes: &[u8]) -> Result<IpFamily> {
    address_from_bytes(bytes).map(|address| IpFamily::of(&address))
}

/// Build a canonical address from its raw byte representation
pub fn address_from_bytes(bytes: &[u8]) -> Result<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Ok(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return Ok(IpAddr::V6(Ipv6Addr::from(octets)).to_canonical());
    }
    Err(Error::invalid_address(format!(
        "{} bytes is neither an IPv4 (4) nor an IPv6 (16) address",
        bytes.len()
    )))
}

/// Parse a textual address into its canonical form
pub fn parse_address(text: &str) -> Result<IpAddr> {
    text.parse::<IpAddr>()
        .map(|address| address.to_canonical())
        .map_err(|_| Error::invalid_address(format!("'{}' is not an IP address", text)))
}

/// Parse a CIDR network into its canonical form
pub fn parse_network(text: &str) -> Result<IpNetwork> {
    let network = text
        .parse::<IpNetwork>()
        .map_err(|e| Error::invalid_address(format!("'{}' is not a CIDR network: {}", text, e)))?;
    canonical_network(network)
}

/// Canonicalise a network so that its family is the family of its base
///
/// An IPv4-mapped IPv6 base with a prefix of at least /96 becomes the
/// equivalent IPv4 network. A mapped base with a shorter prefix spans
/// addresses outside the IPv4 space and cannot be assigned to one family.
pub fn canonical_network(network: IpNetwork) -> Result<IpNetwork> {
    let IpNetwork::V6(v6) = network else {
        return Ok(network);
    };

    let Some(v4) = v6.ip().to_ipv4_mapped() else {
        return Ok(network);
    };

    if v6.prefix() < MAPPED_PREFIX_BITS {
        return Err(Error::invalid_address(format!(
            "{} has an IPv4-mapped base but a prefix shorter than /{}",
            v6, MAPPED_PREFIX_BITS
        )));
    }

    Ipv4Network::new(v4, v6.prefix() - MAPPED_PREFIX_BITS)
        .map(IpNetwork::V4)
        .map_err(|e| Error::invalid_address(format!("{}: {}", v6, e)))
}

/// Family of a network, after canonicalisation
pub fn network_family(network: &IpNetwork) -> Result<IpFamily> {
    canonical_network(*network).map(|canonical| match canonical {
        IpNetwork::V4(_) => IpFamily::V4,
        IpNetwork::V6(_) => IpFamily::V6,
    })
}

/// Family of a network stored as-is by an engine
///
/// Fails with `InvalidAddressInput` when the network is unclassifiable or
/// is written in IPv4-mapped form.
pub fn entry_network_family(network: &IpNetwork) -> Result<IpFamily> {
    let canonical = canonical_network(*network)?;
    if canonical != *network {
        return Err(Error::invalid_address(format!(
            "{} is IPv4-mapped; store it as {}",
            network, canonical
        )));
    }
    network_family(&canonical)
}

/// Inputs that can be turned into a canonical address
pub trait ToAddress {
    /// Convert into a canonical address, or fail with `InvalidAddressInput`
    fn to_address(&self) -> Result<IpAddr>;
}

impl ToAddress for IpAddr {
    fn to_address(&self) -> Result<IpAddr> {
        Ok(self.to_canonical())
    }
}

impl ToAddress for Ipv4Addr {
    fn to_address(&self) -> Result<IpAddr> {
        Ok(IpAddr::V4(*self))
    }
}

impl ToAddress for Ipv6Addr {
    fn to_address(&self) -> Result<IpAddr> {
        Ok(IpAddr::V6(*self).to_canonical())
    }
}

impl ToAddress for str {
    fn to_address(&self) -> Result<IpAddr> {
        parse_address(self)
    }
}

impl ToAddress for String {
    fn to_address(&self) -> Result<IpAddr> {
        parse_address(self)
    }
}

impl ToAddress for [u8] {
    fn to_address(&self) -> Result<IpAddr> {
        address_from_bytes(self)
    }
}

impl<const N: usize> ToAddress for [u8; N] {
    fn to_address(&self) -> Result<IpAddr> {
        address_from_bytes(self)
    }
}

impl ToAddress for Vec<u8> {
    fn to_address(&self) -> Result<IpAddr> {
        address_from_bytes(self)
    }
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    fn to_address(&self) -> Result<IpAddr> {
        (**self).to_address()
    }
}

/// Inputs that can be turned into a canonical network
pub trait ToNetwork {
    /// Convert into a canonical network, or fail with `InvalidAddressInput`
    fn to_network(&self) -> Result<IpNetwork>;
}

impl ToNetwork for IpNetwork {
    fn to_network(&self) -> Result<IpNetwork> {
        canonical_network(*self)
    }
}

impl ToNetwork for Ipv4Network {
    fn to_network(&self) -> Result<IpNetwork> {
        Ok(IpNetwork::V4(*self))
    }
}

impl ToNetwork for Ipv6Network {
    fn to_network(&self) -> Result<IpNetwork> {
        canonical_network(IpNetwork::V6(*self))
    }
}

impl ToNetwork for str {
    fn to_network(&self) -> Result<IpNetwork> {
        parse_network(self)
    }
}

impl ToNetwork for String {
    fn to_network(&self) -> Result<IpNetwork> {
        parse_network(self)
    }
}

impl<T: ToNetwork + ?Sized> ToNetwork for &T {
    fn to_network(&self) -> Result<IpNetwork> {
        (**self).to_network()
    }
}
