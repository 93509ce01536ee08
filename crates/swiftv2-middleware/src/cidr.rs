//! CIDR list parsing
//!
//! CIDR lists arrive as comma-separated strings (e.g. from environment
//! variables). They are split by address family because routes are only
//! emitted for the family of the interface being configured.

use ipnet::{AddrParseError, IpNet, Ipv4Net, Ipv6Net};
use thiserror::Error;

/// An entry of a CIDR list that is not a valid CIDR
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid CIDR {cidr:?}: {source}")]
pub struct InvalidCidr {
    /// The offending entry, trimmed
    pub cidr: String,
    #[source]
    source: AddrParseError,
}

/// CIDRs of one list, split by address family, in their original order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CidrsByFamily {
    /// IPv4 CIDRs
    pub v4: Vec<Ipv4Net>,
    /// IPv6 CIDRs
    pub v6: Vec<Ipv6Net>,
}

/// Parse a comma-separated CIDR list.
///
/// Surrounding whitespace is ignored and an empty (or blank) list yields no
/// CIDRs. The first entry that is not a valid CIDR is returned as the error.
pub fn parse_cidrs(cidrs: &str) -> Result<CidrsByFamily, InvalidCidr> {
    let mut parsed = CidrsByFamily::default();
    if cidrs.trim().is_empty() {
        return Ok(parsed);
    }
    for cidr in cidrs.split(',').map(str::trim) {
        match cidr.parse::<IpNet>() {
            Ok(IpNet::V4(net)) => parsed.v4.push(net),
            Ok(IpNet::V6(net)) => parsed.v6.push(net),
            Err(source) => {
                return Err(InvalidCidr {
                    cidr: cidr.to_string(),
                    source,
                });
            }
        }
    }
    Ok(parsed)
}
