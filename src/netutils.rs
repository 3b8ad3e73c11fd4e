//! IP and network range expansion used when allocating node addresses.
//!
//! Ranges are comma separated `start-end` items; both ends are inclusive.

use crate::error::ApiError;
use ipnet::{IpNet, Ipv4AddrRange, Ipv4Net, Ipv6AddrRange, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

fn split_range<'a>(item: &'a str, ranges: &str) -> Result<(&'a str, &'a str), ApiError> {
    item.split_once('-')
        .map(|(start, end)| (start.trim(), end.trim()))
        .ok_or_else(|| {
            ApiError::InvalidRange(format!(
                "'{}' in \"{}\" is not of the form START-END",
                item, ranges
            ))
        })
}

fn parse_addr(value: &str) -> Result<IpAddr, ApiError> {
    value
        .parse::<IpAddr>()
        .map_err(|e| ApiError::InvalidRange(format!("Invalid IP address '{}': {}", value, e)))
}

fn parse_net(value: &str) -> Result<IpNet, ApiError> {
    value
        .parse::<IpNet>()
        .map_err(|e| ApiError::InvalidRange(format!("Invalid network '{}': {}", value, e)))
}

/// Expand every range into its addresses, in order.
///
/// Fails with [`ApiError::InsufficientCapacity`] when fewer than `needed`
/// addresses are available.
///
/// `parse_ip_ranges("192.168.1.101-192.168.1.103", 3)` yields `.101`, `.102`
/// and `.103`.
pub fn parse_ip_ranges(ranges: &str, needed: usize) -> Result<Vec<IpAddr>, ApiError> {
    let mut addresses = Vec::new();
    for item in ranges.split(',') {
        let (start, end) = split_range(item, ranges)?;
        match (parse_addr(start)?, parse_addr(end)?) {
            (IpAddr::V4(start), IpAddr::V4(end)) => {
                addresses.extend(Ipv4AddrRange::new(start, end).map(IpAddr::V4))
            }
            (IpAddr::V6(start), IpAddr::V6(end)) => {
                addresses.extend(Ipv6AddrRange::new(start, end).map(IpAddr::V6))
            }
            _ => {
                return Err(ApiError::InvalidRange(format!(
                    "Range '{}' mixes IPv4 and IPv6 addresses",
                    item
                )))
            }
        }
    }

    if addresses.len() < needed {
        return Err(ApiError::InsufficientCapacity {
            ranges: ranges.to_string(),
            available: addresses.len(),
            needed,
        });
    }
    tracing::debug!(ranges, count = addresses.len(), "Expanded IP ranges");
    Ok(addresses)
}

/// First host address of every subnet between `start` and `end` inclusive.
///
/// Subnets advance by the size of the start network, so
/// `10.10.0.1/24-10.10.2.1/24` yields `10.10.0.1`, `10.10.1.1` and `10.10.2.1`.
pub fn parse_network_ranges(ranges: &str) -> Result<Vec<IpAddr>, ApiError> {
    let mut addresses = Vec::new();
    for item in ranges.split(',') {
        let (start, end) = split_range(item, ranges)?;
        match (parse_net(start)?, parse_net(end)?) {
            (IpNet::V4(start), IpNet::V4(end)) => {
                ensure_ordered(start.network() > end.network())?;
                addresses.extend(first_hosts_v4(start, end).into_iter().map(IpAddr::V4));
            }
            (IpNet::V6(start), IpNet::V6(end)) => {
                ensure_ordered(start.network() > end.network())?;
                addresses.extend(first_hosts_v6(start, end).into_iter().map(IpAddr::V6));
            }
            _ => {
                return Err(ApiError::InvalidRange(format!(
                    "Range '{}' mixes IPv4 and IPv6 networks",
                    item
                )))
            }
        }
    }
    Ok(addresses)
}

fn ensure_ordered(reversed: bool) -> Result<(), ApiError> {
    if reversed {
        return Err(ApiError::InvalidRange(
            "Invalid network range, start address is higher than end address".to_string(),
        ));
    }
    Ok(())
}

fn first_hosts_v4(start: Ipv4Net, end: Ipv4Net) -> Vec<Ipv4Addr> {
    let step = 1u64 << (32 - u32::from(start.prefix_len()));
    let last = u64::from(u32::from(end.network()));
    let mut current = u64::from(u32::from(start.network()));
    let mut hosts = Vec::new();
    while current <= last {
        // Network + 1 can only overflow on a /32 at the top of the space.
        if let Ok(host) = u32::try_from(current + 1) {
            hosts.push(Ipv4Addr::from(host));
        }
        current += step;
    }
    hosts
}

fn first_hosts_v6(start: Ipv6Net, end: Ipv6Net) -> Vec<Ipv6Addr> {
    let shift = 128 - u32::from(start.prefix_len());
    let step = 1u128.checked_shl(shift).unwrap_or(0);
    let last = u128::from(end.network());
    let mut current = u128::from(start.network());
    let mut hosts = Vec::new();
    loop {
        if let Some(host) = current.checked_add(1) {
            hosts.push(Ipv6Addr::from(host));
        }
        match current.checked_add(step) {
            Some(next) if step != 0 && next <= last => current = next,
            _ => break,
        }
    }
    hosts
}
