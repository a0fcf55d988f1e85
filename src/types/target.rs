//! Probe target types and hostname resolution.
//!
//! A target is a host (name or IP literal), a validated port and the protocol
//! used for the primary probe. Hostnames are resolved on every probe so a
//! long-running session follows DNS changes; the resolver itself is built
//! once per prober.

use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tokio::sync::OnceCell;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Protocol used for a probe.
///
/// ICMP is never selectable on the command line; it only runs as the
/// supplementary fallback after a TCP or UDP failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP connect probe (default, no special privileges required).
    #[default]
    Tcp,
    /// UDP datagram probe; needs a service that answers.
    Udp,
    /// ICMP echo probe.
    #[value(skip)]
    Icmp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
            Self::Icmp => write!(f, "ICMP"),
        }
    }
}

/// The immutable host/port/protocol triple a session probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// Hostname or IP literal, as given by the operator.
    pub host: String,
    /// Destination port. Ignored by ICMP but always validated.
    pub port: Port,
    /// Protocol of the primary probe.
    pub protocol: Protocol,
}

impl ProbeTarget {
    /// Create a new probe target.
    pub fn new(
        host: impl Into<String>,
        port: Port,
        protocol: Protocol,
    ) -> Result<Self, TargetError> {
        let host = host.into().trim().to_string();
        if host.is_empty() {
            return Err(TargetError::InvalidFormat(host));
        }
        Ok(Self {
            host,
            port,
            protocol,
        })
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => write!(f, "[{}]:{}", self.host, self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: '{0}'")]
    InvalidFormat(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}

/// Hostname resolver, built on first use and reused for later lookups.
#[derive(Default)]
pub struct HostResolver {
    inner: OnceCell<TokioAsyncResolver>,
}

impl HostResolver {
    /// Create a resolver. Nothing is read from the system until a hostname
    /// actually needs resolving.
    pub fn new() -> Self {
        Self {
            inner: OnceCell::new(),
        }
    }

    /// Resolve a hostname or IP literal to every address it maps to, in the
    /// order the resolver returned them. Never returns an empty list.
    pub async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, TargetError> {
        // IP literals never touch the resolver
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let resolver = self.inner.get_or_init(|| async { system_resolver() }).await;
        let response = resolver
            .lookup_ip(host)
            .await
            .map_err(|e| TargetError::DnsResolutionFailed(host.to_string(), e.to_string()))?;

        let addrs: Vec<IpAddr> = response.iter().collect();
        if addrs.is_empty() {
            return Err(TargetError::NoAddressesFound(host.to_string()));
        }
        Ok(addrs)
    }

    /// Resolve to the first address only.
    pub async fn lookup_first(&self, host: &str) -> Result<IpAddr, TargetError> {
        let addrs = self.lookup(host).await?;
        addrs
            .into_iter()
            .next()
            .ok_or_else(|| TargetError::NoAddressesFound(host.to_string()))
    }
}

impl fmt::Debug for HostResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostResolver")
            .field("initialized", &self.inner.initialized())
            .finish()
    }
}

fn system_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "system resolver config unavailable, using defaults");
        TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn port(p: u16) -> Port {
        Port::new(p).unwrap()
    }

    #[test]
    fn test_protocol_display() {
        assert_eq!(Protocol::Tcp.to_string(), "TCP");
        assert_eq!(Protocol::Udp.to_string(), "UDP");
        assert_eq!(Protocol::Icmp.to_string(), "ICMP");
    }

    #[test]
    fn test_icmp_not_selectable() {
        use clap::ValueEnum;
        let names: Vec<String> = Protocol::value_variants()
            .iter()
            .filter_map(|p| p.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["tcp", "udp"]);
    }

    #[test]
    fn test_target_rejects_empty_host() {
        assert!(ProbeTarget::new("  ", port(80), Protocol::Tcp).is_err());
    }

    #[test]
    fn test_target_display() {
        let v4 = ProbeTarget::new("127.0.0.1", port(80), Protocol::Tcp).unwrap();
        assert_eq!(v4.to_string(), "127.0.0.1:80");

        let v6 = ProbeTarget::new("::1", port(53), Protocol::Udp).unwrap();
        assert_eq!(v6.to_string(), "[::1]:53");

        let named = ProbeTarget::new("example.com", port(443), Protocol::Tcp).unwrap();
        assert_eq!(named.to_string(), "example.com:443");
    }

    #[tokio::test]
    async fn test_resolve_ip_literals() {
        let resolver = HostResolver::new();
        assert_eq!(
            resolver.lookup("127.0.0.1").await.unwrap(),
            vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]
        );
        assert_eq!(
            resolver.lookup_first("::1").await.unwrap(),
            IpAddr::V6(Ipv6Addr::LOCALHOST)
        );
        // Literals are answered without building the system resolver
        assert!(!resolver.inner.initialized());
    }
}
