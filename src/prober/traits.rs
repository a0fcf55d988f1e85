//! Prober trait abstraction.
//!
//! Defines a common interface for all probe strategies so the scheduler can
//! drive any of them, and tests can swap in fakes without real sockets.

use crate::prober::{IcmpProber, ProbeOutcome, TcpProber, UdpProber};
use crate::types::{ProbeTarget, Protocol};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for probe strategy implementations.
///
/// A probe performs exactly one attempt. It never retries and never returns an
/// error; every failure is folded into the outcome.
///
/// # Example
///
/// ```ignore
/// use reachping::prober::{Prober, ProbeOutcome};
///
/// async fn check<P: Prober>(prober: &P, target: &ProbeTarget) -> bool {
///     prober.probe(target, Duration::from_secs(2)).await.is_success()
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Get the protocol this prober speaks.
    fn protocol(&self) -> Protocol;

    /// Check if this prober needs elevated privileges.
    fn requires_privileges(&self) -> bool;

    /// Probe the target once, waiting at most `timeout`.
    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeOutcome;
}

/// A boxed prober for dynamic dispatch.
pub type BoxedProber = Box<dyn Prober>;

/// Create the prober for a protocol.
pub fn create_prober(protocol: Protocol) -> BoxedProber {
    match protocol {
        Protocol::Tcp => Box::new(TcpProber::new()),
        Protocol::Udp => Box::new(UdpProber::new()),
        Protocol::Icmp => Box::new(IcmpProber::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_prober() {
        for protocol in [Protocol::Tcp, Protocol::Udp, Protocol::Icmp] {
            let prober = create_prober(protocol);
            assert_eq!(prober.protocol(), protocol);
            assert_eq!(prober.requires_privileges(), protocol == Protocol::Icmp);
        }
    }
}
