//! UDP echo probe.
//!
//! Sends a small datagram and waits for any reply. UDP is connectionless, so
//! a silent target is indistinguishable from a dropped packet: both time out.
//!
//! # Detection
//!
//! 1. **Datagram received**: the target is alive
//! 2. **Socket error**: reported verbatim (e.g. an ICMP port unreachable
//!    surfaced by the OS)
//! 3. **No response**: timeout

use crate::prober::traits::Prober;
use crate::prober::{deadline_after, FailureReason, ProbeOutcome};
use crate::types::{HostResolver, ProbeTarget, Protocol};
use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

/// Payload sent with every UDP probe.
pub const UDP_PAYLOAD: &[u8; 4] = b"ping";

/// Receive buffer size; only the arrival of a datagram matters.
const RECV_BUFFER_SIZE: usize = 1024;

/// UDP prober.
#[derive(Debug, Default)]
pub struct UdpProber {
    resolver: HostResolver,
}

impl UdpProber {
    /// Create a new UDP prober.
    pub fn new() -> Self {
        Self {
            resolver: HostResolver::new(),
        }
    }

    /// Send the payload from a fresh unconnected socket and wait for a reply.
    async fn exchange(&self, addr: SocketAddr, deadline: Instant) -> io::Result<Option<Duration>> {
        let local: SocketAddr = match addr.ip() {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).await?;

        let start = Instant::now();
        socket.send_to(UDP_PAYLOAD, addr).await?;

        let mut buf = [0u8; RECV_BUFFER_SIZE];
        match timeout_at(deadline, socket.recv_from(&mut buf)).await {
            Ok(Ok(_)) => Ok(Some(start.elapsed())),
            Ok(Err(e)) => Err(e),
            Err(_) => Ok(None),
        }
    }
}

#[async_trait]
impl Prober for UdpProber {
    fn protocol(&self) -> Protocol {
        Protocol::Udp
    }

    fn requires_privileges(&self) -> bool {
        false
    }

    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeOutcome {
        let deadline = deadline_after(timeout);

        let ip = match timeout_at(deadline, self.resolver.lookup_first(&target.host)).await {
            Ok(Ok(ip)) => ip,
            Ok(Err(e)) => return ProbeOutcome::failure(FailureReason::Other(e.to_string())),
            Err(_) => return ProbeOutcome::failure(FailureReason::Timeout),
        };

        let addr = SocketAddr::new(ip, target.port.as_u16());
        let outcome = match self.exchange(addr, deadline).await {
            Ok(Some(latency)) => ProbeOutcome::success(latency),
            Ok(None) => ProbeOutcome::failure(FailureReason::Timeout),
            Err(e) => ProbeOutcome::failure(FailureReason::Other(e.to_string())),
        };
        tracing::debug!(%addr, ?outcome, "udp probe finished");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    fn target(port: u16) -> ProbeTarget {
        ProbeTarget::new("127.0.0.1", Port::new(port).unwrap(), Protocol::Udp).unwrap()
    }

    #[test]
    fn test_payload() {
        assert_eq!(UDP_PAYLOAD, b"ping");
    }

    #[tokio::test]
    async fn test_probe_echo_service() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            if let Ok((n, peer)) = server.recv_from(&mut buf).await {
                assert_eq!(&buf[..n], UDP_PAYLOAD);
                let _ = server.send_to(b"pong", peer).await;
            }
        });

        let outcome = UdpProber::new()
            .probe(&target(port), Duration::from_secs(2))
            .await;
        assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);
    }

    #[tokio::test]
    async fn test_silent_target_times_out() {
        // Bound but never answers
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let timeout = Duration::from_millis(300);
        let start = std::time::Instant::now();
        let outcome = UdpProber::new().probe(&target(port), timeout).await;
        let elapsed = start.elapsed();

        assert_eq!(outcome.reason(), Some(&FailureReason::Timeout));
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_secs(1));
        drop(server);
    }
}
