//! TCP connect probe.
//!
//! Measures how long the operating system takes to complete a TCP handshake
//! with the target. The connection is closed as soon as it is established.
//! A hostname with several addresses is tried address by address until one
//! connects, all within the same deadline.

use crate::prober::traits::Prober;
use crate::prober::{classify_io_error, deadline_after, FailureReason, ProbeOutcome};
use crate::types::{HostResolver, ProbeTarget, Protocol};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};

/// TCP connect prober.
///
/// Uses a standard socket connect() call. Does not require elevated
/// privileges.
#[derive(Debug, Default)]
pub struct TcpProber {
    resolver: HostResolver,
}

impl TcpProber {
    /// Create a new TCP prober.
    pub fn new() -> Self {
        Self {
            resolver: HostResolver::new(),
        }
    }

    /// Connect to `addr` before `deadline`, returning the handshake time.
    async fn attempt_connect(&self, addr: SocketAddr, deadline: Instant) -> ProbeOutcome {
        let start = Instant::now();
        match timeout_at(deadline, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                let latency = start.elapsed();
                drop(stream);
                ProbeOutcome::success(latency)
            }
            Ok(Err(e)) => ProbeOutcome::failure(classify_io_error(&e)),
            Err(_) => ProbeOutcome::failure(FailureReason::Timeout),
        }
    }

    /// Try each address in turn until one connects or the deadline passes.
    /// The last failure is reported when none connect.
    async fn connect_any<I>(&self, addrs: I, deadline: Instant) -> ProbeOutcome
    where
        I: IntoIterator<Item = SocketAddr>,
    {
        let mut outcome = ProbeOutcome::failure(FailureReason::Other("no addresses".into()));
        for addr in addrs {
            outcome = self.attempt_connect(addr, deadline).await;
            tracing::debug!(%addr, ?outcome, "tcp connect attempt finished");
            if outcome.is_success() || outcome.reason() == Some(&FailureReason::Timeout) {
                break;
            }
        }
        outcome
    }
}

#[async_trait]
impl Prober for TcpProber {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    fn requires_privileges(&self) -> bool {
        false
    }

    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeOutcome {
        let deadline = deadline_after(timeout);

        let ips = match timeout_at(deadline, self.resolver.lookup(&target.host)).await {
            Ok(Ok(ips)) => ips,
            Ok(Err(e)) => return ProbeOutcome::failure(FailureReason::Other(e.to_string())),
            Err(_) => return ProbeOutcome::failure(FailureReason::Timeout),
        };

        let port = target.port.as_u16();
        self.connect_any(ips.into_iter().map(|ip| SocketAddr::new(ip, port)), deadline)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use tokio::net::TcpListener;

    fn target(port: u16) -> ProbeTarget {
        ProbeTarget::new("127.0.0.1", Port::new(port).unwrap(), Protocol::Tcp).unwrap()
    }

    #[test]
    fn test_prober_creation() {
        let prober = TcpProber::new();
        assert!(!prober.requires_privileges());
        assert_eq!(prober.protocol(), Protocol::Tcp);
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let outcome = TcpProber::new()
            .probe(&target(port), Duration::from_secs(2))
            .await;

        assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);
        assert!(outcome.latency_ms().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_repeated_probes_all_succeed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let prober = TcpProber::new();

        for _ in 0..5 {
            let outcome = prober.probe(&target(port), Duration::from_secs(2)).await;
            assert!(outcome.is_success());
        }
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        // Grab a free port, then close the listener so nothing is there
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let timeout = Duration::from_secs(2);
        let start = std::time::Instant::now();
        let outcome = TcpProber::new().probe(&target(port), timeout).await;

        assert!(matches!(
            outcome.reason(),
            Some(FailureReason::ConnectionRefused) | Some(FailureReason::Other(_))
        ));
        assert!(start.elapsed() < timeout);
    }

    #[tokio::test]
    async fn test_huge_timeout_still_probes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let outcome = TcpProber::new()
            .probe(&target(port), Duration::from_secs(u64::MAX))
            .await;
        assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);
    }

    #[tokio::test]
    async fn test_falls_through_to_next_address() {
        let closed = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = listener.local_addr().unwrap();

        let prober = TcpProber::new();
        let deadline = deadline_after(Duration::from_secs(2));

        let outcome = prober.connect_any([closed, open], deadline).await;
        assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);

        let outcome = prober.connect_any([closed], deadline).await;
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_unroutable_address_times_out() {
        // TEST-NET-1 is reserved and never routed
        let target =
            ProbeTarget::new("192.0.2.1", Port::new(80).unwrap(), Protocol::Tcp).unwrap();
        let timeout = Duration::from_millis(300);
        let start = std::time::Instant::now();
        let outcome = TcpProber::new().probe(&target, timeout).await;
        let elapsed = start.elapsed();

        match outcome.reason() {
            Some(FailureReason::Timeout) => assert!(elapsed >= timeout),
            // Hosts without any route fail fast instead of waiting
            Some(FailureReason::Other(message)) => {
                assert!(message.to_lowercase().contains("unreachable"), "{}", message)
            }
            other => panic!("unexpected reason: {:?}", other),
        }
        assert!(elapsed < timeout + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_other() {
        let target = ProbeTarget::new("host.invalid", Port::new(80).unwrap(), Protocol::Tcp)
            .unwrap();
        let outcome = TcpProber::new()
            .probe(&target, Duration::from_secs(5))
            .await;

        assert!(matches!(
            outcome.reason(),
            Some(FailureReason::Other(_)) | Some(FailureReason::Timeout)
        ));
    }
}
